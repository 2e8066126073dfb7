//! Pattern Model - Palette, Stripes and the Sett they form

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Color key to `#RRGGBB` value.
pub type Palette = BTreeMap<String, String>;

pub const NAME_FIELD: &str = "name";
pub const COLORS_FIELD: &str = "colors";
pub const STRIPES_FIELD: &str = "stripes";
pub const STRIPE_COLOR_FIELD: &str = "color";

const COLORS_ALIASES: &[&str] = &["palette"];
const STRIPES_ALIASES: &[&str] = &["sett", "sequences"];
const STRIPE_COLOR_ALIASES: &[&str] = &["colorRef"];

/// A validated tartan definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub name: String,
    pub colors: Palette,
    pub stripes: Vec<Stripe>,
}

/// One colored band of the sett.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stripe {
    /// Thickness in pattern units (1 unit = 1px unscaled).
    pub width: f64,
    /// Literal `#RRGGBB` or a palette key.
    pub color: String,
}

impl Stripe {
    pub fn new(width: f64, color: impl Into<String>) -> Self {
        Self { width, color: color.into() }
    }

    pub fn is_literal(&self) -> bool {
        self.color.starts_with('#')
    }
}

impl PatternDefinition {
    /// Length of one full period along either axis.
    pub fn sett_size(&self) -> f64 {
        self.stripes.iter().map(|s| s.width).sum()
    }

    /// Resolve a stripe's fill. Palette keys that do not exist yield `None`;
    /// the renderer emits those as an empty fill rather than failing.
    pub fn resolve_color<'a>(&'a self, stripe: &'a Stripe) -> Option<&'a str> {
        if stripe.is_literal() {
            Some(stripe.color.as_str())
        } else {
            self.colors.get(&stripe.color).map(String::as_str)
        }
    }

    /// Palette references that do not resolve, in stripe order.
    pub fn unresolved_refs(&self) -> Vec<&str> {
        self.stripes
            .iter()
            .filter(|s| self.resolve_color(s).is_none())
            .map(|s| s.color.as_str())
            .collect()
    }
}

/// `#RRGGBB`, case-insensitive, nothing else.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Rewrite historical field names onto the canonical ones.
///
/// `palette` becomes `colors`, `sett`/`sequences` become `stripes`, and a
/// stripe's `colorRef` becomes `color`. A canonical field that is already
/// present wins and the aliases are dropped. Non-object input is returned
/// untouched so the validator can report it.
pub fn normalize_aliases(raw: Value) -> Value {
    let Value::Object(mut map) = raw else {
        return raw;
    };

    adopt_alias(&mut map, COLORS_FIELD, COLORS_ALIASES);
    adopt_alias(&mut map, STRIPES_FIELD, STRIPES_ALIASES);

    if let Some(Value::Array(stripes)) = map.get_mut(STRIPES_FIELD) {
        for stripe in stripes.iter_mut() {
            if let Value::Object(fields) = stripe {
                adopt_alias(fields, STRIPE_COLOR_FIELD, STRIPE_COLOR_ALIASES);
            }
        }
    }

    Value::Object(map)
}

fn adopt_alias(map: &mut Map<String, Value>, canonical: &str, aliases: &[&str]) {
    for alias in aliases {
        if let Some(value) = map.shift_remove(*alias) {
            if !map.contains_key(canonical) {
                map.insert(canonical.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn highland() -> PatternDefinition {
        PatternDefinition {
            name: "Highland".to_string(),
            colors: Palette::from([
                ("black".to_string(), "#1B1B1C".to_string()),
                ("green".to_string(), "#2E4E3F".to_string()),
            ]),
            stripes: vec![Stripe::new(10.0, "black"), Stripe::new(6.0, "green")],
        }
    }

    #[test]
    fn test_sett_size_is_width_sum() {
        assert_eq!(highland().sett_size(), 16.0);
    }

    #[test]
    fn test_literal_color_ignores_palette() {
        let mut pattern = highland();
        pattern.colors.insert("#FF0000".to_string(), "#000000".to_string());
        let stripe = Stripe::new(2.0, "#FF0000");
        assert_eq!(pattern.resolve_color(&stripe), Some("#FF0000"));
    }

    #[test]
    fn test_missing_key_is_unresolved() {
        let mut pattern = highland();
        pattern.stripes.push(Stripe::new(1.0, "missingKey"));
        assert_eq!(pattern.resolve_color(&pattern.stripes[2]), None);
        assert_eq!(pattern.unresolved_refs(), vec!["missingKey"]);
    }

    #[test]
    fn test_hex_color_format() {
        assert!(is_hex_color("#1b1B1c"));
        assert!(!is_hex_color("#ZZZZZZ"));
        assert!(!is_hex_color("red"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#1234567"));
    }

    #[test]
    fn test_sett_alias_normalized() {
        let raw = json!({"name": "a", "palette": {"k": "#000000"}, "sett": [{"width": 1, "colorRef": "k"}]});
        let normalized = normalize_aliases(raw);
        assert_eq!(
            normalized,
            json!({"name": "a", "colors": {"k": "#000000"}, "stripes": [{"width": 1, "color": "k"}]})
        );
    }

    #[test]
    fn test_canonical_field_wins_over_alias() {
        let raw = json!({"stripes": [{"width": 2, "color": "a"}], "sequences": [{"width": 9, "color": "b"}]});
        let normalized = normalize_aliases(raw);
        assert_eq!(normalized, json!({"stripes": [{"width": 2, "color": "a"}]}));
    }
}
