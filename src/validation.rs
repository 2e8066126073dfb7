//! Validation System - ordered, fail-fast configuration rules
//!
//! Rules run in a fixed order and the first violation wins, so the same
//! bad document always reports the same message. Palette keys referenced by
//! stripes are NOT checked here; the renderer resolves them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, TartanError};
use crate::pattern::{
    is_hex_color, normalize_aliases, PatternDefinition, COLORS_FIELD, NAME_FIELD,
    STRIPES_FIELD, STRIPE_COLOR_FIELD,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub message: String,
}

impl ValidationViolation {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self { rule: rule.to_string(), message: message.into() }
    }
}

impl From<ValidationViolation> for TartanError {
    fn from(v: ValidationViolation) -> Self {
        TartanError::InvalidConfig(v.message)
    }
}

/// Validation rule trait - reports the first violation it finds
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn check(&self, config: &Map<String, Value>) -> std::result::Result<(), ValidationViolation>;
}

// --- Concrete Rules ---

pub struct NameRule;

impl ValidationRule for NameRule {
    fn name(&self) -> &'static str { "name" }

    fn check(&self, config: &Map<String, Value>) -> std::result::Result<(), ValidationViolation> {
        match config.get(NAME_FIELD) {
            Some(Value::String(name)) if !name.is_empty() => Ok(()),
            _ => Err(ValidationViolation::new(
                self.name(),
                "Pattern configuration missing required field: name",
            )),
        }
    }
}

pub struct PaletteRule;

impl ValidationRule for PaletteRule {
    fn name(&self) -> &'static str { "palette" }

    fn check(&self, config: &Map<String, Value>) -> std::result::Result<(), ValidationViolation> {
        let colors = match config.get(COLORS_FIELD) {
            Some(Value::Object(colors)) if !colors.is_empty() => colors,
            _ => {
                return Err(ValidationViolation::new(
                    self.name(),
                    "Pattern configuration missing required field: colors",
                ))
            }
        };

        for (key, value) in colors {
            let Value::String(color) = value else {
                return Err(ValidationViolation::new(
                    self.name(),
                    format!("Color `{key}` has invalid value: {value}"),
                ));
            };
            if !is_hex_color(color) {
                return Err(ValidationViolation::new(
                    self.name(),
                    format!("Color `{key}` has invalid hex format: {color}"),
                ));
            }
        }
        Ok(())
    }
}

pub struct StripesRule;

impl ValidationRule for StripesRule {
    fn name(&self) -> &'static str { "stripes" }

    fn check(&self, config: &Map<String, Value>) -> std::result::Result<(), ValidationViolation> {
        let stripes = match config.get(STRIPES_FIELD) {
            Some(Value::Array(stripes)) if !stripes.is_empty() => stripes,
            _ => {
                return Err(ValidationViolation::new(
                    self.name(),
                    "Pattern configuration missing required field: stripes (must be a non-empty array)",
                ))
            }
        };

        for (index, stripe) in stripes.iter().enumerate() {
            let Value::Object(fields) = stripe else {
                return Err(ValidationViolation::new(
                    self.name(),
                    format!("Invalid stripe {index}: {stripe}"),
                ));
            };

            let width_ok = fields
                .get("width")
                .and_then(Value::as_f64)
                .is_some_and(|w| w > 0.0);
            if !width_ok {
                return Err(ValidationViolation::new(
                    self.name(),
                    format!("Invalid width in stripe {index}: {stripe}"),
                ));
            }

            let color_ok = fields
                .get(STRIPE_COLOR_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|c| !c.trim().is_empty());
            if !color_ok {
                return Err(ValidationViolation::new(
                    self.name(),
                    format!("Invalid color in stripe {index}: {stripe}"),
                ));
            }
        }
        Ok(())
    }
}

/// Validator runs the rules in order and converts the document to the typed model
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(NameRule),
                Box::new(PaletteRule),
                Box::new(StripesRule),
            ],
        }
    }

    /// Check a raw document without converting it.
    pub fn check(&self, raw: &Value) -> std::result::Result<(), ValidationViolation> {
        let Value::Object(config) = raw else {
            return Err(ValidationViolation::new(
                "object",
                "Pattern configuration must be an object",
            ));
        };

        for rule in &self.rules {
            rule.check(config)?;
            debug!(rule = rule.name(), "validation rule passed");
        }
        Ok(())
    }

    /// Normalize field aliases, validate, and produce a `PatternDefinition`.
    pub fn validate(&self, raw: Value) -> Result<PatternDefinition> {
        let raw = normalize_aliases(raw);
        self.check(&raw)?;
        serde_json::from_value(raw).map_err(|e| TartanError::InvalidConfig(e.to_string()))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
