//! Pattern Renderer - tiling geometry and SVG composition
//!
//! One tile is the full sett drawn twice: horizontal bands unmasked, then the
//! same bands rotated to vertical under the weave mask so crossings show the
//! over/under interlace. Tiles are laid out on a grid and clipped to the
//! requested size.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TartanError};
use crate::pattern::PatternDefinition;

/// Upper bound on emitted tiles per document.
pub const MAX_TILES: u64 = 1_000_000;

/// 8x8 user-space tile of two "over" triangles, plus the mask built from it.
/// Identical for every pattern; kept byte-for-byte for visual diffing.
pub const WEAVE_MASK_DEFS: &str = r##"  <defs>
    <pattern id="pattern" x="0" y="0" width="8" height="8" patternUnits="userSpaceOnUse">
      <polygon points="0,4 0,8 8,0 4,0" fill="#ffffff"></polygon>
      <polygon points="4,8 8,8 8,4" fill="#ffffff"></polygon>
    </pattern>
    <mask id="grating" x="0" y="0" width="1" height="1">
      <rect x="0" y="0" width="100%" height="100%" fill="url(#pattern)"></rect>
    </mask>
  </defs>"##;

/// Requested output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum RenderSize {
    /// Exactly one unscaled tile.
    Sett,
    /// Target pixels per axis; a missing axis falls back to the sett size.
    Pixels { width: Option<u32>, height: Option<u32> },
    /// `repeat x repeat` tiles, no over-tiling correction.
    Square { repeat: u32 },
}

impl Default for RenderSize {
    fn default() -> Self {
        Self::Sett
    }
}

/// Document size and tile grid for one render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tiling {
    pub sett_size: f64,
    pub width: f64,
    pub height: f64,
    pub repeat_x: u32,
    pub repeat_y: u32,
}

impl Tiling {
    pub fn compute(sett_size: f64, size: RenderSize) -> Result<Self> {
        let tiling = match size {
            RenderSize::Sett => Self::cover(sett_size, sett_size, sett_size)?,
            RenderSize::Pixels { width, height } => {
                let axis = |target: Option<u32>| match target {
                    Some(px) if px > 0 => f64::from(px),
                    _ => sett_size,
                };
                Self::cover(sett_size, axis(width), axis(height))?
            }
            RenderSize::Square { repeat } => {
                let repeat = repeat.max(1);
                let side = sett_size * f64::from(repeat);
                Self {
                    sett_size,
                    width: side,
                    height: side,
                    repeat_x: repeat,
                    repeat_y: repeat,
                }
            }
        };

        if tiling.tile_count() > MAX_TILES {
            return Err(TartanError::TileGrid(format!(
                "{}x{} tiles of sett {} exceeds the {MAX_TILES}-tile limit",
                tiling.repeat_x, tiling.repeat_y, sett_size
            )));
        }
        Ok(tiling)
    }

    fn cover(sett_size: f64, width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            sett_size,
            width,
            height,
            repeat_x: cover_repeats(width, sett_size)?,
            repeat_y: cover_repeats(height, sett_size)?,
        })
    }

    pub fn tile_count(&self) -> u64 {
        u64::from(self.repeat_x) * u64::from(self.repeat_y)
    }
}

/// `ceil(out / sett)` plus one more whenever `out` is not an exact multiple.
/// The extra tile is intentional; outputs depend on it.
pub fn cover_repeats(out: f64, sett_size: f64) -> Result<u32> {
    let too_many = || {
        TartanError::TileGrid(format!("{out} units cannot be tiled by a sett of {sett_size}"))
    };

    let tiles = (out / sett_size).ceil();
    if !tiles.is_finite() || tiles > f64::from(u32::MAX) {
        return Err(too_many());
    }
    let extra = u32::from(out % sett_size != 0.0);
    (tiles as u32).checked_add(extra).ok_or_else(too_many)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Rendered markup plus the geometry that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPattern {
    pub svg: String,
    pub tiling: Tiling,
}

pub fn render(pattern: &PatternDefinition, size: RenderSize) -> Result<RenderedPattern> {
    for key in pattern.unresolved_refs() {
        warn!(pattern = %pattern.name, key, "stripe color not in palette; rendering empty fill");
    }

    let tiling = Tiling::compute(pattern.sett_size(), size)?;
    let horiz = stripe_group(pattern, Axis::Horizontal);
    let vert = stripe_group(pattern, Axis::Vertical);
    let (w, h) = (tiling.width, tiling.height);

    let mut svg = format!(
        r#"<svg viewBox="0 0 {w} {h}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">
{WEAVE_MASK_DEFS}
  <clipPath id="dimensionClip">
    <rect x="0" y="0" width="{w}" height="{h}" />
  </clipPath>
  <g id="tartan" clip-path="url(#dimensionClip)">"#
    );

    for row in 0..tiling.repeat_y {
        for col in 0..tiling.repeat_x {
            let x = f64::from(col) * tiling.sett_size;
            let y = f64::from(row) * tiling.sett_size;
            svg.push_str(&format!(
                r#"
    <g transform="translate({x}, {y})">
      <g class="horizStripes">{horiz}</g>
      <g class="vertStripes" mask="url(#grating)">{vert}</g>
    </g>
"#
            ));
        }
    }

    svg.push_str("  </g>\n</svg>");
    Ok(RenderedPattern { svg, tiling })
}

fn stripe_group(pattern: &PatternDefinition, axis: Axis) -> String {
    let mut group = String::new();
    let mut offset = 0.0;
    for stripe in &pattern.stripes {
        let fill = pattern.resolve_color(stripe).unwrap_or_default();
        let width = stripe.width;
        group.push_str(&match axis {
            Axis::Horizontal => format!(
                r#"<rect fill="{fill}" height="{width}" width="100%" x="0" y="{offset}"></rect>"#
            ),
            Axis::Vertical => format!(
                r#"<rect fill="{fill}" height="100%" width="{width}" x="{offset}" y="0"></rect>"#
            ),
        });
        offset += width;
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Palette, Stripe};

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
    fn test_cover_repeats_double_rounds() {
        assert_eq!(cover_repeats(40.0, 16.0).unwrap(), 4);
        assert_eq!(cover_repeats(20.0, 16.0).unwrap(), 3);
        assert_eq!(cover_repeats(32.0, 16.0).unwrap(), 2);
        assert_eq!(cover_repeats(16.0, 16.0).unwrap(), 1);
        assert_eq!(cover_repeats(1.0, 16.0).unwrap(), 2);
    }

    #[test]
    fn test_tiny_sett_is_rejected_not_wrapped() {
        let err = cover_repeats(40.5, 1e-9).unwrap_err();
        assert!(matches!(err, TartanError::TileGrid(_)));

        let size = RenderSize::Pixels { width: Some(41), height: Some(41) };
        assert!(matches!(Tiling::compute(1e-9, size), Err(TartanError::TileGrid(_))));
        assert!(Tiling::compute(1e-9, RenderSize::Sett).is_ok());
    }

    #[test]
    fn test_tile_limit_enforced() {
        let size = RenderSize::Square { repeat: 1001 };
        assert!(matches!(Tiling::compute(16.0, size), Err(TartanError::TileGrid(_))));

        let size = RenderSize::Square { repeat: 1000 };
        assert_eq!(Tiling::compute(16.0, size).unwrap().tile_count(), MAX_TILES);
    }

    #[test]
    fn test_tiny_sett_pattern_fails_to_render() {
        let mut pattern = highland();
        pattern.stripes = vec![Stripe::new(1e-9, "black")];
        let size = RenderSize::Pixels { width: Some(41), height: Some(41) };
        assert!(render(&pattern, size).is_err());
    }

    #[test]
    fn test_default_size_is_one_tile() {
        let tiling = Tiling::compute(16.0, RenderSize::Sett).unwrap();
        assert_eq!((tiling.width, tiling.height), (16.0, 16.0));
        assert_eq!((tiling.repeat_x, tiling.repeat_y), (1, 1));
    }

    #[test]
    fn test_pixels_axes_are_independent() {
        let tiling = Tiling::compute(16.0, RenderSize::Pixels { width: Some(40), height: None }).unwrap();
        assert_eq!((tiling.width, tiling.height), (40.0, 16.0));
        assert_eq!((tiling.repeat_x, tiling.repeat_y), (4, 1));
    }

    #[test]
    fn test_zero_pixel_target_falls_back_to_sett() {
        let tiling = Tiling::compute(16.0, RenderSize::Pixels { width: Some(0), height: Some(0) }).unwrap();
        assert_eq!((tiling.width, tiling.height), (16.0, 16.0));
    }

    #[test]
    fn test_square_mode_has_no_correction() {
        let tiling = Tiling::compute(16.0, RenderSize::Square { repeat: 3 }).unwrap();
        assert_eq!((tiling.width, tiling.height), (48.0, 48.0));
        assert_eq!((tiling.repeat_x, tiling.repeat_y), (3, 3));

        let single = Tiling::compute(16.0, RenderSize::Square { repeat: 1 }).unwrap();
        assert_eq!(single, Tiling::compute(16.0, RenderSize::Sett).unwrap());
    }

    #[test]
    fn test_stripe_groups_stack_offsets() {
        let pattern = highland();
        assert_eq!(
            stripe_group(&pattern, Axis::Horizontal),
            r##"<rect fill="#1B1B1C" height="10" width="100%" x="0" y="0"></rect><rect fill="#2E4E3F" height="6" width="100%" x="0" y="10"></rect>"##
        );
        assert_eq!(
            stripe_group(&pattern, Axis::Vertical),
            r##"<rect fill="#1B1B1C" height="100%" width="10" x="0" y="0"></rect><rect fill="#2E4E3F" height="100%" width="6" x="10" y="0"></rect>"##
        );
    }

    #[test]
    fn test_fractional_widths_keep_precision() {
        let mut pattern = highland();
        pattern.stripes[0].width = 2.5;
        let group = stripe_group(&pattern, Axis::Vertical);
        assert!(group.contains(r#"width="2.5" x="0""#));
        assert!(group.contains(r#"width="6" x="2.5""#));
    }

    #[test]
    fn test_unresolved_key_renders_empty_fill() {
        let mut pattern = highland();
        pattern.stripes[1].color = "missingKey".to_string();
        let svg = render(&pattern, RenderSize::Sett).unwrap().svg;
        assert!(svg.contains(r#"<rect fill="" height="6""#));
    }

    #[test]
    fn test_document_skeleton() {
        let svg = render(&highland(), RenderSize::Sett).unwrap().svg;
        assert!(svg.starts_with(
            r#"<svg viewBox="0 0 16 16" width="16" height="16" xmlns="http://www.w3.org/2000/svg">"#
        ));
        assert!(svg.contains(WEAVE_MASK_DEFS));
        assert!(svg.contains(r#"<rect x="0" y="0" width="16" height="16" />"#));
        assert!(svg.ends_with("    </g>\n  </g>\n</svg>"));
    }
}
