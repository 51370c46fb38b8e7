//! Color derivation for features and feature types
//!
//! A feature carries a `#RRGGBB` base color. Each of its types is tinted by
//! applying the shade's alpha to that base color, leaving the RGB channels
//! untouched. The CSS strings produced here are the rendering contract.

use crate::model::Shade;

/// Alpha used for list tags (`{color}33` in CSS hex notation)
pub const TAG_BACKGROUND_ALPHA: u8 = 0x33;

/// Fallback tag colors for a type whose feature is unknown
pub const UNKNOWN_TAG_BACKGROUND: &str = "#333";
pub const UNKNOWN_TAG_BORDER: &str = "#555";
pub const UNKNOWN_TAG_TEXT: &str = "#888";

/// An RGB triple parsed from a hex color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn parse_hex(color: &str) -> Option<Self> {
        let hex = color.strip_prefix('#').unwrap_or(color);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Blend over a background as if painted with `alpha`
    ///
    /// Terminals have no alpha channel, so translucent tints are flattened
    /// against the background they are drawn on.
    pub fn blend_over(self, background: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| {
            (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgb {
            r: mix(self.r, background.r),
            g: mix(self.g, background.g),
            b: mix(self.b, background.b),
        }
    }
}

/// Format an alpha the way the CSS strings do: `0.3`, `0.6`, `1`
fn format_alpha(alpha: f32) -> String {
    if (alpha - 1.0).abs() < f32::EPSILON {
        "1".to_string()
    } else {
        format!("{}", (alpha * 10.0).round() / 10.0)
    }
}

/// Display tint for a type: `rgba(r, g, b, alpha)` from the feature color
///
/// An unparsable base color is returned unchanged.
pub fn shade_color(base_color: &str, shade: Shade) -> String {
    match Rgb::parse_hex(base_color) {
        Some(Rgb { r, g, b }) => {
            format!("rgba({}, {}, {}, {})", r, g, b, format_alpha(shade.alpha()))
        }
        None => base_color.to_string(),
    }
}

/// Validate a feature base color before it is stored
pub fn is_valid_hex(color: &str) -> bool {
    color.starts_with('#') && Rgb::parse_hex(color).is_some()
}

/// Colors used for a tag chip in entity lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStyle {
    pub background: String,
    pub border: String,
    pub text: String,
}

impl TagStyle {
    /// Style for a tag whose parent feature color is known (or not)
    pub fn for_feature_color(color: Option<&str>) -> Self {
        match color {
            Some(color) => Self {
                background: format!("{}{:02x}", color, TAG_BACKGROUND_ALPHA),
                border: color.to_string(),
                text: color.to_string(),
            },
            None => Self {
                background: UNKNOWN_TAG_BACKGROUND.to_string(),
                border: UNKNOWN_TAG_BORDER.to_string(),
                text: UNKNOWN_TAG_TEXT.to_string(),
            },
        }
    }
}
