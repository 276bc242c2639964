use serde::{Deserialize, Serialize};

/// Neutral grey used when a feature carries no usable color.
pub const DEFAULT_COLOR_HEX: &str = "#808080";

/// A display color: either a `#RRGGBB` hex string or an RGB triple in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Hex(String),
    Rgb([f64; 3]),
}

impl Color {
    pub fn hex(s: impl Into<String>) -> Self {
        Color::Hex(s.into())
    }

    /// Convert to an RGB triple in `[0, 1]`.
    ///
    /// Returns `None` for malformed hex strings.
    pub fn to_rgb(&self) -> Option<[f64; 3]> {
        match self {
            Color::Rgb(rgb) => Some(*rgb),
            Color::Hex(s) => {
                let digits = s.strip_prefix('#')?;
                if digits.len() < 6 || !digits.is_ascii() {
                    return None;
                }
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 2], 16)
                        .ok()
                        .map(|v| f64::from(v) / 255.0)
                };
                Some([channel(0)?, channel(2)?, channel(4)?])
            }
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Hex(DEFAULT_COLOR_HEX.to_string())
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Color::Hex(s.to_string())
    }
}

impl From<[f64; 3]> for Color {
    fn from(rgb: [f64; 3]) -> Self {
        Color::Rgb(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_to_unit_rgb() {
        let rgb = Color::hex("#FF8000").to_rgb().unwrap();
        assert_eq!(rgb[0], 1.0);
        assert!((rgb[1] - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(rgb[2], 0.0);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(Color::hex("808080").to_rgb().is_none());
        assert!(Color::hex("#80").to_rgb().is_none());
        assert!(Color::hex("#GG0000").to_rgb().is_none());
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        assert!(Color::hex("#aé000").to_rgb().is_none());
        assert!(Color::hex("#ffé00ff").to_rgb().is_none());
        assert!(Color::hex("#ff00ffé").to_rgb().is_none());
    }

    #[test]
    fn untagged_serde_accepts_both_forms() {
        let hex: Color = serde_json::from_str("\"#123456\"").unwrap();
        assert_eq!(hex, Color::hex("#123456"));
        let rgb: Color = serde_json::from_str("[0.5, 0.25, 1.0]").unwrap();
        assert_eq!(rgb, Color::Rgb([0.5, 0.25, 1.0]));
    }
}
