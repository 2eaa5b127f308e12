//! Color type, default palette colors, and CSS color conversion
//!
//! Colors are plain `image::Rgba<u8>` values. Alpha 255 is opaque and alpha 0
//! is fully transparent; CSS output renders alpha as a 0..1 fraction.
//!
//! Parsing supports:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Anything else CSS understands: `rgb()`, `hsl()`, named colors, ...

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// An RGBA color. Equality is component-wise.
pub type Color = Rgba<u8>;

/// Fully transparent color returned for blank or invalid palette indices.
pub const BLANK_COLOR: Color = Rgba([0, 0, 0, 0]);

/// Seed colors used when a palette is created without explicit colors.
pub const DEFAULT_COLORS: [Color; 8] = [
    Rgba([0, 0, 0, 255]),       // Black
    Rgba([255, 255, 255, 255]), // White
    Rgba([255, 0, 0, 255]),     // Red
    Rgba([0, 255, 0, 255]),     // Green
    Rgba([0, 0, 255, 255]),     // Blue
    Rgba([255, 255, 0, 255]),   // Yellow
    Rgba([0, 255, 255, 255]),   // Teal
    Rgba([255, 0, 255, 255]),   // Pink
];

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a CSS color string into a [`Color`].
///
/// # Examples
///
/// ```
/// use pxsprite::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#00FF0080").unwrap(), image::Rgba([0, 255, 0, 128]));
/// assert_eq!(parse_color("blue").unwrap(), image::Rgba([0, 0, 255, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_css_color(s),
    }
}

/// Format a color the way a 2D canvas `fillStyle` expects it.
///
/// ```
/// use pxsprite::color::to_css;
///
/// assert_eq!(to_css(image::Rgba([255, 0, 0, 255])), "rgba(255, 0, 0, 1)");
/// assert_eq!(to_css(image::Rgba([0, 0, 0, 0])), "rgba(0, 0, 0, 0)");
/// ```
pub fn to_css(color: Color) -> String {
    let [r, g, b, a] = color.0;
    let alpha = f64::from(a) / 255.0;
    // Trim to three decimals so 128 prints as 0.502 rather than a long float
    let alpha = (alpha * 1000.0).round() / 1000.0;
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// Whether a color is fully transparent and should clear rather than paint.
pub fn is_transparent(color: Color) -> bool {
    color.0[3] == 0
}

fn parse_hex_color(hex: &str) -> Result<Color, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, ColorError>>()?;

    match digits.as_slice() {
        // Short forms double each digit: #F00 -> #FF0000
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, a1 * 16 + a0]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

fn parse_css_color(s: &str) -> Result<Color, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
                (rgb.alpha * 255.0).round() as u8,
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#FFF"), Ok(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_color("#F008"), Ok(Rgba([255, 0, 0, 136])));
        assert_eq!(parse_color("#0a141e"), Ok(Rgba([10, 20, 30, 255])));
        assert_eq!(parse_color("#0A141E00"), Ok(Rgba([10, 20, 30, 0])));
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#GG0000"), Err(ColorError::InvalidHex('G')));
    }

    #[test]
    fn test_parse_css_functional_and_named() {
        assert_eq!(parse_color("rgb(255, 0, 255)"), Ok(Rgba([255, 0, 255, 255])));
        assert_eq!(parse_color("yellow"), Ok(Rgba([255, 255, 0, 255])));
        assert_eq!(parse_color("transparent"), Ok(Rgba([0, 0, 0, 0])));
        assert!(matches!(parse_color("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_default_colors_are_opaque_and_distinct() {
        for (i, a) in DEFAULT_COLORS.iter().enumerate() {
            assert_eq!(a.0[3], 255);
            for b in &DEFAULT_COLORS[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(DEFAULT_COLORS[2], Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_to_css_fractional_alpha() {
        assert_eq!(to_css(Rgba([1, 2, 3, 128])), "rgba(1, 2, 3, 0.502)");
        assert!(is_transparent(BLANK_COLOR));
        assert!(!is_transparent(DEFAULT_COLORS[0]));
    }
}
