//! RGB colour type used for run font colours.
use std::fmt;

/// An RGB colour value.
///
/// Word stores run colours as six hex digits (`w:color w:val="FF0000"`).
/// The special value `auto` is not a colour and reads as "unset".
///
/// # Examples
///
/// ```rust
/// use longan::common::RGBColor;
///
/// let red = RGBColor::new(255, 0, 0);
/// let blue = RGBColor::from_hex("0000FF").unwrap();
/// assert_eq!(red.to_hex(), "FF0000");
/// assert_eq!(blue.b, 255);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string.
    ///
    /// Accepts `"FF0000"` or `"#FF0000"`. Returns `None` for anything else,
    /// including Word's `auto`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Convert to hex string (without # prefix), as written to `w:val`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(RGBColor::from_hex("1F3864"), Some(RGBColor::new(0x1F, 0x38, 0x64)));
        assert_eq!(RGBColor::from_hex("#00ff00"), Some(RGBColor::new(0, 255, 0)));
        assert_eq!(RGBColor::from_hex("auto"), None);
        assert_eq!(RGBColor::from_hex("FF00"), None);
        assert_eq!(RGBColor::from_hex("ÿÿÿ"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RGBColor::new(255, 0, 128).to_string(), "#FF0080");
    }
}
