//! sRGB color type
//!
//! Source bitmaps, canvas tiles and palette swatches are all 8-bit sRGB.

use std::str::FromStr;

use crate::palette::ParseColorError;

/// An 8-bit color in sRGB color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Srgb {
    /// Red channel (gamma-encoded, 0..=255)
    pub r: u8,
    /// Green channel (gamma-encoded, 0..=255)
    pub g: u8,
    /// Blue channel (gamma-encoded, 0..=255)
    pub b: u8,
}

impl Srgb {
    /// Create a new sRGB color from 8-bit channels.
    ///
    /// # Example
    /// ```
    /// use palette_match::Srgb;
    /// let red = Srgb::new(255, 0, 0);
    /// assert_eq!(red.to_bytes(), [255, 0, 0]);
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an Srgb color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Format as a `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse an sRGB color from a hex string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`. Parsing is
    /// case-insensitive. Leading and trailing whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use palette_match::Srgb;
    ///
    /// let white: Srgb = "#FFFFFF".parse().unwrap();
    /// assert_eq!(white, Srgb::new(255, 255, 255));
    ///
    /// let red: Srgb = "#F00".parse().unwrap();
    /// assert_eq!(red, Srgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_hex() {
        let color: Srgb = "#ed1c24".parse().unwrap();
        assert_eq!(color, Srgb::new(237, 28, 36));
    }

    #[test]
    fn test_parse_without_hash_and_whitespace() {
        let color: Srgb = "  3C3C3C ".parse().unwrap();
        assert_eq!(color, Srgb::new(60, 60, 60));
    }

    #[test]
    fn test_parse_shorthand() {
        let color: Srgb = "#0f8".parse().unwrap();
        assert_eq!(color, Srgb::new(0, 255, 136));
    }

    #[test]
    fn test_parse_invalid_length() {
        let result: Result<Srgb, _> = "#12345".parse();
        assert_eq!(result, Err(ParseColorError::InvalidLength));
    }

    #[test]
    fn test_parse_invalid_hex() {
        let result: Result<Srgb, _> = "#GG0000".parse();
        assert!(matches!(result, Err(ParseColorError::InvalidHex(_))));
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Srgb::new(250, 128, 114);
        assert_eq!(color.to_hex(), "#fa8072");
        assert_eq!(color.to_hex().parse::<Srgb>().unwrap(), color);
    }
}
