//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for palette validation.
///
/// Every variant is a configuration error: a palette that fails validation
/// cannot be used for matching at all.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// No paintable (non-transparent) colors provided
    EmptyPalette,
    /// More entries than the canvas can ever offer
    TooManyEntries {
        /// Number of entries provided
        count: usize,
        /// Maximum number of entries allowed
        max: usize,
    },
    /// The same id appears twice
    DuplicateId {
        /// The repeated id
        id: u8,
    },
    /// A paintable entry has NaN or infinite perceptual coordinates
    InvalidCoordinates {
        /// Id of the offending entry
        id: u8,
    },
    /// Invalid hex color string
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => {
                write!(f, "palette has no paintable colors")
            }
            PaletteError::TooManyEntries { count, max } => {
                write!(f, "palette has {} entries, at most {} allowed", count, max)
            }
            PaletteError::DuplicateId { id } => {
                write!(f, "duplicate palette id {}", id)
            }
            PaletteError::InvalidCoordinates { id } => {
                write!(f, "palette id {} has non-finite color coordinates", id)
            }
            PaletteError::ParseColor(err) => {
                write!(f, "invalid color: {}", err)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_error_messages() {
        assert_eq!(
            PaletteError::EmptyPalette.to_string(),
            "palette has no paintable colors"
        );
        assert_eq!(
            PaletteError::TooManyEntries { count: 70, max: 64 }.to_string(),
            "palette has 70 entries, at most 64 allowed"
        );
        assert_eq!(
            PaletteError::DuplicateId { id: 5 }.to_string(),
            "duplicate palette id 5"
        );
    }

    #[test]
    fn test_parse_error_source_chain() {
        use std::error::Error;

        let parse_err = "zz".parse::<u8>().unwrap_err();
        let err = PaletteError::from(ParseColorError::from(parse_err));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("invalid color: invalid hex character"));
    }
}
