//! Color normalization.
//!
//! Every visual element stores its colors as a [`Color`] triple. Callers may
//! hand in tuples, arrays or `#RRGGBB` strings; they all pass through
//! [`normalize`] first, so hex strings never reach storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Black (0, 0, 0).
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// White (255, 255, 255).
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelgen::color::Color;
    ///
    /// let c = Color::from_hex("#FF8000").unwrap();
    /// assert_eq!(c, Color::new(255, 128, 0));
    /// assert!(Color::from_hex("#FF80").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex.as_bytes();
        if bytes.len() != 7 || bytes[0] != b'#' {
            return Err(Error::InvalidColorFormat(format!(
                "expected '#RRGGBB', got '{}'",
                hex
            )));
        }
        if !bytes[1..].iter().all(u8::is_ascii_hexdigit) {
            return Err(Error::InvalidColorFormat(format!("non-hex digit in '{}'", hex)));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| Error::InvalidColorFormat(format!("'{}': {}", hex, e)))
        };
        Ok(Self::new(channel(1)?, channel(3)?, channel(5)?))
    }

    /// Build a color from wide channel values, rejecting anything that is not
    /// an integer in `0..=255`.
    pub fn from_components(r: f64, g: f64, b: f64) -> Result<Self> {
        let channel = |v: f64| {
            if !v.is_finite() || v.fract() != 0.0 {
                return Err(Error::InvalidColorFormat(format!(
                    "channel value {} is not an integer",
                    v
                )));
            }
            if !(0.0..=255.0).contains(&v) {
                return Err(Error::InvalidColorFormat(format!(
                    "channel value {} is outside 0..=255",
                    v
                )));
            }
            Ok(v as u8)
        };
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`, as the PDF color operators expect.
    pub fn as_unit_floats(&self) -> (f32, f32, f32) {
        (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
    }

    /// Channels as an array (raster pixel form).
    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s.trim())
    }
}

/// Raw color input, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorInput {
    /// Channel triple (may be out of range until normalized)
    Components(f64, f64, f64),
    /// Hex string, `#RRGGBB`
    Hex(String),
}

impl From<Color> for ColorInput {
    fn from(c: Color) -> Self {
        ColorInput::Components(c.r as f64, c.g as f64, c.b as f64)
    }
}

impl From<(u8, u8, u8)> for ColorInput {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        ColorInput::Components(r as f64, g as f64, b as f64)
    }
}

impl From<[u8; 3]> for ColorInput {
    fn from([r, g, b]: [u8; 3]) -> Self {
        ColorInput::Components(r as f64, g as f64, b as f64)
    }
}

impl From<(i32, i32, i32)> for ColorInput {
    fn from((r, g, b): (i32, i32, i32)) -> Self {
        ColorInput::Components(r as f64, g as f64, b as f64)
    }
}

impl From<(f64, f64, f64)> for ColorInput {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        ColorInput::Components(r, g, b)
    }
}

impl From<&str> for ColorInput {
    fn from(s: &str) -> Self {
        ColorInput::Hex(s.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(s: String) -> Self {
        ColorInput::Hex(s)
    }
}

/// Convert any supported color input into its canonical triple.
///
/// # Examples
///
/// ```
/// use labelgen::color::{normalize, Color};
///
/// assert_eq!(normalize("#000080").unwrap(), Color::new(0, 0, 128));
/// assert_eq!(normalize((10, 20, 30)).unwrap(), Color::new(10, 20, 30));
/// assert!(normalize((256, 0, 0)).is_err());
/// ```
pub fn normalize(input: impl Into<ColorInput>) -> Result<Color> {
    match input.into() {
        ColorInput::Components(r, g, b) => Color::from_components(r, g, b),
        ColorInput::Hex(hex) => Color::from_hex(&hex),
    }
}
