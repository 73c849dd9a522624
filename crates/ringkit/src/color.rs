use derive_more::{Deref, From, Into};
use palette::{Srgb, Srgba};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct ColorParseError(String);

/// An opaque `#rrggbb` color, as edited through the cell editor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deref, From, Into, SerializeDisplay, DeserializeFromStr,
)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn to_paint(self) -> Srgba<f64> {
        let rgb: Srgb<f64> = self.0.into_format();
        Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0)
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(s.trim())
            .map(Self)
            .map_err(|_| ColorParseError(s.to_string()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}

/// Shorthand for the scene's translucent paints.
pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Srgba<f64> {
    Srgba::new(red, green, blue, alpha)
}
