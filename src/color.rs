use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FractalError;

/// Straight-alpha colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fill used by the classic slider demo (`#6867AC`).
    pub const FILL: Rgba = Rgba::from_rgb8(0x68, 0x67, 0xac);
    pub const WHITE: Rgba = Rgba::from_rgb8(0xff, 0xff, 0xff);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn to_rgb8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// CSS hex notation, as accepted by canvas `fillStyle`.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::FILL
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Rgba {
    type Err = FractalError;

    /// Accepts `#rrggbb` or whitespace separated `r g b` components (0-255).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || FractalError::InvalidColor(value.to_string());
        let trimmed = value.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
            };
            return Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let components = trimmed
            .split_whitespace()
            .map(|component| component.parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match components.as_slice() {
            [r, g, b] => Ok(Self::from_rgb8(*r, *g, *b)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_components() {
        let hex: Rgba = "#6867AC".parse().unwrap();
        let parts: Rgba = "104 103 172".parse().unwrap();
        assert_eq!(hex, Rgba::FILL);
        assert_eq!(parts, Rgba::FILL);
        assert_eq!(hex.to_css(), "#6867ac");
    }

    #[test]
    fn rejects_malformed_colours() {
        for bad in ["#12345", "#gggggg", "1 2", "1 2 300", "blue"] {
            assert_eq!(
                bad.parse::<Rgba>(),
                Err(FractalError::InvalidColor(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }
}
