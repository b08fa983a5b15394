//! RGBA color cell values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Default text color.
    pub const DODGER_BLUE: Rgba = Rgba::rgb(30, 144, 255);
    /// Default outline color.
    pub const ORANGE_RED: Rgba = Rgba::rgb(255, 69, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
        Rgba { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// Weighted grayscale value in [0, 255].
    pub fn luma(&self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    /// Builds a color from float channels, each rounded and clamped to [0, 255].
    /// Missing channels read 0, except alpha which reads 255.
    pub fn from_channels(channels: &[f64]) -> Rgba {
        let at = |i: usize, default: f64| -> u8 {
            channels.get(i).copied().unwrap_or(default).round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: at(0, 0.0),
            g: at(1, 0.0),
            b: at(2, 0.0),
            a: at(3, 255.0),
        }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` notation.
    /// Returns `None` for anything else.
    pub fn from_hex(text: &str) -> Option<Rgba> {
        let re = Regex::new(r"^#(?<digits>[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
            .expect("hex color pattern is valid");
        let caps = re.captures(text.trim())?;
        let digits = &caps["digits"];
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let nibble = |s: &str| byte(s).map(|n| n * 17);
                Some(Rgba::rgb(
                    nibble(&digits[0..1])?,
                    nibble(&digits[1..2])?,
                    nibble(&digits[2..3])?,
                ))
            }
            6 => Some(Rgba::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Some(Rgba::rgba(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => None,
        }
    }
}

impl std::str::FromStr for Rgba {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::from_hex(s).ok_or_else(|| format!("invalid color: {}", s))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn test_from_hex_six_digits() {
        assert_eq!(Rgba::from_hex("#d28c45"), Some(Rgba::rgb(0xd2, 0x8c, 0x45)));
        assert_eq!(Rgba::from_hex("#FDCDAA"), Some(Rgba::rgb(0xfd, 0xcd, 0xaa)));
    }

    #[test]
    fn test_from_hex_short_and_alpha() {
        assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::WHITE));
        assert_eq!(
            Rgba::from_hex("#11223344"),
            Some(Rgba::rgba(0x11, 0x22, 0x33, 0x44))
        );
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Rgba::from_hex("dodgerblue"), None);
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#gggggg"), None);
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(Rgba::WHITE.luma().round(), 255.0);
        assert_eq!(Rgba::BLACK.luma(), 0.0);
        assert!((Rgba::rgb(255, 0, 0).luma() - 0.299 * 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_channels_clamps() {
        let c = Rgba::from_channels(&[300.0, -5.0, 127.6]);
        assert_eq!(c, Rgba::rgba(255, 0, 128, 255));
    }

    #[test]
    fn test_display_round_trips() {
        let c = Rgba::rgba(1, 2, 3, 4);
        assert_eq!(Rgba::from_hex(&c.to_string()), Some(c));
    }
}
