use std::str::FromStr;

use crate::error::TerminalError;

/// Color in 0.0..=1.0 space with alpha channel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for Color {
    fn default() -> Self {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rgba({:.2}, {:.2}, {:.2}, {:.2})",
            self.r, self.g, self.b, self.a
        )
    }
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from 8-bit channels, usable in constants
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    pub fn with_alpha(mut self, a: f64) -> Self {
        self.a = a.clamp(0.0, 1.0);
        self
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrrrggggbbbb`
    pub fn parse(spec: &str) -> Result<Self, TerminalError> {
        let invalid = || TerminalError::InvalidColor { value: spec.to_string() };

        let hex = spec.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let digits = match hex.len() {
            3 => 1,
            6 => 2,
            12 => 4,
            _ => return Err(invalid()),
        };
        let max = f64::from((1u32 << (4 * digits)) - 1);

        let channel = |i: usize| -> Result<f64, TerminalError> {
            let part = &hex[i * digits..(i + 1) * digits];
            let value = u32::from_str_radix(part, 16).map_err(|_| invalid())?;
            Ok(f64::from(value) / max)
        };

        Ok(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
    }
}

impl FromStr for Color {
    type Err = TerminalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn parses_six_digit_hex() {
        let c = Color::parse("#ff8000").unwrap();
        assert!(close(c.r, 1.0));
        assert!(close(c.g, 128.0 / 255.0));
        assert!(close(c.b, 0.0));
        assert!(close(c.a, 1.0));
    }

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::rgb(1.0, 1.0, 1.0));
        let c = Color::parse("#ffff00000000").unwrap();
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "fff", "#ff", "#gggggg", "#12345", "#1234567"] {
            assert!(
                matches!(Color::parse(bad), Err(TerminalError::InvalidColor { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn from_rgb8_matches_parse() {
        assert_eq!(Color::from_rgb8(0x26, 0x26, 0x26), Color::parse("#262626").unwrap());
    }

    #[test]
    fn with_alpha_clamps() {
        assert!(close(Color::default().with_alpha(2.0).a, 1.0));
        assert!(close(Color::default().with_alpha(-1.0).a, 0.0));
    }
}
