use crate::util::error::BotaGridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB colour with alpha in `[0, 1]`.
///
/// Displays and parses as CSS, e.g. `rgba(122, 174, 0, 1)` or `#7aae00`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with its alpha replaced.
    pub fn with_opacity(&self, opacity: f64) -> Self {
        Self {
            a: opacity.clamp(0.0, 1.0),
            ..*self
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = BotaGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BotaGridError::ConfigError(format!("Invalid colour '{}'", s));
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, 1.0));
        }

        let body = trimmed
            .strip_prefix("rgba(")
            .or_else(|| trimmed.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();

        let (r, g, b, a) = match parts.as_slice() {
            [r, g, b] => (*r, *g, *b, "1"),
            [r, g, b, a] => (*r, *g, *b, *a),
            _ => return Err(invalid()),
        };
        let a: f64 = a.parse().map_err(|_| invalid())?;
        if !(0.0..=1.0).contains(&a) {
            return Err(invalid());
        }

        Ok(Rgba::new(
            r.parse().map_err(|_| invalid())?,
            g.parse().map_err(|_| invalid())?,
            b.parse().map_err(|_| invalid())?,
            a,
        ))
    }
}

impl TryFrom<String> for Rgba {
    type Error = BotaGridError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Rgba::new(122, 174, 0, 1.0).to_string(), "rgba(122, 174, 0, 1)");
        assert_eq!(
            Rgba::new(122, 174, 0, 1.0).with_opacity(0.2).to_string(),
            "rgba(122, 174, 0, 0.2)"
        );
    }

    #[test]
    fn test_parse() -> Result<(), BotaGridError> {
        assert_eq!("rgba(13, 71, 160, 1)".parse::<Rgba>()?, Rgba::new(13, 71, 160, 1.0));
        assert_eq!("rgb(1,2,3)".parse::<Rgba>()?, Rgba::new(1, 2, 3, 1.0));
        assert_eq!("#AAAAFF".parse::<Rgba>()?, Rgba::new(170, 170, 255, 1.0));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "red", "#12345", "rgba(1, 2)", "rgba(300, 0, 0, 1)", "rgba(0, 0, 0, 2)"] {
            assert!(bad.parse::<Rgba>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_serde_as_string() -> Result<(), serde_json::Error> {
        let c: Rgba = serde_json::from_str(r#""rgba(244, 197, 36, 1)""#)?;
        assert_eq!(c, Rgba::new(244, 197, 36, 1.0));
        assert_eq!(serde_json::to_string(&c)?, r#""rgba(244, 197, 36, 1)""#);
        Ok(())
    }
}
