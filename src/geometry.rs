//! Percentage-based window geometry (`--geometry 60%x90%`).

use std::fmt;
use std::str::FromStr;

/// Requested window size as a percentage of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width_percent: u8,
    pub height_percent: u8,
}

/// Error from parsing a geometry string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("invalid geometry format: {0}, expected format: 60%x90%")]
    Format(String),
    #[error("geometry percentage out of range (1-100): {0}")]
    Range(String),
}

fn parse_percent(part: &str, whole: &str) -> Result<u8, GeometryError> {
    let digits = part
        .strip_suffix('%')
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| GeometryError::Format(whole.to_string()))?;
    let value: u32 = digits
        .parse()
        .map_err(|_| GeometryError::Range(whole.to_string()))?;
    if value == 0 || value > 100 {
        return Err(GeometryError::Range(whole.to_string()));
    }
    Ok(value as u8)
}

impl FromStr for Geometry {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| GeometryError::Format(s.to_string()))?;
        Ok(Geometry {
            width_percent: parse_percent(w, s)?,
            height_percent: parse_percent(h, s)?,
        })
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%x{}%", self.width_percent, self.height_percent)
    }
}
