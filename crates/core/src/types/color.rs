//! Colors as stored in level files (`r, g, b` or `r, g, b, a`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fallback for any malformed color string
    pub const TRANSPARENT_WHITE: Rgba = Rgba::new(255, 255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parses a level-file color, returning `None` when malformed
    ///
    /// Spaces are ignored. Three components give an opaque color; exactly
    /// four carry an alpha channel. Extra components beyond four are ignored
    /// along with the alpha.
    pub fn parse(value: &str) -> Option<Self> {
        let compact: String = value.chars().filter(|c| *c != ' ').collect();
        let parts: Vec<&str> = compact.split(',').collect();
        if parts.len() < 3 {
            return None;
        }

        let r = parts[0].parse::<u8>().ok()?;
        let g = parts[1].parse::<u8>().ok()?;
        let b = parts[2].parse::<u8>().ok()?;
        if parts.len() == 4 {
            let a = parts[3].parse::<u8>().ok()?;
            return Some(Self::new(r, g, b, a));
        }
        Some(Self::opaque(r, g, b))
    }

    /// Parses a level-file color, falling back to transparent white
    pub fn from_ini(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::TRANSPARENT_WHITE)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT_WHITE
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, {}", self.r, self.g, self.b, self.a)
    }
}
