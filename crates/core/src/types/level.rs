//! Configuration levels, from least to most specific

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rung in the configuration override hierarchy
///
/// `Global` through `Gamelist` form the inherited chain. `Layout` is selected
/// by the current layout name, and `Item` holds transient per-ROM overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Global = 0,
    Platform = 1,
    Emulator = 2,
    Gamelist = 3,
    Layout = 4,
    Item = 5,
}

impl Level {
    /// Number of levels
    pub const COUNT: usize = 6;

    /// All levels in ascending specificity
    pub const ALL: [Level; Level::COUNT] = [
        Level::Global,
        Level::Platform,
        Level::Emulator,
        Level::Gamelist,
        Level::Layout,
        Level::Item,
    ];

    /// Deepest level reached by a chained load
    pub const MAX_CHAINED: Level = Level::Gamelist;

    /// Index of this level, usable for per-level arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Level for an index, if in range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The next more specific level
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Levels strictly less specific than this one, most specific first
    pub fn less_specific(self) -> impl Iterator<Item = Level> {
        Self::ALL[..self.index()].iter().rev().copied()
    }

    /// True for the levels that take part in the inherited chain
    pub fn is_chained(self) -> bool {
        self <= Self::MAX_CHAINED
    }

    /// Upper-case name used in logs and dumps
    pub fn name(self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Platform => "PLATFORM",
            Self::Emulator => "EMULATOR",
            Self::Gamelist => "GAMELIST",
            Self::Layout => "LAYOUT",
            Self::Item => "ITEM",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown level '{}'", s))
    }
}
