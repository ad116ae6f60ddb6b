//! Run chains: where a playable selection logically lives

use serde::{Deserialize, Serialize};
use std::fmt;

/// The (platform, emulator, gamelist, game) tuple of a selection
///
/// Serialized as `platform|emulator|gamelist|game`, the form stored in
/// `last_game_played` and `autostart_single_game`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunChain {
    pub platform: String,
    pub emulator: String,
    pub gamelist: String,
    pub game: String,
}

impl RunChain {
    pub fn new(
        platform: impl Into<String>,
        emulator: impl Into<String>,
        gamelist: impl Into<String>,
        game: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            emulator: emulator.into(),
            gamelist: gamelist.into(),
            game: game.into(),
        }
    }

    /// Parses a pipe-delimited chain
    ///
    /// Strings with fewer than four parts yield an empty (unset) chain.
    pub fn parse(value: &str) -> Self {
        let parts: Vec<&str> = value.split('|').collect();
        if parts.len() < 4 {
            return Self::default();
        }
        Self::new(parts[0], parts[1], parts[2], parts[3])
    }

    /// True when all four parts are present
    pub fn is_set(&self) -> bool {
        !(self.platform.is_empty()
            || self.emulator.is_empty()
            || self.gamelist.is_empty()
            || self.game.is_empty())
    }

    /// Identity of the game across gamelists
    pub fn key(&self) -> String {
        format!("{}§{}§{}", self.game, self.platform, self.emulator)
    }

    /// Forgets where the game lives, keeping the game itself
    pub fn clear(&mut self) {
        self.platform.clear();
        self.emulator.clear();
        self.gamelist.clear();
    }
}

impl fmt::Display for RunChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.platform, self.emulator, self.gamelist, self.game
        )
    }
}
