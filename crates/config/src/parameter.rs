//! A single named setting and its resolution state

use marquee_core::Level;
use serde::{Deserialize, Serialize};

/// One configuration parameter
///
/// `current_level` records where the effective value was found. `changed`
/// means the value diverged from what was read at that level; values adopted
/// while resolving are never marked changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    default_level: Level,
    default_value: String,
    current_level: Level,
    value: String,
    changed: bool,
    optional: bool,
}

impl Parameter {
    /// Creates a parameter holding its default
    pub fn new(
        name: &str,
        default_level: Level,
        default_value: impl Into<String>,
        optional: bool,
    ) -> Self {
        let default_value = default_value.into();
        Self {
            name: name.trim().to_lowercase(),
            default_level,
            value: default_value.clone(),
            default_value,
            current_level: default_level,
            changed: false,
            optional,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_level(&self) -> Level {
        self.default_level
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn current_level(&self) -> Level {
        self.current_level
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Optional parameters may stay commented out in level files
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// True when both value and level are the compiled defaults
    pub fn is_default(&self) -> bool {
        self.value == self.default_value && self.current_level == self.default_level
    }

    /// Reverts to the compiled default and clears the change flag
    pub fn restore(&mut self) {
        self.current_level = self.default_level;
        self.value = self.default_value.clone();
        self.changed = false;
    }

    /// Sets a new value, marking the parameter changed only if it differs
    ///
    /// Returns true when the value was replaced.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value == self.value {
            return false;
        }
        self.value = value;
        self.changed = true;
        true
    }

    /// Moves the parameter to another level without touching its value
    pub fn set_current_level(&mut self, level: Level) {
        self.current_level = level;
    }

    /// Takes a value found in a level file
    pub(crate) fn adopt(&mut self, level: Level, value: impl Into<String>) {
        self.current_level = level;
        self.value = value.into();
        self.changed = false;
    }

    /// Clears the change flag once the value is on disk
    pub(crate) fn mark_saved(&mut self) {
        self.changed = false;
    }
}
