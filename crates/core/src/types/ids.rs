//! Installation identity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Random identity of one front-end installation, stored in `feel_uuid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstallationId(Uuid);

impl InstallationId {
    /// Creates a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a stored id
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }

    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for InstallationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstallationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
