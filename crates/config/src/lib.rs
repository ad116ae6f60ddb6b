//! Marquee Configuration Engine
//!
//! Settings of the front-end cascade through a chain of flat level files:
//! GLOBAL, PLATFORM, EMULATOR and GAMELIST, plus the LAYOUT and ITEM side
//! levels. Each parameter remembers which level supplied its value, so a
//! save writes every value back to the file it belongs to.
//!
//! # Architecture
//!
//! - **Data-driven catalog**: parameters, their levels, defaults and value
//!   kinds come from a TOML document, not from code
//! - **Graceful degradation**: malformed values fall back to defaults,
//!   missing files are seeded
//! - **Atomic writes**: level files are never left half written
//! - **Independent engines**: an engine is a plain value, so a run-chain
//!   engine for a single launch never disturbs the main one
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee_config::ConfigManager;
//! use marquee_core::Level;
//!
//! let mut config = ConfigManager::with_builtin_catalog("/games/frontend")
//!     .expect("Failed to build engine");
//! config.load_config(Level::Global).expect("Failed to load config");
//!
//! println!("Platform: {}", config.current_platform());
//! println!("ROM path: {}", config.get_str("rom_path"));
//! ```

mod error;
mod level_file;
mod manager;
mod parameter;
mod persistence;
mod value;

pub mod backup;
pub mod catalog;
pub mod derived;
pub mod discovery;
pub mod launch;
pub mod paths;
pub mod selector;
pub mod template;
pub mod validation;
pub mod watcher;

pub use backup::{BackupSnapshot, SnapshotArchive, SnapshotInfo};
pub use catalog::{Catalog, CatalogEntry, ParamKind};
pub use discovery::{value_from_file, ListEntry, ListKind};
pub use error::{ConfigError, ConfigResult, ValidationError};
pub use launch::{LaunchCommand, LaunchPhase, LaunchPlan};
pub use level_file::{LevelFile, NAME_COLUMN};
pub use manager::ConfigManager;
pub use parameter::Parameter;
pub use paths::{FrontendPaths, AGGREGATE_PLATFORM};
pub use selector::SelectorState;
pub use template::RomContext;
pub use validation::Validator;
pub use value::Setting;
pub use watcher::{LevelFileWatcher, WatchHandle};

/// Line-level helpers of the level-file format, exposed for fuzzing
pub mod format {
    pub use crate::level_file::{format_line, line_name, normalize_line, split_line};
}
