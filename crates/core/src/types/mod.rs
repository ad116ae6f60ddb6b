//! Domain types for Marquee
//!
//! - `level`: the configuration override hierarchy
//! - `run_chain`: platform/emulator/gamelist/game selections
//! - `color`, `keys`, `choices`: typed forms of level-file values
//! - `ids`: installation identity
//! - `label`: display label cleanup

mod choices;
mod color;
mod ids;
mod keys;
mod label;
mod level;
mod run_chain;

// Re-export all public types
pub use choices::{
    AutostartMode, FnetSort, FontStyle, ListType, ScreenSaverMode, SmartAsdMode, SortType,
    TextAlign, UseMouse,
};
pub use color::Rgba;
pub use ids::InstallationId;
pub use keys::KeyCode;
pub use label::label_cleanup;
pub use level::Level;
pub use run_chain::RunChain;
