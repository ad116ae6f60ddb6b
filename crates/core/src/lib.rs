//! Shared domain types for the Marquee front-end
//!
//! Everything here is free of I/O: configuration levels, run chains, the
//! small value types that level files encode as strings, and the action
//! queue that serializes work onto the UI thread.

pub mod error;
pub mod queue;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use queue::{UiQueue, UiSender};
pub use types::{
    label_cleanup, AutostartMode, FnetSort, FontStyle, InstallationId, KeyCode, Level, ListType,
    Rgba, RunChain, ScreenSaverMode, SmartAsdMode, SortType, TextAlign, UseMouse,
};
