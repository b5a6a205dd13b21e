//! session-log - Per-session diagnostic log file for game modifications
//!
//! Open one [`SessionLog`] at startup, hand clones of it to whatever needs to log,
//! and call [`SessionLog::shutdown`] before the host unloads the mod.

pub mod config;
pub mod error;
pub mod logging;

pub use config::LogConfig;
pub use error::LogError;
pub use logging::{LogLevel, SessionLog, SessionState};
