//! Session log for the mod
//!
//! Buffers leveled lines in memory, collapses consecutive duplicates and writes
//! them to one file per session from a background worker.

mod dedup;
mod fallback;
mod file_writer;
mod format;
mod level;
mod logger;
mod state;

pub use fallback::{Fallback, MemoryFallback, StderrFallback};
pub use level::LogLevel;
pub use logger::SessionLog;
pub use state::SessionState;
