//! Failure taxonomy for the session log
//!
//! None of these ever reach a caller of `info`/`warning`/`error`/`shutdown`; they are
//! reported through the fallback channel instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::friendly_io_error_message;

#[derive(Debug, Error)]
pub enum LogError {
    /// Neither a documents nor a home directory could be resolved
    #[error("no documents directory available for the session log")]
    NoDocumentsDir,

    /// Directory or file creation failed; the logger is left degraded
    #[error("{}", init_message(.path, .source))]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The flush worker thread could not be spawned
    #[error("failed to spawn flush worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// A single line could not be written; the line is dropped
    #[error("{}", friendly_io_error_message(.0, "Failed to write log line"))]
    Write(#[source] std::io::Error),

    /// The flush loop itself failed and the worker stopped
    #[error("{}", friendly_io_error_message(.0, "Flush worker stopped"))]
    LoopFatal(#[source] std::io::Error),

    /// Final flush/close or the bounded wait on the worker failed
    #[error("shutdown incomplete: {0}")]
    Shutdown(String),
}

fn init_message(path: &Path, source: &std::io::Error) -> String {
    friendly_io_error_message(source, &format!("Failed to prepare {}", path.display()))
}

impl LogError {
    /// Short tag used in fallback channel prefixes
    pub fn kind(&self) -> &'static str {
        match self {
            LogError::NoDocumentsDir | LogError::Init { .. } | LogError::Spawn(_) => "Init",
            LogError::Write(_) => "Write",
            LogError::LoopFatal(_) => "FlushLoop",
            LogError::Shutdown(_) => "Shutdown",
        }
    }
}
