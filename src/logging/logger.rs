//! The session log handle
//!
//! [`SessionLog`] is cheap to clone and meant to be passed to every part of the mod
//! that logs. Enqueueing formats the line, collapses duplicates and pushes it onto
//! an unbounded queue under one short mutex; disk I/O happens only on the flush
//! worker. The queue has no backpressure: a producer faster than the disk grows
//! memory until the worker catches up.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Local;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::config::LogConfig;
use crate::error::LogError;

use super::dedup::{Admission, DedupState};
use super::fallback::{Fallback, StderrFallback};
use super::file_writer::{create_session_file, FlushWorker};
use super::format;
use super::level::LogLevel;
use super::state::{SessionState, StateCell};

/// Dedup state and the producer side of the queue, guarded together
struct Intake {
    dedup: DedupState,
    /// `None` once shut down, or if the log never opened
    sender: Option<Sender<String>>,
}

struct Worker {
    thread: JoinHandle<()>,
    done: Receiver<()>,
}

struct Shared {
    intake: Mutex<Intake>,
    worker: Mutex<Option<Worker>>,
    state: Arc<StateCell>,
    fallback: Arc<dyn Fallback>,
    shutdown_timeout: Duration,
    path: Option<PathBuf>,
}

/// Handle to the log file of the current session
#[derive(Clone)]
pub struct SessionLog {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog")
            .field("path", &self.shared.path)
            .field("state", &self.state())
            .finish()
    }
}

impl SessionLog {
    /// Open the session log, reporting failures to stderr
    ///
    /// Never fails: if the file cannot be prepared the returned log is degraded and
    /// silently ignores every call.
    pub fn open(config: LogConfig) -> Self {
        Self::open_with_fallback(config, Arc::new(StderrFallback))
    }

    /// Open the session log, reporting failures to `fallback`
    pub fn open_with_fallback(config: LogConfig, fallback: Arc<dyn Fallback>) -> Self {
        match Self::try_open_with_fallback(config, Arc::clone(&fallback)) {
            Ok(log) => log,
            Err(e) => {
                fallback.report(&e);
                Self::degraded(fallback)
            }
        }
    }

    /// Open the session log, returning initialisation failures to the caller
    pub fn try_open(config: LogConfig) -> Result<Self, LogError> {
        Self::try_open_with_fallback(config, Arc::new(StderrFallback))
    }

    pub fn try_open_with_fallback(
        config: LogConfig,
        fallback: Arc<dyn Fallback>,
    ) -> Result<Self, LogError> {
        let path = config.log_path.clone().ok_or(LogError::NoDocumentsDir)?;
        let writer = create_session_file(&path)?;
        Self::start(writer, Some(path), &config, fallback)
    }

    /// Spawn the flush worker over `writer` and log the session banner
    fn start<W: Write + Send + 'static>(
        writer: W,
        path: Option<PathBuf>,
        config: &LogConfig,
        fallback: Arc<dyn Fallback>,
    ) -> Result<Self, LogError> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let state = Arc::new(StateCell::new(SessionState::Running));

        let thread = FlushWorker::new(
            receiver,
            writer,
            config.flush_interval,
            Arc::clone(&state),
            Arc::clone(&fallback),
        )
        .spawn(done_tx)?;

        let log = Self {
            shared: Arc::new(Shared {
                intake: Mutex::new(Intake {
                    dedup: DedupState::new(),
                    sender: Some(sender),
                }),
                worker: Mutex::new(Some(Worker {
                    thread,
                    done: done_rx,
                })),
                state,
                fallback,
                shutdown_timeout: config.shutdown_timeout,
                path,
            }),
        };

        tracing::info!(path = ?log.shared.path, "Session log opened");
        log.info(format::session_banner(Local::now()));
        Ok(log)
    }

    /// A log that accepts and discards everything
    pub fn degraded(fallback: Arc<dyn Fallback>) -> Self {
        Self {
            shared: Arc::new(Shared {
                intake: Mutex::new(Intake {
                    dedup: DedupState::new(),
                    sender: None,
                }),
                worker: Mutex::new(None),
                state: Arc::new(StateCell::new(SessionState::Degraded)),
                fallback,
                shutdown_timeout: Duration::ZERO,
                path: None,
            }),
        }
    }

    /// File this session writes to, `None` when degraded
    pub fn path(&self) -> Option<&Path> {
        self.shared.path.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.shared.state.get()
    }

    pub fn is_degraded(&self) -> bool {
        self.state() == SessionState::Degraded
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    /// Alias of [`warning`](Self::warning)
    pub fn warn(&self, message: impl AsRef<str>) {
        self.warning(message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Log a 50 character `=` separator
    pub fn hr(&self) {
        self.info(format::rule());
    }

    /// Log a separator with `title` centered in it
    pub fn hr_titled(&self, title: &str) {
        self.info(format::titled_rule(title));
    }

    /// Queue a message, collapsing it if it repeats the previous one
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        let tagged = format::tagged(level, message.as_ref());

        let Ok(mut intake) = self.shared.intake.lock() else {
            return;
        };
        let Intake { dedup, sender } = &mut *intake;
        let Some(sender) = sender.as_ref() else {
            return;
        };

        // Send errors mean the worker already stopped; the line is dropped
        if let Admission::Accepted { summary } = dedup.admit(&tagged) {
            if let Some(summary) = summary {
                let _ = sender.send(summary);
            }
            let _ = sender.send(format::timestamped(Local::now(), &tagged));
        }
    }

    /// Flush pending repeats, drain the queue to disk and close the file
    ///
    /// Waits at most the configured shutdown timeout for the worker. If the wait times
    /// out, unwritten lines stay with the detached worker and the file may still be
    /// open when this returns. Only the first call does anything; later log calls are
    /// dropped.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }
}

impl Shared {
    fn shutdown(&self) {
        let sender = match self.intake.lock() {
            Ok(mut intake) => {
                let summary = intake.dedup.finish();
                if let (Some(summary), Some(sender)) = (summary, intake.sender.as_ref()) {
                    let _ = sender.send(summary);
                }
                intake.sender.take()
            }
            Err(_) => None,
        };

        let Some(sender) = sender else {
            return;
        };

        self.state.advance(SessionState::ShuttingDown);
        // Closing the queue is the worker's signal to drain and exit
        drop(sender);

        let worker = self.worker.lock().ok().and_then(|mut w| w.take());
        if let Some(worker) = worker {
            self.wait_for(worker);
        }
        tracing::info!(state = ?self.state.get(), "Session log shut down");
    }

    fn wait_for(&self, worker: Worker) {
        match worker.done.recv_timeout(self.shutdown_timeout) {
            Ok(()) => {
                let _ = worker.thread.join();
            }
            Err(RecvTimeoutError::Timeout) => {
                // Detached: the worker still owns the file and closes it if it ever finishes
                self.fallback.report(&LogError::Shutdown(format!(
                    "flush worker did not finish within {:?}",
                    self.shutdown_timeout
                )));
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = worker.thread.join();
                self.state.advance(SessionState::Failed);
                self.fallback
                    .report(&LogError::Shutdown("flush worker panicked".to_string()));
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.shutdown();
    }
}
