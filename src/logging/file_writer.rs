//! Session file creation and the background flush worker
//!
//! The worker owns the file for its whole life. Producers only ever touch the queue.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::config::friendly_io_error_message;
use crate::error::LogError;

use super::fallback::Fallback;
use super::state::{SessionState, StateCell};

/// Name given to the flush worker thread
pub const WORKER_THREAD_NAME: &str = "session-log-flush";

/// Create a fresh session file at `path`, creating missing parent directories
///
/// A file left over from an earlier session is deleted first.
pub fn create_session_file(path: &Path) -> Result<BufWriter<File>, LogError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| LogError::Init {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    if path.exists() {
        fs::remove_file(path).map_err(|source| LogError::Init {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| LogError::Init {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(BufWriter::new(file))
}

/// Drains the queue into a writer until the queue is closed
pub struct FlushWorker<W: Write> {
    receiver: Receiver<String>,
    writer: W,
    interval: Duration,
    state: Arc<StateCell>,
    fallback: Arc<dyn Fallback>,
}

impl<W: Write + Send + 'static> FlushWorker<W> {
    pub fn new(
        receiver: Receiver<String>,
        writer: W,
        interval: Duration,
        state: Arc<StateCell>,
        fallback: Arc<dyn Fallback>,
    ) -> Self {
        Self {
            receiver,
            writer,
            interval,
            state,
            fallback,
        }
    }

    /// Start the worker on its own thread
    ///
    /// `done` receives one message when the worker has finished, whatever the outcome.
    /// If the thread panics, `done` is dropped unsent instead.
    pub fn spawn(self, done: Sender<()>) -> Result<JoinHandle<()>, LogError> {
        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let fallback = Arc::clone(&self.fallback);
                if let Err(e) = self.run() {
                    fallback.report(&e);
                }
                let _ = done.send(());
            })
            .map_err(LogError::Spawn)
    }

    /// Drain until the queue is closed and empty, then flush and close the writer
    pub fn run(mut self) -> Result<(), LogError> {
        tracing::debug!("Flush worker started");

        loop {
            match self.receiver.recv_timeout(self.interval) {
                Ok(line) => {
                    self.write_line(&line);
                    self.drain();
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if let Err(e) = self.writer.flush() {
                self.state.advance(SessionState::Failed);
                return Err(LogError::LoopFatal(e));
            }
        }

        self.state.advance(SessionState::Drained);
        self.close()
    }

    /// Write everything currently queued without waiting
    fn drain(&mut self) {
        while let Ok(line) = self.receiver.try_recv() {
            self.write_line(&line);
        }
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{}", line) {
            self.fallback.report(&LogError::Write(e));
        }
    }

    fn close(mut self) -> Result<(), LogError> {
        let flushed = self.writer.flush();
        drop(self.writer);
        self.state.advance(SessionState::Closed);
        tracing::debug!("Flush worker closed the session file");

        flushed.map_err(|e| {
            LogError::Shutdown(friendly_io_error_message(&e, "Failed final flush"))
        })
    }
}
