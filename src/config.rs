//! Configuration for the session log
//!
//! The log location is fixed per user: `<documents>/<app folder>/Logs/<file>.txt`.
//! Timing knobs for the flush worker and shutdown live on [`LogConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Folder under the user's documents directory that holds game data
pub const APP_FOLDER: &str = "Mount and Blade II Bannerlord";

/// Subdirectory of [`APP_FOLDER`] that holds logs
pub const LOGS_FOLDER: &str = "Logs";

/// Session log file name, without extension
pub const LOG_FILE_NAME: &str = "SafeWarLog";

/// How long the flush worker sleeps between drains when nothing wakes it
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on how long `shutdown` waits for the flush worker
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full, free space needed to keep logging",
            DiskErrorKind::PermissionDenied => "permission denied on the log directory",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "unexpected IO failure",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &std::io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 (Linux) / 69 (macOS)
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Create a user-friendly error message from an IO error
pub fn friendly_io_error_message(e: &std::io::Error, context: &str) -> String {
    match categorize_io_error(e) {
        DiskErrorKind::Other => format!("{}: {}", context, e),
        kind => format!("{}: {} ({})", context, kind.user_message(), e),
    }
}

/// Settings for a [`SessionLog`](crate::logging::SessionLog)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// File written for this session; recreated on every open
    pub log_path: Option<PathBuf>,

    /// Maximum time the flush worker waits before draining on its own
    pub flush_interval: Duration,

    /// Maximum time `shutdown` waits for the flush worker to finish
    pub shutdown_timeout: Duration,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_path: try_log_file_path(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl LogConfig {
    /// Write to `path` instead of the per-user location
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Try to get the user's documents directory
///
/// Falls back to `<home>/Documents` on platforms where the documents folder is not
/// registered (headless Linux, for instance).
pub fn try_documents_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
}

/// Logs directory below a given documents directory
pub fn logs_dir_in(documents: &Path) -> PathBuf {
    documents.join(APP_FOLDER).join(LOGS_FOLDER)
}

/// Try to get the per-user session log path, `None` if no documents or home dir exists
pub fn try_log_file_path() -> Option<PathBuf> {
    try_documents_dir().map(|docs| logs_dir_in(&docs).join(format!("{}.txt", LOG_FILE_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.flush_interval, Duration::from_millis(100));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_logs_dir_in() {
        let dir = logs_dir_in(Path::new("/home/player/Documents"));
        assert_eq!(
            dir,
            PathBuf::from("/home/player/Documents/Mount and Blade II Bannerlord/Logs")
        );
    }

    #[test]
    fn test_try_log_file_path() {
        // CI might not have a home dir, but if a path resolves it must have the fixed shape
        if let Some(path) = try_log_file_path() {
            assert!(path.ends_with("Mount and Blade II Bannerlord/Logs/SafeWarLog.txt"));
        }
    }

    #[test]
    fn test_with_log_path_overrides_default() {
        let config = LogConfig::default()
            .with_log_path("/tmp/session.txt")
            .with_flush_interval(Duration::from_millis(5));
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/session.txt")));
        assert_eq!(config.flush_interval, Duration::from_millis(5));
    }

    #[test]
    fn test_categorize_io_error() {
        assert_eq!(
            categorize_io_error(&Error::from(ErrorKind::PermissionDenied)),
            DiskErrorKind::PermissionDenied
        );
        assert_eq!(
            categorize_io_error(&Error::from(ErrorKind::NotFound)),
            DiskErrorKind::NotFound
        );
        assert_eq!(
            categorize_io_error(&Error::from(ErrorKind::WriteZero)),
            DiskErrorKind::DiskFull
        );
        assert_eq!(
            categorize_io_error(&Error::new(ErrorKind::Other, "boom")),
            DiskErrorKind::Other
        );
    }

    #[test]
    fn test_friendly_io_error_message() {
        let e = Error::from(ErrorKind::PermissionDenied);
        let msg = friendly_io_error_message(&e, "Failed to create log directory");
        assert!(msg.starts_with("Failed to create log directory: permission denied"));

        let e = Error::new(ErrorKind::Other, "boom");
        let msg = friendly_io_error_message(&e, "Failed to write");
        assert_eq!(msg, "Failed to write: boom");
    }
}
