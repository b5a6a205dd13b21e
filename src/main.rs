//! Session log demo
//!
//! Opens the per-user session log, writes a short burst of lines (including a run of
//! duplicates that collapse into one summary) and shuts down cleanly.

use std::thread;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use session_log::{LogConfig, SessionLog};

fn main() -> Result<()> {
    // Internal diagnostics of the logger itself go to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "session_log=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let log = SessionLog::try_open(LogConfig::default()).context("Failed to open session log")?;

    log.hr_titled("Startup");
    log.info("Demo mod loaded");
    log.warn("Texture cache running low");

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let log = log.clone();
            thread::spawn(move || {
                for tick in 0..3 {
                    log.info(format!("worker {} tick {}", id, tick));
                }
            })
        })
        .collect();
    for worker in workers {
        if worker.join().is_err() {
            log.error("A worker thread panicked");
        }
    }

    for _ in 0..10 {
        log.error("Failed to resolve hook target");
    }
    log.hr();

    if let Some(path) = log.path() {
        println!("Session log written to {}", path.display());
    }
    log.shutdown();
    Ok(())
}
