use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Routes `tracing` output to `log.txt` beside the executable.
///
/// Keep the returned guard alive for the life of the process or buffered
/// lines are lost on exit.
pub fn init() -> WorkerGuard {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("log.txt")
        .build(exe_dir());
    let (writer, guard) = match appender {
        Ok(file) => tracing_appender::non_blocking(file),
        // Fallback: stderr when the exe directory is not writable
        Err(_) => tracing_appender::non_blocking(std::io::stderr()),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_thread_names(true)
                .with_writer(writer),
        )
        .try_init();

    if installed.is_ok() {
        tracing::info!("===== trendcast start =====");
    }
    guard
}
