use std::path::PathBuf;

use chrono::Local;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with file-based logging.
///
/// Logs are written to `<data_local_dir>/spotcli/logs/spotcli-YYYY-MM-DD-HH-MM-SS.log`,
/// never to the terminal, so they cannot corrupt the full-screen player.
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init_logging() -> Result<PathBuf, String> {
    let logs_dir = dirs::data_local_dir()
        .ok_or("Could not find local data directory")?
        .join("spotcli")
        .join("logs");
    std::fs::create_dir_all(&logs_dir).map_err(|e| e.to_string())?;

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_filename = format!("spotcli-{}.log", timestamp);
    let log_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())?;

    // Lives as long as the process; dropping it would stop the writer thread.
    std::mem::forget(guard);

    Ok(log_path)
}
