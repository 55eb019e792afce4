/// Per-run crawl logging configuration.
///
/// Logs are stored under the run directory in `crawl_logs/`. Each crawl run
/// appends to the log file with a clear separator.
use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes file logging for a crawl run.
///
/// Logs are written to `{run_dir}/crawl_logs/crawl.log`. Each run starts with
/// a separator containing the timestamp and project ID.
pub fn init_run_logging(run_dir: &Path, project_id: &str) -> Result<()> {
    let log_dir = run_dir.join("crawl_logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "crawl.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    // Default to INFO level, but allow override via RUST_LOG env var
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok(); // Ignore error if already initialized

    let separator = format!(
        "\n{sep}\n[{ts}] New crawl run: {project}\n{sep}\n",
        sep = "=".repeat(80),
        ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        project = project_id
    );

    use std::io::Write;
    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("crawl.log"))
    {
        let _ = writeln!(file, "{}", separator);
    }

    tracing::info!("Crawl logging initialized for project: {}", project_id);

    Ok(())
}
