//! Log output for the web binary
//!
//! Every line goes to stderr and, unless turned off in [`WebConfig`], to a
//! daily rolling file `app.<date>.log` in the configured directory.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::WebConfig;

pub const LOG_FILE_PREFIX: &str = "app";
pub const LOG_FILE_SUFFIX: &str = "log";

/// Rolling file writer for the configured log directory
pub fn file_appender(cfg: &WebConfig) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(&cfg.log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(cfg.log_max_files)
        .build(&cfg.log_dir)?;
    Ok(appender)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init(cfg: &WebConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));

    let (file_layer, guard) = if cfg.log_to_file {
        let (writer, guard) = tracing_appender::non_blocking(file_appender(cfg)?);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
