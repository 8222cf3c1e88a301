//! Tracing setup.
//!
//! The configuration decides the final log level and file, so it is loaded
//! under a temporary console subscriber first. `init_logging` then installs
//! the global one.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LoggingConfig};

/// Load the configuration with its own log lines printed to stdout.
///
/// `RUST_LOG` applies here too, defaulting to `info`.
pub fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    load_config_with(path, filter, std::io::stdout)
}

fn load_config_with<W>(path: Option<&str>, filter: EnvFilter, writer: W) -> anyhow::Result<Config>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).finish();
    tracing::subscriber::with_default(bootstrap, || Config::load(path))
}

/// Console logging always, plus a daily rolling file when configured.
///
/// Keep the returned guard alive for the life of the process, or buffered file
/// output is lost.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid logging.level")?;

    let (file_layer, guard) = match config.file.as_deref() {
        Some(file) => {
            let (dir, name) = split_log_path(file)?;
            let appender = tracing_appender::rolling::daily(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

fn split_log_path(file: &str) -> anyhow::Result<(PathBuf, PathBuf)> {
    let path = Path::new(file);
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = path.file_name().context("logging.file has no file name")?;
    Ok((dir.to_path_buf(), PathBuf::from(name)))
}
