//! Logger setup.
//!
//! The crate logs through the `log` facade. [`init`] installs an
//! `env_logger` backend writing lines shaped like
//! `[2026-01-31 12:00:00,123][labelgen][INFO] message` to stderr or to a file.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

use crate::config::{LogConfig, LogFile};
use crate::error::{Error, Result};
use crate::render::FontSink;

/// Logger name printed in every line.
pub const LOGGER_NAME: &str = "labelgen";

/// Directory used when a file target has an empty directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Parse a level name. `warning` and `critical` are accepted as aliases.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "error" | "critical" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(Error::Config(format!("unknown log level '{}'", other))),
    }
}

/// `labelgen_YYYYMMDD_HHMMSS.log` for the current local time.
pub fn default_log_file_name() -> String {
    format!("{}_{}.log", LOGGER_NAME, chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Full path of a log file target.
pub fn log_file_path(file: &LogFile) -> PathBuf {
    let dir = if file.dir.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_LOG_DIR)
    } else {
        file.dir.clone()
    };
    let name = file.name.clone().unwrap_or_else(default_log_file_name);
    dir.join(name)
}

fn builder(config: &LogConfig) -> Result<Builder> {
    let mut builder = match &config.level {
        Some(level) => {
            let mut builder = Builder::new();
            builder.filter_level(parse_level(level)?);
            builder
        },
        None => Builder::from_env(Env::default().default_filter_or("info")),
    };

    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}][{}][{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            LOGGER_NAME,
            record.level(),
            record.args()
        )
    });

    if let Some(file) = &config.file {
        let path = log_file_path(file);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let handle = File::create(&path)?;
        builder.target(Target::Pipe(Box::new(handle)));
    }

    Ok(builder)
}

/// Install the global logger.
///
/// Fails with [`Error::Config`] on an unknown level or when a logger is
/// already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    builder(config)?
        .try_init()
        .map_err(|e| Error::Config(format!("logger already initialized: {}", e)))?;

    if let Some(file) = &config.file {
        log::info!("Logging to file: {}", log_file_path(file).display());
    }
    Ok(())
}

/// Log the fonts registered with a renderer and return their identifiers.
pub fn log_registered_fonts<S: FontSink + ?Sized>(sink: &S) -> Vec<String> {
    let fonts: Vec<String> = sink.registered_fonts().into_iter().collect();
    log::info!("Registered font count: {}", fonts.len());
    for font in &fonts {
        log::debug!("  - {}", font);
    }
    fonts
}
