use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LoggingSection};

/// RUST_LOG wins, then `--debug`, then `--log-level`, then `logging.level`.
///
/// Logs go to stderr (or `logging.file`) so stdout carries only command
/// output. The returned guard must be held until exit to flush the file
/// writer.
pub fn init_logging(
    level: Option<&str>,
    debug: bool,
    settings: &LoggingSection,
) -> Result<Option<WorkerGuard>> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level
            .or(settings.level.as_deref())
            .unwrap_or("info")
            .parse()
            .context("Invalid log level")?
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let (writer, guard) = match &settings.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("logging.file {} has no file name", path.display()))?;
            std::fs::create_dir_all(&directory)
                .with_context(|| format!("creating {}", directory.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let initialized = if settings.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init()
    };
    initialized.context("Failed to initialize logging")?;

    Ok(guard)
}

pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub found: bool,
}

/// `--config`, else `./config/alphaloop.yaml`, else
/// `<config dir>/alphaloop/config.yaml`. A missing file means defaults.
pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    if fs::try_exists(&config_path).await.unwrap_or(false) {
        let config = read_config(&config_path).await?;
        Ok(LoadedConfig {
            config,
            path: config_path,
            found: true,
        })
    } else {
        Ok(LoadedConfig {
            config: AppConfig::default(),
            path: config_path,
            found: false,
        })
    }
}

pub async fn read_config(path: &std::path::Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn default_config_path() -> Result<PathBuf> {
    let local_config = PathBuf::from("config/alphaloop.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("alphaloop");
    path.push("config.yaml");
    Ok(path)
}
