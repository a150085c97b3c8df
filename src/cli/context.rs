use std::path::{Path, PathBuf};

use crate::config::AppConfig;

use super::output::OutputFormat;

pub struct CliContext {
    config: AppConfig,
    config_path: PathBuf,
    config_found: bool,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(
        config: AppConfig,
        config_path: PathBuf,
        config_found: bool,
        output: OutputFormat,
    ) -> Self {
        Self {
            config,
            config_path,
            config_found,
            output,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Whether `config_path` existed when the CLI started.
    pub fn config_found(&self) -> bool {
        self.config_found
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }
}
