//! Application configuration
//!
//! One YAML document: browser attachment, logging, and the trade loop
//! sections (`trade`, `pacing`, `selectors`) at the top level.

use std::path::PathBuf;
use std::time::Duration;

use action_flow::FlowConfig;
use cdp_adapter::CdpConfig;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub browser: BrowserSection,
    pub logging: LoggingSection,
    #[serde(flatten)]
    pub flow: FlowConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.browser.validate()?;
        self.flow.validate()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSection {
    /// DevTools endpoint of an already running browser
    pub debugger_url: String,
    /// Attach to the first tab whose URL contains this
    pub page_url_contains: Option<String>,
    pub connect_timeout_ms: u64,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            debugger_url: "http://127.0.0.1:9222".to_string(),
            page_url_contains: None,
            connect_timeout_ms: 10_000,
        }
    }
}

impl BrowserSection {
    fn validate(&self) -> Result<(), AppError> {
        let url = self.debugger_url.trim();
        let known_scheme = ["http://", "https://", "ws://", "wss://"]
            .iter()
            .any(|scheme| url.starts_with(scheme));
        if !known_scheme {
            return Err(AppError::DebuggerUrl(self.debugger_url.clone()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(AppError::ConnectTimeout);
        }
        Ok(())
    }

    pub fn to_cdp(&self) -> CdpConfig {
        CdpConfig {
            debugger_url: self.debugger_url.trim().to_string(),
            page_url_contains: self.page_url_contains.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default level when neither RUST_LOG nor --log-level is given
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Append logs to this file instead of stderr
    pub file: Option<PathBuf>,
}
