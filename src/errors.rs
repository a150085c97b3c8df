//! Errors raised while preparing a run

use action_flow::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Flow(#[from] ConfigError),

    #[error("browser.debugger_url must be an http(s) or ws(s) URL, got {0:?}")]
    DebuggerUrl(String),

    #[error("browser.connect_timeout_ms must be greater than zero")]
    ConnectTimeout,
}
