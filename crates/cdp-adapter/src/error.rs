use std::fmt;

use alphaloop_core_types::CoreError;
use thiserror::Error;

/// High-level error categories surfaced by the adapter.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AdapterErrorKind {
    #[error("could not connect to browser")]
    Connect,
    #[error("no matching page")]
    NoPage,
    #[error("cdp i/o failure")]
    CdpIo,
    #[error("script returned an unexpected shape")]
    Script,
}

/// Error kind plus an optional human hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub hint: Option<String>,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, ": {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdapterError {}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind) -> Self {
        Self { kind, hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<AdapterError> for CoreError {
    fn from(err: AdapterError) -> Self {
        CoreError::new(err.to_string())
    }
}
