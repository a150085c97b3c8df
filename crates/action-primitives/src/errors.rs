//! Failure taxonomy for primitive operations

use alphaloop_core_types::CoreError;
use thiserror::Error;

/// Why a primitive could not do its job.
///
/// The primitives themselves report these softly (`None` / `false`); callers
/// that need fail-fast behavior promote them into faults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveFailure {
    /// Target not found, or ambiguous after filtering
    #[error("target absent: {0}")]
    LocateAbsent(String),

    /// Target refused interaction because it is disabled
    #[error("target gated: {0}")]
    GateBlocked(String),

    /// Base value setter could not be obtained
    #[error("value injector unavailable: {0}")]
    InjectorUnavailable(String),

    /// Document channel failed
    #[error("document port error: {0}")]
    Port(#[from] CoreError),
}

impl PrimitiveFailure {
    /// Short machine-friendly label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PrimitiveFailure::LocateAbsent(_) => "locate_absent",
            PrimitiveFailure::GateBlocked(_) => "gate_blocked",
            PrimitiveFailure::InjectorUnavailable(_) => "injector_unavailable",
            PrimitiveFailure::Port(_) => "port",
        }
    }
}
