//! Flow execution error types

use action_primitives::PrimitiveFailure;
use thiserror::Error;

use crate::types::StepName;

/// Faults that abort one attempt. Neither ever escapes the iteration loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A workflow step could not complete; remaining steps were skipped
    #[error("step {step} failed: {cause}")]
    StepFault {
        step: StepName,
        cause: PrimitiveFailure,
    },

    /// The panel could not be brought back to its baseline
    #[error("panel reset failed: {0}")]
    ResetFault(String),
}

impl FlowError {
    /// Step that raised the fault, if any.
    pub fn step(&self) -> Option<StepName> {
        match self {
            FlowError::StepFault { step, .. } => Some(*step),
            FlowError::ResetFault(_) => None,
        }
    }
}
