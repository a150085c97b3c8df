//! Trade loop orchestration
//!
//! A fixed buy-then-sell workflow built from the action primitives, a panel
//! reset that brings the page back to a known baseline, and an iteration
//! controller that runs N isolated attempts and tallies their outcomes.

pub mod config;
pub mod controller;
pub mod errors;
mod interact;
pub mod reset;
pub mod types;
pub mod workflow;

pub use config::{ConfigError, FlowConfig, PacingConfig, SelectorConfig, TradeConfig};
pub use controller::IterationController;
pub use errors::FlowError;
pub use reset::PanelReset;
pub use types::{
    AttemptReport, ConfirmPoint, LoopTally, RunSummary, Side, StepName, StepOutcome, WORKFLOW,
};
pub use workflow::TradeWorkflow;
