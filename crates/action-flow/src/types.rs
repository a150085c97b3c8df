//! Step names, per-attempt reports and the run-scoped tally

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

/// Which modal a confirm step closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmPoint {
    BuySlippage,
    BuyOrder,
    SellSlippage,
    SellOrder,
}

impl fmt::Display for ConfirmPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfirmPoint::BuySlippage => "buy-slippage",
            ConfirmPoint::BuyOrder => "buy-order",
            ConfirmPoint::SellSlippage => "sell-slippage",
            ConfirmPoint::SellOrder => "sell-order",
        };
        f.write_str(label)
    }
}

/// One step of the trade workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepName {
    SelectBuyTab,
    EnterBuyAmount,
    ConfigureSlippage(Side),
    Confirm(ConfirmPoint),
    ClickBuy,
    SelectSellTab,
    SetSellToFull,
    ClickSell,
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepName::SelectBuyTab => f.write_str("select-buy-tab"),
            StepName::EnterBuyAmount => f.write_str("enter-buy-amount"),
            StepName::ConfigureSlippage(side) => write!(f, "configure-slippage({})", side),
            StepName::Confirm(point) => write!(f, "confirm({})", point),
            StepName::ClickBuy => f.write_str("click-buy"),
            StepName::SelectSellTab => f.write_str("select-sell-tab"),
            StepName::SetSellToFull => f.write_str("set-sell-to-full"),
            StepName::ClickSell => f.write_str("click-sell"),
        }
    }
}

/// The fixed buy-then-sell plan, in execution order.
///
/// Slippage is configured after the amount on the buy leg but after the
/// full-size slider on the sell leg.
pub const WORKFLOW: [StepName; 12] = [
    StepName::SelectBuyTab,
    StepName::EnterBuyAmount,
    StepName::ConfigureSlippage(Side::Buy),
    StepName::Confirm(ConfirmPoint::BuySlippage),
    StepName::ClickBuy,
    StepName::Confirm(ConfirmPoint::BuyOrder),
    StepName::SelectSellTab,
    StepName::SetSellToFull,
    StepName::ConfigureSlippage(Side::Sell),
    StepName::Confirm(ConfirmPoint::SellSlippage),
    StepName::ClickSell,
    StepName::Confirm(ConfirmPoint::SellOrder),
];

/// Step execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Step that ran
    pub step: StepName,

    /// Success flag
    pub success: bool,

    /// Failure reason, or a note on a tolerated gap
    pub detail: Option<String>,

    /// Start time
    pub started_at: DateTime<Utc>,

    /// Wall time including the trailing pace, in milliseconds
    pub latency_ms: u64,
}

impl StepOutcome {
    pub fn new(step: StepName) -> Self {
        Self {
            step,
            success: false,
            detail: None,
            started_at: Utc::now(),
            latency_ms: 0,
        }
    }

    pub fn with_success(mut self, detail: Option<String>) -> Self {
        self.success = true;
        self.detail = detail;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.success = false;
        self.detail = Some(error);
        self
    }

    /// Stamp latency from `started_at`.
    pub fn finish(mut self) -> Self {
        self.latency_ms = (Utc::now() - self.started_at).num_milliseconds().max(0) as u64;
        self
    }
}

/// Ordered outcomes of one attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    pub iteration: u32,
    pub outcomes: Vec<StepOutcome>,
    pub success: bool,
    /// Rendered fault when the attempt was aborted
    pub fault: Option<String>,
}

impl AttemptReport {
    pub fn new(iteration: u32) -> Self {
        Self {
            iteration,
            outcomes: Vec::new(),
            success: false,
            fault: None,
        }
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        self.outcomes.push(outcome);
    }

    /// Names of the steps that ran, in order.
    pub fn steps(&self) -> Vec<StepName> {
        self.outcomes.iter().map(|o| o.step).collect()
    }

    pub fn outcome(&self, step: StepName) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }
}

/// Counters for one loop invocation.
///
/// Passed into and returned from the controller; `attempted` always equals
/// `succeeded + failed` once an attempt has been recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopTally {
    pub attempted: u32,
    pub succeeded: u32,
    pub failed: u32,
}

impl LoopTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, success: bool) {
        self.attempted += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            succeeded: self.succeeded,
            failed: self.failed,
            total: self.attempted,
        }
    }
}

/// Final record reported after the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub succeeded: u32,
    pub failed: u32,
    pub total: u32,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} total",
            self.succeeded, self.failed, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names_render_as_workflow_labels() {
        let labels: Vec<String> = WORKFLOW.iter().map(ToString::to_string).collect();
        assert_eq!(labels[0], "select-buy-tab");
        assert_eq!(labels[2], "configure-slippage(buy)");
        assert_eq!(labels[5], "confirm(buy-order)");
        assert_eq!(labels[8], "configure-slippage(sell)");
        assert_eq!(labels[11], "confirm(sell-order)");
    }

    #[test]
    fn tally_keeps_attempted_equal_to_outcomes() {
        let mut tally = LoopTally::new();
        for success in [true, false, true, true] {
            tally.record(success);
            assert_eq!(tally.attempted, tally.succeeded + tally.failed);
        }
        assert_eq!(
            tally.summary(),
            RunSummary {
                succeeded: 3,
                failed: 1,
                total: 4
            }
        );
        assert_eq!(tally.summary().to_string(), "3 succeeded, 1 failed, 4 total");
    }
}
