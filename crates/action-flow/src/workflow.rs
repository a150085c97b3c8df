//! Workflow step sequencer
//!
//! Runs the fixed buy-then-sell plan. Every step re-locates its targets after
//! the previous pace, so no handle outlives the step that resolved it. The
//! first failing step aborts the rest of the attempt.

use action_primitives::{locate_first, DocumentPort, InjectOptions, Pacer, PrimitiveFailure};
use alphaloop_core_types::TextFilter;
use tracing::{info, instrument, warn};

use crate::config::FlowConfig;
use crate::errors::FlowError;
use crate::interact::{click, click_target, fill};
use crate::types::{AttemptReport, ConfirmPoint, Side, StepName, StepOutcome, WORKFLOW};

/// Sequencer over one document and pacer.
pub struct TradeWorkflow<'a> {
    port: &'a dyn DocumentPort,
    pacer: &'a dyn Pacer,
    config: &'a FlowConfig,
}

impl<'a> TradeWorkflow<'a> {
    pub fn new(port: &'a dyn DocumentPort, pacer: &'a dyn Pacer, config: &'a FlowConfig) -> Self {
        Self {
            port,
            pacer,
            config,
        }
    }

    /// Run every step of [`WORKFLOW`] in order, appending outcomes to `report`.
    ///
    /// Returns the first [`FlowError::StepFault`]; its outcome is recorded
    /// before returning and no later step runs.
    #[instrument(skip_all, fields(iteration = report.iteration))]
    pub async fn execute(&self, report: &mut AttemptReport) -> Result<(), FlowError> {
        for step in WORKFLOW {
            let outcome = StepOutcome::new(step);
            match self.run_step(step).await {
                Ok(note) => {
                    info!(step = %step, "step completed");
                    report.record(outcome.with_success(note).finish());
                }
                Err(cause) => {
                    warn!(step = %step, reason = %cause, kind = cause.kind(), "step failed");
                    report.record(outcome.with_error(cause.to_string()).finish());
                    return Err(FlowError::StepFault { step, cause });
                }
            }
        }
        Ok(())
    }

    /// One step: locate, act, pace. `Ok(Some(_))` carries a tolerated gap.
    async fn run_step(&self, step: StepName) -> Result<Option<String>, PrimitiveFailure> {
        let selectors = &self.config.selectors;
        let trade = &self.config.trade;
        let pacing = &self.config.pacing;

        match step {
            StepName::SelectBuyTab => {
                let label = TextFilter::Exact(selectors.buy_tab_text.clone());
                click_target(self.port, &selectors.buy_tab, Some(&label)).await?;
                self.pacer.pause(pacing.step).await;
            }
            StepName::EnterBuyAmount => {
                fill(
                    self.port,
                    &selectors.amount_field,
                    &trade.buy_amount,
                    InjectOptions::text(),
                )
                .await?;
                self.pacer.pause(pacing.amount_settle).await;
            }
            StepName::ConfigureSlippage(side) => return self.configure_slippage(side).await,
            StepName::Confirm(point) => {
                click_target(self.port, &selectors.confirm_button, None).await?;
                let settle = match point {
                    ConfirmPoint::SellOrder => pacing.final_settle,
                    _ => pacing.order_settle,
                };
                self.pacer.pause(settle).await;
            }
            StepName::ClickBuy => {
                click_target(self.port, &selectors.buy_button, None).await?;
                self.pacer.pause(pacing.step).await;
            }
            StepName::SelectSellTab => {
                let label = TextFilter::Exact(selectors.sell_tab_text.clone());
                click_target(self.port, &selectors.sell_tab, Some(&label)).await?;
                self.pacer.pause(pacing.step).await;
            }
            StepName::SetSellToFull => {
                fill(
                    self.port,
                    &selectors.range_control,
                    &trade.sell_fraction,
                    InjectOptions::range(),
                )
                .await?;
                self.pacer.pause(pacing.order_settle).await;
            }
            StepName::ClickSell => {
                click_target(self.port, &selectors.sell_button, None).await?;
                self.pacer.pause(pacing.step).await;
            }
        }
        Ok(None)
    }

    /// Open the slippage panel, pick the custom option, write the tolerance.
    ///
    /// A missing custom option is tolerated: the step succeeds without
    /// writing a tolerance and the gap is returned as a note.
    async fn configure_slippage(&self, side: Side) -> Result<Option<String>, PrimitiveFailure> {
        let selectors = &self.config.selectors;
        let window = self.config.pacing.step;

        click_target(self.port, &selectors.slippage_settings, None).await?;
        self.pacer.pause(window).await;

        let marker = TextFilter::Contains(selectors.custom_option_marker.clone());
        let listed = locate_first(self.port, &selectors.slippage_options, Some(&marker))
            .await?
            .is_some();
        self.pacer.pause(window).await;
        if !listed {
            return Ok(Some(self.custom_absent(side)));
        }

        // Resolved again: the option list may have re-rendered during the pause.
        let Some(custom) =
            locate_first(self.port, &selectors.slippage_options, Some(&marker)).await?
        else {
            return Ok(Some(self.custom_absent(side)));
        };
        click(self.port, &custom, &selectors.custom_option_marker).await?;
        self.pacer.pause(window).await;

        fill(
            self.port,
            &selectors.slippage_field,
            &self.config.trade.slippage_tolerance,
            InjectOptions::text(),
        )
        .await?;
        self.pacer.pause(window).await;
        Ok(None)
    }

    fn custom_absent(&self, side: Side) -> String {
        let marker = &self.config.selectors.custom_option_marker;
        warn!(side = %side, marker = %marker, "custom slippage option absent, tolerance not applied");
        format!("custom option '{}' absent; tolerance not applied", marker)
    }
}
