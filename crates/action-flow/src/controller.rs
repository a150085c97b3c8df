//! Iteration controller: N isolated attempts, one tally

use action_primitives::{DelayWindow, DocumentPort, Pacer};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::config::FlowConfig;
use crate::reset::PanelReset;
use crate::types::{AttemptReport, LoopTally};
use crate::workflow::TradeWorkflow;

/// Drives reset + workflow for each iteration.
///
/// Faults are contained per attempt. A cancelled token stops the loop between
/// iterations; the attempt in flight always runs to completion.
pub struct IterationController<'a> {
    port: &'a dyn DocumentPort,
    pacer: &'a dyn Pacer,
    config: &'a FlowConfig,
    cancel: CancellationToken,
}

impl<'a> IterationController<'a> {
    pub fn new(port: &'a dyn DocumentPort, pacer: &'a dyn Pacer, config: &'a FlowConfig) -> Self {
        Self {
            port,
            pacer,
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run up to `trade.iterations` attempts, folding outcomes into `tally`.
    #[instrument(skip_all, fields(iterations = self.config.trade.iterations))]
    pub async fn run(&self, mut tally: LoopTally) -> LoopTally {
        let total = self.config.trade.iterations;

        for iteration in 1..=total {
            if self.cancel.is_cancelled() {
                warn!(iteration, total, "stop requested, skipping remaining iterations");
                break;
            }

            info!(iteration, total, "starting iteration");
            let report = self.run_attempt(iteration).await;
            tally.record(report.success);

            if report.success {
                info!(iteration, "iteration succeeded");
            } else {
                error!(
                    iteration,
                    fault = report.fault.as_deref().unwrap_or("unknown"),
                    "iteration failed"
                );
                self.settle(self.config.pacing.failure_backoff).await;
            }
            self.settle(self.config.pacing.iteration).await;
        }

        let summary = tally.summary();
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            total = summary.total,
            "trade loop completed"
        );
        tally
    }

    /// One reset + workflow attempt. Never fails; the fault lands in the report.
    #[instrument(skip_all, fields(iteration = iteration))]
    pub async fn run_attempt(&self, iteration: u32) -> AttemptReport {
        let mut report = AttemptReport::new(iteration);

        let result = match PanelReset::new(self.port, self.pacer, self.config).run().await {
            Ok(()) => {
                TradeWorkflow::new(self.port, self.pacer, self.config)
                    .execute(&mut report)
                    .await
            }
            Err(fault) => Err(fault),
        };

        match result {
            Ok(()) => report.success = true,
            Err(fault) => report.fault = Some(fault.to_string()),
        }
        report
    }

    /// Pause between iterations, cut short by a stop request.
    async fn settle(&self, window: DelayWindow) {
        tokio::select! {
            _ = self.pacer.pause(window) => {}
            _ = self.cancel.cancelled() => {}
        }
    }
}
