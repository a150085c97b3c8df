use std::future::Future;
use std::time::{Duration, Instant};

use action_flow::{IterationController, LoopTally, RunSummary};
use action_primitives::RandomPacer;
use alphaloop_core_types::RunId;
use anyhow::{Context, Result};
use cdp_adapter::CdpDocument;
use clap::Args;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Number of iterations (overrides trade.iterations)
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// DevTools endpoint (overrides browser.debugger_url)
    #[arg(long, value_name = "URL")]
    pub debugger_url: Option<String>,

    /// Attach to the first tab whose URL contains this
    #[arg(long, value_name = "FRAGMENT")]
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    run_id: String,
    #[serde(flatten)]
    summary: RunSummary,
    requested: u32,
    elapsed_ms: u64,
    elapsed: String,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    let mut config = ctx.config().clone();
    if let Some(iterations) = args.iterations {
        config.flow.trade.iterations = iterations;
    }
    if let Some(url) = args.debugger_url {
        config.browser.debugger_url = url;
    }
    if let Some(page) = args.page {
        config.browser.page_url_contains = Some(page);
    }
    config.validate().context("invalid configuration")?;

    let run_id = RunId::new();
    let requested = config.flow.trade.iterations;
    info!(%run_id, iterations = requested, debugger_url = %config.browser.debugger_url, "starting trade loop");

    let document = CdpDocument::connect(&config.browser.to_cdp())
        .await
        .context("attaching to browser")?;

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if watch_stop_requests(tokio::signal::ctrl_c, cancel).await {
                error!("second stop request, exiting without finishing the iteration");
                std::process::exit(130);
            }
        }
    });

    let started = Instant::now();
    let pacer = RandomPacer;
    let tally = IterationController::new(&document, &pacer, &config.flow)
        .with_cancellation(cancel)
        .run(LoopTally::new())
        .await;
    watcher.abort();

    let elapsed = Duration::from_millis(started.elapsed().as_millis() as u64);
    let report = RunReport {
        run_id: run_id.to_string(),
        summary: tally.summary(),
        requested,
        elapsed_ms: elapsed.as_millis() as u64,
        elapsed: humantime::format_duration(elapsed).to_string(),
    };

    ctx.output().emit(&report, || {
        format!(
            "Trade loop completed: {} (run {}, {})",
            report.summary, report.run_id, report.elapsed
        )
    })
}

/// First signal cancels `cancel`; returns `true` on the second.
///
/// Listening for SIGINT replaces the default handler, so the caller has to
/// terminate itself when this returns `true`. Returns `false` if the signal
/// listener fails.
async fn watch_stop_requests<F, Fut>(mut next_signal: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    while next_signal().await.is_ok() {
        if cancel.is_cancelled() {
            return true;
        }
        warn!("stop requested, finishing the current iteration (Ctrl-C again to abort)");
        cancel.cancel();
    }
    false
}
