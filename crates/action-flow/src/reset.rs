//! Panel reset: return the trade panel to its buy-tab baseline

use action_primitives::{exists, locate, simulate, DocumentPort, Gesture, Pacer};
use alphaloop_core_types::{CoreError, TextFilter};
use tracing::{debug, info, instrument, warn};

use crate::config::FlowConfig;
use crate::errors::FlowError;
use crate::interact::{click_target, require};

pub struct PanelReset<'a> {
    port: &'a dyn DocumentPort,
    pacer: &'a dyn Pacer,
    config: &'a FlowConfig,
}

impl<'a> PanelReset<'a> {
    pub fn new(port: &'a dyn DocumentPort, pacer: &'a dyn Pacer, config: &'a FlowConfig) -> Self {
        Self {
            port,
            pacer,
            config,
        }
    }

    /// Dismiss a leftover modal, re-select the buy tab and check that the
    /// amount field and range control are present.
    ///
    /// Safe to run on an already clean panel: with no modal the cancel click
    /// is skipped.
    #[instrument(skip_all)]
    pub async fn run(&self) -> Result<(), FlowError> {
        let selectors = &self.config.selectors;
        let pacing = &self.config.pacing;

        if exists(self.port, &selectors.modal_footer)
            .await
            .map_err(port_fault)?
        {
            self.dismiss_modal().await?;
        } else {
            debug!("no modal open");
        }

        let label = TextFilter::Exact(selectors.buy_tab_text.clone());
        click_target(self.port, &selectors.buy_tab, Some(&label))
            .await
            .map_err(|cause| FlowError::ResetFault(format!("buy tab: {}", cause)))?;
        self.pacer.pause(pacing.step).await;

        let amount = require(self.port, &selectors.amount_field, None)
            .await
            .map_err(|cause| FlowError::ResetFault(format!("amount field: {}", cause)))?;
        let range = require(self.port, &selectors.range_control, None)
            .await
            .map_err(|cause| FlowError::ResetFault(format!("range control: {}", cause)))?;

        let amount_value = self.port.value(&amount).await.unwrap_or_default();
        let range_value = self.port.value(&range).await.unwrap_or_default();
        info!(amount = %amount_value, range = %range_value, "panel reset");
        Ok(())
    }

    /// Best effort: a missing or gated cancel control is logged, not raised.
    async fn dismiss_modal(&self) -> Result<(), FlowError> {
        let cancel = locate(self.port, &self.config.selectors.cancel_button, None)
            .await
            .map_err(port_fault)?;
        let Some(cancel) = cancel else {
            warn!("modal open but no cancel control found");
            return Ok(());
        };

        match simulate(self.port, &cancel, Gesture::Click).await {
            Ok(true) => debug!("modal dismissed"),
            Ok(false) => warn!("cancel control is gated"),
            Err(err) => warn!(error = %err, "cancel click failed"),
        }
        self.pacer.pause(self.config.pacing.modal).await;
        Ok(())
    }
}

fn port_fault(err: CoreError) -> FlowError {
    FlowError::ResetFault(format!("document port: {}", err))
}
