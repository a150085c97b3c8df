//! Value Injector - write a control's value so framework-bound state sees it

use alphaloop_core_types::{CoreError, ElementHandle, EventKind, GateState, InteractionEvent};
use tracing::{debug, instrument, warn};

use crate::ports::{DocumentPort, ValueWrite};

/// Which notifications accompany the write.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InjectOptions {
    /// Also emit `change` after `input`.
    pub commit_notification: bool,
    /// Mirror into `aria-valuenow`/`aria-valuetext` and bracket with focus/blur.
    pub rich_state_sync: bool,
}

impl InjectOptions {
    /// Plain text-like field: live edit only.
    pub fn text() -> Self {
        Self::default()
    }

    /// Continuous-range control (slider).
    pub fn range() -> Self {
        Self {
            commit_notification: true,
            rich_state_sync: true,
        }
    }
}

/// Set `handle`'s value to `value`.
///
/// Disabled/read-only gating is lifted for the write and restored afterwards
/// on every path, including errors. Returns `Ok(false)` when the base value
/// setter is unavailable.
#[instrument(skip_all, fields(target = %handle, value = %value))]
pub async fn inject_value(
    port: &dyn DocumentPort,
    handle: &ElementHandle,
    value: &str,
    options: InjectOptions,
) -> Result<bool, CoreError> {
    let prior = port.gate(handle).await?;
    let lifted = prior.is_gated();

    let outcome = if lifted {
        match port.set_gate(handle, GateState::OPEN).await {
            Ok(()) => write_and_notify(port, handle, value, options).await,
            Err(err) => Err(err),
        }
    } else {
        write_and_notify(port, handle, value, options).await
    };

    if lifted {
        if let Err(err) = port.set_gate(handle, prior).await {
            warn!(error = %err, "failed to restore gate after value write");
            if outcome.is_ok() {
                return Err(err);
            }
        }
    }

    if let Ok(written) = &outcome {
        if *written {
            let live = port.value(handle).await.unwrap_or_default();
            debug!(live = %live, "value after write");
        }
    }
    outcome
}

async fn write_and_notify(
    port: &dyn DocumentPort,
    handle: &ElementHandle,
    value: &str,
    options: InjectOptions,
) -> Result<bool, CoreError> {
    if port.write_base_value(handle, value).await? == ValueWrite::SetterUnavailable {
        warn!("base value setter unavailable");
        return Ok(false);
    }
    port.set_attribute(handle, "value", value).await?;

    if options.rich_state_sync {
        port.set_attribute(handle, "aria-valuenow", value).await?;
        port.set_attribute(handle, "aria-valuetext", &format!("{value} units"))
            .await?;
        port.focus(handle).await?;
    }

    port.dispatch(&InteractionEvent::new(EventKind::Input, handle.clone()))
        .await?;
    if options.commit_notification {
        port.dispatch(&InteractionEvent::new(EventKind::Change, handle.clone()))
            .await?;
    }

    if options.rich_state_sync {
        port.blur(handle).await?;
    }
    Ok(true)
}
