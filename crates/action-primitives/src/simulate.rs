//! Event Simulator - synthetic user gestures against a resolved handle

use alphaloop_core_types::{CoreError, ElementHandle, EventKind, InteractionEvent};
use tracing::{debug, instrument, warn};

use crate::ports::DocumentPort;

/// Offset from the bounding-box origin so the click lands inside thin targets.
pub const CLICK_INSET_PX: f64 = 10.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Gesture {
    Click,
}

/// Perform `gesture` on `handle`.
///
/// A disabled target is refused softly: `Ok(false)` and nothing dispatched.
/// Focus is requested first, then pointer-down, click, pointer-up are
/// dispatched in that order, each bubbling and cancelable.
#[instrument(skip_all, fields(target = %handle, gesture = ?gesture))]
pub async fn simulate(
    port: &dyn DocumentPort,
    handle: &ElementHandle,
    gesture: Gesture,
) -> Result<bool, CoreError> {
    let gate = port.gate(handle).await?;
    if gate.disabled {
        warn!("target is disabled, gesture ignored");
        return Ok(false);
    }

    match gesture {
        Gesture::Click => {
            let (x, y) = port
                .bounding_box(handle)
                .await?
                .inset_origin(CLICK_INSET_PX);

            port.focus(handle).await?;
            port.dispatch(&InteractionEvent::new(EventKind::MouseDown, handle.clone()))
                .await?;
            port.dispatch(&InteractionEvent::new(EventKind::Click, handle.clone()).at(x, y))
                .await?;
            port.dispatch(&InteractionEvent::new(EventKind::MouseUp, handle.clone()))
                .await?;
            debug!(x, y, "click dispatched");
        }
    }
    Ok(true)
}
