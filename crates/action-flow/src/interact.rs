//! Step-level wrappers that promote soft primitive results into failures

use action_primitives::{
    inject_value, locate, simulate, DocumentPort, Gesture, InjectOptions, PrimitiveFailure,
};
use alphaloop_core_types::{ElementHandle, StructuralPredicate, TextFilter};

/// Locate a unique element or fail with `LocateAbsent`.
pub(crate) async fn require(
    port: &dyn DocumentPort,
    predicate: &StructuralPredicate,
    filter: Option<&TextFilter>,
) -> Result<ElementHandle, PrimitiveFailure> {
    match locate(port, predicate, filter).await? {
        Some(handle) => Ok(handle),
        None => Err(PrimitiveFailure::LocateAbsent(describe(predicate, filter))),
    }
}

/// Click or fail with `GateBlocked`.
pub(crate) async fn click(
    port: &dyn DocumentPort,
    handle: &ElementHandle,
    label: &str,
) -> Result<(), PrimitiveFailure> {
    if simulate(port, handle, Gesture::Click).await? {
        Ok(())
    } else {
        Err(PrimitiveFailure::GateBlocked(label.to_string()))
    }
}

/// Locate by predicate and click.
pub(crate) async fn click_target(
    port: &dyn DocumentPort,
    predicate: &StructuralPredicate,
    filter: Option<&TextFilter>,
) -> Result<(), PrimitiveFailure> {
    let handle = require(port, predicate, filter).await?;
    click(port, &handle, &describe(predicate, filter)).await
}

/// Locate by predicate and write `value`, or fail with `InjectorUnavailable`.
pub(crate) async fn fill(
    port: &dyn DocumentPort,
    predicate: &StructuralPredicate,
    value: &str,
    options: InjectOptions,
) -> Result<(), PrimitiveFailure> {
    let handle = require(port, predicate, None).await?;
    if inject_value(port, &handle, value, options).await? {
        Ok(())
    } else {
        Err(PrimitiveFailure::InjectorUnavailable(predicate.to_string()))
    }
}

pub(crate) fn describe(predicate: &StructuralPredicate, filter: Option<&TextFilter>) -> String {
    match filter {
        Some(filter) => format!("{} {}", predicate, filter),
        None => predicate.to_string(),
    }
}
