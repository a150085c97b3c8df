//! Element Locator - resolve a structural predicate to a single live handle

use alphaloop_core_types::{CoreError, ElementHandle, StructuralPredicate, TextFilter};
use tracing::{debug, instrument};

use crate::ports::DocumentPort;

/// Resolve exactly one element.
///
/// Applies `predicate`, then narrows by `filter` when given. Zero or several
/// remaining candidates yield `Ok(None)`; only a broken document channel is
/// an error. There is no retry here.
#[instrument(skip_all, fields(predicate = %predicate))]
pub async fn locate(
    port: &dyn DocumentPort,
    predicate: &StructuralPredicate,
    filter: Option<&TextFilter>,
) -> Result<Option<ElementHandle>, CoreError> {
    let candidates = port.query(predicate).await?;
    let total = candidates.len();

    let mut matched = Vec::with_capacity(total);
    for handle in candidates {
        if passes(port, &handle, filter).await? {
            matched.push(handle);
        }
    }

    match matched.len() {
        1 => Ok(matched.pop()),
        0 => {
            debug!(candidates = total, "no element matched");
            Ok(None)
        }
        n => {
            debug!(candidates = total, matched = n, "ambiguous match, refusing to pick");
            Ok(None)
        }
    }
}

/// Scan candidates in document order and return the first passing `filter`.
#[instrument(skip_all, fields(predicate = %predicate))]
pub async fn locate_first(
    port: &dyn DocumentPort,
    predicate: &StructuralPredicate,
    filter: Option<&TextFilter>,
) -> Result<Option<ElementHandle>, CoreError> {
    for handle in port.query(predicate).await? {
        if passes(port, &handle, filter).await? {
            return Ok(Some(handle));
        }
    }
    Ok(None)
}

/// Whether at least one element satisfies `predicate`.
pub async fn exists(
    port: &dyn DocumentPort,
    predicate: &StructuralPredicate,
) -> Result<bool, CoreError> {
    Ok(!port.query(predicate).await?.is_empty())
}

async fn passes(
    port: &dyn DocumentPort,
    handle: &ElementHandle,
    filter: Option<&TextFilter>,
) -> Result<bool, CoreError> {
    match filter {
        None => Ok(true),
        Some(filter) => {
            let text = port.text_content(handle).await?;
            Ok(filter.matches(&text))
        }
    }
}
