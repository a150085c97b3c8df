use alphaloop_core_types::{
    BoundingBox, CoreError, ElementHandle, GateState, InteractionEvent, StructuralPredicate,
};
use async_trait::async_trait;

/// Result of a write through the base value setter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueWrite {
    Written,
    /// No base-class setter exists for this control.
    SetterUnavailable,
}

/// Access to the live document tree.
///
/// Every method may fail with [`CoreError`] when the channel breaks or a
/// handle went stale; absence of matches is an empty `query` result.
#[async_trait]
pub trait DocumentPort: Send + Sync {
    async fn query(&self, predicate: &StructuralPredicate)
        -> Result<Vec<ElementHandle>, CoreError>;
    async fn text_content(&self, handle: &ElementHandle) -> Result<String, CoreError>;
    async fn attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, CoreError>;
    async fn set_attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), CoreError>;
    async fn gate(&self, handle: &ElementHandle) -> Result<GateState, CoreError>;
    async fn set_gate(&self, handle: &ElementHandle, gate: GateState) -> Result<(), CoreError>;
    async fn bounding_box(&self, handle: &ElementHandle) -> Result<BoundingBox, CoreError>;
    async fn focus(&self, handle: &ElementHandle) -> Result<(), CoreError>;
    async fn blur(&self, handle: &ElementHandle) -> Result<(), CoreError>;
    async fn dispatch(&self, event: &InteractionEvent) -> Result<(), CoreError>;
    /// Write through the prototype's `value` setter, bypassing any
    /// instance-level interceptor a binding layer installed.
    async fn write_base_value(
        &self,
        handle: &ElementHandle,
        value: &str,
    ) -> Result<ValueWrite, CoreError>;
    async fn value(&self, handle: &ElementHandle) -> Result<String, CoreError>;
}
