//! In-memory document tree and pacer used by tests across the workspace.
//!
//! `MemoryDocument` behaves like a tiny live page: nodes carry tag, classes,
//! attributes, text, gate flags and a value; every interaction is appended to a
//! journal so tests can assert what was (and was not) dispatched.

use std::collections::BTreeMap;

use alphaloop_core_types::{
    BoundingBox, CoreError, ElementHandle, EventKind, GateState, InteractionEvent,
    StructuralPredicate,
};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::ports::{DocumentPort, ValueWrite};
use crate::tempo::{DelayWindow, Pacer};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Builder for one node of a [`MemoryDocument`].
#[derive(Clone, Debug)]
pub struct MemoryNode {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    gate: GateState,
    bbox: BoundingBox,
    base_setter: bool,
    value: String,
}

impl MemoryNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent: None,
            gate: GateState::OPEN,
            bbox: BoundingBox {
                x: 100.0,
                y: 200.0,
                width: 80.0,
                height: 24.0,
            },
            base_setter: true,
            value: String::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn role(self, role: &str) -> Self {
        self.attr("role", role)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.gate.disabled = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.gate.read_only = true;
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn bbox(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bbox = BoundingBox {
            x,
            y,
            width,
            height,
        };
        self
    }

    /// Simulates a control whose prototype exposes no `value` setter.
    pub fn without_base_setter(mut self) -> Self {
        self.base_setter = false;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum JournalEntry {
    Focus,
    Blur,
    Dispatch(InteractionEvent),
    /// Value written through the base setter, with the gate in force at the time.
    Write { value: String, gate: GateState },
    Gate(GateState),
}

/// Port call forced to fail with a channel error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PortFault {
    /// Every `dispatch`.
    Dispatch,
    /// `set_gate` to the open state; restoring a gate still works.
    OpenGate,
}

#[derive(Debug)]
struct NodeState {
    shape: MemoryNode,
    present: bool,
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<NodeState>,
    generation: u64,
    journal: Vec<(NodeId, JournalEntry)>,
    faults: Vec<PortFault>,
}

impl State {
    fn resolve(&self, handle: &ElementHandle) -> Result<usize, CoreError> {
        let mut parts = handle.0.split(':');
        let (Some("mem"), Some(generation), Some(index)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CoreError::new(format!("foreign handle {}", handle)));
        };
        let generation: u64 = generation.parse().map_err(|_| CoreError::stale(handle))?;
        let index: usize = index.parse().map_err(|_| CoreError::stale(handle))?;
        if generation != self.generation {
            return Err(CoreError::stale(handle));
        }
        match self.nodes.get(index) {
            Some(node) if node.present => Ok(index),
            _ => Err(CoreError::stale(handle)),
        }
    }

    fn handle(&self, index: usize) -> ElementHandle {
        ElementHandle(format!("mem:{}:{}", self.generation, index))
    }

    fn matches(&self, index: usize, predicate: &StructuralPredicate) -> bool {
        let node = &self.nodes[index];
        if !node.present {
            return false;
        }
        let shape = &node.shape;
        if let Some(tag) = &predicate.tag {
            if !shape.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &predicate.id {
            if shape.attributes.get("id") != Some(id) {
                return false;
            }
        }
        if let Some(role) = &predicate.role {
            if shape.attributes.get("role") != Some(role) {
                return false;
            }
        }
        if !predicate.classes.iter().all(|c| shape.classes.contains(c)) {
            return false;
        }
        if predicate
            .excluded_classes
            .iter()
            .any(|c| shape.classes.contains(c))
        {
            return false;
        }
        if !predicate
            .attributes
            .iter()
            .all(|(name, value)| shape.attributes.get(name) == Some(value))
        {
            return false;
        }
        match &predicate.within {
            Some(ancestor) => self
                .ancestors(index)
                .into_iter()
                .any(|candidate| self.matches(candidate, ancestor)),
            None => true,
        }
    }

    fn ancestors(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cursor = self.nodes[index].shape.parent;
        while let Some(NodeId(parent)) = cursor {
            out.push(parent);
            cursor = self.nodes[parent].shape.parent;
        }
        out
    }

    fn text_of(&self, index: usize) -> String {
        let mut text = self.nodes[index].shape.text.clone();
        for (child, node) in self.nodes.iter().enumerate() {
            if node.present && node.shape.parent == Some(NodeId(index)) {
                text.push_str(&self.text_of(child));
            }
        }
        text
    }

    fn record(&mut self, index: usize, entry: JournalEntry) {
        self.journal.push((NodeId(index), entry));
    }

    fn check(&self, fault: PortFault) -> Result<(), CoreError> {
        if self.faults.contains(&fault) {
            return Err(CoreError::new(format!("{:?} channel down", fault)));
        }
        Ok(())
    }
}

/// In-memory [`DocumentPort`] with a full interaction journal.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: Mutex<State>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, node: MemoryNode) -> NodeId {
        let mut state = self.state.lock();
        state.nodes.push(NodeState {
            shape: node,
            present: true,
        });
        NodeId(state.nodes.len() - 1)
    }

    /// Detach a node; its handles go stale and queries skip it.
    pub fn remove(&self, node: NodeId) {
        self.state.lock().nodes[node.0].present = false;
    }

    pub fn fail_on(&self, fault: PortFault) {
        self.state.lock().faults.push(fault);
    }

    /// Invalidate every outstanding handle, as a framework re-render would.
    pub fn rerender(&self) {
        self.state.lock().generation += 1;
    }

    pub fn set_node_gate(&self, node: NodeId, gate: GateState) {
        self.state.lock().nodes[node.0].shape.gate = gate;
    }

    pub fn set_base_setter(&self, node: NodeId, available: bool) {
        self.state.lock().nodes[node.0].shape.base_setter = available;
    }

    pub fn gate_of(&self, node: NodeId) -> GateState {
        self.state.lock().nodes[node.0].shape.gate
    }

    pub fn value_of(&self, node: NodeId) -> String {
        self.state.lock().nodes[node.0].shape.value.clone()
    }

    pub fn attribute_of(&self, node: NodeId, name: &str) -> Option<String> {
        self.state.lock().nodes[node.0]
            .shape
            .attributes
            .get(name)
            .cloned()
    }

    /// Handle for `node` in the current render generation.
    pub fn handle_of(&self, node: NodeId) -> ElementHandle {
        self.state.lock().handle(node.0)
    }

    pub fn journal(&self, node: NodeId) -> Vec<JournalEntry> {
        self.state
            .lock()
            .journal
            .iter()
            .filter(|(id, _)| *id == node)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Event kinds dispatched against `node`, in order.
    pub fn dispatched(&self, node: NodeId) -> Vec<EventKind> {
        self.journal(node)
            .into_iter()
            .filter_map(|entry| match entry {
                JournalEntry::Dispatch(event) => Some(event.kind),
                _ => None,
            })
            .collect()
    }

    pub fn dispatch_count(&self) -> usize {
        self.state
            .lock()
            .journal
            .iter()
            .filter(|(_, entry)| matches!(entry, JournalEntry::Dispatch(_)))
            .count()
    }
}

#[async_trait]
impl DocumentPort for MemoryDocument {
    async fn query(
        &self,
        predicate: &StructuralPredicate,
    ) -> Result<Vec<ElementHandle>, CoreError> {
        let state = self.state.lock();
        Ok((0..state.nodes.len())
            .filter(|index| state.matches(*index, predicate))
            .map(|index| state.handle(index))
            .collect())
    }

    async fn text_content(&self, handle: &ElementHandle) -> Result<String, CoreError> {
        let state = self.state.lock();
        let index = state.resolve(handle)?;
        Ok(state.text_of(index))
    }

    async fn attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, CoreError> {
        let state = self.state.lock();
        let index = state.resolve(handle)?;
        Ok(state.nodes[index].shape.attributes.get(name).cloned())
    }

    async fn set_attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        let index = state.resolve(handle)?;
        state.nodes[index]
            .shape
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn gate(&self, handle: &ElementHandle) -> Result<GateState, CoreError> {
        let state = self.state.lock();
        let index = state.resolve(handle)?;
        Ok(state.nodes[index].shape.gate)
    }

    async fn set_gate(&self, handle: &ElementHandle, gate: GateState) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        let index = state.resolve(handle)?;
        if gate == GateState::OPEN {
            state.check(PortFault::OpenGate)?;
        }
        state.nodes[index].shape.gate = gate;
        state.record(index, JournalEntry::Gate(gate));
        Ok(())
    }

    async fn bounding_box(&self, handle: &ElementHandle) -> Result<BoundingBox, CoreError> {
        let state = self.state.lock();
        let index = state.resolve(handle)?;
        Ok(state.nodes[index].shape.bbox)
    }

    async fn focus(&self, handle: &ElementHandle) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        let index = state.resolve(handle)?;
        state.record(index, JournalEntry::Focus);
        Ok(())
    }

    async fn blur(&self, handle: &ElementHandle) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        let index = state.resolve(handle)?;
        state.record(index, JournalEntry::Blur);
        Ok(())
    }

    async fn dispatch(&self, event: &InteractionEvent) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        let index = state.resolve(&event.target)?;
        state.check(PortFault::Dispatch)?;
        state.record(index, JournalEntry::Dispatch(event.clone()));
        Ok(())
    }

    async fn write_base_value(
        &self,
        handle: &ElementHandle,
        value: &str,
    ) -> Result<ValueWrite, CoreError> {
        let mut state = self.state.lock();
        let index = state.resolve(handle)?;
        if !state.nodes[index].shape.base_setter {
            return Ok(ValueWrite::SetterUnavailable);
        }
        let gate = state.nodes[index].shape.gate;
        state.nodes[index].shape.value = value.to_string();
        state.record(
            index,
            JournalEntry::Write {
                value: value.to_string(),
                gate,
            },
        );
        Ok(ValueWrite::Written)
    }

    async fn value(&self, handle: &ElementHandle) -> Result<String, CoreError> {
        let state = self.state.lock();
        let index = state.resolve(handle)?;
        Ok(state.nodes[index].shape.value.clone())
    }
}

/// Pacer that never sleeps and remembers every requested window.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<DelayWindow>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<DelayWindow> {
        self.pauses.lock().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, window: DelayWindow) -> u64 {
        self.pauses.lock().push(window);
        window.min_ms
    }
}
