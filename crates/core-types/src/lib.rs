//! Shared primitives for the alphaloop automation engine.
//!
//! Everything here describes the live document tree from the outside: opaque
//! element handles, the structural predicates used to find them, and the
//! synthetic events dispatched against them. None of these types own page
//! state; they are re-created on every observation.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Failure of the document channel itself.
///
/// "Nothing matched" is never a `CoreError`; it is an empty result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{message}")]
    Message { message: String },
    #[error("element handle {handle} no longer resolves")]
    StaleHandle { handle: String },
}

impl CoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    pub fn stale(handle: &ElementHandle) -> Self {
        Self::StaleHandle {
            handle: handle.0.clone(),
        }
    }
}

/// Identifier for one loop invocation, used to correlate log lines.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to one node of the live document tree.
///
/// Valid only until the page re-renders. Callers re-resolve after every
/// suspension point instead of holding on to one.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementHandle(pub String);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structural match over tag, id, role, classes and attributes.
///
/// `within` restricts matches to descendants of a node matching the nested
/// predicate, which is how "the primary button inside the modal footer" is
/// expressed.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(default))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StructuralPredicate {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub role: Option<String>,
    pub classes: Vec<String>,
    pub excluded_classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub within: Option<Box<StructuralPredicate>>,
}

impl StructuralPredicate {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn without_class(mut self, class: impl Into<String>) -> Self {
        self.excluded_classes.push(class.into());
        self
    }

    pub fn within(mut self, ancestor: StructuralPredicate) -> Self {
        self.within = Some(Box::new(ancestor));
        self
    }

    /// Render as a CSS selector for engines that speak CSS.
    pub fn to_css(&self) -> String {
        let own = self.compound_css();
        match &self.within {
            Some(ancestor) => format!("{} {}", ancestor.to_css(), own),
            None => own,
        }
    }

    fn compound_css(&self) -> String {
        let mut out = self.tag.clone().unwrap_or_default();
        if let Some(role) = &self.role {
            out.push_str(&format!("[role=\"{}\"]", escape_attr(role)));
        }
        if let Some(id) = &self.id {
            out.push_str(&format!("[id=\"{}\"]", escape_attr(id)));
        }
        for (name, value) in &self.attributes {
            out.push_str(&format!("[{}=\"{}\"]", name, escape_attr(value)));
        }
        for class in &self.classes {
            out.push('.');
            out.push_str(class);
        }
        for class in &self.excluded_classes {
            out.push_str(&format!(":not(.{})", class));
        }
        if out.is_empty() {
            out.push('*');
        }
        out
    }
}

impl fmt::Display for StructuralPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn escape_attr(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Narrowing applied to the candidates of a structural query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextFilter {
    /// Trimmed text equals the literal.
    Exact(String),
    /// Text contains the literal anywhere.
    Contains(String),
}

impl TextFilter {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextFilter::Exact(expected) => text.trim() == expected.trim(),
            TextFilter::Contains(needle) => text.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for TextFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFilter::Exact(text) => write!(f, "text:exact:'{}'", text),
            TextFilter::Contains(text) => write!(f, "text:contains:'{}'", text),
        }
    }
}

/// Disabled / read-only flags that block interaction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GateState {
    pub disabled: bool,
    pub read_only: bool,
}

impl GateState {
    pub const OPEN: GateState = GateState {
        disabled: false,
        read_only: false,
    };

    pub fn is_gated(&self) -> bool {
        self.disabled || self.read_only
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Origin shifted by `inset` on both axes.
    pub fn inset_origin(&self, inset: f64) -> (f64, f64) {
        (self.x + inset, self.y + inset)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    MouseDown,
    Click,
    MouseUp,
    Input,
    Change,
}

impl EventKind {
    /// DOM event type name.
    pub fn dom_type(&self) -> &'static str {
        match self {
            EventKind::MouseDown => "mousedown",
            EventKind::Click => "click",
            EventKind::MouseUp => "mouseup",
            EventKind::Input => "input",
            EventKind::Change => "change",
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            EventKind::MouseDown | EventKind::Click | EventKind::MouseUp
        )
    }
}

/// Immutable description of one synthetic event.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionEvent {
    pub kind: EventKind,
    pub bubbles: bool,
    pub cancelable: bool,
    pub coordinates: Option<(f64, f64)>,
    pub target: ElementHandle,
}

impl InteractionEvent {
    /// Bubbling, cancelable event with no coordinates.
    pub fn new(kind: EventKind, target: ElementHandle) -> Self {
        Self {
            kind,
            bubbles: true,
            cancelable: true,
            coordinates: None,
            target,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.coordinates = Some((x, y));
        self
    }
}
