//! Action primitives over a live, externally rendered document tree.
//!
//! Four building blocks, each usable on its own:
//! - `locate` / `locate_first` - resolve a structural predicate (+ text filter) to a handle
//! - `simulate` - synthetic pointer gesture against a handle
//! - `inject_value` - framework-proof value write with gate lift/restore
//! - `Pacer` - randomized suspension between interactions
//!
//! All page access goes through [`DocumentPort`], so the same primitives run
//! against a CDP-attached browser tab or the in-memory `testkit` document.

pub mod errors;
mod inject;
mod locator;
pub mod ports;
mod simulate;
mod tempo;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use errors::PrimitiveFailure;
pub use inject::{inject_value, InjectOptions};
pub use locator::{exists, locate, locate_first};
pub use ports::{DocumentPort, ValueWrite};
pub use simulate::{simulate, Gesture, CLICK_INSET_PX};
pub use tempo::{DelayWindow, Pacer, RandomPacer};
