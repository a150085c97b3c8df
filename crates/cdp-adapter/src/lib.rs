//! Chrome DevTools Protocol implementation of the document port.
//!
//! Attaches to an already running browser (started with
//! `--remote-debugging-port`), picks the tab to drive, and evaluates small
//! scripts in it for every port operation. Elements are addressed by a token
//! attribute stamped on each query, so a handle dies with the node it tagged.

pub mod config;
pub mod document;
pub mod error;
mod scripts;

pub use config::CdpConfig;
pub use document::CdpDocument;
pub use error::{AdapterError, AdapterErrorKind};
