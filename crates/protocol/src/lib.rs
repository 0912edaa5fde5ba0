//! Data types for the extension windowing platform boundary.
//!
//! This crate contains the serde-serializable types exchanged with the host
//! platform: item identifiers, window/tab/tab-group snapshots, request and
//! event shapes, and the status codes the platform reports back. These types
//! represent the "protocol layer" - pure data, no behavior.
//!
//! The mechanism built on top of these types (pending operations, the object
//! identity cache, the operation drivers) lives in `extwin-core`.

pub mod options;
pub mod request;
pub mod types;

pub use options::*;
pub use request::*;
pub use types::*;
