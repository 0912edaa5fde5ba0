//! Error types for the windowing core.
//!
//! The taxonomy separates four families that must never be confused:
//! local validation failures (reported before any platform call), copy
//! failures (a distinct memory status), platform business refusals (one
//! variant per refusal code), and unrecognized platform codes (always an
//! explicit invalid-state error, never silent success).

use extwin_protocol::{ItemId, ItemKind, Status};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An argument failed local validation; no platform call was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Copying platform data into owned storage failed.
    #[error("out of memory while copying platform data")]
    OutOfMemory,

    /// The platform refused the operation in the calling context.
    #[error("operation not supported in this context")]
    UnsupportedContext,

    /// The requested placement would violate the container hierarchy.
    #[error("hierarchy violation: {0}")]
    HierarchyViolation(String),

    /// A platform capacity limit was reached.
    #[error("capacity exceeded")]
    CapacityExceeded,

    /// An id named an entity of the wrong kind. `expected` is absent when
    /// the refusal came from the platform, which reports only the code.
    #[error("item {id} is of the wrong kind{}", expected_suffix(.expected))]
    WrongKind {
        expected: Option<ItemKind>,
        id: ItemId,
    },

    /// The addressed item has been closed.
    #[error("item {0} is closed")]
    Closed(ItemId),

    /// An envelope was read under the wrong kind, or the platform reported a
    /// code this layer does not recognize.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

fn expected_suffix(expected: &Option<ItemKind>) -> String {
    match expected {
        Some(kind) => format!(", expected a {kind}"),
        None => String::new(),
    }
}

impl Error {
    /// Maps a non-`Ok` platform status to the matching error for the request
    /// that addressed `id`.
    pub(crate) fn from_status(status: Status, id: ItemId) -> Error {
        debug_assert!(!status.is_ok());
        match status {
            Status::Ok => Error::InvalidState("ok status mapped to error".into()),
            Status::NoMemory => Error::OutOfMemory,
            Status::UnsupportedContext => Error::UnsupportedContext,
            Status::HierarchyViolation => {
                Error::HierarchyViolation(format!("platform refused placement of item {id}"))
            }
            Status::CapacityExceeded => Error::CapacityExceeded,
            Status::WrongKind => Error::WrongKind { expected: None, id },
            Status::ItemClosed => Error::Closed(id),
            Status::Failed => Error::InvalidState(format!("platform request for item {id} failed")),
        }
    }
}
