//! Request, event, and status shapes at the platform boundary.

use serde::{Deserialize, Serialize};

use crate::options::{
    InsertTarget, TabCreateProps, TabGroupUpdate, TabUpdate, WindowCreateParams, WindowPlacement,
};
use crate::types::{ItemId, ItemKind};

/// One primitive request submitted to the platform.
///
/// Every request is fire-and-forget-with-callback: the platform receives a
/// notify handle alongside the request and must invoke exactly one matching
/// notify method on it exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformRequest {
    QueryAllWindows,
    QueryAllTabGroups,
    QueryAllTabs,
    /// `id` may be `NONE` to name the current window.
    QueryWindow { id: ItemId, include_contents: bool },
    QueryTabGroup { id: ItemId, include_contents: bool },
    /// `id` may be `NONE` to name the focused tab of the current window.
    QueryTab { id: ItemId },
    CreateWindow { params: WindowCreateParams },
    /// Create a tab directly inside the target container.
    CreateTab { props: TabCreateProps, target: InsertTarget },
    CloseWindow { id: ItemId },
    PlaceWindow { id: ItemId, placement: WindowPlacement },
    CloseTabGroup { id: ItemId },
    MoveTabGroup { id: ItemId, target: InsertTarget },
    UpdateTabGroup { id: ItemId, update: TabGroupUpdate },
    CloseTab { id: ItemId },
    MoveTab { id: ItemId, target: InsertTarget },
    UpdateTab { id: ItemId, update: TabUpdate },
}

/// Outcome code reported by the platform for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    /// Copying the result out of platform memory failed. Distinct from every
    /// business failure.
    NoMemory,
    /// The operation is not available in the calling context.
    UnsupportedContext,
    /// The requested placement would violate the container hierarchy.
    HierarchyViolation,
    /// The platform refused because a capacity limit was reached.
    CapacityExceeded,
    /// An argument named an entity of the wrong kind.
    WrongKind,
    /// The addressed item has been closed.
    ItemClosed,
    /// Catch-all for codes this layer does not recognize.
    Failed,
}

impl Status {
    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

/// What happened to an item, as reported on the platform event feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDetail {
    Created,
    Closed,
    Focused,
    Blurred,
    /// The item moved; carries the previous parent and the new position.
    Moved { previous_parent: ItemId, index: u32 },
    Updated,
}

/// One entry on the platform's out-of-band event feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub kind: ItemKind,
    pub id: ItemId,
    pub detail: EventDetail,
}
