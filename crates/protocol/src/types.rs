//! Item identifiers and platform snapshot types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque platform-assigned identifier for a window, tab, or tab-group.
///
/// The id namespace is shared across all three kinds: two open entities of
/// different kinds never share a nonzero id. The value `0` means
/// "current/none" depending on context and never names a concrete item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// The reserved "current/none" id.
    pub const NONE: ItemId = ItemId(0);

    /// Returns `true` for the reserved zero id.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of entity an [`ItemId`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Window,
    TabGroup,
    Tab,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Window => write!(f, "window"),
            ItemKind::TabGroup => write!(f, "tab-group"),
            ItemKind::Tab => write!(f, "tab"),
        }
    }
}

/// Screen placement of a top-level window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub top: i32,
    pub left: i32,
    pub width: u32,
    pub height: u32,
}

/// Snapshot of one top-level window as reported by the platform.
///
/// `tab_ids` and `tab_group_ids` are populated only when the query asked for
/// contents; they list direct children in strip order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowData {
    pub id: ItemId,
    pub bounds: WindowBounds,
    pub focused: bool,
    pub private: bool,
    /// Id of the window's currently selected tab, `NONE` for an empty window.
    pub active_tab: ItemId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tab_ids: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tab_group_ids: Vec<ItemId>,
}

/// Snapshot of one tab as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabData {
    pub id: ItemId,
    /// Containing window.
    pub window: ItemId,
    /// Containing tab-group, `NONE` when the tab is ungrouped.
    pub group: ItemId,
    /// Position within the window's tab strip.
    pub index: u32,
    pub url: String,
    pub title: String,
    pub focused: bool,
    pub locked: bool,
}

/// Snapshot of one tab-group as reported by the platform.
///
/// `tab_ids` is populated only when the query asked for contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroupData {
    pub id: ItemId,
    /// Containing window.
    pub window: ItemId,
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tab_ids: Vec<ItemId>,
}
