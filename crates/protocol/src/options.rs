//! Argument shapes for mutating operations.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, WindowBounds};

/// Creation parameters for a new top-level window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCreateParams {
    /// Initial placement; the platform picks a default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<WindowBounds>,
    #[serde(default)]
    pub maximized: bool,
    #[serde(default)]
    pub private: bool,
}

/// Creation parameters for a new tab-group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroupCreateParams {
    #[serde(default)]
    pub collapsed: bool,
}

/// Properties for a tab created directly inside a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabCreateProps {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub focus: bool,
}

/// Partial update for an existing tab. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TabUpdate {
    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.focus.is_none() && self.locked.is_none() && self.url.is_none() && self.title.is_none()
    }
}

/// Partial update for an existing tab-group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

/// Move/resize arguments for an existing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPlacement {
    pub bounds: WindowBounds,
    #[serde(default)]
    pub maximize: bool,
}

/// Destination container for a move or in-container create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InsertDest {
    /// A window the platform creates as part of this operation.
    NewWindow(WindowCreateParams),
    /// An existing window.
    Window(ItemId),
    /// A tab-group the platform creates as part of this operation.
    NewTabGroup(TabGroupCreateParams),
    /// An existing tab-group.
    TabGroup(ItemId),
    /// The item's current container.
    Current,
}

/// Where a tab or tab-group is placed: a destination container plus an
/// optional "insert before" sibling inside that container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertTarget {
    pub dest: InsertDest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<ItemId>,
}

impl InsertTarget {
    /// Target an existing container with no explicit position (append).
    pub fn append_to(dest: InsertDest) -> Self {
        Self { dest, before: None }
    }
}
