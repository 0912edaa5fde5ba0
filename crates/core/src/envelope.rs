//! Owned result envelopes.
//!
//! A [`ResultEnvelope`] captures the outcome of one platform request: a kind
//! tag, a status, and the payload that is live for that kind. Envelopes are
//! value-semantic and own every byte they reference - platform payloads are
//! valid only for the duration of the callback that delivered them, so the
//! notify layer deep-copies them before the envelope is built.

use extwin_protocol::{ItemId, Status, TabData, TabGroupData, WindowData};

use crate::error::{Error, Result};

/// Which request a [`ResultEnvelope`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeKind {
    AllWindows,
    AllTabGroups,
    AllTabs,
    Window,
    TabGroup,
    Tab,
    WindowCreated,
    TabGroupCreated,
    TabCreated,
    WindowMoved,
    WindowClosed,
    TabGroupClosed,
    TabClosed,
    TabMoved,
    TabGroupMoved,
    TabUpdated,
    TabGroupUpdated,
}

/// Payload of a [`ResultEnvelope`]. Exactly one variant is live per kind;
/// failed operations carry `Empty` regardless of kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    Empty,
    Windows(Vec<WindowData>),
    TabGroups(Vec<TabGroupData>),
    Tabs(Vec<TabData>),
    Window(WindowData),
    TabGroup(TabGroupData),
    Tab(TabData),
    /// A freshly created item and the container it landed in (`NONE` for a
    /// top-level window).
    Created { id: ItemId, parent: ItemId },
    /// A moved item, its new parent, and its new position.
    Moved { id: ItemId, parent: ItemId, index: u32 },
}

/// Outcome of one platform request, owned by the operation that issued it.
///
/// Payload accessors are checked: reading under a kind other than the one
/// the envelope was built with is an [`Error::InvalidState`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    kind: EnvelopeKind,
    status: Status,
    payload: Payload,
}

impl ResultEnvelope {
    pub(crate) fn new(kind: EnvelopeKind, status: Status, payload: Payload) -> Self {
        // Failures never carry a partially populated payload.
        debug_assert!(status.is_ok() || payload == Payload::Empty);
        Self {
            kind,
            status,
            payload,
        }
    }

    pub fn kind(&self) -> EnvelopeKind {
        self.kind
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Converts a failed envelope into the matching error for the request
    /// that addressed `id`; returns the envelope itself on success.
    pub(crate) fn ok(self, id: ItemId) -> Result<ResultEnvelope> {
        if self.status.is_ok() {
            Ok(self)
        } else {
            Err(Error::from_status(self.status, id))
        }
    }

    fn wrong_read(&self, wanted: EnvelopeKind) -> Error {
        Error::InvalidState(format!(
            "envelope of kind {:?} read as {:?}",
            self.kind, wanted
        ))
    }

    pub fn windows(&self) -> Result<&[WindowData]> {
        match (self.kind, &self.payload) {
            (EnvelopeKind::AllWindows, Payload::Windows(items)) => Ok(items),
            _ => Err(self.wrong_read(EnvelopeKind::AllWindows)),
        }
    }

    pub fn tab_groups(&self) -> Result<&[TabGroupData]> {
        match (self.kind, &self.payload) {
            (EnvelopeKind::AllTabGroups, Payload::TabGroups(items)) => Ok(items),
            _ => Err(self.wrong_read(EnvelopeKind::AllTabGroups)),
        }
    }

    pub fn tabs(&self) -> Result<&[TabData]> {
        match (self.kind, &self.payload) {
            (EnvelopeKind::AllTabs, Payload::Tabs(items)) => Ok(items),
            _ => Err(self.wrong_read(EnvelopeKind::AllTabs)),
        }
    }

    pub fn window(&self) -> Result<&WindowData> {
        match (self.kind, &self.payload) {
            (EnvelopeKind::Window, Payload::Window(data)) => Ok(data),
            _ => Err(self.wrong_read(EnvelopeKind::Window)),
        }
    }

    pub fn tab_group(&self) -> Result<&TabGroupData> {
        match (self.kind, &self.payload) {
            (EnvelopeKind::TabGroup, Payload::TabGroup(data)) => Ok(data),
            _ => Err(self.wrong_read(EnvelopeKind::TabGroup)),
        }
    }

    pub fn tab(&self) -> Result<&TabData> {
        match (self.kind, &self.payload) {
            (EnvelopeKind::Tab, Payload::Tab(data)) => Ok(data),
            _ => Err(self.wrong_read(EnvelopeKind::Tab)),
        }
    }

    /// Id and parent of a freshly created item. Valid for the three
    /// `*Created` kinds.
    pub fn created(&self) -> Result<(ItemId, ItemId)> {
        match (self.kind, &self.payload) {
            (
                EnvelopeKind::WindowCreated
                | EnvelopeKind::TabGroupCreated
                | EnvelopeKind::TabCreated,
                Payload::Created { id, parent },
            ) => Ok((*id, *parent)),
            _ => Err(self.wrong_read(EnvelopeKind::TabCreated)),
        }
    }

    /// New parent and position of a moved item. Valid for `TabMoved` and
    /// `TabGroupMoved`.
    pub fn moved(&self) -> Result<(ItemId, u32)> {
        match (self.kind, &self.payload) {
            (
                EnvelopeKind::TabMoved | EnvelopeKind::TabGroupMoved,
                Payload::Moved { parent, index, .. },
            ) => Ok((*parent, *index)),
            _ => Err(self.wrong_read(EnvelopeKind::TabMoved)),
        }
    }
}

/// Deep-copies a borrowed platform collection into owned storage.
///
/// Returns `None` when the allocation fails; the caller downgrades the
/// status to [`Status::NoMemory`] and keeps the payload defined-empty.
pub(crate) fn try_copy_slice<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(items.len()).ok()?;
    out.extend(items.iter().cloned());
    Some(out)
}
