//! The notification side of the platform boundary.
//!
//! A [`NotifyHandle`] travels with each submitted request and exposes one
//! notify method per result kind. The platform invokes exactly one of them
//! exactly once, from within its own callback frame; the handle deep-copies
//! any borrowed payload into an owned [`ResultEnvelope`] and resolves the
//! paired pending operation.
//!
//! When the deep copy itself fails, the status is downgraded to
//! [`Status::NoMemory`] and the payload stays defined-empty - the waiting
//! call is still woken, never left hanging, and never sees a partially
//! populated or aliasing payload.

use std::sync::Arc;

use extwin_protocol::{ItemId, Status, TabData, TabGroupData, WindowData};

use crate::envelope::{EnvelopeKind, Payload, ResultEnvelope, try_copy_slice};
use crate::pending::OpShared;

/// Per-request callback handle handed to the platform.
///
/// Correlated 1:1 with the pending operation of the request it accompanied;
/// there is no shared request-id table to cross-talk through.
#[derive(Debug, Clone)]
pub struct NotifyHandle {
    shared: Arc<OpShared>,
}

impl NotifyHandle {
    pub(crate) fn new(shared: Arc<OpShared>) -> Self {
        Self { shared }
    }

    fn finish(&self, kind: EnvelopeKind, status: Status, payload: Payload) {
        self.shared.resolve(ResultEnvelope::new(kind, status, payload));
    }

    /// Builds a collection payload, downgrading to `NoMemory` on copy failure.
    fn finish_collection<T: Clone>(
        &self,
        kind: EnvelopeKind,
        status: Status,
        items: &[T],
        wrap: fn(Vec<T>) -> Payload,
    ) {
        if !status.is_ok() {
            self.finish(kind, status, Payload::Empty);
            return;
        }
        match try_copy_slice(items) {
            Some(owned) => self.finish(kind, status, wrap(owned)),
            None => self.finish(kind, Status::NoMemory, Payload::Empty),
        }
    }

    /// Builds a single-item payload, downgrading to `NoMemory` on copy failure.
    fn finish_one<T: Clone>(
        &self,
        kind: EnvelopeKind,
        status: Status,
        data: Option<&T>,
        wrap: fn(T) -> Payload,
    ) {
        let Some(data) = data.filter(|_| status.is_ok()) else {
            self.finish(kind, status, Payload::Empty);
            return;
        };
        match try_copy_slice(std::slice::from_ref(data)).and_then(|mut v| v.pop()) {
            Some(owned) => self.finish(kind, status, wrap(owned)),
            None => self.finish(kind, Status::NoMemory, Payload::Empty),
        }
    }

    pub fn notify_all_windows(&self, status: Status, windows: &[WindowData]) {
        self.finish_collection(EnvelopeKind::AllWindows, status, windows, Payload::Windows);
    }

    pub fn notify_all_tab_groups(&self, status: Status, groups: &[TabGroupData]) {
        self.finish_collection(
            EnvelopeKind::AllTabGroups,
            status,
            groups,
            Payload::TabGroups,
        );
    }

    pub fn notify_all_tabs(&self, status: Status, tabs: &[TabData]) {
        self.finish_collection(EnvelopeKind::AllTabs, status, tabs, Payload::Tabs);
    }

    pub fn notify_window(&self, status: Status, data: Option<&WindowData>) {
        self.finish_one(EnvelopeKind::Window, status, data, Payload::Window);
    }

    pub fn notify_tab_group(&self, status: Status, data: Option<&TabGroupData>) {
        self.finish_one(EnvelopeKind::TabGroup, status, data, Payload::TabGroup);
    }

    pub fn notify_tab(&self, status: Status, data: Option<&TabData>) {
        self.finish_one(EnvelopeKind::Tab, status, data, Payload::Tab);
    }

    pub fn notify_window_created(&self, status: Status, id: ItemId) {
        let payload = if status.is_ok() {
            Payload::Created {
                id,
                parent: ItemId::NONE,
            }
        } else {
            Payload::Empty
        };
        self.finish(EnvelopeKind::WindowCreated, status, payload);
    }

    /// `parent` is the container the tab was created in - a window or, for a
    /// `NewTabGroup` target, the implicitly created group.
    pub fn notify_tab_created(&self, status: Status, id: ItemId, parent: ItemId) {
        let payload = if status.is_ok() {
            Payload::Created { id, parent }
        } else {
            Payload::Empty
        };
        self.finish(EnvelopeKind::TabCreated, status, payload);
    }

    pub fn notify_window_moved(&self, status: Status) {
        self.finish(EnvelopeKind::WindowMoved, status, Payload::Empty);
    }

    pub fn notify_window_closed(&self, status: Status) {
        self.finish(EnvelopeKind::WindowClosed, status, Payload::Empty);
    }

    pub fn notify_tab_group_closed(&self, status: Status) {
        self.finish(EnvelopeKind::TabGroupClosed, status, Payload::Empty);
    }

    pub fn notify_tab_closed(&self, status: Status) {
        self.finish(EnvelopeKind::TabClosed, status, Payload::Empty);
    }

    /// `parent` is the tab's container after the move - for a `NewTabGroup`
    /// target this is the id of the implicitly created group.
    pub fn notify_tab_moved(&self, status: Status, id: ItemId, parent: ItemId, index: u32) {
        let payload = if status.is_ok() {
            Payload::Moved { id, parent, index }
        } else {
            Payload::Empty
        };
        self.finish(EnvelopeKind::TabMoved, status, payload);
    }

    pub fn notify_tab_group_moved(&self, status: Status, id: ItemId, parent: ItemId, index: u32) {
        let payload = if status.is_ok() {
            Payload::Moved { id, parent, index }
        } else {
            Payload::Empty
        };
        self.finish(EnvelopeKind::TabGroupMoved, status, payload);
    }

    pub fn notify_tab_updated(&self, status: Status) {
        self.finish(EnvelopeKind::TabUpdated, status, Payload::Empty);
    }

    pub fn notify_tab_group_updated(&self, status: Status) {
        self.finish(EnvelopeKind::TabGroupUpdated, status, Payload::Empty);
    }
}
