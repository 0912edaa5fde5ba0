//! Composite create state machines.
//!
//! "Create a window with N initial tabs" and "move several tabs into a new
//! tab-group" cannot be one platform call: platform primitives only create
//! an empty container or place one item at a time. The machines here
//! validate everything up front, establish the container, then drain an
//! explicit work queue of insertion steps - one platform request per step,
//! no recursive re-entry from callback frames.
//!
//! Once the container id is concretely known, every later step targets the
//! existing container, never "new" again, and the explicit insert-before
//! position is consumed by the first insertion so later items append in
//! caller order. A failing step aborts the remaining steps and surfaces its
//! specific error; completed steps are not rolled back - the caller can
//! query the container afterwards to see what succeeded.

use std::collections::VecDeque;
use std::sync::Arc;

use extwin_protocol::{
    InsertDest, InsertTarget, ItemId, ItemKind, PlatformRequest, TabCreateProps,
    TabGroupCreateParams, WindowCreateParams,
};

use crate::cache::ScriptObject;
use crate::error::{Error, Result};
use crate::platform::issue;
use crate::windowing::Windowing;

/// One entry of a composite create's initial-content list.
#[derive(Debug, Clone)]
pub enum InitialEntry {
    /// An existing tab or tab-group object; inserted with a move request.
    Existing(Arc<ScriptObject>),
    /// A plain property bag; shaped into a create-tab-directly-inside-
    /// container request, no query-before-insert needed.
    Tab(TabCreateProps),
}

/// One validated insertion step.
#[derive(Debug)]
enum InsertStep {
    MoveExisting { id: ItemId, kind: ItemKind },
    CreateTab(TabCreateProps),
}

/// The container a machine is filling.
#[derive(Debug)]
enum Container {
    /// Tab-group case before the first insertion: the group does not exist
    /// yet, the first step's `NewTabGroup` target creates it implicitly.
    PendingGroup(TabGroupCreateParams),
    /// Concrete container id. Once reached, later steps never target "new"
    /// again.
    Known(ItemId, ItemKind),
}

struct CreateMachine<'a> {
    api: &'a Windowing,
    container: Container,
    queue: VecDeque<InsertStep>,
    /// Explicit insert-before position, consumed by the first insertion.
    before: Option<ItemId>,
}

impl CreateMachine<'_> {
    fn step_target(&mut self) -> InsertTarget {
        let before = self.before.take();
        match &self.container {
            Container::PendingGroup(params) => InsertTarget {
                dest: InsertDest::NewTabGroup(*params),
                before,
            },
            Container::Known(id, ItemKind::Window) => InsertTarget {
                dest: InsertDest::Window(*id),
                before,
            },
            Container::Known(id, _) => InsertTarget {
                dest: InsertDest::TabGroup(*id),
                before,
            },
        }
    }

    /// Drains the work queue, issuing one platform request per step.
    async fn run(&mut self) -> Result<()> {
        while let Some(step) = self.queue.pop_front() {
            let target = self.step_target();
            let parent = match step {
                InsertStep::MoveExisting {
                    id,
                    kind: ItemKind::Tab,
                } => {
                    let envelope = issue(self.api.platform(), PlatformRequest::MoveTab { id, target })
                        .await
                        .ok(id)?;
                    envelope.moved()?.0
                }
                InsertStep::MoveExisting { id, .. } => {
                    let envelope =
                        issue(self.api.platform(), PlatformRequest::MoveTabGroup { id, target })
                            .await
                            .ok(id)?;
                    envelope.moved()?.0
                }
                InsertStep::CreateTab(props) => {
                    let envelope =
                        issue(self.api.platform(), PlatformRequest::CreateTab { props, target })
                            .await
                            .ok(ItemId::NONE)?;
                    envelope.created()?.1
                }
            };

            if matches!(self.container, Container::PendingGroup(_)) {
                if parent.is_none() {
                    return Err(Error::InvalidState(
                        "platform did not report the implicitly created tab-group".into(),
                    ));
                }
                self.container = Container::Known(parent, ItemKind::TabGroup);
            }
        }
        Ok(())
    }
}

/// Shapes and validates the initial-content list before any platform call.
fn validate_entries(initial: &[InitialEntry], allow_groups: bool) -> Result<VecDeque<InsertStep>> {
    let mut queue = VecDeque::with_capacity(initial.len());
    for entry in initial {
        match entry {
            InitialEntry::Existing(object) => {
                if object.is_closed() {
                    return Err(Error::Closed(object.id()));
                }
                match object.kind() {
                    ItemKind::Tab => {}
                    ItemKind::TabGroup if allow_groups => {}
                    ItemKind::TabGroup => {
                        return Err(Error::HierarchyViolation(
                            "a tab-group cannot be placed inside a tab-group".into(),
                        ));
                    }
                    ItemKind::Window => {
                        return Err(Error::WrongKind {
                            expected: Some(ItemKind::Tab),
                            id: object.id(),
                        });
                    }
                }
                queue.push_back(InsertStep::MoveExisting {
                    id: object.id(),
                    kind: object.kind(),
                });
            }
            InitialEntry::Tab(props) => {
                if props.url.is_empty() {
                    return Err(Error::InvalidArgument(
                        "an initial tab entry requires a url".into(),
                    ));
                }
                queue.push_back(InsertStep::CreateTab(props.clone()));
            }
        }
    }
    Ok(queue)
}

/// Window-with-initial-content driver.
///
/// The create callback carries the concrete window id, so every insertion
/// targets the existing window from the start.
pub(crate) async fn create_window(
    api: &Windowing,
    params: WindowCreateParams,
    initial: Vec<InitialEntry>,
) -> Result<Arc<ScriptObject>> {
    // A window has no minimum content; validation may still fail locally.
    let queue = validate_entries(&initial, true)?;

    let envelope = issue(api.platform(), PlatformRequest::CreateWindow { params })
        .await
        .ok(ItemId::NONE)?;
    let (window_id, _) = envelope.created()?;

    let mut machine = CreateMachine {
        api,
        container: Container::Known(window_id, ItemKind::Window),
        queue,
        before: None,
    };
    machine.run().await?;

    api.get_or_create_object(ItemKind::Window, window_id)
}

/// Tab-group-from-initial-content driver.
///
/// Fewer than two initial items is a local validation failure with zero
/// platform calls. The group itself is created implicitly by the first
/// step's `NewTabGroup` target; its completion carries the concrete group
/// id, which every later step then targets.
pub(crate) async fn create_tab_group(
    api: &Windowing,
    params: TabGroupCreateParams,
    initial: Vec<InitialEntry>,
    before: Option<ItemId>,
) -> Result<Arc<ScriptObject>> {
    if initial.len() < 2 {
        return Err(Error::InvalidArgument(format!(
            "a tab-group requires at least two initial items, got {}",
            initial.len()
        )));
    }
    let queue = validate_entries(&initial, false)?;

    let mut machine = CreateMachine {
        api,
        container: Container::PendingGroup(params),
        queue,
        before,
    };
    machine.run().await?;

    let Container::Known(group_id, _) = machine.container else {
        return Err(Error::InvalidState(
            "tab-group creation finished without a concrete group id".into(),
        ));
    };

    // The containing window is not part of any step result; the caller can
    // query the group for it.
    api.get_or_create_object(ItemKind::TabGroup, group_id)
}
