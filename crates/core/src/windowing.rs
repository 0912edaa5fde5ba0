//! Script-facing operation drivers.
//!
//! One entry point per verb. Arguments arrive already deserialized from the
//! script-value glue; every method validates locally first (validation
//! failures return without touching the platform), then issues the matching
//! request and suspends until the notify layer resolves it. The resumed call
//! converts the envelope into the script-visible result: cache-backed
//! objects for queries, unit for actions.

use std::sync::Arc;

use extwin_protocol::{
    EventDetail, InsertDest, InsertTarget, ItemId, ItemKind, PlatformEvent, PlatformRequest,
    TabData, TabGroupCreateParams, TabGroupData, TabGroupUpdate, TabUpdate, WindowCreateParams,
    WindowData, WindowPlacement,
};
use serde_json::Value;

use crate::cache::{ObjectCache, ScriptObject};
use crate::create::{self, InitialEntry};
use crate::error::{Error, Result};
use crate::platform::{Platform, issue};

/// The windowing subsystem as seen by script-engine glue.
pub struct Windowing {
    platform: Arc<dyn Platform>,
    cache: ObjectCache,
}

impl Windowing {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            cache: ObjectCache::new(),
        }
    }

    pub fn cache(&self) -> &ObjectCache {
        &self.cache
    }

    pub(crate) fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// Entry point for property glue exposing a related object (for example
    /// "this tab's window") without issuing a query.
    pub fn get_or_create_object(&self, kind: ItemKind, id: ItemId) -> Result<Arc<ScriptObject>> {
        self.cache.get_or_create(kind, id)
    }

    /// Feeds one platform event into the subsystem. Close events invalidate
    /// the identity cache; the rest only leave a trace.
    pub fn handle_event(&self, event: PlatformEvent) {
        match event.detail {
            EventDetail::Closed => self.cache.remove_closed(event.id),
            EventDetail::Moved {
                previous_parent,
                index,
            } => {
                tracing::debug!(
                    kind = %event.kind, id = %event.id,
                    previous_parent = %previous_parent, index,
                    "item moved"
                );
            }
            detail => {
                tracing::trace!(kind = %event.kind, id = %event.id, ?detail, "platform event");
            }
        }
    }

    // --- queries ---

    pub async fn all_windows(&self) -> Result<Vec<Arc<ScriptObject>>> {
        let envelope = issue(&self.platform, PlatformRequest::QueryAllWindows)
            .await
            .ok(ItemId::NONE)?;
        let mut objects = Vec::with_capacity(envelope.windows()?.len());
        for data in envelope.windows()? {
            let object = self.cache.get_or_create(ItemKind::Window, data.id)?;
            seed_window(&object, data, false);
            objects.push(object);
        }
        Ok(objects)
    }

    pub async fn all_tab_groups(&self) -> Result<Vec<Arc<ScriptObject>>> {
        let envelope = issue(&self.platform, PlatformRequest::QueryAllTabGroups)
            .await
            .ok(ItemId::NONE)?;
        let mut objects = Vec::with_capacity(envelope.tab_groups()?.len());
        for data in envelope.tab_groups()? {
            let object = self.cache.get_or_create(ItemKind::TabGroup, data.id)?;
            seed_tab_group(&object, data);
            objects.push(object);
        }
        Ok(objects)
    }

    pub async fn all_tabs(&self) -> Result<Vec<Arc<ScriptObject>>> {
        let envelope = issue(&self.platform, PlatformRequest::QueryAllTabs)
            .await
            .ok(ItemId::NONE)?;
        let mut objects = Vec::with_capacity(envelope.tabs()?.len());
        for data in envelope.tabs()? {
            let object = self.cache.get_or_create(ItemKind::Tab, data.id)?;
            seed_tab(&object, data);
            objects.push(object);
        }
        Ok(objects)
    }

    /// Queries one window. `id` may be `NONE` for the current window.
    pub async fn window(&self, id: ItemId, include_contents: bool) -> Result<Arc<ScriptObject>> {
        let data = self.query_window_data(id, include_contents).await?;
        let object = self.cache.get_or_create(ItemKind::Window, data.id)?;
        seed_window(&object, &data, include_contents);
        Ok(object)
    }

    pub async fn tab_group(&self, id: ItemId, include_contents: bool) -> Result<Arc<ScriptObject>> {
        if id.is_none() {
            return Err(Error::InvalidArgument(
                "tab-group queries require a concrete id".into(),
            ));
        }
        let data = self.query_tab_group_data(id, include_contents).await?;
        let object = self.cache.get_or_create(ItemKind::TabGroup, data.id)?;
        seed_tab_group(&object, &data);
        Ok(object)
    }

    /// Queries one tab. `id` may be `NONE` for the focused tab of the
    /// current window.
    pub async fn tab(&self, id: ItemId) -> Result<Arc<ScriptObject>> {
        let envelope = issue(&self.platform, PlatformRequest::QueryTab { id })
            .await
            .ok(id)?;
        let data = envelope.tab()?;
        let object = self.cache.get_or_create(ItemKind::Tab, data.id)?;
        seed_tab(&object, data);
        Ok(object)
    }

    pub(crate) async fn query_window_data(
        &self,
        id: ItemId,
        include_contents: bool,
    ) -> Result<WindowData> {
        let envelope = issue(
            &self.platform,
            PlatformRequest::QueryWindow {
                id,
                include_contents,
            },
        )
        .await
        .ok(id)?;
        Ok(envelope.window()?.clone())
    }

    pub(crate) async fn query_tab_group_data(
        &self,
        id: ItemId,
        include_contents: bool,
    ) -> Result<TabGroupData> {
        let envelope = issue(
            &self.platform,
            PlatformRequest::QueryTabGroup {
                id,
                include_contents,
            },
        )
        .await
        .ok(id)?;
        Ok(envelope.tab_group()?.clone())
    }

    // --- simple actions ---

    pub async fn close_window(&self, id: ItemId) -> Result<()> {
        require_concrete(id)?;
        issue(&self.platform, PlatformRequest::CloseWindow { id })
            .await
            .ok(id)?;
        Ok(())
    }

    pub async fn place_window(&self, id: ItemId, placement: WindowPlacement) -> Result<()> {
        require_concrete(id)?;
        if placement.bounds.width == 0 || placement.bounds.height == 0 {
            return Err(Error::InvalidArgument(
                "window placement requires a nonzero size".into(),
            ));
        }
        issue(&self.platform, PlatformRequest::PlaceWindow { id, placement })
            .await
            .ok(id)?;
        Ok(())
    }

    pub async fn close_tab_group(&self, id: ItemId) -> Result<()> {
        require_concrete(id)?;
        issue(&self.platform, PlatformRequest::CloseTabGroup { id })
            .await
            .ok(id)?;
        Ok(())
    }

    pub async fn close_tab(&self, id: ItemId) -> Result<()> {
        require_concrete(id)?;
        issue(&self.platform, PlatformRequest::CloseTab { id })
            .await
            .ok(id)?;
        Ok(())
    }

    pub async fn update_tab(&self, id: ItemId, update: TabUpdate) -> Result<()> {
        require_concrete(id)?;
        if update.url.as_deref().is_some_and(str::is_empty) {
            return Err(Error::InvalidArgument("tab url must not be empty".into()));
        }
        if update.is_empty() {
            return Ok(());
        }
        issue(&self.platform, PlatformRequest::UpdateTab { id, update })
            .await
            .ok(id)?;
        Ok(())
    }

    pub async fn update_tab_group(&self, id: ItemId, update: TabGroupUpdate) -> Result<()> {
        require_concrete(id)?;
        issue(&self.platform, PlatformRequest::UpdateTabGroup { id, update })
            .await
            .ok(id)?;
        Ok(())
    }

    /// Moves a tab into the target container. Single-step shape of the
    /// composite machines: validate source kind, destination kind, and the
    /// insert-before position, then issue exactly one move request.
    pub async fn move_tab(&self, id: ItemId, target: InsertTarget) -> Result<()> {
        self.validate_move(ItemKind::Tab, id, &target).await?;
        let envelope = issue(&self.platform, PlatformRequest::MoveTab { id, target })
            .await
            .ok(id)?;
        envelope.moved()?;
        Ok(())
    }

    pub async fn move_tab_group(&self, id: ItemId, target: InsertTarget) -> Result<()> {
        self.validate_move(ItemKind::TabGroup, id, &target).await?;
        let envelope = issue(&self.platform, PlatformRequest::MoveTabGroup { id, target })
            .await
            .ok(id)?;
        envelope.moved()?;
        Ok(())
    }

    /// Focuses a window by focusing its currently selected tab.
    ///
    /// Two-step composite: the first request learns the selected tab id, the
    /// second selects it. Each step is a distinct pending operation, so the
    /// second callback cannot be confused with the first's result.
    pub async fn focus_window(&self, id: ItemId) -> Result<()> {
        let data = self.query_window_data(id, false).await?;
        let active = data.active_tab;
        if active.is_none() {
            return Err(Error::InvalidState(format!(
                "window {} has no active tab to focus",
                data.id
            )));
        }

        let update = TabUpdate {
            focus: Some(true),
            ..TabUpdate::default()
        };
        issue(
            &self.platform,
            PlatformRequest::UpdateTab { id: active, update },
        )
        .await
        .ok(active)?;
        Ok(())
    }

    // --- composite creates ---

    /// Creates a window and populates it with `initial` content, driving one
    /// platform request per step. See [`create`] for the machine.
    pub async fn create_window(
        &self,
        params: WindowCreateParams,
        initial: Vec<InitialEntry>,
    ) -> Result<Arc<ScriptObject>> {
        create::create_window(self, params, initial).await
    }

    /// Creates a tab-group from `initial` content (at least two items). The
    /// group is created implicitly by the first insertion; `before` places
    /// the group within its window's tab strip.
    pub async fn create_tab_group(
        &self,
        params: TabGroupCreateParams,
        initial: Vec<InitialEntry>,
        before: Option<ItemId>,
    ) -> Result<Arc<ScriptObject>> {
        create::create_tab_group(self, params, initial, before).await
    }

    /// Argument validation shared by the move drivers. Rejects bad shapes
    /// before any platform move is issued; the membership check for
    /// `before` costs one query, never a move.
    async fn validate_move(
        &self,
        source_kind: ItemKind,
        id: ItemId,
        target: &InsertTarget,
    ) -> Result<()> {
        require_concrete(id)?;
        if let Some(object) = self.cache.get(id) {
            if object.kind() != source_kind {
                return Err(Error::WrongKind {
                    expected: Some(source_kind),
                    id,
                });
            }
            if object.is_closed() {
                return Err(Error::Closed(id));
            }
        }

        match &target.dest {
            InsertDest::Window(dest) => {
                require_concrete(*dest)?;
                if let Some(object) = self.cache.get(*dest) {
                    if object.kind() != ItemKind::Window {
                        return Err(Error::WrongKind {
                            expected: Some(ItemKind::Window),
                            id: *dest,
                        });
                    }
                }
            }
            InsertDest::TabGroup(dest) => {
                if source_kind == ItemKind::TabGroup {
                    return Err(Error::HierarchyViolation(
                        "a tab-group cannot be placed inside a tab-group".into(),
                    ));
                }
                require_concrete(*dest)?;
                if let Some(object) = self.cache.get(*dest) {
                    if object.kind() != ItemKind::TabGroup {
                        return Err(Error::WrongKind {
                            expected: Some(ItemKind::TabGroup),
                            id: *dest,
                        });
                    }
                }
            }
            InsertDest::NewTabGroup(_) => {
                if source_kind == ItemKind::TabGroup {
                    return Err(Error::HierarchyViolation(
                        "a tab-group cannot be placed inside a tab-group".into(),
                    ));
                }
            }
            InsertDest::NewWindow(_) | InsertDest::Current => {}
        }

        if let Some(before) = target.before {
            match &target.dest {
                InsertDest::Window(dest) => {
                    let data = self.query_window_data(*dest, true).await?;
                    if !data.tab_ids.contains(&before) && !data.tab_group_ids.contains(&before) {
                        return Err(Error::HierarchyViolation(format!(
                            "insert-before item {before} is not in window {dest}"
                        )));
                    }
                }
                InsertDest::TabGroup(dest) => {
                    let data = self.query_tab_group_data(*dest, true).await?;
                    if !data.tab_ids.contains(&before) {
                        return Err(Error::HierarchyViolation(format!(
                            "insert-before item {before} is not in tab-group {dest}"
                        )));
                    }
                }
                // The container does not exist yet, or the platform resolves
                // it; membership can only be checked there.
                InsertDest::NewWindow(_) | InsertDest::NewTabGroup(_) | InsertDest::Current => {}
            }
        }

        Ok(())
    }
}

fn require_concrete(id: ItemId) -> Result<()> {
    if id.is_none() {
        return Err(Error::InvalidArgument(
            "this operation requires a concrete item id".into(),
        ));
    }
    Ok(())
}

pub(crate) fn seed_window(object: &ScriptObject, data: &WindowData, include_contents: bool) {
    object.seed([
        ("focused", Value::from(data.focused)),
        ("private", Value::from(data.private)),
        ("top", Value::from(data.bounds.top)),
        ("left", Value::from(data.bounds.left)),
        ("width", Value::from(data.bounds.width)),
        ("height", Value::from(data.bounds.height)),
        ("activeTabId", Value::from(data.active_tab.0)),
    ]);
    // Contents are authoritative only when the query asked for them; an
    // empty list then genuinely means an empty window and must overwrite
    // whatever an earlier seed left behind.
    if include_contents {
        let tabs: Vec<u64> = data.tab_ids.iter().map(|id| id.0).collect();
        let groups: Vec<u64> = data.tab_group_ids.iter().map(|id| id.0).collect();
        object.seed([
            ("tabIds", Value::from(tabs)),
            ("tabGroupIds", Value::from(groups)),
        ]);
    }
}

pub(crate) fn seed_tab(object: &ScriptObject, data: &TabData) {
    object.seed([
        ("url", Value::from(data.url.clone())),
        ("title", Value::from(data.title.clone())),
        ("windowId", Value::from(data.window.0)),
        ("groupId", Value::from(data.group.0)),
        ("index", Value::from(data.index)),
        ("focused", Value::from(data.focused)),
        ("locked", Value::from(data.locked)),
    ]);
}

pub(crate) fn seed_tab_group(object: &ScriptObject, data: &TabGroupData) {
    object.seed([
        ("windowId", Value::from(data.window.0)),
        ("collapsed", Value::from(data.collapsed)),
    ]);
}
