//! Object identity cache.
//!
//! Maps a platform item id to the single script-visible object representing
//! it, so repeated queries about the same tab yield the same object. The
//! cache is a pure identity-preservation optimization, never a source of
//! truth: an entry that has been collected is rebuilt from a fresh platform
//! copy on the next reference.
//!
//! Entries are held weakly. An object becomes *pinned* - kept alive by the
//! cache itself - the first time script mutates a property on it (or a
//! listener path calls [`ScriptObject::pin`]), because such objects carry
//! state script relies on and must survive collection. Read-only objects
//! may be dropped and recreated later under an equal id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use extwin_protocol::{ItemId, ItemKind};
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Error, Result};

/// Script-visible handle for one window, tab, or tab-group.
///
/// Once the underlying item closes, the handle becomes detached and inert:
/// it keeps answering `kind`/`id`, but property access reports the item as
/// closed.
#[derive(Debug)]
pub struct ScriptObject {
    kind: ItemKind,
    id: ItemId,
    closed: AtomicBool,
    properties: Mutex<HashMap<String, Value>>,
    cache: Weak<CacheInner>,
    self_ref: Weak<ScriptObject>,
}

impl ScriptObject {
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// `true` once a close notification for this item has been processed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Reads one script-visible property.
    pub fn property(&self, name: &str) -> Result<Option<Value>> {
        if self.is_closed() {
            return Err(Error::Closed(self.id));
        }
        Ok(self.properties.lock().get(name).cloned())
    }

    /// Script mutation path: stores the value and pins the object so the
    /// identity script now relies on survives collection.
    pub fn set_property(&self, name: &str, value: Value) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed(self.id));
        }
        self.properties.lock().insert(name.to_string(), value);
        self.pin();
        Ok(())
    }

    /// Keeps this object alive in the cache. Called by the mutation path and
    /// by glue when script registers a listener on the object.
    pub fn pin(&self) {
        let (Some(cache), Some(me)) = (self.cache.upgrade(), self.self_ref.upgrade()) else {
            return;
        };
        cache.pinned.lock().entry(self.id).or_insert(me);
    }

    /// Refreshes platform-derived properties without pinning; a query result
    /// is not a script mutation.
    pub(crate) fn seed(&self, pairs: impl IntoIterator<Item = (&'static str, Value)>) {
        if self.is_closed() {
            return;
        }
        let mut properties = self.properties.lock();
        for (name, value) in pairs {
            properties.insert(name.to_string(), value);
        }
    }

    fn mark_closed(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: Mutex<HashMap<ItemId, Weak<ScriptObject>>>,
    pinned: Mutex<HashMap<ItemId, Arc<ScriptObject>>>,
}

/// The id-to-object map shared by all drivers.
///
/// Touched only from the single event-loop thread in production; the locks
/// exist for the `Send + Sync` bound, not for contention.
#[derive(Debug, Default, Clone)]
pub struct ObjectCache {
    inner: Arc<CacheInner>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live object for `id`, creating and registering a fresh
    /// one when none exists. At most one live object per open nonzero id.
    pub fn get_or_create(&self, kind: ItemKind, id: ItemId) -> Result<Arc<ScriptObject>> {
        if id.is_none() {
            return Err(Error::InvalidArgument(
                "cannot cache an object for the reserved zero id".into(),
            ));
        }

        let mut entries = self.inner.entries.lock();
        if let Some(existing) = entries.get(&id).and_then(Weak::upgrade) {
            if existing.kind() != kind {
                return Err(Error::WrongKind {
                    expected: Some(kind),
                    id,
                });
            }
            return Ok(existing);
        }

        let object = Arc::new_cyclic(|me| ScriptObject {
            kind,
            id,
            closed: AtomicBool::new(false),
            properties: Mutex::new(HashMap::new()),
            cache: Arc::downgrade(&self.inner),
            self_ref: me.clone(),
        });
        entries.insert(id, Arc::downgrade(&object));
        Ok(object)
    }

    /// Returns the live object for `id` without creating one.
    pub fn get(&self, id: ItemId) -> Option<Arc<ScriptObject>> {
        self.inner.entries.lock().get(&id).and_then(Weak::upgrade)
    }

    /// Handles a platform close notification: the entry is removed
    /// unconditionally and any surviving script reference becomes a
    /// detached, inert handle.
    pub fn remove_closed(&self, id: ItemId) {
        let entry = self.inner.entries.lock().remove(&id);
        self.inner.pinned.lock().remove(&id);
        if let Some(object) = entry.and_then(|weak| weak.upgrade()) {
            object.mark_closed();
            tracing::debug!(id = %id, kind = %object.kind(), "cache entry invalidated on close");
        }
    }

    /// Collector pass: drops entries whose objects are gone. Pinned objects
    /// are owned by the pin set and therefore always survive.
    pub fn sweep(&self) {
        self.inner
            .entries
            .lock()
            .retain(|_, weak| weak.strong_count() > 0);
    }

    #[cfg(test)]
    fn live_count(&self) -> usize {
        self.inner
            .entries
            .lock()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}
