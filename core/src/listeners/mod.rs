//! Event listener set
//!
//! Independent observers that turn host editor events into announcements.
//! Events are dispatched in order, either synchronously through
//! [`ListenerSet::dispatch`] or from an mpsc stream via [`ListenerSet::spawn`].

mod handlers;

pub use handlers::{
    BlockLifecycleListener, DropdownListener, FieldEditListener, FormControlListener,
    PaletteListener, SelectionListener, SurfaceListener,
};

use crate::announcer::{Announcement, Announcer};
use crate::describe::{Describer, FormControl, MenuItem};
use crate::model::BlockId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub const ALL_DELETED_PHRASE: &str = "All blocks are deleted";

/// Transient overlay kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    ContextMenu,
    DropdownMenu,
    ColourPicker,
    Dialog,
}

/// Content of an overlay at the moment it appeared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub kind: SurfaceKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    /// Index into `items`
    #[serde(default)]
    pub highlighted: Option<usize>,
}

/// Raw change events from the host editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    SelectionChanged {
        block: Option<BlockId>,
    },
    BlockCreated {
        ids: Vec<BlockId>,
    },
    BlockDeleted {
        ids: Vec<BlockId>,
    },
    BlockChanged {
        block: BlockId,
        field: String,
        new_value: String,
    },
    PaletteItemSelected {
        block: BlockId,
        index: usize,
        total: usize,
    },
    SurfaceAppeared(SurfaceSnapshot),
    SurfaceDisappeared {
        kind: SurfaceKind,
    },
    DropdownOptionFocused {
        label: String,
        index: usize,
        total: usize,
    },
    FormControlFocused(FormControl),
    FieldTextEdited {
        block: BlockId,
        field: String,
        text: String,
    },
}

/// Observer turning one kind of event into speech
pub trait EventListener: Send {
    fn name(&self) -> &'static str;

    fn on_event(&mut self, event: &EditorEvent, describer: &Describer) -> Option<Announcement>;
}

struct Inner {
    listeners: Mutex<Vec<Box<dyn EventListener>>>,
    describer: Arc<Describer>,
    announcer: Announcer,
    bulk_depth: AtomicUsize,
    suppressed_deletes: AtomicUsize,
}

/// Ordered collection of listeners sharing one describer and announcer
#[derive(Clone)]
pub struct ListenerSet {
    inner: Arc<Inner>,
}

impl ListenerSet {
    /// A set with no listeners.
    pub fn new(describer: Arc<Describer>, announcer: Announcer) -> Self {
        Self {
            inner: Arc::new(Inner {
                listeners: Mutex::new(Vec::new()),
                describer,
                announcer,
                bulk_depth: AtomicUsize::new(0),
                suppressed_deletes: AtomicUsize::new(0),
            }),
        }
    }

    /// A set with every built-in listener registered.
    pub fn standard(describer: Arc<Describer>, announcer: Announcer) -> Self {
        let set = Self::new(describer, announcer);
        set.register(Box::new(SelectionListener));
        set.register(Box::new(BlockLifecycleListener));
        set.register(Box::new(PaletteListener));
        set.register(Box::new(SurfaceListener::default()));
        set.register(Box::new(DropdownListener));
        set.register(Box::new(FormControlListener));
        set.register(Box::new(FieldEditListener));
        set
    }

    pub fn register(&self, listener: Box<dyn EventListener>) {
        debug!(target: "listeners", listener = listener.name(), "Registered listener");
        self.lock().push(listener);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run every listener over `event` and announce what they produce.
    pub fn dispatch(&self, event: &EditorEvent) {
        if let EditorEvent::BlockDeleted { ids } = event {
            if self.inner.bulk_depth.load(Ordering::SeqCst) > 0 {
                self.inner
                    .suppressed_deletes
                    .fetch_add(ids.len().max(1), Ordering::SeqCst);
                debug!(target: "listeners", count = ids.len(), "Deletion folded into bulk delete");
                return;
            }
        }

        let announcements: Vec<Announcement> = {
            let mut listeners = self.lock();
            listeners
                .iter_mut()
                .filter_map(|l| l.on_event(event, &self.inner.describer))
                .collect()
        };
        self.inner.announcer.announce_all(announcements);
    }

    /// Silence per-block deletion chatter until the guard drops; then one
    /// summary is spoken if anything was deleted. Guards nest.
    pub fn bulk_delete(&self) -> BulkDeleteGuard {
        self.inner.bulk_depth.fetch_add(1, Ordering::SeqCst);
        BulkDeleteGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Dispatch events from `rx` in arrival order until the sender closes.
    pub fn spawn(&self, mut rx: mpsc::Receiver<EditorEvent>) -> JoinHandle<()> {
        let set = self.clone();
        tokio::spawn(async move {
            info!(target: "listeners", "Listening for editor events");
            while let Some(event) = rx.recv().await {
                set.dispatch(&event);
            }
            info!(target: "listeners", "Editor event stream closed");
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Box<dyn EventListener>>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped suppression of deletion announcements; see [`ListenerSet::bulk_delete`].
#[must_use = "deletions are only suppressed while the guard is alive"]
pub struct BulkDeleteGuard {
    inner: Arc<Inner>,
}

impl Drop for BulkDeleteGuard {
    fn drop(&mut self) {
        if self.inner.bulk_depth.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }
        let deleted = self.inner.suppressed_deletes.swap(0, Ordering::SeqCst);
        if deleted > 0 {
            info!(target: "listeners", deleted, "Bulk delete finished");
            self.inner
                .announcer
                .announce(ALL_DELETED_PHRASE, crate::announcer::Priority::Normal);
        }
    }
}
