//! The item store: the single owner of the ordered task sequence.
//!
//! A [`Store`] holds every task and cluster in display order, the set of
//! clusters skipped by focus mode and the weekly schedule. Every mutation
//! goes through a method on the store, which applies the change in memory,
//! persists the full state to its [`KeyValueStore`] and then notifies
//! subscribers.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │    Key-value    │
//! │   (handlers)    │───▶│ (item_ops,      │───▶│     backend     │
//! │                 │    │  move_ops, ...) │    │    (via kv/)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!   Params & display       Business logic        Data persistence
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for SQLite-backed stores with XDG default paths
//! - [`events`]: Change notifications sent to subscribers
//! - `item_ops`: Creating, deleting, completing and editing items
//! - `move_ops`: Reordering and cluster membership changes
//! - `queries`: Read-only views over the sequence
//! - `focus`: Focus-mode selection and cluster skipping
//! - `schedule_ops`: Weekly schedule maintenance
//! - `handlers`: Parameter-driven operations returning display wrappers
//!
//! # Usage Examples
//!
//! ```rust
//! use tally_core::{kv::MemoryKv, ordering::Position, Store};
//!
//! let mut store = Store::open(MemoryKv::new());
//! let errands = store.create_cluster("Errands")?;
//! let milk = store.add_task("Buy milk")?;
//! let post = store.add_task("Post letter")?;
//!
//! store.move_to_cluster(&milk, &errands)?;
//! store.move_to_cluster(&post, &errands)?;
//! store.reorder(&post, &milk, Position::Above)?;
//!
//! let labels: Vec<&str> = store.items().iter().map(|item| item.label()).collect();
//! assert_eq!(labels, ["Errands", "Post letter", "Buy milk"]);
//! # tally_core::Result::<()>::Ok(())
//! ```

use std::{
    collections::VecDeque,
    sync::mpsc::{self, Receiver, Sender},
};

use crate::{
    error::{Result, TallyError},
    kv::KeyValueStore,
    models::{Item, Task, WeeklySchedule},
};

pub mod builder;
pub mod events;
mod focus;
mod handlers;
mod item_ops;
mod load;
mod move_ops;
mod queries;
mod schedule_ops;

#[cfg(test)]
mod tests;

pub use builder::StoreBuilder;
pub use events::StoreEvent;

/// Key holding the item sequence.
pub const ITEMS_KEY: &str = "todos";
/// Key holding the skipped cluster ids.
pub const SKIPPED_KEY: &str = "skippedClusters";
/// Key holding the weekly schedule.
pub const SCHEDULE_KEY: &str = "weeklyTasks";

/// Outcome of a [`Store::delete`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Ids removed from the sequence, in sequence order
    Deleted(Vec<String>),
    /// The target is a pinned cluster; nothing was removed
    ConfirmationRequired,
}

/// Ordered collection of tasks and clusters persisted to a key-value backend.
pub struct Store<K: KeyValueStore> {
    kv: K,
    items: Vec<Item>,
    skipped: VecDeque<String>,
    schedule: WeeklySchedule,
    version: u64,
    dirty: bool,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl<K: KeyValueStore> Store<K> {
    /// Loads the persisted state from `kv`, falling back to an empty store
    /// when nothing usable is stored.
    pub fn open(kv: K) -> Self {
        let state = load::load_state(&kv);
        Self {
            kv,
            items: state.items,
            skipped: state.skipped,
            schedule: state.schedule,
            version: 0,
            dirty: state.repaired,
            subscribers: Vec::new(),
        }
    }

    /// Registers a new subscriber. Events are delivered for every mutation
    /// after this call; dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Writes the full state to the backend.
    ///
    /// Mutations already persist; call this to retry after a failed write.
    pub fn save(&mut self) -> Result<()> {
        let items = serde_json::to_string(&self.items)?;
        let skipped = serde_json::to_string(&self.skipped)?;
        let schedule = serde_json::to_string(&self.schedule)?;

        self.kv.set_many(&[
            (ITEMS_KEY, items),
            (SKIPPED_KEY, skipped),
            (SCHEDULE_KEY, schedule),
        ])?;
        self.dirty = false;
        Ok(())
    }

    /// Whether the in-memory state has changes the backend has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Counter bumped on every committed mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Consumes the store and returns its backend.
    pub fn into_inner(self) -> K {
        self.kv
    }

    /// Records a finished mutation: bumps the version, persists and notifies.
    /// The in-memory change stays applied when persisting fails.
    fn commit(&mut self, event: StoreEvent) -> Result<()> {
        self.version += 1;
        self.dirty = true;
        let saved = self.save();
        if let Err(e) = &saved {
            log::warn!("Failed to persist state: {e}");
        }
        self.emit(event);
        saved
    }

    fn emit(&mut self, event: StoreEvent) {
        log::debug!("Store event: {event:?}");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn index(&self, id: &str) -> Result<usize> {
        crate::ordering::index_of(&self.items, id).ok_or_else(|| TallyError::not_found(id))
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task> {
        let idx = self.index(id)?;
        self.items[idx].as_task_mut().ok_or_else(|| {
            TallyError::invalid_input("id").with_reason(format!("{id} is a cluster, not a task"))
        })
    }
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
