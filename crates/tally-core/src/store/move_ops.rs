//! Sequence operations for the Store: reorder, cluster membership and drops.

use jiff::Timestamp;

use super::{Store, StoreEvent};
use crate::{
    error::{Result, TallyError},
    kv::KeyValueStore,
    models::Item,
    ordering::{self, DropPosition, Position},
};

impl<K: KeyValueStore> Store<K> {
    /// Moves `source_id` directly above or below `target_id`.
    ///
    /// Moving an item relative to itself does nothing. See
    /// [`ordering::reorder`] for the placement rules.
    pub fn reorder(&mut self, source_id: &str, target_id: &str, position: Position) -> Result<()> {
        if source_id == target_id {
            log::debug!("Ignoring reorder of {source_id} relative to itself");
            return Ok(());
        }
        self.items = ordering::reorder(&self.items, source_id, target_id, position)?;
        self.commit(StoreEvent::ItemsReordered {
            source: source_id.to_string(),
            target: target_id.to_string(),
            position,
        })
    }

    /// Makes a task the last child of a cluster.
    pub fn move_to_cluster(&mut self, task_id: &str, cluster_id: &str) -> Result<()> {
        let items = ordering::move_into_cluster(&self.items, task_id, cluster_id)?;
        if items == self.items {
            log::debug!("Task {task_id} is already in cluster {cluster_id}");
            return Ok(());
        }
        self.apply_move(items, task_id, Some(cluster_id))
    }

    /// Turns a child task into a root task right after its cluster's block.
    pub fn remove_from_cluster(&mut self, task_id: &str) -> Result<()> {
        let items = ordering::detach_from_cluster(&self.items, task_id)?;
        if items == self.items {
            log::debug!("Task {task_id} is already at root level");
            return Ok(());
        }
        self.apply_move(items, task_id, None)
    }

    /// Places a task, as a root task, directly above a cluster or below its
    /// block.
    pub fn move_relative_to_cluster(
        &mut self,
        task_id: &str,
        cluster_id: &str,
        position: Position,
    ) -> Result<()> {
        let items = ordering::move_relative_to_cluster(&self.items, task_id, cluster_id, position)?;
        self.apply_move(items, task_id, None)
    }

    /// Swaps an item with its previous sibling in the same container.
    pub fn move_up(&mut self, id: &str) -> Result<()> {
        match self.adjacent_sibling(id, false)? {
            Some(previous) => self.reorder(id, &previous, Position::Above),
            None => {
                log::debug!("{id} is already first");
                Ok(())
            }
        }
    }

    /// Swaps an item with its next sibling in the same container.
    pub fn move_down(&mut self, id: &str) -> Result<()> {
        match self.adjacent_sibling(id, true)? {
            Some(next) => self.reorder(id, &next, Position::Below),
            None => {
                log::debug!("{id} is already last");
                Ok(())
            }
        }
    }

    /// Applies the outcome of a drop gesture.
    ///
    /// `Into` makes the source a child of a cluster target. A task dropped
    /// above or below a cluster lands outside its block as a root task.
    /// Everything else is a plain [`Store::reorder`].
    ///
    /// # Errors
    ///
    /// * `TallyError::InvalidMove` - When `Into` is used with a cluster
    ///   source or a task target
    pub fn apply_drop(
        &mut self,
        source_id: &str,
        target_id: &str,
        drop: DropPosition,
    ) -> Result<()> {
        let source_is_cluster = self.require(source_id)?.is_cluster();
        let target_is_cluster = self.require(target_id)?.is_cluster();

        match drop.as_position() {
            None if target_is_cluster && !source_is_cluster => {
                self.move_to_cluster(source_id, target_id)
            }
            None => Err(TallyError::invalid_move(
                "only a task can be dropped into a cluster",
            )),
            Some(position) if target_is_cluster && !source_is_cluster => {
                self.move_relative_to_cluster(source_id, target_id, position)
            }
            Some(position) => self.reorder(source_id, target_id, position),
        }
    }

    fn require(&self, id: &str) -> Result<&Item> {
        self.get(id).ok_or_else(|| TallyError::not_found(id))
    }

    fn adjacent_sibling(&self, id: &str, next: bool) -> Result<Option<String>> {
        let item = self.require(id)?;
        let siblings = ordering::siblings(&self.items, item.parent_id());
        let pos = siblings
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| TallyError::not_found(id))?;
        let neighbour = if next {
            siblings.get(pos + 1)
        } else {
            pos.checked_sub(1).and_then(|p| siblings.get(p))
        };
        Ok(neighbour.map(|s| s.id().to_string()))
    }

    fn apply_move(&mut self, items: Vec<Item>, task_id: &str, cluster: Option<&str>) -> Result<()> {
        self.items = items;
        if let Some(idx) = ordering::index_of(&self.items, task_id) {
            self.items[idx].touch(Timestamp::now());
        }
        self.commit(StoreEvent::ItemMoved {
            id: task_id.to_string(),
            cluster: cluster.map(str::to_string),
        })
    }
}
