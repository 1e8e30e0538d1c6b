//! Read-only views over the Store's sequence.

use super::Store;
use crate::{
    error::{Result, TallyError},
    kv::KeyValueStore,
    models::{Item, Task},
    ordering,
};

impl<K: KeyValueStore> Store<K> {
    /// Every item in display order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Resolves a full id or a unique id prefix to the full id.
    ///
    /// # Errors
    ///
    /// * `TallyError::InvalidInput` - When the prefix is empty
    /// * `TallyError::ItemNotFound` - When nothing matches
    /// * `TallyError::AmbiguousId` - When more than one item matches
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(TallyError::invalid_input("id").with_reason("must not be empty"));
        }
        if self.get(prefix).is_some() {
            return Ok(prefix.to_string());
        }

        let matches: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| item.id().starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [] => Err(TallyError::not_found(prefix)),
            [item] => Ok(item.id().to_string()),
            _ => Err(TallyError::AmbiguousId {
                prefix: prefix.to_string(),
                matches: matches.len(),
            }),
        }
    }

    /// Clusters and standalone tasks, in order.
    pub fn root_items(&self) -> Vec<&Item> {
        ordering::siblings(&self.items, None)
    }

    /// Children of a cluster, in order. Unknown ids have no children.
    pub fn children_of(&self, cluster_id: &str) -> Vec<&Item> {
        ordering::siblings(&self.items, Some(cluster_id))
    }

    pub fn is_first(&self, id: &str) -> Result<bool> {
        Ok(self.position_of(id)? == 1)
    }

    pub fn is_last(&self, id: &str) -> Result<bool> {
        let (position, count) = self.container_position(id)?;
        Ok(position == count)
    }

    /// 1-based position of an item within its container.
    pub fn position_of(&self, id: &str) -> Result<usize> {
        self.container_position(id).map(|(position, _)| position)
    }

    fn container_position(&self, id: &str) -> Result<(usize, usize)> {
        let item = self.get(id).ok_or_else(|| TallyError::not_found(id))?;
        let siblings = ordering::siblings(&self.items, item.parent_id());
        let index = siblings
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| TallyError::not_found(id))?;
        Ok((index + 1, siblings.len()))
    }

    /// Ids of clusters owning at least one incomplete task, in order.
    pub fn cluster_ids_with_incomplete_tasks(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.is_cluster())
            .filter(|cluster| {
                self.items
                    .iter()
                    .any(|item| item.parent_id() == Some(cluster.id()) && !item.is_completed())
            })
            .map(|cluster| cluster.id().to_string())
            .collect()
    }

    pub fn incomplete_tasks(&self) -> Vec<&Task> {
        self.items
            .iter()
            .filter_map(Item::as_task)
            .filter(|task| !task.completed)
            .collect()
    }

    /// Skipped cluster ids, oldest first.
    pub fn skipped_clusters(&self) -> Vec<&str> {
        self.skipped.iter().map(String::as_str).collect()
    }
}
