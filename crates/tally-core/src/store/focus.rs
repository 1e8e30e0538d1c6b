//! Focus mode: picking the current task and rotating through clusters.

use std::collections::HashSet;

use super::{Store, StoreEvent};
use crate::{error::Result, kv::KeyValueStore, models::Task};

impl<K: KeyValueStore> Store<K> {
    /// The incomplete task to work on next.
    ///
    /// Highest priority wins, ties go to the earlier task. Tasks in skipped
    /// clusters are passed over; root tasks never are. When the skips cover
    /// every cluster that still has open tasks they are ignored, so focus is
    /// never empty while open tasks exist.
    pub fn current_task(&self) -> Option<&Task> {
        let active = self.cluster_ids_with_incomplete_tasks();
        let mut skipped: HashSet<&str> = self
            .skipped
            .iter()
            .map(String::as_str)
            .filter(|id| active.iter().any(|a| a == id))
            .collect();
        if !active.is_empty() && skipped.len() >= active.len() {
            log::debug!("Every active cluster is skipped; ignoring skips");
            skipped.clear();
        }

        self.items
            .iter()
            .filter_map(|item| item.as_task())
            .filter(|task| !task.completed)
            .filter(|task| {
                task.parent_id
                    .as_deref()
                    .map_or(true, |parent| !skipped.contains(parent))
            })
            .fold(None, |best: Option<&Task>, task| match best {
                Some(best) if best.priority >= task.priority => Some(best),
                _ => Some(task),
            })
    }

    /// Skips the cluster owning the current task and returns its id.
    ///
    /// Nothing is skipped when the current task is at root level or fewer
    /// than two clusters hold incomplete tasks. Once every other active
    /// cluster is skipped, the oldest skip is released first, so repeated
    /// calls cycle through all active clusters.
    pub fn skip_current_cluster(&mut self) -> Result<Option<String>> {
        let active = self.cluster_ids_with_incomplete_tasks();
        let before = self.skipped.len();
        self.skipped.retain(|id| active.contains(id));
        if self.skipped.len() != before {
            log::debug!("Pruned {} stale skip(s)", before - self.skipped.len());
            self.dirty = true;
        }

        let Some(cluster_id) = self.current_task().and_then(|task| task.parent_id.clone()) else {
            log::debug!("Current task is not in a cluster; nothing to skip");
            return Ok(None);
        };
        if active.len() < 2 {
            log::warn!("Skipping needs at least two clusters with open tasks");
            return Ok(None);
        }

        // At most every active cluster but one stays skipped.
        self.skipped.retain(|id| *id != cluster_id);
        while self.skipped.len() + 1 >= active.len() {
            let Some(released) = self.skipped.pop_front() else {
                break;
            };
            log::debug!("Releasing oldest skipped cluster {released}");
        }
        self.skipped.push_back(cluster_id.clone());

        self.commit(StoreEvent::ClusterSkipped {
            id: cluster_id.clone(),
        })?;
        Ok(Some(cluster_id))
    }

    /// Forgets every skipped cluster.
    pub fn clear_skipped(&mut self) -> Result<()> {
        if self.skipped.is_empty() {
            return Ok(());
        }
        self.skipped.clear();
        self.commit(StoreEvent::SkipsCleared)
    }
}
