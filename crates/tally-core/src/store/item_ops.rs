//! Item operations for the Store: create, delete, complete and edit.

use std::collections::HashSet;

use jiff::Timestamp;

use super::{generate_id, DeleteOutcome, Store, StoreEvent};
use crate::{
    error::{Result, TallyError},
    kv::KeyValueStore,
    models::{item::normalize_label, Cluster, Item, ItemUpdate, Priority, Section, Subtask, Task},
};

impl<K: KeyValueStore> Store<K> {
    /// Appends a new task or cluster and returns its id.
    ///
    /// The label is trimmed; an empty label is rejected with
    /// `TallyError::InvalidInput`.
    pub fn add(&mut self, label: &str, is_cluster: bool) -> Result<String> {
        let label = normalize_label("label", label)?;
        let now = Timestamp::now();
        let item = if is_cluster {
            Item::Cluster(Cluster::new(generate_id(), label, now))
        } else {
            Item::Task(Task::new(generate_id(), label, now))
        };
        self.insert_new(item, false)
    }

    pub fn add_task(&mut self, label: &str) -> Result<String> {
        self.add(label, false)
    }

    pub fn create_cluster(&mut self, name: &str) -> Result<String> {
        self.add(name, true)
    }

    /// Inserts a placeholder task at the front of the sequence.
    pub fn add_draft(&mut self) -> Result<String> {
        let item = Task::new(
            generate_id(),
            crate::models::DRAFT_LABEL.to_string(),
            Timestamp::now(),
        );
        self.insert_new(Item::Task(item), true)
    }

    pub(crate) fn insert_new(&mut self, item: Item, at_front: bool) -> Result<String> {
        let id = item.id().to_string();
        log::debug!(
            "Adding {} {id}",
            if item.is_cluster() { "cluster" } else { "task" }
        );
        if at_front {
            self.items.insert(0, item);
        } else {
            self.items.push(item);
        }
        self.commit(StoreEvent::ItemAdded { id: id.clone() })?;
        Ok(id)
    }

    /// Deletes an item, cascading to a cluster's children.
    ///
    /// Pinned clusters are left untouched and yield
    /// [`DeleteOutcome::ConfirmationRequired`]; use
    /// [`Store::delete_confirmed`] to remove them.
    pub fn delete(&mut self, id: &str) -> Result<DeleteOutcome> {
        let idx = self.index(id)?;
        if let Item::Cluster(cluster) = &self.items[idx] {
            if cluster.is_pinned {
                log::debug!("Deletion of pinned cluster {id} needs confirmation");
                self.emit(StoreEvent::DeletionNeedsConfirmation { id: id.to_string() });
                return Ok(DeleteOutcome::ConfirmationRequired);
            }
        }
        self.delete_confirmed(id).map(DeleteOutcome::Deleted)
    }

    /// Deletes an item and its children without the pin check.
    pub fn delete_confirmed(&mut self, id: &str) -> Result<Vec<String>> {
        self.index(id)?;
        let removed = self.remove_cascading(vec![id.to_string()]);
        self.commit(StoreEvent::ItemsDeleted {
            ids: removed.clone(),
        })?;
        Ok(removed)
    }

    /// Removes every completed task.
    pub fn delete_completed(&mut self) -> Result<Vec<String>> {
        let roots = self
            .items
            .iter()
            .filter(|item| item.is_completed())
            .map(|item| item.id().to_string())
            .collect();
        self.delete_many(roots)
    }

    /// Removes every item in `section`, with the children of removed
    /// clusters.
    ///
    /// Pinned clusters and their tasks are kept; each pinned cluster in the
    /// section emits [`StoreEvent::DeletionNeedsConfirmation`].
    pub fn delete_section(&mut self, section: Section) -> Result<Vec<String>> {
        let pinned: HashSet<&str> = self
            .items
            .iter()
            .filter_map(Item::as_cluster)
            .filter(|cluster| cluster.is_pinned)
            .map(|cluster| cluster.id.as_str())
            .collect();

        let mut roots = Vec::new();
        let mut held = Vec::new();
        for item in self.items.iter().filter(|item| item.section() == section) {
            if pinned.contains(item.id()) {
                held.push(item.id().to_string());
            } else if !item.parent_id().is_some_and(|parent| pinned.contains(parent)) {
                roots.push(item.id().to_string());
            }
        }

        for id in held {
            log::debug!("Keeping pinned cluster {id}; deletion needs confirmation");
            self.emit(StoreEvent::DeletionNeedsConfirmation { id });
        }
        self.delete_many(roots)
    }

    fn delete_many(&mut self, roots: Vec<String>) -> Result<Vec<String>> {
        if roots.is_empty() {
            log::debug!("Nothing to delete");
            return Ok(Vec::new());
        }
        let removed = self.remove_cascading(roots);
        self.commit(StoreEvent::ItemsDeleted {
            ids: removed.clone(),
        })?;
        Ok(removed)
    }

    /// Removes the given items and everything they own. Returns the removed
    /// ids in sequence order.
    fn remove_cascading(&mut self, roots: Vec<String>) -> Vec<String> {
        let mut doomed: HashSet<String> = HashSet::new();
        let mut work = roots;
        while let Some(id) = work.pop() {
            if !doomed.insert(id.clone()) {
                continue;
            }
            work.extend(
                self.items
                    .iter()
                    .filter(|item| item.parent_id() == Some(id.as_str()))
                    .map(|item| item.id().to_string()),
            );
        }

        let removed: Vec<String> = self
            .items
            .iter()
            .filter(|item| doomed.contains(item.id()))
            .map(|item| item.id().to_string())
            .collect();
        self.items.retain(|item| !doomed.contains(item.id()));
        self.skipped.retain(|id| !doomed.contains(id));
        self.schedule.remove_items(&doomed);
        log::debug!("Removed {} item(s)", removed.len());
        removed
    }

    /// Flips a task's completion and returns the new state.
    ///
    /// Subtasks follow the task. Clusters are never completed; toggling one
    /// returns `None` and changes nothing.
    pub fn toggle_complete(&mut self, id: &str) -> Result<Option<bool>> {
        let idx = self.index(id)?;
        let Some(task) = self.items[idx].as_task_mut() else {
            log::debug!("Ignoring completion toggle on cluster {id}");
            return Ok(None);
        };

        let completed = !task.completed;
        for subtask in &mut task.subtasks {
            subtask.completed = completed;
        }
        task.apply_completion(completed, Timestamp::now());

        self.commit(StoreEvent::ItemToggled {
            id: id.to_string(),
            completed,
        })?;
        Ok(Some(completed))
    }

    /// Appends a subtask and returns its id. The task's completion is
    /// re-derived from its subtasks.
    pub fn add_subtask(&mut self, task_id: &str, label: &str) -> Result<String> {
        let label = normalize_label("label", label)?;
        let now = Timestamp::now();
        let task = self.task_mut(task_id)?;
        let subtask_id = generate_id();
        task.subtasks.push(Subtask {
            id: subtask_id.clone(),
            label,
            completed: false,
            created_at: now,
        });
        task.recompute_from_subtasks(now);

        self.commit(StoreEvent::ItemUpdated {
            id: task_id.to_string(),
        })?;
        Ok(subtask_id)
    }

    /// Flips one subtask and returns its new state.
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<bool> {
        let now = Timestamp::now();
        let task = self.task_mut(task_id)?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| TallyError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })?;
        subtask.completed = !subtask.completed;
        let completed = subtask.completed;
        task.recompute_from_subtasks(now);

        self.commit(StoreEvent::ItemUpdated {
            id: task_id.to_string(),
        })?;
        Ok(completed)
    }

    /// Removes one subtask. A task left without subtasks keeps its
    /// completion state.
    pub fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<()> {
        let now = Timestamp::now();
        let task = self.task_mut(task_id)?;
        let before = task.subtasks.len();
        task.subtasks.retain(|s| s.id != subtask_id);
        if task.subtasks.len() == before {
            return Err(TallyError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            });
        }
        task.recompute_from_subtasks(now);
        task.updated_at = Some(now);

        self.commit(StoreEvent::ItemUpdated {
            id: task_id.to_string(),
        })
    }

    /// Merges the fields set in `update` into an item.
    ///
    /// # Errors
    ///
    /// * `TallyError::ItemNotFound` - When the id is absent
    /// * `TallyError::InvalidInput` - When a task label would be empty, when
    ///   a task is pinned, or when a cluster gets a priority other than none
    pub fn update(&mut self, id: &str, update: ItemUpdate) -> Result<()> {
        let idx = self.index(id)?;
        if update.is_empty() {
            log::debug!("Empty update for {id}");
            return Ok(());
        }
        let now = Timestamp::now();

        match &mut self.items[idx] {
            Item::Task(task) => {
                if update.is_pinned.is_some() {
                    return Err(TallyError::invalid_input("is_pinned")
                        .with_reason("only clusters can be pinned"));
                }
                let label = update
                    .label
                    .as_deref()
                    .map(|label| normalize_label("label", label))
                    .transpose()?;

                if let Some(label) = label {
                    task.label = label;
                }
                if let Some(priority) = update.priority {
                    task.priority = priority;
                }
                if let Some(section) = update.section {
                    task.section = section;
                }
                task.updated_at = Some(now);
            }
            Item::Cluster(cluster) => {
                if matches!(update.priority, Some(p) if p != Priority::None) {
                    return Err(TallyError::invalid_input("priority")
                        .with_reason("clusters do not carry a priority"));
                }
                match update.label.as_deref().map(str::trim) {
                    Some("") => log::debug!("Keeping label of cluster {id}"),
                    Some(label) => cluster.label = label.to_string(),
                    None => {}
                }
                if let Some(section) = update.section {
                    cluster.section = section;
                }
                if let Some(pinned) = update.is_pinned {
                    cluster.is_pinned = pinned;
                }
                cluster.updated_at = Some(now);
            }
        }

        self.commit(StoreEvent::ItemUpdated { id: id.to_string() })
    }

    /// Pins or unpins a cluster.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> Result<()> {
        self.update(
            id,
            ItemUpdate {
                is_pinned: Some(pinned),
                ..Default::default()
            },
        )
    }

    /// Moves an item to another section. The sequence is unchanged.
    pub fn set_section(&mut self, id: &str, section: Section) -> Result<()> {
        self.update(
            id,
            ItemUpdate {
                section: Some(section),
                ..Default::default()
            },
        )
    }
}
