//! Handler operations that take string parameters and return display
//! wrappers.
//!
//! Every id accepted here may be a unique prefix of the full id.

use jiff::Timestamp;

use super::{DeleteOutcome, Store};
use crate::{
    display::{CreateResult, DeleteResult, ItemDetails, ItemList, OperationStatus, TaskList, UpdateResult},
    error::{Result, TallyError},
    kv::KeyValueStore,
    models::{item::normalize_label, Cluster, Item, ItemUpdate, Subtask, Task},
    ordering::DropPosition,
    params::{
        parse_day, AddItem, AddSubtask, DeleteItem, Id, MoveItem, MoveToCluster, ScheduleTask,
        SubtaskRef, UpdateItem,
    },
};

impl<K: KeyValueStore> Store<K> {
    /// Handle creating a task or a cluster.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tally_core::{kv::MemoryKv, params::AddItem, Store};
    ///
    /// let mut store = Store::open(MemoryKv::new());
    /// let params = AddItem {
    ///     label: "Home".to_string(),
    ///     cluster: true,
    ///     pinned: true,
    ///     ..Default::default()
    /// };
    /// let created = store.create_item_result(&params)?;
    /// assert!(created.resource.as_cluster().unwrap().is_pinned);
    /// # tally_core::Result::<()>::Ok(())
    /// ```
    pub fn create_item_result(&mut self, params: &AddItem) -> Result<CreateResult<Item>> {
        let priority = params.validate()?;
        let label = normalize_label("label", &params.label)?;
        let now = Timestamp::now();

        let item = if params.cluster {
            let mut cluster = Cluster::new(super::generate_id(), label, now);
            cluster.is_pinned = params.pinned;
            Item::Cluster(cluster)
        } else {
            let mut task = Task::new(super::generate_id(), label, now);
            task.priority = priority;
            Item::Task(task)
        };

        let id = self.insert_new(item, false)?;
        self.created(&id)
    }

    /// Handle creating a draft task at the top of the list.
    pub fn create_draft_result(&mut self) -> Result<CreateResult<Item>> {
        let id = self.add_draft()?;
        self.created(&id)
    }

    pub fn list_items(&self) -> ItemList {
        ItemList(self.items.clone())
    }

    /// Handle showing one item; clusters include their children.
    pub fn show_item(&self, params: &Id) -> Result<ItemDetails> {
        let id = self.resolve_id(&params.id)?;
        let item = self.snapshot(&id)?;
        let children = self.children_of(&id).into_iter().cloned().collect();
        Ok(ItemDetails { item, children })
    }

    /// Handle toggling a task's completion.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::InvalidInput` when the id names a cluster
    pub fn toggle_item_result(&mut self, params: &Id) -> Result<UpdateResult<Item>> {
        let id = self.resolve_id(&params.id)?;
        let change = match self.toggle_complete(&id)? {
            Some(true) => "Marked done",
            Some(false) => "Marked open",
            None => {
                return Err(TallyError::invalid_input("id")
                    .with_reason("clusters cannot be completed"));
            }
        };
        Ok(UpdateResult::with_changes(self.snapshot(&id)?, vec![change.to_string()]))
    }

    /// Handle editing label, priority, section or pin state.
    pub fn update_item_result(&mut self, params: &UpdateItem) -> Result<UpdateResult<Item>> {
        let id = self.resolve_id(&params.id)?;
        let update = ItemUpdate::try_from(params.clone())?;
        let changes = update.describe();
        self.update(&id, update)?;
        Ok(UpdateResult::with_changes(self.snapshot(&id)?, changes))
    }

    /// Handle pinning or unpinning a cluster.
    pub fn pin_item_result(&mut self, params: &Id, pinned: bool) -> Result<UpdateResult<Item>> {
        self.update_item_result(&UpdateItem {
            id: params.id.clone(),
            pinned: Some(pinned),
            ..Default::default()
        })
    }

    /// Handle deleting an item and its children.
    ///
    /// Uses get-before-delete so the removed items can be shown.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::InvalidInput` for a pinned cluster unless
    /// `confirmed` is set
    pub fn delete_item_result(&mut self, params: &DeleteItem) -> Result<DeleteResult<Vec<Item>>> {
        let id = self.resolve_id(&params.id)?;
        let before = self.items.clone();

        let removed = if params.confirmed {
            self.delete_confirmed(&id)?
        } else {
            match self.delete(&id)? {
                DeleteOutcome::Deleted(ids) => ids,
                DeleteOutcome::ConfirmationRequired => {
                    return Err(TallyError::invalid_input("confirmed").with_reason(format!(
                        "cluster {} is pinned; deleting it requires confirmation",
                        crate::models::item::short_id(&id)
                    )));
                }
            }
        };

        Ok(DeleteResult::new(collect_removed(before, &removed)))
    }

    /// Handle removing every completed task.
    pub fn clear_completed_result(&mut self) -> Result<DeleteResult<Vec<Item>>> {
        let before = self.items.clone();
        let removed = self.delete_completed()?;
        Ok(DeleteResult::new(collect_removed(before, &removed)))
    }

    /// Handle moving an item above or below another one.
    ///
    /// A task placed next to a cluster lands outside the cluster's block.
    pub fn move_item_result(&mut self, params: &MoveItem) -> Result<OperationStatus> {
        let position = params.validate()?;
        let source = self.resolve_id(&params.source)?;
        let target = self.resolve_id(&params.target)?;
        self.apply_drop(&source, &target, DropPosition::from(position))?;
        Ok(OperationStatus::success(format!(
            "Moved {} {position} {}",
            self.label_of(&source),
            self.label_of(&target)
        )))
    }

    /// Handle putting a task into a cluster.
    pub fn join_cluster_result(&mut self, params: &MoveToCluster) -> Result<OperationStatus> {
        let task = self.resolve_id(&params.task_id)?;
        let cluster = self.resolve_id(&params.cluster_id)?;
        self.move_to_cluster(&task, &cluster)?;
        Ok(OperationStatus::success(format!(
            "Moved {} into {}",
            self.label_of(&task),
            self.label_of(&cluster)
        )))
    }

    /// Handle taking a task out of its cluster.
    pub fn leave_cluster_result(&mut self, params: &Id) -> Result<OperationStatus> {
        let task = self.resolve_id(&params.id)?;
        self.remove_from_cluster(&task)?;
        Ok(OperationStatus::success(format!(
            "{} is now a standalone task",
            self.label_of(&task)
        )))
    }

    /// Handle moving an item one step up or down within its container.
    pub fn shift_item_result(&mut self, params: &Id, up: bool) -> Result<OperationStatus> {
        let id = self.resolve_id(&params.id)?;
        if up {
            self.move_up(&id)?;
        } else {
            self.move_down(&id)?;
        }
        Ok(OperationStatus::success(format!(
            "{} is now at position {}",
            self.label_of(&id),
            self.position_of(&id)?
        )))
    }

    pub fn add_subtask_result(&mut self, params: &AddSubtask) -> Result<CreateResult<Subtask>> {
        let task_id = self.resolve_id(&params.task_id)?;
        let subtask_id = self.add_subtask(&task_id, &params.label)?;
        let subtask = self
            .subtasks_of(&task_id)?
            .iter()
            .find(|s| s.id == subtask_id)
            .cloned()
            .ok_or_else(|| TallyError::SubtaskNotFound {
                task_id: task_id.clone(),
                subtask_id,
            })?;
        Ok(CreateResult::new(subtask))
    }

    pub fn toggle_subtask_result(&mut self, params: &SubtaskRef) -> Result<UpdateResult<Item>> {
        let task_id = self.resolve_id(&params.task_id)?;
        let subtask_id = self.resolve_subtask_id(&task_id, &params.subtask_id)?;
        let completed = self.toggle_subtask(&task_id, &subtask_id)?;
        let change = format!(
            "Subtask {} marked {}",
            crate::models::item::short_id(&subtask_id),
            if completed { "done" } else { "open" }
        );
        Ok(UpdateResult::with_changes(self.snapshot(&task_id)?, vec![change]))
    }

    pub fn remove_subtask_result(&mut self, params: &SubtaskRef) -> Result<UpdateResult<Item>> {
        let task_id = self.resolve_id(&params.task_id)?;
        let subtask_id = self.resolve_subtask_id(&task_id, &params.subtask_id)?;
        self.remove_subtask(&task_id, &subtask_id)?;
        let change = format!(
            "Removed subtask {}",
            crate::models::item::short_id(&subtask_id)
        );
        Ok(UpdateResult::with_changes(self.snapshot(&task_id)?, vec![change]))
    }

    /// Handle showing the focus task.
    pub fn focus_result(&self) -> Option<Item> {
        self.current_task().cloned().map(Item::Task)
    }

    /// Handle skipping the cluster of the focus task.
    pub fn skip_result(&mut self) -> Result<OperationStatus> {
        Ok(match self.skip_current_cluster()? {
            Some(id) => OperationStatus::success(format!("Skipped cluster {}", self.label_of(&id))),
            None => OperationStatus::failure("Nothing to skip"),
        })
    }

    pub fn schedule_result(&mut self, params: &ScheduleTask) -> Result<OperationStatus> {
        let day = params.validate()?;
        let task = self.resolve_id(&params.task_id)?;
        let message = if self.schedule_task(day, &task)? {
            format!("Scheduled {} on {day}", self.label_of(&task))
        } else {
            format!("{} is already scheduled on {day}", self.label_of(&task))
        };
        Ok(OperationStatus::success(message))
    }

    pub fn unschedule_result(&mut self, params: &ScheduleTask) -> Result<OperationStatus> {
        let day = params.validate()?;
        let task = self.resolve_id(&params.task_id)?;
        Ok(if self.unschedule_task(day, &task)? {
            OperationStatus::success(format!("Removed {} from {day}", self.label_of(&task)))
        } else {
            OperationStatus::failure(format!("{} is not scheduled on {day}", self.label_of(&task)))
        })
    }

    /// Handle listing the tasks of one weekday.
    pub fn day_tasks(&self, day: &str) -> Result<TaskList> {
        let day = parse_day(day)?;
        Ok(TaskList(self.tasks_for_day(day).into_iter().cloned().collect()))
    }

    fn created(&self, id: &str) -> Result<CreateResult<Item>> {
        Ok(CreateResult::new(self.snapshot(id)?))
    }

    fn snapshot(&self, id: &str) -> Result<Item> {
        self.get(id).cloned().ok_or_else(|| TallyError::not_found(id))
    }

    fn label_of(&self, id: &str) -> String {
        self.get(id)
            .map(|item| format!("'{}'", item.label()))
            .unwrap_or_else(|| id.to_string())
    }

    fn subtasks_of(&self, task_id: &str) -> Result<&[Subtask]> {
        let item = self.get(task_id).ok_or_else(|| TallyError::not_found(task_id))?;
        item.as_task()
            .map(|task| task.subtasks.as_slice())
            .ok_or_else(|| {
                TallyError::invalid_input("id")
                    .with_reason(format!("{task_id} is a cluster, not a task"))
            })
    }

    fn resolve_subtask_id(&self, task_id: &str, prefix: &str) -> Result<String> {
        let prefix = prefix.trim();
        let subtasks = self.subtasks_of(task_id)?;
        if let Some(exact) = subtasks.iter().find(|s| s.id == prefix) {
            return Ok(exact.id.clone());
        }
        let matches: Vec<&Subtask> = subtasks
            .iter()
            .filter(|s| !prefix.is_empty() && s.id.starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [subtask] => Ok(subtask.id.clone()),
            [] => Err(TallyError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: prefix.to_string(),
            }),
            _ => Err(TallyError::AmbiguousId {
                prefix: prefix.to_string(),
                matches: matches.len(),
            }),
        }
    }
}

/// Keeps the items of `before` whose ids are in `removed`.
fn collect_removed(before: Vec<Item>, removed: &[String]) -> Vec<Item> {
    before
        .into_iter()
        .filter(|item| removed.iter().any(|id| id == item.id()))
        .collect()
}
