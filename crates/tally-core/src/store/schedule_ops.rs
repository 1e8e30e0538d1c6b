//! Weekly schedule operations for the Store.

use super::{Store, StoreEvent};
use crate::{
    error::{Result, TallyError},
    kv::KeyValueStore,
    models::{Task, Weekday, WeeklySchedule},
};

impl<K: KeyValueStore> Store<K> {
    /// Adds a task to a weekday. Returns `false` when it was already
    /// scheduled there.
    ///
    /// # Errors
    ///
    /// * `TallyError::ItemNotFound` - When the task is absent
    /// * `TallyError::InvalidInput` - When the id names a cluster
    pub fn schedule_task(&mut self, day: Weekday, task_id: &str) -> Result<bool> {
        let item = self.get(task_id).ok_or_else(|| TallyError::not_found(task_id))?;
        if item.is_cluster() {
            return Err(TallyError::invalid_input("task_id")
                .with_reason("clusters cannot be scheduled"));
        }
        if !self.schedule.add(day, task_id) {
            log::debug!("{task_id} is already scheduled on {day}");
            return Ok(false);
        }
        self.commit(StoreEvent::ScheduleChanged { day })?;
        Ok(true)
    }

    /// Removes a task from a weekday. Returns `false` when it was not
    /// scheduled there.
    pub fn unschedule_task(&mut self, day: Weekday, task_id: &str) -> Result<bool> {
        if !self.schedule.remove(day, task_id) {
            log::debug!("{task_id} is not scheduled on {day}");
            return Ok(false);
        }
        self.commit(StoreEvent::ScheduleChanged { day })?;
        Ok(true)
    }

    /// Tasks scheduled on a day, in scheduling order.
    pub fn tasks_for_day(&self, day: Weekday) -> Vec<&Task> {
        self.schedule
            .tasks(day)
            .iter()
            .filter_map(|id| self.get(id).and_then(|item| item.as_task()))
            .collect()
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }
}
