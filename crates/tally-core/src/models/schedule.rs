//! Weekly schedule: tasks pinned to days of the week.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Day of the week a task can be scheduled on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == lower || day.as_str()[..3] == lower)
            .ok_or_else(|| format!("Invalid day: {s}"))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, duplicate-free task ids per weekday.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule(BTreeMap<Weekday, Vec<String>>);

impl WeeklySchedule {
    /// Appends a task to a day. Returns `false` if it was already there.
    pub fn add(&mut self, day: Weekday, task_id: &str) -> bool {
        let ids = self.0.entry(day).or_default();
        if ids.iter().any(|id| id == task_id) {
            return false;
        }
        ids.push(task_id.to_string());
        true
    }

    /// Removes a task from a day. Returns `false` if it was not scheduled.
    pub fn remove(&mut self, day: Weekday, task_id: &str) -> bool {
        let Some(ids) = self.0.get_mut(&day) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|id| id != task_id);
        let removed = ids.len() != before;
        if ids.is_empty() {
            self.0.remove(&day);
        }
        removed
    }

    pub fn tasks(&self, day: Weekday) -> &[String] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[String])> {
        self.0.iter().map(|(day, ids)| (*day, ids.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops every occurrence of the given ids.
    pub(crate) fn remove_items(&mut self, ids: &HashSet<String>) {
        for list in self.0.values_mut() {
            list.retain(|id| !ids.contains(id));
        }
        self.0.retain(|_, list| !list.is_empty());
    }

    /// Rewrites ids through `renames` and keeps only ids accepted by `keep`.
    pub(crate) fn remap(
        &mut self,
        renames: &HashMap<String, String>,
        keep: impl Fn(&str) -> bool,
    ) {
        for list in self.0.values_mut() {
            let mut seen = HashSet::new();
            let remapped: Vec<String> = list
                .drain(..)
                .map(|id| renames.get(&id).cloned().unwrap_or(id))
                .filter(|id| keep(id) && seen.insert(id.clone()))
                .collect();
            *list = remapped;
        }
        self.0.retain(|_, list| !list.is_empty());
    }
}

impl FromIterator<(Weekday, Vec<String>)> for WeeklySchedule {
    fn from_iter<I: IntoIterator<Item = (Weekday, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
