//! Item model: the tasks and clusters that make up the ordered sequence.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Priority, Section};
use crate::error::{Result, TallyError};

/// Placeholder label used by draft tasks.
pub const DRAFT_LABEL: &str = "New Task";

/// Lightweight checklist entry owned by a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,

    #[serde(alias = "todo")]
    pub label: String,

    #[serde(default)]
    pub completed: bool,

    pub created_at: Timestamp,
}

/// A single to-do entry, optionally owned by a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub label: String,
    pub completed: bool,
    /// Owning cluster; `None` means root level
    pub parent_id: Option<String>,
    pub section: Section,
    pub priority: Priority,
    pub subtasks: Vec<Subtask>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl Task {
    pub(crate) fn new(id: String, label: String, now: Timestamp) -> Self {
        Self {
            id,
            label,
            completed: false,
            parent_id: None,
            section: Section::TaskManager,
            priority: Priority::None,
            subtasks: Vec::new(),
            created_at: now,
            updated_at: Some(now),
            completed_at: None,
        }
    }

    /// Sets the completion state together with its timestamp. The section
    /// follows only when the state actually changes.
    pub(crate) fn apply_completion(&mut self, completed: bool, now: Timestamp) {
        if completed != self.completed {
            self.section = if completed {
                Section::Completed
            } else {
                Section::TaskManager
            };
        }
        if completed && !self.completed {
            self.completed_at = Some(now);
        } else if !completed {
            self.completed_at = None;
        }
        self.completed = completed;
        self.updated_at = Some(now);
    }

    /// Re-derives `completed` from the subtasks. Tasks without subtasks are
    /// left alone.
    pub(crate) fn recompute_from_subtasks(&mut self, now: Timestamp) {
        if self.subtasks.is_empty() {
            return;
        }
        let all_done = self.subtasks.iter().all(|s| s.completed);
        self.apply_completion(all_done, now);
    }
}

/// A grouping item owning a contiguous block of child tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: String,
    pub label: String,
    /// Pinned clusters need confirmation before deletion
    pub is_pinned: bool,
    pub section: Section,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Cluster {
    pub(crate) fn new(id: String, label: String, now: Timestamp) -> Self {
        Self {
            id,
            label,
            is_pinned: false,
            section: Section::MainContainer,
            created_at: now,
            updated_at: Some(now),
        }
    }
}

/// An entry of the ordered sequence: either a task or a cluster.
///
/// Persisted as a flat record with an `isCluster` discriminator; see
/// [`ItemRecord`] for the wire layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub enum Item {
    Task(Task),
    Cluster(Cluster),
}

impl Item {
    pub fn id(&self) -> &str {
        match self {
            Item::Task(t) => &t.id,
            Item::Cluster(c) => &c.id,
        }
    }

    /// First eight characters of the id, used for display and prefix lookup.
    pub fn short_id(&self) -> &str {
        short_id(self.id())
    }

    pub fn label(&self) -> &str {
        match self {
            Item::Task(t) => &t.label,
            Item::Cluster(c) => &c.label,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, Item::Cluster(_))
    }

    /// Owning cluster id. Always `None` for clusters.
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Item::Task(t) => t.parent_id.as_deref(),
            Item::Cluster(_) => None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id().is_none()
    }

    /// Clusters are never completed.
    pub fn is_completed(&self) -> bool {
        match self {
            Item::Task(t) => t.completed,
            Item::Cluster(_) => false,
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Item::Task(t) => t.section,
            Item::Cluster(c) => c.section,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        match self {
            Item::Task(t) => t.created_at,
            Item::Cluster(c) => c.created_at,
        }
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        match self {
            Item::Task(t) => t.updated_at,
            Item::Cluster(c) => c.updated_at,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Item::Task(t) => Some(t),
            Item::Cluster(_) => None,
        }
    }

    pub fn as_cluster(&self) -> Option<&Cluster> {
        match self {
            Item::Cluster(c) => Some(c),
            Item::Task(_) => None,
        }
    }

    pub(crate) fn as_task_mut(&mut self) -> Option<&mut Task> {
        match self {
            Item::Task(t) => Some(t),
            Item::Cluster(_) => None,
        }
    }

    pub(crate) fn touch(&mut self, now: Timestamp) {
        match self {
            Item::Task(t) => t.updated_at = Some(now),
            Item::Cluster(c) => c.updated_at = Some(now),
        }
    }

    /// Replaces the id. Only used by the legacy id migration at load time.
    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            Item::Task(t) => t.id = id,
            Item::Cluster(c) => c.id = id,
        }
    }
}

/// Flat persisted layout of an [`Item`].
///
/// Missing optional fields are default-filled; records that violate the
/// item rules fail conversion and are discarded by the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,

    #[serde(alias = "todo")]
    pub label: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub is_cluster: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pinned: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

/// First eight characters of an id.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Trims a label and rejects it when nothing is left.
pub(crate) fn normalize_label(field: &str, label: &str) -> Result<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(TallyError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(trimmed.to_string())
}

impl TryFrom<ItemRecord> for Item {
    type Error = TallyError;

    fn try_from(record: ItemRecord) -> Result<Self> {
        let id = record.id.trim().to_string();
        if id.is_empty() {
            return Err(TallyError::invalid_input("id").with_reason("must not be empty"));
        }
        let label = normalize_label("label", &record.label)?;
        let created_at = record.created_at.unwrap_or_else(Timestamp::now);

        if record.is_cluster {
            return Ok(Item::Cluster(Cluster {
                id,
                label,
                is_pinned: record.is_pinned,
                section: record.section.unwrap_or(Section::MainContainer),
                created_at,
                updated_at: record.updated_at,
            }));
        }

        for subtask in &record.subtasks {
            if subtask.id.trim().is_empty() || subtask.label.trim().is_empty() {
                return Err(TallyError::invalid_input("subtasks")
                    .with_reason("subtask id and label must not be empty"));
            }
        }

        let completed = if record.subtasks.is_empty() {
            record.completed
        } else {
            record.subtasks.iter().all(|s| s.completed)
        };

        Ok(Item::Task(Task {
            id,
            label,
            completed,
            parent_id: record.parent_id.filter(|p| !p.trim().is_empty()),
            section: record.section.unwrap_or(Section::TaskManager),
            priority: record.priority,
            subtasks: record.subtasks,
            created_at,
            updated_at: record.updated_at,
            completed_at: if completed { record.completed_at } else { None },
        }))
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        match item {
            Item::Task(t) => ItemRecord {
                id: t.id,
                label: t.label,
                completed: t.completed,
                is_cluster: false,
                parent_id: t.parent_id,
                is_pinned: false,
                section: Some(t.section),
                priority: t.priority,
                subtasks: t.subtasks,
                created_at: Some(t.created_at),
                updated_at: t.updated_at,
                completed_at: t.completed_at,
            },
            Item::Cluster(c) => ItemRecord {
                id: c.id,
                label: c.label,
                completed: false,
                is_cluster: true,
                parent_id: None,
                is_pinned: c.is_pinned,
                section: Some(c.section),
                priority: Priority::None,
                subtasks: Vec::new(),
                created_at: Some(c.created_at),
                updated_at: c.updated_at,
                completed_at: None,
            },
        }
    }
}
