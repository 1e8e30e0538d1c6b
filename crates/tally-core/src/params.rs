//! Parameter structures for store operations driven by user input.
//!
//! These structures carry raw, string-typed input from an interface layer
//! (the CLI today) into the store's handler methods. They stay free of
//! interface-framework derives; each front end defines its own argument
//! types and converts them with `From`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │   Item Store    │
//! │  (clap derives) │───▶│ (strings, ids)  │───▶│ (typed values)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Ids in these structures may be unique prefixes; the handlers resolve
//! them with [`crate::Store::resolve_id`].

use serde::{Deserialize, Serialize};

use crate::{
    models::{Priority, Section, Weekday},
    ordering::Position,
    Result, TallyError,
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// Item id or unique id prefix
    pub id: String,
}

/// Parameters for creating a task or a cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddItem {
    /// Display text (required, trimmed)
    pub label: String,
    /// Create a cluster instead of a task
    #[serde(default)]
    pub cluster: bool,
    /// Pin the new cluster (clusters only)
    #[serde(default)]
    pub pinned: bool,
    /// Optional priority for tasks ('none', 'low', 'medium', 'high')
    pub priority: Option<String>,
}

impl AddItem {
    /// Validate the creation parameters and return the parsed priority.
    ///
    /// # Errors
    ///
    /// * `TallyError::InvalidInput` - When the priority string is invalid
    /// * `TallyError::InvalidInput` - When a cluster is given a priority or a
    ///   task is pinned
    ///
    /// ```rust
    /// use tally_core::{models::Priority, params::AddItem};
    ///
    /// let params = AddItem {
    ///     label: "Ship release".to_string(),
    ///     priority: Some("high".to_string()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(params.validate()?, Priority::High);
    /// # tally_core::Result::<()>::Ok(())
    /// ```
    pub fn validate(&self) -> Result<Priority> {
        let priority = parse_priority(self.priority.as_deref())?.unwrap_or_default();
        if self.cluster && priority != Priority::None {
            return Err(TallyError::invalid_input("priority")
                .with_reason("clusters do not carry a priority"));
        }
        if !self.cluster && self.pinned {
            return Err(TallyError::invalid_input("pinned").with_reason("only clusters can be pinned"));
        }
        Ok(priority)
    }
}

/// Parameters for deleting an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteItem {
    pub id: String,
    /// Required to delete a pinned cluster
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for updating an existing item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    /// Item id or unique prefix (required)
    pub id: String,
    /// New label
    pub label: Option<String>,
    /// New priority ('none', 'low', 'medium', 'high')
    pub priority: Option<String>,
    /// New section ('mainContainer', 'taskManager', 'Completed')
    pub section: Option<String>,
    /// New pin state (clusters only)
    pub pinned: Option<bool>,
}

impl UpdateItem {
    /// Validate the update and return the parsed priority and section.
    ///
    /// # Errors
    ///
    /// * `TallyError::InvalidInput` - When priority or section is invalid
    ///
    /// ```rust
    /// use tally_core::params::UpdateItem;
    ///
    /// let mut params = UpdateItem::default();
    /// params.id = "abc".to_string();
    /// params.priority = Some("urgent".to_string());
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(Option<Priority>, Option<Section>)> {
        let priority = parse_priority(self.priority.as_deref())?;
        let section = match &self.section {
            Some(raw) => Some(raw.parse::<Section>().map_err(|_| {
                TallyError::invalid_input("section").with_reason(format!(
                    "Invalid section: {raw}. Must be 'mainContainer', 'taskManager', or 'Completed'"
                ))
            })?),
            None => None,
        };
        Ok((priority, section))
    }
}

/// Parameters for moving one item relative to another.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveItem {
    /// Item being moved
    pub source: String,
    /// Item the source is placed next to
    pub target: String,
    /// 'above' or 'below'
    pub position: String,
}

impl MoveItem {
    pub fn validate(&self) -> Result<Position> {
        self.position.parse::<Position>().map_err(|_| {
            TallyError::invalid_input("position").with_reason(format!(
                "Invalid position: {}. Must be 'above' or 'below'",
                self.position
            ))
        })
    }
}

/// Parameters for placing a task inside a cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveToCluster {
    pub task_id: String,
    pub cluster_id: String,
}

/// Parameters for adding a subtask.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddSubtask {
    pub task_id: String,
    pub label: String,
}

/// Parameters addressing one subtask of a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtaskRef {
    pub task_id: String,
    /// Subtask id or unique prefix
    pub subtask_id: String,
}

/// Parameters for adding a task to, or removing it from, a weekday.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleTask {
    /// Day name ('monday' .. 'sunday', or a three-letter abbreviation)
    pub day: String,
    pub task_id: String,
}

impl ScheduleTask {
    pub fn validate(&self) -> Result<Weekday> {
        parse_day(&self.day)
    }
}

/// Parses a weekday name into [`Weekday`].
pub fn parse_day(raw: &str) -> Result<Weekday> {
    raw.parse::<Weekday>().map_err(|_| {
        TallyError::invalid_input("day")
            .with_reason(format!("Invalid day: {raw}. Must be a weekday name such as 'monday'"))
    })
}

fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>> {
    raw.map(|value| {
        value.parse::<Priority>().map_err(|_| {
            TallyError::invalid_input("priority").with_reason(format!(
                "Invalid priority: {value}. Must be 'none', 'low', 'medium', or 'high'"
            ))
        })
    })
    .transpose()
}
