//! Placement and priority enumerations for items.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display-filtering tag attached to every item.
///
/// Sections are orthogonal to ordering: moving an item between sections
/// never changes its position in the sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Section {
    /// Root placement in the main list
    #[serde(rename = "mainContainer")]
    MainContainer,

    /// Default placement for freshly created tasks
    #[serde(rename = "taskManager")]
    TaskManager,

    /// Completed tasks
    #[serde(rename = "Completed")]
    Completed,
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maincontainer" | "main" => Ok(Section::MainContainer),
            "taskmanager" | "tasks" => Ok(Section::TaskManager),
            "completed" | "done" => Ok(Section::Completed),
            _ => Err(format!("Invalid section: {s}")),
        }
    }
}

impl Section {
    /// Persisted string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::MainContainer => "mainContainer",
            Section::TaskManager => "taskManager",
            Section::Completed => "Completed",
        }
    }
}

/// Task priority, ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Short marker used in list output; empty for [`Priority::None`].
    ///
    /// ```rust
    /// use tally_core::models::Priority;
    ///
    /// assert_eq!(Priority::High.marker(), "!!!");
    /// assert_eq!(Priority::None.marker(), "");
    /// ```
    pub fn marker(&self) -> &'static str {
        match self {
            Priority::None => "",
            Priority::Low => "!",
            Priority::Medium => "!!",
            Priority::High => "!!!",
        }
    }
}
