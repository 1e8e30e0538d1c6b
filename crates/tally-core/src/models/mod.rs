//! Data models for tasks, clusters and the weekly schedule.
//!
//! Every entry of the ordered sequence is an [`Item`]: either a [`Task`] or a
//! [`Cluster`]. The split is a real enum, so cluster-only fields (pinning)
//! and task-only fields (completion, parent, subtasks) cannot be set on the
//! wrong kind. On disk both kinds share one flat record, [`ItemRecord`],
//! with an `isCluster` discriminator and camelCase field names.
//!
//! Display implementations live in [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use tally_core::models::{Item, Section};
//!
//! let raw = r#"{"id":"a-1","label":"Groceries","isCluster":true}"#;
//! let item: Item = serde_json::from_str(raw).unwrap();
//! assert!(item.is_cluster());
//! assert_eq!(item.section(), Section::MainContainer);
//! ```

pub mod item;
pub mod requests;
pub mod schedule;
pub mod status;

#[cfg(test)]
mod tests;

pub use item::{Cluster, Item, ItemRecord, Subtask, Task, DRAFT_LABEL};
pub use requests::ItemUpdate;
pub use schedule::{WeeklySchedule, Weekday};
pub use status::{Priority, Section};
