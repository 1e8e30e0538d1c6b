//! Core library for the Tally task planner.
//!
//! Tally keeps tasks and clusters of tasks in one ordered sequence. This
//! crate holds the business logic: the data models, the pure ordering
//! engine, the [`Store`] that owns and persists the sequence, and markdown
//! display wrappers shared by every front end.
//!
//! # Layout
//!
//! - [`models`]: `Item` (task or cluster), subtasks, sections, priorities,
//!   the weekly schedule
//! - [`ordering`]: reorder and cluster-membership functions over item slices
//! - [`store`]: the item store, focus rotation and schedule operations
//! - [`kv`]: key-value backends (`MemoryKv`, `SqliteKv`)
//! - [`display`]: `Display` wrappers producing markdown
//! - [`params`]: string-typed operation parameters for interface layers
//!
//! # Quick Start
//!
//! ```rust
//! use tally_core::{kv::MemoryKv, ordering::Position, Store};
//!
//! let mut store = Store::open(MemoryKv::new());
//! let home = store.create_cluster("Home")?;
//! let work = store.create_cluster("Work")?;
//! let sweep = store.add_task("Sweep")?;
//! store.move_to_cluster(&sweep, &home)?;
//!
//! // Clusters move together with their tasks.
//! store.reorder(&home, &work, Position::Below)?;
//! let order: Vec<&str> = store.items().iter().map(|item| item.label()).collect();
//! assert_eq!(order, ["Work", "Home", "Sweep"]);
//!
//! assert_eq!(store.current_task().map(|task| task.label.as_str()), Some("Sweep"));
//! # tally_core::Result::<()>::Ok(())
//! ```

pub mod display;
pub mod error;
pub mod kv;
pub mod models;
pub mod ordering;
pub mod params;
pub mod store;

pub use display::{
    CreateResult, DeleteResult, ItemDetails, ItemList, LocalDateTime, OperationStatus, TaskList,
    UpdateResult,
};
pub use error::{Result, TallyError};
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};
pub use models::{Cluster, Item, ItemUpdate, Priority, Section, Subtask, Task, Weekday};
pub use ordering::{DropPosition, Position};
pub use store::{DeleteOutcome, Store, StoreBuilder, StoreEvent};
