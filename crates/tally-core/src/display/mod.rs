//! Markdown display wrappers for items and operation results.
//!
//! Domain models implement `Display` directly for their detailed view.
//! Collections and operation outcomes get newtype wrappers, so every front
//! end prints the same text. The CLI renders that markdown with termimad.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │   Wrappers      │    │    Markdown     │
//! │ (Item, Task)    │───▶│ (ItemList,      │───▶│     output      │
//! │                 │    │  CreateResult)  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: `ItemList` tree view and flat `TaskList`
//! - [`results`]: `CreateResult`, `UpdateResult`, `DeleteResult`
//! - [`status`]: `OperationStatus`
//! - [`datetime`]: `LocalDateTime`
//! - [`models`]: `Display` for items and `ItemDetails`
//!
//! ```rust
//! use tally_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Skipped cluster 1a2b3c4d");
//! assert_eq!(status.to_string(), "Success: Skipped cluster 1a2b3c4d\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

#[cfg(test)]
mod tests;

pub use collections::{ItemList, TaskList};
pub use datetime::LocalDateTime;
pub use models::ItemDetails;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
