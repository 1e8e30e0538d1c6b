//! Change notifications emitted by the store.

use crate::{models::Weekday, ordering::Position};

/// A committed change, delivered to every subscriber after persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ItemAdded {
        id: String,
    },
    /// Ids removed by one delete, including cascaded children
    ItemsDeleted {
        ids: Vec<String>,
    },
    ItemUpdated {
        id: String,
    },
    ItemToggled {
        id: String,
        completed: bool,
    },
    ItemsReordered {
        source: String,
        target: String,
        position: Position,
    },
    /// A task joined `cluster`, or left for root level when `cluster` is `None`
    ItemMoved {
        id: String,
        cluster: Option<String>,
    },
    /// A pinned cluster was asked to be deleted; nothing changed
    DeletionNeedsConfirmation {
        id: String,
    },
    ClusterSkipped {
        id: String,
    },
    SkipsCleared,
    ScheduleChanged {
        day: Weekday,
    },
}
