//! Relative positions used by reorder and drop operations.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Where the source lands relative to the target of a reorder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Above,
    Below,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Above => "above",
            Position::Below => "below",
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "above" | "before" => Ok(Position::Above),
            "below" | "after" => Ok(Position::Below),
            _ => Err(format!("Invalid position: {s}")),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a drop gesture over a target item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Above,
    Below,
    /// Only valid when the target is a cluster
    Into,
}

impl DropPosition {
    /// Upper edge of the "above" zone on a cluster row.
    pub const CLUSTER_ABOVE_LIMIT: f64 = 0.25;
    /// Lower edge of the "below" zone on a cluster row.
    pub const CLUSTER_BELOW_LIMIT: f64 = 0.75;
    /// Split point on a task row.
    pub const TASK_SPLIT: f64 = 0.5;

    /// Maps the vertical pointer offset within the target row, as a fraction
    /// of its height, to a drop position.
    ///
    /// Cluster rows have three zones; task rows have two. Out-of-range
    /// fractions are clamped and NaN counts as the row centre.
    ///
    /// ```rust
    /// use tally_core::ordering::DropPosition;
    ///
    /// assert_eq!(DropPosition::from_offset(0.1, true), DropPosition::Above);
    /// assert_eq!(DropPosition::from_offset(0.5, true), DropPosition::Into);
    /// assert_eq!(DropPosition::from_offset(0.9, true), DropPosition::Below);
    /// assert_eq!(DropPosition::from_offset(0.5, false), DropPosition::Below);
    /// ```
    pub fn from_offset(fraction: f64, target_is_cluster: bool) -> Self {
        let fraction = if fraction.is_nan() {
            0.5
        } else {
            fraction.clamp(0.0, 1.0)
        };

        if target_is_cluster {
            if fraction < Self::CLUSTER_ABOVE_LIMIT {
                DropPosition::Above
            } else if fraction > Self::CLUSTER_BELOW_LIMIT {
                DropPosition::Below
            } else {
                DropPosition::Into
            }
        } else if fraction < Self::TASK_SPLIT {
            DropPosition::Above
        } else {
            DropPosition::Below
        }
    }

    /// The plain reorder position, if this is not [`DropPosition::Into`].
    pub fn as_position(&self) -> Option<Position> {
        match self {
            DropPosition::Above => Some(Position::Above),
            DropPosition::Below => Some(Position::Below),
            DropPosition::Into => None,
        }
    }
}

impl From<Position> for DropPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Above => DropPosition::Above,
            Position::Below => DropPosition::Below,
        }
    }
}
