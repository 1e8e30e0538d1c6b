//! Request types for updating models.

use super::{Priority, Section};

/// Partial field update for an item. `None` leaves a field untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemUpdate {
    pub label: Option<String>,
    pub priority: Option<Priority>,
    pub section: Option<Section>,
    /// Clusters only
    pub is_pinned: Option<bool>,
}

impl ItemUpdate {
    /// Lists the fields this update touches, for change summaries.
    ///
    /// ```rust
    /// use tally_core::models::{ItemUpdate, Priority};
    ///
    /// let update = ItemUpdate {
    ///     label: Some("Write docs".to_string()),
    ///     priority: Some(Priority::High),
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     update.describe(),
    ///     vec!["Label set to 'Write docs'", "Priority set to high"]
    /// );
    /// ```
    pub fn describe(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(label) = &self.label {
            changes.push(format!("Label set to '{}'", label.trim()));
        }
        if let Some(priority) = self.priority {
            changes.push(format!("Priority set to {}", priority.as_str()));
        }
        if let Some(section) = self.section {
            changes.push(format!("Section set to {}", section.as_str()));
        }
        if let Some(pinned) = self.is_pinned {
            changes.push(if pinned { "Pinned" } else { "Unpinned" }.to_string());
        }
        changes
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl TryFrom<crate::params::UpdateItem> for ItemUpdate {
    type Error = crate::TallyError;

    /// Convert string-typed update parameters into a validated request.
    fn try_from(params: crate::params::UpdateItem) -> Result<Self, Self::Error> {
        let (priority, section) = params.validate()?;

        Ok(Self {
            label: params.label,
            priority,
            section,
            is_pinned: params.pinned,
        })
    }
}
