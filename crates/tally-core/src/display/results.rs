//! Markdown wrappers around the outcome of create, update and delete handlers.

use std::fmt;

use crate::models::{item::short_id, Item, Subtask};

fn kind(item: &Item) -> &'static str {
    if item.is_cluster() {
        "cluster"
    } else {
        "task"
    }
}

/// A freshly created item or subtask, headed by its short id.
///
/// # Examples
///
/// ```rust
/// use tally_core::{display::CreateResult, kv::MemoryKv, Store};
///
/// let mut store = Store::open(MemoryKv::new());
/// let id = store.add_task("Water plants")?;
/// let item = store.get(&id).cloned().unwrap();
///
/// let output = CreateResult::new(item).to_string();
/// assert!(output.starts_with(&format!("Created task with ID: {}", &id[..8])));
/// # tally_core::Result::<()>::Ok(())
/// ```
#[derive(Debug)]
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Created {} with ID: {}",
            kind(&self.resource),
            self.resource.short_id()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Subtask> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created subtask with ID: {}", short_id(&self.resource.id))?;
        writeln!(f)?;
        self.resource.fmt_line(f, 0)
    }
}

/// Wrapper type for displaying the result of update operations, with the
/// list of changes applied.
#[derive(Debug)]
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated {} with ID: {}",
            kind(&self.resource),
            self.resource.short_id()
        )?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying removed items.
#[derive(Debug)]
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Vec<Item>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource.as_slice() {
            [] => writeln!(f, "Nothing to delete."),
            [item] => writeln!(
                f,
                "Deleted {} '{}' (ID: {})",
                kind(item),
                item.label(),
                item.short_id()
            ),
            items => {
                writeln!(f, "Deleted {} items:", items.len())?;
                writeln!(f)?;
                for item in items {
                    writeln!(f, "- {} (ID: {})", item.label(), item.short_id())?;
                }
                Ok(())
            }
        }
    }
}
