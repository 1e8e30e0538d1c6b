//! Collection wrapper types for displaying groups of items.

use std::fmt;

use crate::models::{Item, Task};

/// Newtype wrapper rendering a sequence slice as a tree: clusters with
/// their children indented beneath them.
///
/// # Examples
///
/// ```rust
/// use tally_core::{display::ItemList, kv::MemoryKv, Store};
///
/// let mut store = Store::open(MemoryKv::new());
/// let errands = store.create_cluster("Errands")?;
/// let milk = store.add_task("Buy milk")?;
/// store.move_to_cluster(&milk, &errands)?;
///
/// let output = ItemList(store.items().to_vec()).to_string();
/// assert!(output.contains("- **Errands** (0/1)"));
/// assert!(output.contains("  - [ ] Buy milk"));
/// # tally_core::Result::<()>::Ok(())
/// ```
pub struct ItemList(pub Vec<Item>);

impl ItemList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }
}

impl fmt::Display for ItemList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No items.");
        }

        for item in &self.0 {
            match item {
                Item::Cluster(cluster) => {
                    let children = self
                        .0
                        .iter()
                        .filter(|child| child.parent_id() == Some(cluster.id.as_str()));
                    let (done, total) = children.fold((0, 0), |(done, total), child| {
                        (done + usize::from(child.is_completed()), total + 1)
                    });
                    cluster.fmt_line(f, done, total)?;
                }
                Item::Task(task) => {
                    let indent = usize::from(task.parent_id.is_some());
                    task.fmt_line(f, indent)?;
                }
            }
        }
        Ok(())
    }
}

impl IntoIterator for ItemList {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Flat checklist of tasks, used by focus and schedule views.
pub struct TaskList(pub Vec<Task>);

impl TaskList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks.");
        }
        for task in &self.0 {
            task.fmt_line(f, 0)?;
        }
        Ok(())
    }
}
