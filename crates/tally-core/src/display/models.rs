//! Display implementations for domain models.
//!
//! Items render as markdown: a heading with a metadata list for the detailed
//! view, and checklist lines for list views.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{item::short_id, Cluster, Item, Priority, Section, Subtask, Task};

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

impl Subtask {
    pub(crate) fn fmt_line(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(
            f,
            "{}- {} {} `{}`",
            "  ".repeat(indent),
            checkbox(self.completed),
            self.label,
            short_id(&self.id)
        )
    }
}

impl Task {
    /// Checklist line for the task followed by one line per subtask.
    pub(crate) fn fmt_line(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(
            f,
            "{}- {} {}",
            "  ".repeat(indent),
            checkbox(self.completed),
            self.label
        )?;
        if self.priority != Priority::None {
            write!(f, " {}", self.priority.marker())?;
        }
        writeln!(f, " `{}`", short_id(&self.id))?;

        for subtask in &self.subtasks {
            subtask.fmt_line(f, indent + 1)?;
        }
        Ok(())
    }

    fn fmt_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.label)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Kind: task")?;
        writeln!(
            f,
            "- Status: {}",
            if self.completed { "done" } else { "open" }
        )?;
        writeln!(f, "- Priority: {}", self.priority)?;
        writeln!(f, "- Section: {}", self.section)?;
        if let Some(parent) = &self.parent_id {
            writeln!(f, "- Cluster: {}", short_id(parent))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        if let Some(updated) = &self.updated_at {
            writeln!(f, "- Updated: {}", LocalDateTime(updated))?;
        }
        if let Some(completed) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed))?;
        }

        if !self.subtasks.is_empty() {
            let done = self.subtasks.iter().filter(|s| s.completed).count();
            writeln!(f, "\n## Subtasks ({done}/{})", self.subtasks.len())?;
            writeln!(f)?;
            for subtask in &self.subtasks {
                subtask.fmt_line(f, 0)?;
            }
        }
        Ok(())
    }
}

impl Cluster {
    /// List line for the cluster with its completion progress.
    pub(crate) fn fmt_line(
        &self,
        f: &mut fmt::Formatter<'_>,
        done: usize,
        total: usize,
    ) -> fmt::Result {
        write!(f, "- **{}**", self.label)?;
        if total > 0 {
            write!(f, " ({done}/{total})")?;
        }
        if self.is_pinned {
            write!(f, " (pinned)")?;
        }
        writeln!(f, " `{}`", short_id(&self.id))
    }

    fn fmt_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.label)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Kind: cluster")?;
        writeln!(f, "- Pinned: {}", if self.is_pinned { "yes" } else { "no" })?;
        writeln!(f, "- Section: {}", self.section)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        if let Some(updated) = &self.updated_at {
            writeln!(f, "- Updated: {}", LocalDateTime(updated))?;
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_details(f)
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_details(f)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Task(task) => fmt::Display::fmt(task, f),
            Item::Cluster(cluster) => fmt::Display::fmt(cluster, f),
        }
    }
}

/// Detailed view of one item, with the children of a cluster.
pub struct ItemDetails {
    pub item: Item,
    pub children: Vec<Item>,
}

impl fmt::Display for ItemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.item)?;
        if !self.item.is_cluster() {
            return Ok(());
        }

        if self.children.is_empty() {
            writeln!(f, "\nNo tasks in this cluster.")?;
            return Ok(());
        }
        let done = self.children.iter().filter(|c| c.is_completed()).count();
        writeln!(f, "\n## Tasks ({done}/{})", self.children.len())?;
        writeln!(f)?;
        for child in self.children.iter().filter_map(Item::as_task) {
            child.fmt_line(f, 0)?;
        }
        Ok(())
    }
}
