//! Ordering engine for the flat item sequence.
//!
//! All functions here are pure: they take the current sequence and return a
//! new one, leaving the input untouched on error. The store is the only
//! caller that commits results.
//!
//! The sequence obeys one structural rule. A cluster's children follow the
//! cluster contiguously, and nothing else sits between a cluster and its
//! last child. A cluster together with its children is called a block:
//!
//! ```text
//! C1  ┐
//! t1  │ block of C1
//! t2  ┘
//! t4    root task
//! C2  ┐ block of C2
//! t3  ┘
//! ```
//!
//! Moving a cluster always moves its whole block. Reordering never changes a
//! task's `parent_id`; joining or leaving a cluster goes through
//! [`move_into_cluster`] and [`detach_from_cluster`].

use std::{
    collections::{HashMap, HashSet},
    ops::Range,
};

use crate::{
    error::{Result, TallyError},
    models::{Item, Section},
};

mod position;


pub use position::{DropPosition, Position};

/// Index of the item with the given id.
pub fn index_of(items: &[Item], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Range covered by the item at `index`: the whole block for a cluster, the
/// single slot otherwise.
pub fn block_range(items: &[Item], index: usize) -> Range<usize> {
    let Some(Item::Cluster(cluster)) = items.get(index) else {
        return index..(index + 1).min(items.len());
    };
    let len = items[index + 1..]
        .iter()
        .take_while(|item| item.parent_id() == Some(cluster.id.as_str()))
        .count();
    index..index + 1 + len
}

/// Items sharing the container `parent` (`None` for root level), in
/// sequence order.
pub fn siblings<'a>(items: &'a [Item], parent: Option<&str>) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| item.parent_id() == parent)
        .collect()
}

/// Validates that every child sits inside its parent cluster's block.
///
/// # Errors
///
/// * `TallyError::InvalidMove` - When a task refers to a cluster that is not
///   in the sequence, or a block is split
pub fn check_contiguity(items: &[Item]) -> Result<()> {
    let cluster_ids: HashSet<&str> = items
        .iter()
        .filter(|item| item.is_cluster())
        .map(Item::id)
        .collect();

    let mut current: Option<&str> = None;
    for item in items {
        match item {
            Item::Cluster(cluster) => current = Some(cluster.id.as_str()),
            Item::Task(task) => match task.parent_id.as_deref() {
                None => current = None,
                Some(parent) if !cluster_ids.contains(parent) => {
                    return Err(TallyError::invalid_move(format!(
                        "task {} belongs to unknown cluster {parent}",
                        task.id
                    )));
                }
                Some(parent) if current != Some(parent) => {
                    return Err(TallyError::invalid_move(format!(
                        "the block of cluster {parent} would be split"
                    )));
                }
                Some(_) => {}
            },
        }
    }
    Ok(())
}

/// Moves `source_id` directly above or below `target_id`.
///
/// A cluster source carries its children along. With a cluster target,
/// `Below` means after the target's whole block.
///
/// # Errors
///
/// * `TallyError::InvalidMove` - When source and target are the same item,
///   when a cluster is moved relative to one of its own children, or when
///   the result would split a block
/// * `TallyError::ItemNotFound` - When either id is absent
pub fn reorder(
    items: &[Item],
    source_id: &str,
    target_id: &str,
    position: Position,
) -> Result<Vec<Item>> {
    if source_id == target_id {
        return Err(TallyError::invalid_move("an item cannot be moved relative to itself"));
    }
    let source_idx = index_of(items, source_id).ok_or_else(|| TallyError::not_found(source_id))?;
    let target_idx = index_of(items, target_id).ok_or_else(|| TallyError::not_found(target_id))?;

    if items[source_idx].is_cluster() && items[target_idx].parent_id() == Some(source_id) {
        return Err(TallyError::invalid_move(
            "a cluster cannot be moved relative to its own child",
        ));
    }

    let mut rest = items.to_vec();
    let block: Vec<Item> = rest.drain(block_range(items, source_idx)).collect();

    let target_idx = index_of(&rest, target_id).ok_or_else(|| TallyError::not_found(target_id))?;
    let insert_at = match position {
        Position::Above => target_idx,
        Position::Below => block_range(&rest, target_idx).end,
    };
    rest.splice(insert_at..insert_at, block);

    check_contiguity(&rest)?;
    log::debug!("Reordered {source_id} {position} {target_id}");
    Ok(rest)
}

/// Places a task at the end of a cluster's block and makes it a child of
/// that cluster. A task already in the cluster stays where it is.
///
/// # Errors
///
/// * `TallyError::ItemNotFound` - When either id is absent
/// * `TallyError::InvalidMove` - When the source is not a task or the target
///   is not a cluster
pub fn move_into_cluster(items: &[Item], task_id: &str, cluster_id: &str) -> Result<Vec<Item>> {
    let task_idx = require_task(items, task_id)?;
    require_cluster(items, cluster_id)?;

    if items[task_idx].parent_id() == Some(cluster_id) {
        return Ok(items.to_vec());
    }

    let mut rest = items.to_vec();
    let mut moved = rest.remove(task_idx);
    if let Item::Task(task) = &mut moved {
        task.parent_id = Some(cluster_id.to_string());
    }

    let cluster_idx = index_of(&rest, cluster_id).ok_or_else(|| TallyError::not_found(cluster_id))?;
    let insert_at = block_range(&rest, cluster_idx).end;
    rest.insert(insert_at, moved);

    check_contiguity(&rest)?;
    Ok(rest)
}

/// Turns a child task into a root task placed right after its former
/// cluster's block, in the main section. Root tasks are returned unchanged.
///
/// # Errors
///
/// * `TallyError::ItemNotFound` - When the task is absent
/// * `TallyError::InvalidMove` - When the id names a cluster
pub fn detach_from_cluster(items: &[Item], task_id: &str) -> Result<Vec<Item>> {
    let task_idx = require_task(items, task_id)?;
    let Some(cluster_id) = items[task_idx].parent_id().map(str::to_string) else {
        return Ok(items.to_vec());
    };

    let mut rest = items.to_vec();
    let mut moved = rest.remove(task_idx);
    if let Item::Task(task) = &mut moved {
        task.parent_id = None;
        task.section = Section::MainContainer;
    }

    let insert_at = match index_of(&rest, &cluster_id) {
        Some(cluster_idx) => block_range(&rest, cluster_idx).end,
        None => task_idx.min(rest.len()),
    };
    rest.insert(insert_at, moved);

    check_contiguity(&rest)?;
    Ok(rest)
}

/// Places a task directly above a cluster or directly below its block, as a
/// root-level task.
///
/// # Errors
///
/// * `TallyError::ItemNotFound` - When either id is absent
/// * `TallyError::InvalidMove` - When the source is not a task or the target
///   is not a cluster
pub fn move_relative_to_cluster(
    items: &[Item],
    task_id: &str,
    cluster_id: &str,
    position: Position,
) -> Result<Vec<Item>> {
    let task_idx = require_task(items, task_id)?;
    require_cluster(items, cluster_id)?;

    let mut rest = items.to_vec();
    let mut moved = rest.remove(task_idx);
    if let Item::Task(task) = &mut moved {
        if task.parent_id.take().is_some() {
            task.section = Section::MainContainer;
        }
    }

    let cluster_idx = index_of(&rest, cluster_id).ok_or_else(|| TallyError::not_found(cluster_id))?;
    let insert_at = match position {
        Position::Above => cluster_idx,
        Position::Below => block_range(&rest, cluster_idx).end,
    };
    rest.insert(insert_at, moved);

    check_contiguity(&rest)?;
    Ok(rest)
}

/// Repairs a sequence so it satisfies [`check_contiguity`].
///
/// Parent references to missing items or to tasks are cleared. Children are
/// then regrouped directly after their cluster, keeping their relative
/// order. Items that are already well placed do not move.
pub fn normalize(items: Vec<Item>) -> Vec<Item> {
    let cluster_ids: HashSet<String> = items
        .iter()
        .filter(|item| item.is_cluster())
        .map(|item| item.id().to_string())
        .collect();

    let mut roots = Vec::with_capacity(items.len());
    let mut children: HashMap<String, Vec<Item>> = HashMap::new();

    for mut item in items {
        let parent = item.parent_id().map(str::to_string);
        match parent {
            Some(parent) if cluster_ids.contains(&parent) => {
                children.entry(parent).or_default().push(item);
            }
            Some(parent) => {
                log::warn!(
                    "Clearing invalid parent {parent} of task {}",
                    item.id()
                );
                if let Some(task) = item.as_task_mut() {
                    task.parent_id = None;
                }
                roots.push(item);
            }
            None => roots.push(item),
        }
    }

    let mut result = Vec::with_capacity(roots.len());
    for item in roots {
        let cluster_id = item.is_cluster().then(|| item.id().to_string());
        result.push(item);
        if let Some(block) = cluster_id.and_then(|id| children.remove(&id)) {
            result.extend(block);
        }
    }
    result
}

fn require_task(items: &[Item], task_id: &str) -> Result<usize> {
    let idx = index_of(items, task_id).ok_or_else(|| TallyError::not_found(task_id))?;
    if items[idx].is_cluster() {
        return Err(TallyError::invalid_move(format!(
            "{task_id} is a cluster; clusters cannot be nested"
        )));
    }
    Ok(idx)
}

fn require_cluster(items: &[Item], cluster_id: &str) -> Result<usize> {
    let idx = index_of(items, cluster_id).ok_or_else(|| TallyError::not_found(cluster_id))?;
    if !items[idx].is_cluster() {
        return Err(TallyError::invalid_move(format!(
            "{cluster_id} is not a cluster"
        )));
    }
    Ok(idx)
}
