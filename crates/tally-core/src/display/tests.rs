use jiff::Timestamp;

use super::*;
use crate::models::{Cluster, Item, Priority, Subtask, Task};

fn created() -> Timestamp {
    Timestamp::from_second(1640995200).unwrap() // 2022-01-01 00:00:00 UTC
}

fn errands() -> Item {
    let mut cluster = Cluster::new("c0ffee00-1111".to_string(), "Errands".to_string(), created());
    cluster.is_pinned = true;
    Item::Cluster(cluster)
}

fn milk(completed: bool) -> Item {
    let mut task = Task::new("abcdef12-2222".to_string(), "Buy milk".to_string(), created());
    task.parent_id = Some("c0ffee00-1111".to_string());
    task.priority = Priority::High;
    task.completed = completed;
    task.subtasks.push(Subtask {
        id: "5ub7a5k0-3333".to_string(),
        label: "Check fridge".to_string(),
        completed,
        created_at: created(),
    });
    Item::Task(task)
}

fn letter() -> Item {
    Item::Task(Task::new(
        "1e77e400-4444".to_string(),
        "Post letter".to_string(),
        created(),
    ))
}

#[test]
fn test_item_list_renders_tree() {
    let output = ItemList(vec![errands(), milk(false), letter()]).to_string();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "- **Errands** (0/1) (pinned) `c0ffee00`",
            "  - [ ] Buy milk !!! `abcdef12`",
            "    - [ ] Check fridge `5ub7a5k0`",
            "- [ ] Post letter `1e77e400`",
        ]
    );
}

#[test]
fn test_item_list_counts_completed_children() {
    let output = ItemList(vec![errands(), milk(true)]).to_string();
    assert!(output.contains("- **Errands** (1/1)"));
    assert!(output.contains("- [x] Buy milk"));
}

#[test]
fn test_empty_collections() {
    assert_eq!(ItemList(Vec::new()).to_string(), "No items.\n");
    assert_eq!(TaskList(Vec::new()).to_string(), "No tasks.\n");
}

#[test]
fn test_task_details() {
    let output = milk(false).to_string();
    assert!(output.starts_with("# Buy milk\n"));
    assert!(output.contains("- ID: abcdef12-2222"));
    assert!(output.contains("- Status: open"));
    assert!(output.contains("- Priority: high"));
    assert!(output.contains("- Section: taskManager"));
    assert!(output.contains("- Cluster: c0ffee00"));
    assert!(output.contains("## Subtasks (0/1)"));
}

#[test]
fn test_cluster_details_list_children() {
    let details = ItemDetails {
        item: errands(),
        children: vec![milk(true)],
    };
    let output = details.to_string();
    assert!(output.contains("- Kind: cluster"));
    assert!(output.contains("- Pinned: yes"));
    assert!(output.contains("## Tasks (1/1)"));
    assert!(output.contains("- [x] Buy milk !!! `abcdef12`"));

    let empty = ItemDetails {
        item: errands(),
        children: Vec::new(),
    };
    assert!(empty.to_string().contains("No tasks in this cluster."));
}

#[test]
fn test_create_and_update_results() {
    let created = CreateResult::new(errands()).to_string();
    assert!(created.starts_with("Created cluster with ID: c0ffee00\n"));

    let updated = UpdateResult::with_changes(letter(), vec!["Priority set to low".to_string()])
        .to_string();
    assert!(updated.starts_with("Updated task with ID: 1e77e400\n"));
    assert!(updated.contains("Changes made:\n- Priority set to low"));
}

#[test]
fn test_delete_result_messages() {
    assert_eq!(
        DeleteResult::new(Vec::<Item>::new()).to_string(),
        "Nothing to delete.\n"
    );
    assert_eq!(
        DeleteResult::new(vec![letter()]).to_string(),
        "Deleted task 'Post letter' (ID: 1e77e400)\n"
    );

    let many = DeleteResult::new(vec![errands(), milk(false)]).to_string();
    assert!(many.starts_with("Deleted 2 items:"));
    assert!(many.contains("- Buy milk (ID: abcdef12)"));
}

#[test]
fn test_operation_status_display() {
    let success = OperationStatus::success("Operation completed");
    assert!(success.to_string().contains("Success:"));

    let failure = OperationStatus::failure("Operation failed");
    assert!(failure.to_string().contains("Error:"));
}
