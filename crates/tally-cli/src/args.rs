//! Command-line argument definitions.
//!
//! Each subcommand owns a small clap wrapper that converts into the matching
//! `tally_core::params` structure with `From`, so the core types stay free of
//! clap derives.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tally_core::params::{
    AddItem, AddSubtask, DeleteItem, Id, MoveItem, MoveToCluster, ScheduleTask, SubtaskRef,
    UpdateItem,
};

/// Tally keeps your tasks in one ordered list, grouped into clusters.
///
/// Every item id printed by tally can be shortened to any unique prefix.
#[derive(Parser)]
#[command(version, about, name = "tally")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/tally/tally.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task at the end of the list
    #[command(alias = "a")]
    Add(AddArgs),
    /// Create a cluster
    #[command(alias = "c")]
    Cluster(ClusterArgs),
    /// Insert an empty placeholder task at the top of the list
    Draft,
    /// List every item in order
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show one item, or a cluster with its tasks
    #[command(alias = "s")]
    Show(IdArgs),
    /// Toggle a task between done and open
    #[command(alias = "x")]
    Done(IdArgs),
    /// Change the label, priority or section of an item
    #[command(alias = "e")]
    Edit(EditArgs),
    /// Pin a cluster so deleting it asks for confirmation
    Pin(IdArgs),
    /// Unpin a cluster
    Unpin(IdArgs),
    /// Delete an item; clusters take their tasks with them
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteArgs),
    /// Delete every completed task
    ClearCompleted,
    /// Move an item above or below another item
    #[command(alias = "mv")]
    Move(MoveArgs),
    /// Move a task into a cluster
    #[command(name = "into")]
    Join(JoinArgs),
    /// Move a task out of its cluster
    #[command(name = "out")]
    Leave(IdArgs),
    /// Swap an item with the previous sibling
    Up(IdArgs),
    /// Swap an item with the next sibling
    Down(IdArgs),
    /// Manage the checklist of a task
    #[command(alias = "st")]
    Subtask {
        #[command(subcommand)]
        command: SubtaskCommands,
    },
    /// Show the task to work on next
    #[command(alias = "f")]
    Focus,
    /// Skip the cluster of the focus task for the next few rounds
    Skip,
    /// Plan tasks on weekdays
    #[command(alias = "w")]
    Week {
        #[command(subcommand)]
        command: WeekCommands,
    },
}

/// Positional id argument shared by single-item commands.
#[derive(ClapArgs)]
pub struct IdArgs {
    #[arg(help = "Item id or unique id prefix")]
    pub id: String,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(ClapArgs)]
pub struct AddArgs {
    /// Text of the task
    pub label: String,
    #[arg(short, long, help = "Priority of the task")]
    pub priority: Option<PriorityArg>,
}

impl From<AddArgs> for AddItem {
    fn from(val: AddArgs) -> Self {
        AddItem {
            label: val.label,
            priority: val.priority.map(|p| p.to_string()),
            ..Default::default()
        }
    }
}

#[derive(ClapArgs)]
pub struct ClusterArgs {
    /// Name of the cluster
    pub name: String,
    #[arg(long, help = "Pin the cluster right away")]
    pub pin: bool,
}

impl From<ClusterArgs> for AddItem {
    fn from(val: ClusterArgs) -> Self {
        AddItem {
            label: val.name,
            cluster: true,
            pinned: val.pin,
            priority: None,
        }
    }
}

/// Edit an item in place
///
/// Priorities only apply to tasks. Sections are display tags and never
/// change the order of the list.
#[derive(ClapArgs)]
pub struct EditArgs {
    #[arg(help = "Item id or unique id prefix")]
    pub id: String,
    #[arg(short, long, help = "New label")]
    pub label: Option<String>,
    #[arg(short, long, help = "New priority (tasks only)")]
    pub priority: Option<PriorityArg>,
    #[arg(short, long, help = "New section")]
    pub section: Option<SectionArg>,
}

impl From<EditArgs> for UpdateItem {
    fn from(val: EditArgs) -> Self {
        UpdateItem {
            id: val.id,
            label: val.label,
            priority: val.priority.map(|p| p.to_string()),
            section: val.section.map(|s| s.to_string()),
            pinned: None,
        }
    }
}

#[derive(ClapArgs)]
pub struct DeleteArgs {
    #[arg(help = "Item id or unique id prefix")]
    pub id: String,
    /// Confirm deleting a pinned cluster
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeleteArgs> for DeleteItem {
    fn from(val: DeleteArgs) -> Self {
        DeleteItem {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

/// Move an item relative to another one
///
/// Moving a cluster carries its tasks along. Moving a task above or below a
/// cluster takes it out of any cluster it was in.
#[derive(ClapArgs)]
pub struct MoveArgs {
    #[arg(help = "Id of the item to move")]
    pub source: String,
    #[arg(help = "Where to put it relative to the target")]
    pub position: PositionArg,
    #[arg(help = "Id of the item to move next to")]
    pub target: String,
}

impl From<MoveArgs> for MoveItem {
    fn from(val: MoveArgs) -> Self {
        MoveItem {
            source: val.source,
            target: val.target,
            position: val.position.to_string(),
        }
    }
}

#[derive(ClapArgs)]
pub struct JoinArgs {
    #[arg(help = "Id of the task")]
    pub task_id: String,
    #[arg(help = "Id of the cluster")]
    pub cluster_id: String,
}

impl From<JoinArgs> for MoveToCluster {
    fn from(val: JoinArgs) -> Self {
        MoveToCluster {
            task_id: val.task_id,
            cluster_id: val.cluster_id,
        }
    }
}

#[derive(Subcommand)]
pub enum SubtaskCommands {
    /// Add a checklist entry to a task
    #[command(alias = "a")]
    Add(AddSubtaskArgs),
    /// Toggle a checklist entry
    #[command(alias = "x")]
    Toggle(SubtaskRefArgs),
    /// Remove a checklist entry
    #[command(alias = "rm")]
    Remove(SubtaskRefArgs),
}

#[derive(ClapArgs)]
pub struct AddSubtaskArgs {
    #[arg(help = "Id of the task")]
    pub task_id: String,
    /// Text of the checklist entry
    pub label: String,
}

impl From<AddSubtaskArgs> for AddSubtask {
    fn from(val: AddSubtaskArgs) -> Self {
        AddSubtask {
            task_id: val.task_id,
            label: val.label,
        }
    }
}

#[derive(ClapArgs)]
pub struct SubtaskRefArgs {
    #[arg(help = "Id of the task")]
    pub task_id: String,
    #[arg(help = "Id of the subtask (unique prefix within the task)")]
    pub subtask_id: String,
}

impl From<SubtaskRefArgs> for SubtaskRef {
    fn from(val: SubtaskRefArgs) -> Self {
        SubtaskRef {
            task_id: val.task_id,
            subtask_id: val.subtask_id,
        }
    }
}

#[derive(Subcommand)]
pub enum WeekCommands {
    /// Plan a task on a weekday
    #[command(alias = "a")]
    Add(DayTaskArgs),
    /// Take a task off a weekday
    #[command(alias = "rm")]
    Remove(DayTaskArgs),
    /// Show the plan for one day, or the whole week
    #[command(alias = "s")]
    Show(ShowWeekArgs),
}

#[derive(ClapArgs)]
pub struct DayTaskArgs {
    #[arg(help = "Weekday name, e.g. monday or mon")]
    pub day: String,
    #[arg(help = "Id of the task")]
    pub task_id: String,
}

impl From<DayTaskArgs> for ScheduleTask {
    fn from(val: DayTaskArgs) -> Self {
        ScheduleTask {
            day: val.day,
            task_id: val.task_id,
        }
    }
}

#[derive(ClapArgs)]
pub struct ShowWeekArgs {
    #[arg(help = "Weekday to show; omit for the whole week")]
    pub day: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    /// No priority
    #[value(name = "none")]
    Unset,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for PriorityArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PriorityArg::Unset => "none",
            PriorityArg::Low => "low",
            PriorityArg::Medium => "medium",
            PriorityArg::High => "high",
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    /// The main list
    Main,
    /// The task manager view
    Tasks,
    /// The completed view
    Completed,
}

impl std::fmt::Display for SectionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SectionArg::Main => "main",
            SectionArg::Tasks => "tasks",
            SectionArg::Completed => "completed",
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PositionArg {
    Above,
    Below,
}

impl std::fmt::Display for PositionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PositionArg::Above => "above",
            PositionArg::Below => "below",
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_move_args_parse_position() {
        let args = Args::try_parse_from(["tally", "move", "ab12", "below", "cd34"]).unwrap();
        let Some(Commands::Move(args)) = args.command else {
            panic!("Expected move command");
        };
        let params = MoveItem::from(args);
        assert_eq!(params.position, "below");
        assert_eq!(params.target, "cd34");
    }

    #[test]
    fn test_cluster_args_convert_to_pinned_cluster() {
        let args = Args::try_parse_from(["tally", "cluster", "Errands", "--pin"]).unwrap();
        let Some(Commands::Cluster(args)) = args.command else {
            panic!("Expected cluster command");
        };
        let params = AddItem::from(args);
        assert!(params.cluster && params.pinned);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let args = Args::try_parse_from(["tally", "--no-color"]).unwrap();
        assert!(args.no_color);
        assert!(args.command.is_none());
    }
}
