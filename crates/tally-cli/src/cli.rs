//! Command dispatch: each subcommand calls one store handler and renders the
//! returned display wrapper.

use std::fmt::Display;

use anyhow::{Context, Result};
use log::debug;
use tally_core::{
    params::{AddItem, Id},
    OperationStatus, SqliteKv, Store, Weekday,
};

use crate::{
    args::{Commands, SubtaskCommands, WeekCommands},
    renderer::TerminalRenderer,
};

pub struct Cli {
    store: Store<SqliteKv>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: Store<SqliteKv>, renderer: TerminalRenderer) -> Self {
        Self { store, renderer }
    }

    fn render(&self, content: impl Display) {
        self.renderer.render(&content.to_string());
    }

    fn render_status(&self, status: OperationStatus) {
        if !status.success {
            debug!("Operation had no effect: {}", status.message);
        }
        self.render(status);
    }

    pub fn run(mut self, command: Commands) -> Result<()> {
        use Commands::*;

        match command {
            Add(args) => self.create(&AddItem::from(args)),
            Cluster(args) => self.create(&AddItem::from(args)),
            Draft => {
                let result = self
                    .store
                    .create_draft_result()
                    .context("Failed to insert draft")?;
                self.render(result);
                Ok(())
            }
            List => {
                self.list();
                Ok(())
            }
            Show(args) => {
                let details = self
                    .store
                    .show_item(&args.into())
                    .context("Failed to show item")?;
                self.render(details);
                Ok(())
            }
            Done(args) => {
                let result = self
                    .store
                    .toggle_item_result(&args.into())
                    .context("Failed to toggle item")?;
                self.render(result);
                Ok(())
            }
            Edit(args) => {
                let result = self
                    .store
                    .update_item_result(&args.into())
                    .context("Failed to update item")?;
                self.render(result);
                Ok(())
            }
            Pin(args) => self.pin(&args.into(), true),
            Unpin(args) => self.pin(&args.into(), false),
            Delete(args) => {
                let result = self
                    .store
                    .delete_item_result(&args.into())
                    .context("Failed to delete item")?;
                self.render(result);
                Ok(())
            }
            ClearCompleted => {
                let result = self
                    .store
                    .clear_completed_result()
                    .context("Failed to clear completed tasks")?;
                self.render(result);
                Ok(())
            }
            Move(args) => {
                let status = self
                    .store
                    .move_item_result(&args.into())
                    .context("Failed to move item")?;
                self.render_status(status);
                Ok(())
            }
            Join(args) => {
                let status = self
                    .store
                    .join_cluster_result(&args.into())
                    .context("Failed to move task into cluster")?;
                self.render_status(status);
                Ok(())
            }
            Leave(args) => {
                let status = self
                    .store
                    .leave_cluster_result(&args.into())
                    .context("Failed to move task out of cluster")?;
                self.render_status(status);
                Ok(())
            }
            Up(args) => self.shift(&args.into(), true),
            Down(args) => self.shift(&args.into(), false),
            Subtask { command } => self.handle_subtask_command(command),
            Focus => {
                match self.store.focus_result() {
                    Some(task) => self.render(task),
                    None => self.render("No open tasks.\n"),
                }
                Ok(())
            }
            Skip => {
                let status = self.store.skip_result().context("Failed to skip cluster")?;
                self.render_status(status);
                Ok(())
            }
            Week { command } => self.handle_week_command(command),
        }
    }

    pub fn list(&self) {
        self.render(self.store.list_items());
    }

    fn create(&mut self, params: &AddItem) -> Result<()> {
        let result = self
            .store
            .create_item_result(params)
            .context("Failed to create item")?;
        self.render(result);
        Ok(())
    }

    fn pin(&mut self, params: &Id, pinned: bool) -> Result<()> {
        let result = self
            .store
            .pin_item_result(params, pinned)
            .context("Failed to change pin")?;
        self.render(result);
        Ok(())
    }

    fn shift(&mut self, params: &Id, up: bool) -> Result<()> {
        let status = self
            .store
            .shift_item_result(params, up)
            .context("Failed to shift item")?;
        self.render_status(status);
        Ok(())
    }

    fn handle_subtask_command(&mut self, command: SubtaskCommands) -> Result<()> {
        match command {
            SubtaskCommands::Add(args) => {
                let result = self
                    .store
                    .add_subtask_result(&args.into())
                    .context("Failed to add subtask")?;
                self.render(result);
            }
            SubtaskCommands::Toggle(args) => {
                let result = self
                    .store
                    .toggle_subtask_result(&args.into())
                    .context("Failed to toggle subtask")?;
                self.render(result);
            }
            SubtaskCommands::Remove(args) => {
                let result = self
                    .store
                    .remove_subtask_result(&args.into())
                    .context("Failed to remove subtask")?;
                self.render(result);
            }
        }
        Ok(())
    }

    fn handle_week_command(&mut self, command: WeekCommands) -> Result<()> {
        match command {
            WeekCommands::Add(args) => {
                let status = self
                    .store
                    .schedule_result(&args.into())
                    .context("Failed to schedule task")?;
                self.render_status(status);
            }
            WeekCommands::Remove(args) => {
                let status = self
                    .store
                    .unschedule_result(&args.into())
                    .context("Failed to unschedule task")?;
                self.render_status(status);
            }
            WeekCommands::Show(args) => match args.day {
                Some(day) => {
                    let tasks = self
                        .store
                        .day_tasks(&day)
                        .context("Failed to show day")?;
                    self.render(tasks);
                }
                None => self.render(self.week_overview()?),
            },
        }
        Ok(())
    }

    fn week_overview(&self) -> Result<String> {
        let mut out = String::new();
        for day in Weekday::ALL {
            let tasks = self.store.day_tasks(day.as_str())?;
            if tasks.is_empty() {
                continue;
            }
            out.push_str(&format!("## {day}\n\n{tasks}\n"));
        }
        if out.is_empty() {
            out.push_str("Nothing planned this week.\n");
        }
        Ok(out)
    }
}
