//! Task management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use cluckplan_core::{Config, TaskCategory};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// work, personal, health, learning or other
        #[arg(long, default_value = "other")]
        category: TaskCategory,
        /// Scheduled time (RFC 3339)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List tasks
    List {
        /// Only tasks not yet done
        #[arg(long, conflicts_with = "completed")]
        pending: bool,
        /// Only finished tasks
        #[arg(long)]
        completed: bool,
    },
    /// Flip a task between done and not done
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Completed versus total tasks
    Progress,
}

pub fn run(action: TaskAction) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        TaskAction::Add {
            title,
            category,
            at,
        } => {
            let task = store.add_task(title, category, at);
            print_json(&store, &task)?;
        }
        TaskAction::List { pending, completed } => {
            let tasks: Vec<_> = if pending {
                store.pending_tasks()
            } else if completed {
                store.completed_tasks()
            } else {
                store.tasks().iter().collect()
            };
            print_json(&store, &tasks)?;
        }
        TaskAction::Toggle { id } => {
            store.toggle_task(&id)?;
            let task = store.task(&id);
            print_json(&store, &task)?;
        }
        TaskAction::Delete { id } => {
            let task = store.delete_task(&id)?;
            print_json(&store, &task)?;
        }
        TaskAction::Progress => {
            print_json(
                &store,
                &serde_json::json!({
                    "completed": store.completed_tasks().len(),
                    "total": store.tasks().len(),
                    "progress": store.completion_progress(),
                }),
            )?;
        }
    }
    Ok(())
}
