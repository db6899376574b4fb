use clap::{Parser, Subcommand, ValueEnum};
use tasklist_core::query::StatusFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk"
    Add {
        text: Option<String>,
    },
    /// Edit a task's text
    ///
    /// Example: tasklist edit task-17 "Buy organic milk"
    Edit {
        id: String,
        text: String,
    },
    /// Mark a task as completed
    ///
    /// Example: tasklist done task-17
    Done {
        id: String,
    },
    /// Mark a task as active again
    ///
    /// Example: tasklist undo task-17
    Undo {
        id: String,
    },
    /// Flip a task's completion flag
    ///
    /// Example: tasklist toggle task-17
    Toggle {
        id: String,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete task-17
    Delete {
        id: String,
    },
    /// List tasks
    ///
    /// Example: tasklist list
    /// Example: tasklist list active --search milk
    List {
        #[arg(value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        /// Only show tasks whose text contains this string
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Set every task's completion flag at once
    ///
    /// Example: tasklist mark-all
    /// Example: tasklist mark-all --active
    MarkAll {
        /// Mark everything active instead of completed
        #[arg(long)]
        active: bool,
    },
    /// Delete every completed task
    ///
    /// Example: tasklist purge
    Purge,
    /// Replace in-memory state with the store file's contents
    ///
    /// Example: tasklist reload
    Reload,
    /// Force a save of the current in-memory state
    ///
    /// Example: tasklist save
    Save,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Active,
    Completed,
}

impl From<FilterArg> for StatusFilter {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::All => StatusFilter::All,
            FilterArg::Active => StatusFilter::Active,
            FilterArg::Completed => StatusFilter::Completed,
        }
    }
}
