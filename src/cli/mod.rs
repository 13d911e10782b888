//! Command-line interface for smarttask
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in [`task`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// smarttask - personal task tracker
///
/// Create tasks, move them between todo, in-progress and completed, and
/// get keyword-based suggestions for each one.
#[derive(Parser, Debug)]
#[command(name = "smarttask")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true, env = "SMARTTASK_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a task
    Add {
        /// Task title (must not be blank)
        title: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,

        /// Category label (e.g. Work, Personal)
        #[arg(short, long, default_value = "")]
        category: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Status filter: all, todo, in-progress, completed
        #[arg(long, default_value = "all")]
        status: String,

        /// Case-insensitive search over title, description and category
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show one task with its suggestions
    Show {
        /// Task id or unique id prefix
        id: String,
    },

    /// Mark a task in-progress
    Start {
        /// Task id or unique id prefix
        id: String,
    },

    /// Mark a task completed
    Complete {
        /// Task id or unique id prefix
        id: String,
    },

    /// Set a task's status
    Status {
        /// Task id or unique id prefix
        id: String,

        /// New status: todo, in-progress, completed
        status: String,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task id or unique id prefix
        id: String,
    },

    /// Preview the suggestions a task would get
    Suggest {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Progress overview
    Stats,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let common = task::CommonOptions {
            dir: self.dir,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command {
            Commands::Add {
                title,
                description,
                priority,
                category,
                due,
            } => task::run_add(
                task::AddOptions {
                    title,
                    description,
                    priority,
                    category,
                    due,
                },
                common,
            ),
            Commands::List { status, search } => {
                task::run_list(task::ListOptions { status, search }, common)
            }
            Commands::Show { id } => task::run_show(&id, common),
            Commands::Start { id } => task::run_set_status(&id, "in-progress", "start", common),
            Commands::Complete { id } => task::run_set_status(&id, "completed", "complete", common),
            Commands::Status { id, status } => task::run_set_status(&id, &status, "status", common),
            Commands::Rm { id } => task::run_rm(&id, common),
            Commands::Suggest { title, description } => {
                task::run_suggest(&title, &description, common)
            }
            Commands::Stats => task::run_stats(common),
        }
    }
}
