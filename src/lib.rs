//! smarttask - personal task tracker library
//!
//! This library provides the core of the smarttask CLI: an owned task
//! store with keyword-based suggestions, status filtering and search, and
//! snapshot persistence over a pluggable key-value store.
//!
//! # Core Concepts
//!
//! - **Tasks**: title, description, priority, category, optional due date
//! - **Status**: todo, in-progress, completed; any status may follow any other
//! - **Suggestions**: fixed keyword rules evaluated once at creation
//! - **Snapshots**: the full ordered task list, saved after every change
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `smarttask.toml`
//! - `error`: Error types and result aliases
//! - `id`: Task id generators
//! - `lock`: File locking and atomic writes
//! - `model`: Task records and enums
//! - `output`: Human and JSON output for the CLI
//! - `persist`: Key-value store and snapshot adapter traits
//! - `query`: Status filter, search and progress statistics
//! - `storage`: File-backed key-value store
//! - `store`: The task store
//! - `suggest`: Suggestion rules

pub mod cli;
pub mod config;
pub mod error;
pub mod id;
pub mod lock;
pub mod model;
pub mod output;
pub mod persist;
pub mod query;
pub mod storage;
pub mod store;
pub mod suggest;

pub use error::{Error, Result};
pub use model::{NewTask, Priority, Task, TaskStatus};
pub use query::{StatusFilter, TaskStats};
pub use store::{Outcome, TaskStore};
