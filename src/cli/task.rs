//! smarttask command implementations.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config::{resolve_data_dir, Config};
use crate::error::{Error, Result};
use crate::model::{parse_due_date, NewTask, Priority, Task, TaskStatus};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persist::KeyValueSnapshots;
use crate::query::{StatusFilter, TaskStats};
use crate::storage::FileKeyValueStore;
use crate::store::{Outcome, TaskStore};

type FileTaskStore = TaskStore<KeyValueSnapshots<FileKeyValueStore>>;

pub struct CommonOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl CommonOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub priority: Option<String>,
    pub category: String,
    pub due: Option<String>,
}

pub struct ListOptions {
    pub status: String,
    pub search: String,
}

struct Context {
    store: FileTaskStore,
    load_error: Option<Error>,
    today: NaiveDate,
}

impl Context {
    /// Mutations would overwrite a snapshot we could not read.
    fn ensure_writable(&mut self) -> Result<()> {
        match self.load_error.take() {
            Some(err) => Err(Error::Storage(format!(
                "refusing to modify tasks: saved tasks could not be loaded ({err})"
            ))),
            None => Ok(()),
        }
    }

    fn push_load_warning(&self, human: &mut HumanOutput) {
        if let Some(err) = self.load_error.as_ref() {
            human.push_warning(format!("saved tasks could not be loaded: {err}"));
        }
    }
}

fn load_context(dir: Option<PathBuf>) -> Result<Context> {
    let dir = resolve_data_dir(dir)?;
    let config = Config::load_from_dir(&dir)?;
    let storage = FileKeyValueStore::new(&dir).with_lock_timeout(config.store.lock_timeout_ms);
    let adapter = KeyValueSnapshots::with_key(storage, config.store.key);
    let opened = TaskStore::open_default(adapter);
    Ok(Context {
        store: opened.value,
        load_error: opened.persist_error,
        today: Local::now().date_naive(),
    })
}

#[derive(Serialize)]
struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    overdue: bool,
}

impl<'a> TaskView<'a> {
    fn new(task: &'a Task, today: NaiveDate) -> Self {
        Self {
            task,
            overdue: task.is_overdue(today),
        }
    }
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    status: String,
    search: &'a str,
    total: usize,
    tasks: Vec<TaskView<'a>>,
}

#[derive(Serialize)]
struct SuggestOutput<'a> {
    title: &'a str,
    suggestions: Vec<String>,
}

#[derive(Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: TaskStats,
    completed_percent: u32,
    in_progress_percent: u32,
    todo_percent: u32,
}

fn task_line(task: &Task, today: NaiveDate) -> String {
    let mut line = format!(
        "[{}][{}] {} {}",
        task.status, task.priority, task.id, task.title
    );
    if !task.category.is_empty() {
        line.push_str(&format!(" (category: {})", task.category));
    }
    if let Some(due) = task.due_date {
        if task.is_overdue(today) {
            line.push_str(&format!(" (due: {due}, overdue)"));
        } else {
            line.push_str(&format!(" (due: {due})"));
        }
    }
    line
}

fn push_task_summary(human: &mut HumanOutput, task: &Task, today: NaiveDate) {
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Priority", task.priority.to_string());
    if !task.category.is_empty() {
        human.push_summary("Category", task.category.clone());
    }
    if let Some(due) = task.due_date {
        human.push_summary("Due", due.to_string());
    }
    if task.is_overdue(today) {
        human.push_summary("Overdue", "");
    }
}

fn push_save_warning<T>(human: &mut HumanOutput, outcome: &Outcome<T>) {
    if let Some(warning) = outcome.warning() {
        human.push_warning(warning);
    }
}

pub fn run_add(options: AddOptions, common: CommonOptions) -> Result<()> {
    let mut ctx = load_context(common.dir.clone())?;
    ctx.ensure_writable()?;

    let priority = match options.priority.as_deref() {
        Some(value) => value.parse::<Priority>()?,
        None => Priority::default(),
    };

    let mut human = HumanOutput::new("Task created");
    let due_date = match options.due.as_deref() {
        Some(raw) => {
            let parsed = parse_due_date(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                human.push_warning(format!("ignoring unrecognized due date '{}'", raw.trim()));
            }
            parsed
        }
        None => None,
    };

    let outcome = ctx.store.create(NewTask {
        title: options.title,
        description: options.description,
        priority,
        category: options.category,
        due_date,
    });
    push_save_warning(&mut human, &outcome);
    let task = outcome
        .value
        .ok_or_else(|| Error::InvalidArgument("title cannot be empty".to_string()))?;

    push_task_summary(&mut human, &task, ctx.today);
    for suggestion in &task.ai_suggestions {
        human.push_detail(suggestion.clone());
    }
    human.push_next_step(format!("smarttask start {}", task.id));

    emit_success(
        common.output(),
        "add",
        &TaskView::new(&task, ctx.today),
        Some(&human),
    )
}

pub fn run_list(options: ListOptions, common: CommonOptions) -> Result<()> {
    let ctx = load_context(common.dir.clone())?;
    let filter: StatusFilter = options.status.parse()?;
    let tasks = ctx.store.query_tasks(filter, &options.search);

    let output = TaskListOutput {
        status: filter.to_string(),
        search: &options.search,
        total: tasks.len(),
        tasks: tasks
            .iter()
            .map(|task| TaskView::new(task, ctx.today))
            .collect(),
    };

    let mut human = HumanOutput::new("Tasks");
    ctx.push_load_warning(&mut human);
    human.push_summary("Total", tasks.len().to_string());
    if filter != StatusFilter::All {
        human.push_summary("Status", filter.to_string());
    }
    if !options.search.is_empty() {
        human.push_summary("Search", options.search.clone());
    }
    for task in &tasks {
        human.push_detail(task_line(task, ctx.today));
    }
    if tasks.is_empty() {
        if options.search.is_empty() {
            human.push_next_step("smarttask add \"<title>\"");
        } else {
            human.push_next_step("try adjusting your search terms");
        }
    }

    emit_success(common.output(), "list", &output, Some(&human))
}

pub fn run_show(id: &str, common: CommonOptions) -> Result<()> {
    let ctx = load_context(common.dir.clone())?;
    let id = ctx.store.resolve_id(id)?;
    let task = ctx
        .store
        .get(&id)
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let mut human = HumanOutput::new("Task");
    ctx.push_load_warning(&mut human);
    push_task_summary(&mut human, task, ctx.today);
    human.push_summary("Created", task.created_at.to_rfc3339());
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }
    for suggestion in &task.ai_suggestions {
        human.push_detail(format!("suggestion: {suggestion}"));
    }

    emit_success(
        common.output(),
        "show",
        &TaskView::new(task, ctx.today),
        Some(&human),
    )
}

pub fn run_set_status(id: &str, status: &str, command: &str, common: CommonOptions) -> Result<()> {
    let mut ctx = load_context(common.dir.clone())?;
    ctx.ensure_writable()?;
    let status: TaskStatus = status.parse()?;
    let id = ctx.store.resolve_id(id)?;

    let outcome = ctx.store.update_status(&id, status);
    let mut human = HumanOutput::new("Task updated");
    push_save_warning(&mut human, &outcome);
    let task = outcome.value.ok_or_else(|| Error::TaskNotFound(id.clone()))?;
    push_task_summary(&mut human, &task, ctx.today);

    emit_success(
        common.output(),
        command,
        &TaskView::new(&task, ctx.today),
        Some(&human),
    )
}

pub fn run_rm(id: &str, common: CommonOptions) -> Result<()> {
    let mut ctx = load_context(common.dir.clone())?;
    ctx.ensure_writable()?;
    let id = ctx.store.resolve_id(id)?;

    let outcome = ctx.store.delete_task(&id);
    let mut human = HumanOutput::new("Task deleted");
    push_save_warning(&mut human, &outcome);
    let task = outcome.value.ok_or_else(|| Error::TaskNotFound(id.clone()))?;
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());

    emit_success(
        common.output(),
        "rm",
        &TaskView::new(&task, ctx.today),
        Some(&human),
    )
}

pub fn run_suggest(title: &str, description: &str, common: CommonOptions) -> Result<()> {
    let suggestions = crate::suggest::generate(title, description);

    let mut human = HumanOutput::new("Suggestions");
    for suggestion in &suggestions {
        human.push_detail(suggestion.clone());
    }

    emit_success(
        common.output(),
        "suggest",
        &SuggestOutput { title, suggestions },
        Some(&human),
    )
}

pub fn run_stats(common: CommonOptions) -> Result<()> {
    let ctx = load_context(common.dir.clone())?;
    let stats = ctx.store.stats(ctx.today);
    let output = StatsOutput {
        stats,
        completed_percent: stats.percent(stats.completed),
        in_progress_percent: stats.percent(stats.in_progress),
        todo_percent: stats.percent(stats.todo),
    };

    let mut human = HumanOutput::new("Progress");
    ctx.push_load_warning(&mut human);
    human.push_summary("Total", stats.total.to_string());
    human.push_summary(
        "Completed",
        format!("{} / {} ({}%)", stats.completed, stats.total, output.completed_percent),
    );
    human.push_summary(
        "In progress",
        format!("{} / {} ({}%)", stats.in_progress, stats.total, output.in_progress_percent),
    );
    human.push_summary(
        "Pending",
        format!("{} / {} ({}%)", stats.todo, stats.total, output.todo_percent),
    );
    if stats.overdue > 0 {
        human.push_warning(format!("{} overdue task(s)", stats.overdue));
    }

    emit_success(common.output(), "stats", &output, Some(&human))
}
