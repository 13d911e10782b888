//! Task store.
//!
//! The store owns the ordered task collection. Tasks are appended on
//! create, edited in place by status updates and removed by delete; the
//! order of the remaining tasks never changes.
//!
//! Every change is applied to the latest saved snapshot through
//! [`PersistenceAdapter::update_snapshot`] and the result becomes the
//! in-memory collection, so stores sharing one storage pick up each
//! other's tasks instead of overwriting them.
//!
//! Persistence faults are never fatal. They are logged, returned alongside
//! the result in an [`Outcome`], and the change is kept in memory. Until a
//! later save succeeds the in-memory collection is authoritative and is
//! written out whole.

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::id::{IdGenerator, UlidIdGenerator};
use crate::model::{NewTask, Task, TaskStatus};
use crate::persist::PersistenceAdapter;
use crate::query::{filter_tasks, StatusFilter, TaskStats};
use crate::suggest;

/// Result of a store call plus any persistence fault it hit.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    pub value: T,
    pub persist_error: Option<Error>,
}

impl<T> Outcome<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            persist_error: None,
        }
    }

    /// Warning for a failed save, if any.
    pub fn warning(&self) -> Option<String> {
        self.persist_error
            .as_ref()
            .map(|err| format!("changes are not saved: {err}"))
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

pub struct TaskStore<P, G = UlidIdGenerator> {
    tasks: Vec<Task>,
    persistence: P,
    ids: G,
    /// In-memory changes the last save did not persist.
    unsaved: bool,
}

impl<P: PersistenceAdapter> TaskStore<P, UlidIdGenerator> {
    /// Open with ULID task ids.
    pub fn open_default(persistence: P) -> Outcome<Self> {
        Self::open(persistence, UlidIdGenerator::new())
    }
}

impl<P: PersistenceAdapter, G: IdGenerator> TaskStore<P, G> {
    /// Load the saved snapshot once and take ownership of it.
    ///
    /// A load fault is reported in the outcome and the store starts empty.
    pub fn open(persistence: P, ids: G) -> Outcome<Self> {
        let (tasks, persist_error) = match persistence.load_snapshot() {
            Ok(tasks) => (tasks, None),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load saved tasks; starting empty");
                (Vec::new(), Some(err))
            }
        };
        Outcome {
            value: Self {
                tasks,
                persistence,
                ids,
                unsaved: false,
            },
            persist_error,
        }
    }

    /// Current snapshot, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Add a task. A blank title is declined: nothing changes, nothing is
    /// saved and the value is `None`.
    pub fn create(&mut self, input: NewTask) -> Outcome<Option<Task>> {
        if input.title.trim().is_empty() {
            tracing::debug!("declined task with blank title");
            return Outcome::clean(None);
        }

        let suggestions = suggest::generate(&input.title, &input.description);
        let created_at = Utc::now();
        self.commit(|tasks, ids| {
            let task = Task {
                id: fresh_id(tasks, ids),
                title: input.title.clone(),
                description: input.description.clone(),
                priority: input.priority,
                status: TaskStatus::Todo,
                category: input.category.clone(),
                due_date: input.due_date,
                ai_suggestions: suggestions.clone(),
                created_at,
            };
            tracing::debug!(id = %task.id, "created task");
            tasks.push(task.clone());
            Some(task)
        })
    }

    /// Set the status of task `id`. Unknown ids are ignored.
    pub fn update_status(&mut self, id: &str, status: TaskStatus) -> Outcome<Option<Task>> {
        self.commit(|tasks, _| {
            let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
                tracing::debug!(id, "status update for unknown task ignored");
                return None;
            };
            task.status = status;
            tracing::debug!(id, status = %status, "updated task status");
            Some(task.clone())
        })
    }

    /// Remove task `id`. Unknown ids are ignored.
    pub fn delete(&mut self, id: &str) -> Outcome<Option<Task>> {
        self.commit(|tasks, _| {
            let Some(index) = tasks.iter().position(|task| task.id == id) else {
                tracing::debug!(id, "delete for unknown task ignored");
                return None;
            };
            tracing::debug!(id, "deleted task");
            Some(tasks.remove(index))
        })
    }

    pub fn create_task(&mut self, input: NewTask) -> Outcome<Option<Task>> {
        self.create(input)
    }

    pub fn delete_task(&mut self, id: &str) -> Outcome<Option<Task>> {
        self.delete(id)
    }

    /// Visible tasks for a status filter and search term.
    pub fn query_tasks(&self, filter: StatusFilter, search: &str) -> Vec<&Task> {
        filter_tasks(&self.tasks, filter, search)
    }

    /// Suggestions a task with this title and description would get.
    pub fn suggestions_for(&self, title: &str, description: &str) -> Vec<String> {
        suggest::generate(title, description)
    }

    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        TaskStats::collect(&self.tasks, today)
    }

    /// Resolve a full id or a unique, case-insensitive id prefix.
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }

        if let Some(task) = self.get(trimmed) {
            return Ok(task.id.clone());
        }

        let needle = trimmed.to_lowercase();
        let mut exact: Vec<String> = Vec::new();
        let mut matches: Vec<String> = Vec::new();
        for task in &self.tasks {
            let id_norm = task.id.to_lowercase();
            if id_norm == needle {
                exact.push(task.id.clone());
            } else if id_norm.starts_with(&needle) {
                matches.push(task.id.clone());
            }
        }

        if exact.len() == 1 {
            return Ok(exact.remove(0));
        }
        if exact.len() > 1 {
            return Err(Error::AmbiguousTaskId {
                input: trimmed.to_string(),
                matches: exact,
            });
        }

        match matches.len() {
            0 => Err(Error::TaskNotFound(trimmed.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::AmbiguousTaskId {
                input: trimmed.to_string(),
                matches,
            }),
        }
    }

    /// Run `change` against the saved snapshot and adopt the result.
    ///
    /// `change` returns `None` when it changed nothing; nothing is saved
    /// then. On a persistence fault the change is applied to the in-memory
    /// collection instead, and it may run a second time to do so.
    fn commit<T>(
        &mut self,
        mut change: impl FnMut(&mut Vec<Task>, &mut G) -> Option<T>,
    ) -> Outcome<Option<T>> {
        let Self {
            tasks: memory,
            persistence,
            ids,
            unsaved,
        } = self;

        let mut value = None;
        let mut applied_in_memory = false;
        let result = persistence.update_snapshot(&mut |saved: &mut Vec<Task>| {
            if *unsaved {
                value = change(&mut *memory, &mut *ids);
                applied_in_memory = true;
                saved.clone_from(&*memory);
            } else {
                value = change(saved, &mut *ids);
            }
            value.is_some()
        });

        match result {
            Ok(saved) => {
                *memory = saved;
                if value.is_some() {
                    *unsaved = false;
                }
                Outcome::clean(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save tasks; keeping in-memory state");
                if !applied_in_memory {
                    value = change(memory, ids);
                }
                if value.is_some() {
                    *unsaved = true;
                }
                Outcome {
                    value,
                    persist_error: Some(err),
                }
            }
        }
    }
}

/// Draw ids until one is not taken by `tasks`.
fn fresh_id<G: IdGenerator>(tasks: &[Task], ids: &mut G) -> String {
    loop {
        let candidate = ids.next_id();
        if tasks.iter().all(|task| task.id != candidate) {
            return candidate;
        }
        tracing::debug!(id = %candidate, "generated id already in use; drawing another");
    }
}
