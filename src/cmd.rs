//! Command implementations for the CLI interface.
//!
//! Each handler drives the [`TaskStore`] and prints its result. Handlers
//! return errors instead of exiting so `main` decides how to report them.
//! A write that failed to reach storage is reported as an error here: on the
//! command line, persisting is the whole point of a mutating command.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::dates::{format_due_relative, resolve_due};
use crate::error::{PersistenceError, Result, TaskError};
use crate::fields::{Priority, PriorityFilter, SortKey, Status, StatusFilter};
use crate::storage::{decode, encode};
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::tui::run::run_tui;
use crate::view::{compute_statistics, dashboard_view, list_view};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "friday", "in Nd", ...
        #[arg(long)]
        due: Option<String>,
        /// Priority: high | medium | low.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Initial status; pending when omitted.
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// List tasks, optionally searched, filtered and sorted.
    List {
        /// Case-insensitive title search.
        #[arg(long, default_value = "")]
        search: String,
        /// Sort order.
        #[arg(long, value_enum, default_value_t = SortKey::DueDateAsc)]
        sort: SortKey,
        /// Filter by status.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Filter by priority.
        #[arg(long, value_enum, default_value_t = PriorityFilter::All)]
        priority: PriorityFilter,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show total, completed and pending counts.
    Stats {
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        #[arg(long, value_enum, default_value_t = PriorityFilter::All)]
        priority: PriorityFilter,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// View a single task.
    View {
        id: String,
    },

    /// Update fields on a task.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Mark a task completed.
    Complete {
        id: String,
    },

    /// Mark a task pending again.
    Reopen {
        id: String,
    },

    /// Flip a task between pending and completed.
    Toggle {
        id: String,
    },

    /// Delete a task. Deleting an unknown id does nothing.
    Delete {
        id: String,
    },

    /// Write all tasks as JSON to a file or stdout.
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replace all tasks with the contents of a JSON export.
    Import {
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    Completions {
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(store: &mut TaskStore) -> Result<()> {
    Ok(run_tui(store)?)
}

/// Add a new task.
pub fn cmd_add(
    store: &mut TaskStore,
    title: String,
    desc: Option<String>,
    due: Option<String>,
    priority: Priority,
    status: Option<Status>,
) -> Result<()> {
    let mut draft = TaskDraft::new(title)
        .description(desc.unwrap_or_default())
        .priority(priority);
    if let Some(due) = due {
        draft = draft.due_date(resolve_due(&due)?);
    }
    draft.status = status;

    let task = store.add(draft)?;
    finish(store)?;
    println!("Added task {}", task.id);
    Ok(())
}

/// List tasks through the task-list view (search then sort), after the
/// dashboard filters.
pub fn cmd_list(
    store: &TaskStore,
    search: &str,
    sort: SortKey,
    status: StatusFilter,
    priority: PriorityFilter,
    limit: Option<usize>,
) {
    let filtered = dashboard_view(store.tasks(), status, priority);
    let mut rows = list_view(filtered, search, sort);
    if let Some(n) = limit {
        rows.truncate(n);
    }
    if rows.is_empty() {
        println!("No tasks found.");
        return;
    }
    print!("{}", render_table(&rows, Local::now().date_naive()));
}

/// Print statistics over the dashboard-filtered tasks.
pub fn cmd_stats(store: &TaskStore, status: StatusFilter, priority: PriorityFilter, json: bool) -> Result<()> {
    let stats = compute_statistics(dashboard_view(store.tasks(), status, priority));
    if json {
        let text = serde_json::to_string_pretty(&stats).map_err(PersistenceError::from)?;
        println!("{text}");
    } else {
        println!("Total Tasks:     {}", stats.total);
        println!("Completed Tasks: {}", stats.completed);
        println!("Pending Tasks:   {}", stats.pending);
        println!("Done:            {}%", stats.completion_percent());
    }
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_view(store: &TaskStore, id: &str) -> Result<()> {
    let task = store.get(id).ok_or_else(|| TaskError::NotFound(id.to_string()))?;
    let today = Local::now().date_naive();
    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!("Status:      {}", format_status(task.status));
    println!("Priority:    {}", task.priority);
    match task.due() {
        Some(d) => println!("Due:         {} ({})", d, format_due_relative(Some(d), today)),
        None if task.due_date.is_empty() => println!("Due:         -"),
        None => println!("Due:         {} (unrecognised date)", task.due_date),
    }
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
    }
    Ok(())
}

/// Update fields on a task. Unspecified fields keep their current values.
pub fn cmd_update(
    store: &mut TaskStore,
    id: &str,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<Priority>,
    status: Option<Status>,
) -> Result<()> {
    let mut task = store
        .get(id)
        .cloned()
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
    apply_changes(&mut task, title, desc, due, clear_due, priority, status)?;
    store.update(task)?;
    finish(store)?;
    println!("Updated {id}");
    Ok(())
}

fn apply_changes(
    task: &mut Task,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<Priority>,
    status: Option<Status>,
) -> Result<()> {
    if let Some(title) = title {
        task.title = title;
    }
    if let Some(desc) = desc {
        task.description = desc;
    }
    if clear_due {
        task.due_date.clear();
    } else if let Some(due) = due {
        task.due_date = resolve_due(&due)?;
    }
    if let Some(priority) = priority {
        task.priority = priority;
    }
    if let Some(status) = status {
        task.status = status;
    }
    Ok(())
}

/// Set the status of a task.
pub fn cmd_set_status(store: &mut TaskStore, id: &str, status: Status) -> Result<()> {
    store.set_status(id, status)?;
    finish(store)?;
    match status {
        Status::Completed => println!("Marked {id} completed."),
        Status::Pending => println!("Reopened {id}"),
    }
    Ok(())
}

/// Flip a task between pending and completed.
pub fn cmd_toggle(store: &mut TaskStore, id: &str) -> Result<()> {
    let task = store.toggle_status(id)?;
    finish(store)?;
    println!("{} is now {}", task.id, task.status);
    Ok(())
}

/// Delete a task; an unknown id is reported but not an error.
pub fn cmd_delete(store: &mut TaskStore, id: &str) -> Result<()> {
    let removed = store.remove(id);
    finish(store)?;
    if removed {
        println!("Deleted.");
    } else {
        println!("No task with id {id}; nothing to delete.");
    }
    Ok(())
}

/// Export all tasks as JSON.
pub fn cmd_export(store: &TaskStore, output: Option<PathBuf>) -> Result<()> {
    let data = encode(store.tasks())?;
    match output {
        Some(path) => {
            fs::write(&path, data)?;
            println!("Exported {} task(s) to {}", store.len(), path.display());
        }
        None => println!("{data}"),
    }
    Ok(())
}

/// Replace the collection with a JSON export.
pub fn cmd_import(store: &mut TaskStore, input: PathBuf) -> Result<()> {
    let text = fs::read_to_string(&input)?;
    let tasks = decode(&text)?;
    let count = tasks.len();
    store.replace(tasks)?;
    finish(store)?;
    println!("Imported {count} task(s) from {}", input.display());
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

/// Surface a write that did not reach storage.
fn finish(store: &mut TaskStore) -> Result<()> {
    match store.take_persistence_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

pub fn format_status(status: Status) -> &'static str {
    match status {
        Status::Pending => "Pending",
        Status::Completed => "Completed",
    }
}

/// Render tasks as a fixed-width table.
pub fn render_table(tasks: &[&Task], today: NaiveDate) -> String {
    let mut out = format!(
        "{:<14} {:<10} {:<8} {:<11} {}\n",
        "ID", "Status", "Priority", "Due", "Title"
    );
    for t in tasks {
        let due = if t.due_date.is_empty() || t.due().is_some() {
            format_due_relative(t.due(), today)
        } else {
            truncate(&t.due_date, 11)
        };
        out.push_str(&format!(
            "{:<14} {:<10} {:<8} {:<11} {}\n",
            t.id,
            format_status(t.status),
            t.priority.as_str(),
            due,
            t.title
        ));
    }
    out
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
