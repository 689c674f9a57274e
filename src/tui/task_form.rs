//! Task form handling for the terminal user interface.
//!
//! The same form serves creation and editing. The completed toggle is only
//! offered while editing; new tasks always start pending.

use crate::dates::resolve_due;
use crate::error::{Result, TaskError};
use crate::fields::{Priority, Status};
use crate::task::{is_valid_title, Task, TaskDraft};
use crate::tui::input::InputField;

/// Field order constants for the form, top to bottom.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const DUE_FIELD: usize = 2;
pub const PRIORITY_FIELD: usize = 3;
pub const COMPLETED_FIELD: usize = 4;

/// Task form for editing fields
#[derive(Clone, Debug)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub priority: usize,
    pub completed: bool,
    pub editing: bool,
    pub current_field: usize,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// An empty form for a new task, Medium priority selected.
    pub fn new() -> Self {
        let mut form = Self {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            priority: priority_index(Priority::default()),
            completed: false,
            editing: false,
            current_field: TITLE_FIELD,
        };
        form.sync_active();
        form
    }

    /// A form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self {
            title: InputField::with_value(&task.title),
            description: InputField::with_value(&task.description),
            due: InputField::with_value(&task.due_date),
            priority: priority_index(task.priority),
            completed: task.is_completed(),
            editing: true,
            current_field: TITLE_FIELD,
        };
        form.sync_active();
        form
    }

    pub fn field_count(&self) -> usize {
        if self.editing {
            COMPLETED_FIELD + 1
        } else {
            PRIORITY_FIELD + 1
        }
    }

    pub fn priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
        self.sync_active();
    }

    pub fn prev_field(&mut self) {
        let count = self.field_count();
        self.current_field = (self.current_field + count - 1) % count;
        self.sync_active();
    }

    /// The text input under focus, if the focused field is a text field.
    pub fn current_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            DUE_FIELD => Some(&mut self.due),
            _ => None,
        }
    }

    /// Cycle or toggle a selector field. Returns false on text fields.
    pub fn cycle_selector(&mut self, forward: bool) -> bool {
        match self.current_field {
            PRIORITY_FIELD => {
                let len = Priority::ALL.len();
                self.priority = if forward {
                    (self.priority + 1) % len
                } else {
                    (self.priority + len - 1) % len
                };
                true
            }
            COMPLETED_FIELD if self.editing => {
                self.completed = !self.completed;
                true
            }
            _ => false,
        }
    }

    /// Build a draft for a new task. Fails on a blank title or an
    /// unrecognised due date.
    pub fn to_draft(&self) -> Result<TaskDraft> {
        let title = self.checked_title()?;
        let due_date = resolve_due(&self.due.value)?;
        Ok(TaskDraft::new(title)
            .description(self.description.value.trim())
            .due_date(due_date)
            .priority(self.priority()))
    }

    /// Copy the form onto an existing task, keeping its id.
    pub fn apply_to(&self, task: &mut Task) -> Result<()> {
        let title = self.checked_title()?;
        let due_date = resolve_due(&self.due.value)?;
        task.title = title;
        task.description = self.description.value.trim().to_string();
        task.due_date = due_date;
        task.priority = self.priority();
        task.status = if self.completed {
            Status::Completed
        } else {
            Status::Pending
        };
        Ok(())
    }

    fn checked_title(&self) -> Result<String> {
        if !is_valid_title(&self.title.value) {
            return Err(TaskError::Validation("title is required".into()));
        }
        Ok(self.title.value.trim().to_string())
    }

    fn sync_active(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
        self.due.active = self.current_field == DUE_FIELD;
    }
}

fn priority_index(priority: Priority) -> usize {
    Priority::ALL
        .iter()
        .position(|p| *p == priority)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(field: &mut InputField, text: &str) {
        for c in text.chars() {
            field.handle_char(c);
        }
    }

    #[test]
    fn new_form_builds_pending_medium_draft() {
        let mut form = TaskForm::new();
        type_into(&mut form.title, "  Write report ");
        type_into(&mut form.due, "2024-03-01");
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.title, "Write report");
        assert_eq!(draft.due_date, "2024-03-01");
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.status, None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut form = TaskForm::new();
        type_into(&mut form.title, "   ");
        assert!(matches!(form.to_draft(), Err(TaskError::Validation(_))));
    }

    #[test]
    fn bad_due_date_is_rejected() {
        let mut form = TaskForm::new();
        type_into(&mut form.title, "A");
        type_into(&mut form.due, "someday");
        assert!(matches!(form.to_draft(), Err(TaskError::Validation(_))));
    }

    #[test]
    fn out_of_range_due_offset_is_rejected() {
        let mut form = TaskForm::new();
        type_into(&mut form.title, "A");
        type_into(&mut form.due, "in 100000000d");
        assert!(matches!(form.to_draft(), Err(TaskError::Validation(_))));
    }

    #[test]
    fn completed_toggle_only_when_editing() {
        let mut form = TaskForm::new();
        assert_eq!(form.field_count(), 4);
        form.current_field = COMPLETED_FIELD;
        assert!(!form.cycle_selector(true));

        let task = Task::from_draft("7".into(), TaskDraft::new("Edit me"));
        let mut form = TaskForm::from_task(&task);
        assert_eq!(form.field_count(), 5);
        form.prev_field();
        assert_eq!(form.current_field, COMPLETED_FIELD);
        assert!(form.cycle_selector(true));

        let mut edited = task.clone();
        form.apply_to(&mut edited).unwrap();
        assert_eq!(edited.id, "7");
        assert_eq!(edited.status, Status::Completed);
    }

    #[test]
    fn priority_selector_wraps() {
        let mut form = TaskForm::new();
        form.current_field = PRIORITY_FIELD;
        assert!(form.cycle_selector(true));
        assert_eq!(form.priority(), Priority::Low);
        assert!(form.cycle_selector(true));
        assert_eq!(form.priority(), Priority::High);
        assert!(form.cycle_selector(false));
        assert_eq!(form.priority(), Priority::Low);
    }
}
