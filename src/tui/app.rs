//! Main application logic for the terminal user interface.
//!
//! `App` borrows the task store for the whole session. Every view it draws
//! is derived from the store on each frame, so nothing shown can drift from
//! the canonical collection. Mutations go through the store and any write
//! failure it reports is surfaced in the status bar.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use tracing::{debug, warn};

use crate::cmd::format_status;
use crate::dates::format_due_relative;
use crate::fields::{PriorityFilter, SortKey, StatusFilter};
use crate::store::TaskStore;
use crate::task::Task;
use crate::tui::{
    colors::{priority_color, status_color, AMBER, INK, MINT, ROSE, SLATE},
    enums::{cycle, AppState, InputMode, Tab},
    input::InputField,
    task_form::{TaskForm, COMPLETED_FIELD, DESCRIPTION_FIELD, DUE_FIELD, PRIORITY_FIELD, TITLE_FIELD},
    utils::{centered_rect, cursor_column},
};
use crate::view::{compute_statistics, dashboard_view, list_view, ViewParams};

pub struct App<'a> {
    store: &'a mut TaskStore,
    pub state: AppState,
    pub tab: Tab,
    pub params: ViewParams,
    pub input_mode: InputMode,
    pub search: InputField,
    pub task_form: TaskForm,
    pub status_message: String,
    editing: Option<String>,
    pending_delete: Option<String>,
    unsaved: bool,
    table_state: TableState,
}

impl<'a> App<'a> {
    pub fn new(store: &'a mut TaskStore) -> Self {
        let mut table_state = TableState::default();
        if !store.is_empty() {
            table_state.select(Some(0));
        }
        Self {
            store,
            state: AppState::Browse,
            tab: Tab::Dashboard,
            params: ViewParams::default(),
            input_mode: InputMode::None,
            search: InputField::new(),
            task_form: TaskForm::new(),
            status_message: String::new(),
            editing: None,
            pending_delete: None,
            unsaved: false,
            table_state,
        }
    }

    /// Tasks shown by the current tab, in display order.
    fn visible(&self) -> Vec<&Task> {
        let tasks = self.store.tasks();
        match self.tab {
            Tab::Dashboard => dashboard_view(tasks, self.params.status, self.params.priority),
            Tab::Tasks => list_view(tasks, &self.params.search, self.params.sort),
        }
    }

    fn selected_id(&self) -> Option<String> {
        let idx = self.table_state.selected()?;
        self.visible().get(idx).map(|t| t.id.clone())
    }

    fn select_id(&mut self, id: &str) {
        let pos = self.visible().iter().position(|t| t.id == id);
        if pos.is_some() {
            self.table_state.select(pos);
        } else {
            self.clamp_selection();
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.visible().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if down => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Pick up the outcome of the last write the store attempted.
    fn check_persistence(&mut self) {
        match self.store.take_persistence_error() {
            Some(e) => {
                warn!(error = %e, "change kept in memory only");
                self.unsaved = true;
                self.set_status_message(format!("Not saved: {e}"));
            }
            None => self.unsaved = false,
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.table_state.select(Some(0));
            self.clamp_selection();
        }
    }

    /// Dispatch one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        self.status_message.clear();
        match self.state {
            AppState::Browse => self.handle_browse_input(key, modifiers),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key, modifiers),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Help => self.handle_help_input(key),
        }
    }

    fn handle_browse_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        if self.input_mode == InputMode::Search {
            self.handle_search_input(key);
            return Ok(false);
        }

        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            return Ok(true);
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab => self.switch_tab(self.tab.next()),
            KeyCode::Char('1') => self.switch_tab(Tab::Dashboard),
            KeyCode::Char('2') => self.switch_tab(Tab::Tasks),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Char('s') => {
                self.switch_tab(Tab::Dashboard);
                self.params.status = cycle(&StatusFilter::ALL, self.params.status, true);
                self.clamp_selection();
            }
            KeyCode::Char('p') => {
                self.switch_tab(Tab::Dashboard);
                self.params.priority = cycle(&PriorityFilter::ALL, self.params.priority, true);
                self.clamp_selection();
            }
            KeyCode::Char('o') => {
                self.switch_tab(Tab::Tasks);
                self.params.sort = cycle(&SortKey::ALL, self.params.sort, true);
                self.clamp_selection();
            }
            KeyCode::Char('/') => {
                self.switch_tab(Tab::Tasks);
                self.input_mode = InputMode::Search;
                self.search.active = true;
            }
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new();
                self.editing = None;
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') | KeyCode::Enter => self.open_selected_for_edit(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.pending_delete = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('x') | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        Ok(false)
    }

    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.search.clear();
                self.input_mode = InputMode::None;
                self.search.active = false;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::None;
                self.search.active = false;
            }
            KeyCode::Char(c) => self.search.handle_char(c),
            KeyCode::Backspace => self.search.handle_backspace(),
            KeyCode::Delete => self.search.handle_delete(),
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            _ => return,
        }
        self.params.search = self.search.value.clone();
        self.clamp_selection();
    }

    fn open_selected_for_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Some(task) = self.store.get(&id) {
            self.task_form = TaskForm::from_task(task);
            self.editing = Some(id);
            self.state = AppState::EditTask;
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.toggle_status(&id) {
            Ok(task) => {
                self.set_status_message(format!("'{}' is now {}", task.title, task.status));
                self.check_persistence();
                self.select_id(&id);
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn handle_form_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.state = AppState::Browse;
                self.editing = None;
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => {
                if !self.task_form.cycle_selector(false) {
                    if let Some(input) = self.task_form.current_input() {
                        input.move_cursor_left();
                    }
                }
            }
            KeyCode::Right => {
                if !self.task_form.cycle_selector(true) {
                    if let Some(input) = self.task_form.current_input() {
                        input.move_cursor_right();
                    }
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.task_form.current_input() {
                    input.handle_char(c);
                } else if c == ' ' {
                    self.task_form.cycle_selector(true);
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.task_form.current_input() {
                    input.handle_backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(input) = self.task_form.current_input() {
                    input.handle_delete();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Validate the form and hand it to the store. The form stays open on
    /// a validation failure.
    fn submit_form(&mut self) {
        let result = match self.editing.clone() {
            None => self
                .task_form
                .to_draft()
                .and_then(|draft| self.store.add(draft)),
            Some(id) => {
                let Some(mut task) = self.store.get(&id).cloned() else {
                    self.set_status_message(format!("Task {id} no longer exists"));
                    self.state = AppState::Browse;
                    self.editing = None;
                    return;
                };
                self.task_form
                    .apply_to(&mut task)
                    .and_then(|_| self.store.update(task))
            }
        };

        match result {
            Ok(task) => {
                let verb = if self.editing.is_some() { "Updated" } else { "Added" };
                debug!(task_id = %task.id, "form submitted");
                self.set_status_message(format!("{verb} '{}'", task.title));
                self.check_persistence();
                self.state = AppState::Browse;
                self.editing = None;
                self.select_id(&task.id);
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.pending_delete.take() {
                    if self.store.remove(&id) {
                        self.set_status_message("Task deleted".into());
                    }
                    self.check_persistence();
                    self.clamp_selection();
                }
                self.state = AppState::Browse;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::Browse;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_help_input(&mut self, key: KeyCode) -> io::Result<bool> {
        if matches!(
            key,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')
        ) {
            self.state = AppState::Browse;
        }
        Ok(false)
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL).title("Taskboard"))
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(ROSE).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_dashboard(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filters
                Constraint::Length(3), // Counts
                Constraint::Length(3), // Gauge
                Constraint::Min(0),    // Table
            ])
            .split(area);

        let filters = Paragraph::new(Line::from(vec![
            Span::raw("Status: "),
            Span::styled(
                format!("< {} >", self.params.status.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   Priority: "),
            Span::styled(
                format!("< {} >", self.params.priority.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("   (s / p to change)", Style::default().fg(Color::DarkGray)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Filters"));
        f.render_widget(filters, chunks[0]);

        let stats = compute_statistics(self.visible());

        let boxes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(chunks[1]);
        let counts = [
            ("Total Tasks", stats.total, Color::White),
            ("Completed", stats.completed, MINT),
            ("Pending", stats.pending, ROSE),
        ];
        for ((label, value, color), area) in counts.into_iter().zip(boxes.iter()) {
            let card = Paragraph::new(Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(label));
            f.render_widget(card, *area);
        }

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(MINT).bg(SLATE))
            .percent(stats.completion_percent())
            .label(format!(
                "{}% complete ({}/{})",
                stats.completion_percent(),
                stats.completed,
                stats.total
            ));
        f.render_widget(gauge, chunks[2]);

        let title = format!("Filtered Tasks ({})", stats.total);
        self.render_task_table(f, chunks[3], title, false);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[0]);

        let search_style = if self.input_mode == InputMode::Search {
            Style::default().fg(ROSE)
        } else {
            Style::default()
        };
        let search = Paragraph::new(self.search.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search title (/)")
                .border_style(search_style),
        );
        f.render_widget(search, top[0]);
        if self.input_mode == InputMode::Search {
            f.set_cursor_position((cursor_column(top[0], self.search.cursor), top[0].y + 1));
        }

        let sort = Paragraph::new(format!("< {} >", self.params.sort.label()))
            .block(Block::default().borders(Borders::ALL).title("Sort (o)"));
        f.render_widget(sort, top[1]);

        let title = format!(
            "Tasks ({}/{})",
            self.visible().len(),
            self.store.len()
        );
        self.render_task_table(f, chunks[1], title, true);
    }

    fn render_task_table(&mut self, f: &mut Frame, area: Rect, title: String, with_description: bool) {
        let today = Local::now().date_naive();

        let mut headers = vec!["Title"];
        if with_description {
            headers.push("Description");
        }
        headers.extend(["Due", "Priority", "Status"]);
        let header = Row::new(
            headers
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(SLATE).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = self
            .visible()
            .into_iter()
            .map(|task| {
                let mut cells = vec![Cell::from(task.title.clone())];
                if with_description {
                    cells.push(Cell::from(task.description.clone()));
                }
                let due = if task.due_date.is_empty() || task.due().is_some() {
                    format_due_relative(task.due(), today)
                } else {
                    task.due_date.clone()
                };
                cells.push(Cell::from(due));
                cells.push(Cell::from(Span::styled(
                    format!(" {} ", task.priority),
                    Style::default().bg(priority_color(task.priority)).fg(INK),
                )));
                cells.push(Cell::from(Span::styled(
                    format!(" {} ", format_status(task.status)),
                    Style::default().bg(status_color(task.status)).fg(INK),
                )));

                let style = if task.is_completed() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(cells).style(style)
            })
            .collect();

        let mut widths = vec![Constraint::Min(20)];
        if with_description {
            widths.push(Constraint::Min(20));
        }
        widths.extend([
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(12),
        ]);

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let editing = self.state == AppState::EditTask;
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(if editing { "Edit Task" } else { "Add Task" })
            .style(Style::default().bg(SLATE).fg(Color::White));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Due date
                Constraint::Length(3), // Priority
                Constraint::Length(if editing { 3 } else { 0 }), // Completed
                Constraint::Min(1),    // Hints
            ])
            .split(inner);

        let form = &self.task_form;
        let border = |field: usize| {
            if form.current_field == field {
                Style::default().fg(AMBER)
            } else {
                Style::default()
            }
        };

        let text_fields = [
            (TITLE_FIELD, "Title *", &form.title),
            (DESCRIPTION_FIELD, "Description", &form.description),
            (DUE_FIELD, "Due date (YYYY-MM-DD, tomorrow, in 3d...)", &form.due),
        ];
        for (field, label, input) in text_fields {
            let widget = Paragraph::new(input.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(border(field)),
            );
            f.render_widget(widget, chunks[field]);
            if form.current_field == field {
                let cursor_x = cursor_column(chunks[field], input.cursor);
                f.set_cursor_position((cursor_x, chunks[field].y + 1));
            }
        }

        let priority = form.priority();
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("< "),
            Span::styled(
                priority.as_str(),
                Style::default().fg(priority_color(priority)).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" >"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(border(PRIORITY_FIELD)),
        );
        f.render_widget(selector, chunks[PRIORITY_FIELD]);

        if editing {
            let mark = if form.completed { "[x] Completed" } else { "[ ] Completed" };
            let checkbox = Paragraph::new(mark).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Status")
                    .border_style(border(COMPLETED_FIELD)),
            );
            f.render_widget(checkbox, chunks[COMPLETED_FIELD]);
        }

        let hints = Paragraph::new(vec![
            Line::from("Tab/Up/Down: move   Left/Right/Space: change selection"),
            Line::from("Enter: save   Esc: cancel"),
        ])
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
        f.render_widget(hints, chunks[5]);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);

        let bindings = [
            ("Tab / 1 / 2", "switch between Dashboard and Tasks"),
            ("Up / Down, j / k", "move selection"),
            ("a", "add a task"),
            ("e / Enter", "edit the selected task"),
            ("x / Space", "toggle completed"),
            ("d / Del", "delete the selected task"),
            ("s", "cycle the status filter"),
            ("p", "cycle the priority filter"),
            ("/", "search task titles"),
            ("o", "cycle the sort order"),
            ("h / ?", "show this help"),
            ("q / Esc", "quit"),
        ];
        let mut text = vec![Line::from("")];
        text.extend(bindings.iter().map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:>18}  "), Style::default().fg(AMBER)),
                Span::raw(*action),
            ])
        }));

        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().bg(SLATE).fg(Color::White));
        f.render_widget(help, area);
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(ROSE).fg(Color::White));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let title = self
            .pending_delete
            .as_deref()
            .and_then(|id| self.store.get(id))
            .map(|t| t.title.as_str())
            .unwrap_or("");
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(title),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.input_mode == InputMode::Search {
            format!("Search: {} (Enter to keep, Esc to clear)", self.search.value)
        } else {
            match self.state {
                AppState::Browse => format!(
                    "{}: {} shown, {} total | Press 'h' for help",
                    self.tab.title(),
                    self.visible().len(),
                    self.store.len()
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
            }
        };

        let mut spans = vec![Span::raw(text)];
        if self.unsaved {
            spans.push(Span::styled(
                "  [changes not saved]",
                Style::default().fg(ROSE).add_modifier(Modifier::BOLD),
            ));
        }
        let status = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(SLATE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_tabs(f, chunks[0]);
        match self.tab {
            Tab::Dashboard => self.render_dashboard(f, chunks[1]),
            Tab::Tasks => self.render_task_list(f, chunks[1]),
        }
        match self.state {
            AppState::Browse => {}
            AppState::AddTask | AppState::EditTask => self.render_task_form(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Confirm => self.render_confirm(f, chunks[1]),
        }
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop: draw, then handle one key, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code, key.modifiers)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Status};
    use crate::storage::MemoryStorage;
    use crate::task::TaskDraft;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn seeded() -> TaskStore {
        let mut store = TaskStore::initialize(MemoryStorage::new());
        store
            .add(TaskDraft::new("Task A").due_date("2024-01-10").priority(Priority::Low))
            .unwrap();
        store
            .add(
                TaskDraft::new("Task B")
                    .due_date("2024-01-05")
                    .priority(Priority::High)
                    .status(Status::Completed),
            )
            .unwrap();
        store
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 36)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn add_through_the_form() {
        let mut store = TaskStore::initialize(MemoryStorage::new());
        let mut app = App::new(&mut store);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::AddTask);
        type_text(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Browse);
        assert!(!app.unsaved);

        let task = &store.tasks()[0];
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::Pending);
    }

    #[test]
    fn blank_title_keeps_form_open() {
        let mut store = TaskStore::initialize(MemoryStorage::new());
        let mut app = App::new(&mut store);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddTask);
        assert!(app.status_message.contains("title"));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Browse);
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_and_delete_selected() {
        let mut store = seeded();
        let mut app = App::new(&mut store);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.store.tasks()[0].status, Status::Completed);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.len(), 2);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.state, AppState::Browse);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "Task B");
    }

    #[test]
    fn edit_marks_completed() {
        let mut store = seeded();
        let mut app = App::new(&mut store);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::EditTask);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        let task = &store.tasks()[0];
        assert_eq!(task.title, "Task A");
        assert_eq!(task.status, Status::Completed);
    }

    #[test]
    fn filters_and_search_follow_keys() {
        let mut store = seeded();
        let mut app = App::new(&mut store);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.params.status, StatusFilter::Pending);
        assert_eq!(app.visible().len(), 1);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.tab, Tab::Tasks);
        type_text(&mut app, "b");
        press(&mut app, KeyCode::Enter);
        let titles: Vec<&str> = app.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Task B"]);

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.params.search, "");
        let titles: Vec<&str> = app.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Task B", "Task A"]);
    }

    #[test]
    fn lost_write_shows_in_status_bar() {
        let mut store = TaskStore::initialize(MemoryStorage::with_quota(8));
        let mut app = App::new(&mut store);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Too big to store");
        press(&mut app, KeyCode::Enter);
        assert!(app.unsaved);
        assert!(app.status_message.starts_with("Not saved"));
        assert!(screen(&mut app).contains("changes not saved"));
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn dashboard_renders_statistics() {
        let mut store = seeded();
        let mut app = App::new(&mut store);
        let text = screen(&mut app);
        assert!(text.contains("Dashboard"));
        assert!(text.contains("Total Tasks"));
        assert!(text.contains("50% complete (1/2)"));
        assert!(text.contains("Task A"));

        press(&mut app, KeyCode::Char('?'));
        assert!(screen(&mut app).contains("cycle the sort order"));
        press(&mut app, KeyCode::Esc);
        assert!(!press(&mut app, KeyCode::Tab));
        assert!(screen(&mut app).contains("Due Date"));
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
