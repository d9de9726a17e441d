//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which holds the UI-only state (focus, table
//! selection, form input, status line), runs a render pass for every key press, and
//! draws the latest `View`: the add-task sidebar, the task table, the category pie
//! chart, and the footer.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};

use crate::chart::pie_points;
use crate::db::{format_completed, format_due, format_due_relative, truncate};
use crate::task::Task;
use crate::tui::{
    colors::{pie_color, DARK_RED, GOLD, SIDEBAR_GREY},
    enums::AppState,
    task_form::{TaskForm, DESCRIPTION_FIELD, DUE_FIELD, SUBMIT_BUTTON},
    utils::{centered_rect, circle_bounds, input_scroll},
};
use crate::view::{render_pass, Action, Notice, View};

const UNAVAILABLE_MESSAGE: &str = "Error: Unable to create database connection.";
const READ_ERROR_MESSAGE: &str = "Error: Unable to read tasks.";
const EMPTY_TASKS_MESSAGE: &str = "No tasks available. Add some tasks to get started!";
const EMPTY_CHART_MESSAGE: &str = "No tasks available. Add some tasks to see the categories!";
const SIDEBAR_WIDTH: u16 = 38;
const PIE_STEP: f64 = 0.02;

/// What a key press asks the event loop to do next.
enum Outcome {
    Quit,
    Continue(Action),
}

/// Main application state for the terminal user interface.
///
/// Task data is never kept between interactions: every key press runs a fresh
/// render pass against the database and replaces `view`.
pub struct App {
    state: AppState,
    db_path: PathBuf,
    view: View,
    task_list_state: TableState,
    task_form: TaskForm,
    status_message: String,
    status_is_error: bool,
}

impl App {
    /// Create a new App and run the first render pass against `db_path`.
    pub fn new(db_path: &Path) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            db_path: db_path.to_path_buf(),
            view: View::default(),
            task_list_state: TableState::default(),
            task_form: TaskForm::new(),
            status_message: String::new(),
            status_is_error: false,
        };
        app.refresh(Action::None);
        app
    }

    /// Run a render pass and fold its outcome into the UI state.
    fn refresh(&mut self, action: Action) {
        self.view = render_pass(&self.db_path, action);
        if let Some(notice) = self.view.notice.clone() {
            if let Notice::Added(_) = notice {
                self.task_form.reset_description();
            }
            self.set_status_message(notice.to_string(), notice.is_error());
        }
        self.clamp_selection();
    }

    /// Keep the table selection on an existing row after the task list changed.
    fn clamp_selection(&mut self) {
        let len = self.view.tasks.len();
        let selected = match self.task_list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.task_list_state.select(selected);
    }

    fn selected_task(&self) -> Option<&Task> {
        self.task_list_state
            .selected()
            .and_then(|i| self.view.tasks.get(i))
    }

    fn set_status_message(&mut self, msg: String, is_error: bool) {
        self.status_message = msg;
        self.status_is_error = is_error;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
        self.status_is_error = false;
    }

    /// Handle a single key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.clear_status_message();

        let outcome = if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            Outcome::Quit
        } else {
            match self.state {
                AppState::TaskList => self.handle_task_list_input(key),
                AppState::AddTask => self.handle_form_input(key),
                AppState::Help => self.handle_help_input(key),
                AppState::Confirm(id) => self.handle_confirm_input(key, id),
            }
        };

        match outcome {
            Outcome::Quit => true,
            Outcome::Continue(action) => {
                self.refresh(action);
                false
            }
        }
    }

    /// Handle keyboard input when the task table has focus.
    fn handle_task_list_input(&mut self, key: KeyCode) -> Outcome {
        let action = match key {
            KeyCode::Esc | KeyCode::Char('q') => return Outcome::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.task_list_state.selected() {
                    self.task_list_state.select(Some(selected.saturating_sub(1)));
                }
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.view.tasks.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                }
                Action::None
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('x') => {
                match self.selected_task().map(|t| (t.id, t.completed)) {
                    Some((id, true)) => Action::Reopen(id),
                    Some((id, false)) => Action::Complete(id),
                    None => {
                        self.set_status_message("No task selected".to_string(), false);
                        Action::None
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                match self.selected_task().map(|t| (t.id, t.completed)) {
                    Some((id, true)) => self.state = AppState::Confirm(id),
                    Some(_) => self.set_status_message(
                        "Only completed tasks can be deleted. Press space to complete it first."
                            .to_string(),
                        false,
                    ),
                    None => self.set_status_message("No task selected".to_string(), false),
                }
                Action::None
            }
            KeyCode::Char('a') | KeyCode::Tab => {
                self.task_form.roll_prefill();
                self.state = AppState::AddTask;
                Action::None
            }
            KeyCode::Char('h') | KeyCode::Char('?') => {
                self.state = AppState::Help;
                Action::None
            }
            _ => Action::None,
        };
        Outcome::Continue(action)
    }

    /// Handle keyboard input when the add-task sidebar has focus.
    fn handle_form_input(&mut self, key: KeyCode) -> Outcome {
        match key {
            KeyCode::Esc => self.state = AppState::TaskList,
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Home => {
                if let Some(field) = self.task_form.active_field_mut() {
                    field.move_home();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.task_form.active_field_mut() {
                    field.move_end();
                }
            }
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => match self.task_form.to_action() {
                Ok(action) => return Outcome::Continue(action),
                Err(e) => self.set_status_message(format!("Error: {e}"), true),
            },
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
        Outcome::Continue(Action::None)
    }

    /// Handle keyboard input in the delete confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode, id: i64) -> Outcome {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.state = AppState::TaskList;
                Outcome::Continue(Action::Delete(id))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::TaskList;
                Outcome::Continue(Action::None)
            }
            _ => Outcome::Continue(Action::None),
        }
    }

    fn handle_help_input(&mut self, key: KeyCode) -> Outcome {
        if matches!(
            key,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')
        ) {
            self.state = AppState::TaskList;
        }
        Outcome::Continue(Action::None)
    }

    fn focus_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled("SUPERTASK", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                "The Ultimate To-Do List",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the add-task sidebar: description, due date and the submit button.
    fn render_sidebar(&self, f: &mut Frame, area: Rect) {
        let active = self.state == AppState::AddTask;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Add New Task")
            .border_style(self.focus_style(active));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Description
                Constraint::Length(3), // Due Date
                Constraint::Length(3), // Add Task button
                Constraint::Min(0),    // Hints
            ])
            .split(inner);

        let fields = [
            (DESCRIPTION_FIELD, "Enter Task", &self.task_form.description, chunks[0]),
            (DUE_FIELD, "Due Date", &self.task_form.due, chunks[1]),
        ];
        for (order, title, field, rect) in fields {
            let focused = active && self.task_form.current_field == order;
            let (offset, column) = input_scroll(field.cursor_width(), rect.width.saturating_sub(2));
            let input = Paragraph::new(field.value.as_str())
                .scroll((0, offset))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(self.focus_style(focused)),
                );
            f.render_widget(input, rect);
            if focused {
                f.set_cursor_position((rect.x + 1 + column, rect.y + 1));
            }
        }

        let button_style = if active && self.task_form.current_field == SUBMIT_BUTTON {
            Style::default().fg(Color::Black).bg(GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new(Span::styled(" Add Task ", button_style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, chunks[2]);

        let hints = if !self.view.is_available() {
            "Tasks cannot be added until the database can be opened."
        } else if active {
            "Tab next field  Enter add  Esc back to tasks\nDue date: YYYY-MM-DD, today, tomorrow, friday, in 3d. Leave empty for none."
        } else {
            "Press 'a' to add a task"
        };
        let hints = Paragraph::new(hints)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(hints, chunks[3]);
    }

    /// Render the task table, or the empty / unavailable message in its place.
    fn render_task_table(&mut self, f: &mut Frame, area: Rect) {
        let done = self.view.tasks.iter().filter(|t| t.completed).count();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Your Tasks ({} total, {} done)", self.view.tasks.len(), done))
            .border_style(self.focus_style(self.state == AppState::TaskList));

        if let Some(message) = self.section_message(EMPTY_TASKS_MESSAGE) {
            f.render_widget(message.block(block), area);
            return;
        }

        let today = Local::now().date_naive();
        let header_cells = ["ID", "Done", "Task", "Due Date", "Due", "Category", "Action"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(SIDEBAR_GREY).fg(Color::Black))
            .height(1);

        let rows: Vec<Row> = self
            .view
            .tasks
            .iter()
            .map(|task| {
                let style = if task.completed {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(format_completed(task.completed)),
                    Cell::from(truncate(&task.description, 60)),
                    Cell::from(format_due(task.due_date)),
                    Cell::from(format_due_relative(task.due_date, today)),
                    Cell::from(task.category.label()),
                    Cell::from(if task.completed { "[d] Delete" } else { "" })
                        .style(Style::default().fg(Color::Red)),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(5),  // ID
            Constraint::Length(5),  // Done
            Constraint::Min(20),    // Task
            Constraint::Length(11), // Due Date
            Constraint::Length(10), // Due
            Constraint::Length(9),  // Category
            Constraint::Length(11), // Action
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    /// Message shown instead of a section when the store is unavailable or empty.
    fn section_message(&self, empty: &str) -> Option<Paragraph<'static>> {
        if let Some(reason) = &self.view.unavailable {
            let text = vec![
                Line::from(Span::styled(
                    UNAVAILABLE_MESSAGE,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(reason.clone()),
            ];
            return Some(Paragraph::new(text).wrap(Wrap { trim: true }));
        }
        if let Some(reason) = &self.view.read_error {
            let text = vec![
                Line::from(Span::styled(
                    READ_ERROR_MESSAGE,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(reason.clone()),
            ];
            return Some(Paragraph::new(text).wrap(Wrap { trim: true }));
        }
        if self.view.tasks.is_empty() {
            return Some(
                Paragraph::new(empty.to_string())
                    .style(Style::default().fg(Color::Cyan))
                    .wrap(Wrap { trim: true }),
            );
        }
        None
    }

    /// Render the category pie chart and its legend.
    fn render_categories(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Task Categories");
        if let Some(message) = self.section_message(EMPTY_CHART_MESSAGE) {
            f.render_widget(message.block(block), area);
            return;
        }
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(inner);

        let slices = &self.view.slices;
        let points = pie_points(slices, PIE_STEP);
        let (x_bounds, y_bounds) = circle_bounds(chunks[0].width, chunks[0].height);
        let pie = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for (slice, coords) in slices.iter().zip(&points) {
                    ctx.draw(&Points {
                        coords,
                        color: pie_color(slice.color),
                    });
                }
            });
        f.render_widget(pie, chunks[0]);

        let total: usize = slices.iter().map(|s| s.count).sum();
        let mut legend: Vec<Line> = slices
            .iter()
            .map(|slice| {
                Line::from(vec![
                    Span::styled("██ ", Style::default().fg(pie_color(slice.color))),
                    Span::raw(format!(
                        "{:<9}{:>4}  {:>5.1}%",
                        slice.category.label(),
                        slice.count,
                        slice.fraction * 100.0
                    )),
                ])
            })
            .collect();
        legend.push(Line::from(""));
        legend.push(Line::from(Span::styled(
            format!("   {:<9}{:>4}", "Total", total),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let legend = Paragraph::new(legend).block(Block::default().borders(Borders::LEFT));
        f.render_widget(legend, chunks[1]);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let footer = Paragraph::new(
            "a add  space toggle done  d delete completed  h help  q quit",
        )
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
        f.render_widget(footer, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | {} | Press 'h' for help",
                    self.view.tasks.len(),
                    self.db_path.display()
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm(_) => "Confirm Action".to_string(),
            }
        };
        let style = if self.status_is_error {
            Style::default().bg(DARK_RED).fg(Color::White)
        } else {
            Style::default().bg(SIDEBAR_GREY).fg(Color::Black)
        };
        f.render_widget(Paragraph::new(status_text).style(style), area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        let text = vec![
            Line::from(Span::styled("Tasks", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Up/Down, j/k     Select a task"),
            Line::from("  Space, Enter, x  Toggle completed"),
            Line::from("  d, Delete        Delete the selected completed task"),
            Line::from("  a, Tab           Focus the add-task sidebar"),
            Line::from("  q, Esc           Quit"),
            Line::from(""),
            Line::from(Span::styled("Add New Task", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Tab, Up/Down     Move between fields"),
            Line::from("  Enter            Add the task"),
            Line::from("  Esc              Back to the task list"),
            Line::from(""),
            Line::from("Tasks mentioning 'work' are filed under Work, 'personal' under"),
            Line::from("Personal, everything else under Other."),
        ];
        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }

    /// Render a confirmation dialog for deleting a task.
    fn render_confirm(&self, f: &mut Frame, area: Rect, id: i64) {
        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let description = self
            .view
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| truncate(&t.description, 40))
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Delete task #{id} {description}")),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title("Confirm Action")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(DARK_RED)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Draw the whole screen from the latest view.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Sidebar + tasks + chart
                Constraint::Length(1), // Footer
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(chunks[1]);
        self.render_sidebar(f, body[0]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body[1]);
        self.render_task_table(f, main[0]);
        self.render_categories(f, main[1]);

        self.render_footer(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);

        match self.state {
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Confirm(id) => self.render_confirm(f, chunks[1], id),
            AppState::TaskList | AppState::AddTask => {}
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
