//! Add-task form handling for the terminal user interface.
//!
//! The form backs the sidebar: a description, a due date prefilled with today's date,
//! and an "Add Task" button, cycled through with Tab.

use chrono::{Local, NaiveDate};

use crate::{db::parse_due_input_from, tui::input::InputField, view::Action};

/// Order of the form's focusable elements.
pub const DESCRIPTION_FIELD: usize = 0;
pub const DUE_FIELD: usize = 1;
pub const SUBMIT_BUTTON: usize = 2;
const FIELD_COUNT: usize = 3;

/// Form state for entering a new task.
pub struct TaskForm {
    pub description: InputField,
    pub due: InputField,
    pub current_field: usize,
    /// Fixed "today" for relative dates; `None` reads the local clock on use.
    pinned_today: Option<NaiveDate>,
    /// Date last written into the due field as its default.
    prefilled: NaiveDate,
}

impl TaskForm {
    /// Create an empty form with the due date set to today.
    pub fn new() -> Self {
        Self::with_today(None)
    }

    /// Create an empty form whose due date and relative parsing use `today`.
    pub fn for_date(today: NaiveDate) -> Self {
        Self::with_today(Some(today))
    }

    fn with_today(pinned_today: Option<NaiveDate>) -> Self {
        let today = pinned_today.unwrap_or_else(|| Local::now().date_naive());
        Self {
            description: InputField::new(),
            due: InputField::with_value(&today.to_string()),
            current_field: DESCRIPTION_FIELD,
            pinned_today,
            prefilled: today,
        }
    }

    fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Move an untouched due-date default forward when the day has changed.
    pub fn roll_prefill(&mut self) {
        let today = self.today();
        if self.prefilled == today {
            return;
        }
        if self.due.value == self.prefilled.to_string() {
            self.due = InputField::with_value(&today.to_string());
        }
        self.prefilled = today;
    }

    /// Input field under the cursor, if the focus is on a text field.
    pub fn active_field_mut(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            DESCRIPTION_FIELD => Some(&mut self.description),
            DUE_FIELD => Some(&mut self.due),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_field_mut() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_field_mut() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_field_mut() {
            field.handle_delete();
        }
    }

    /// Handle left/right arrow keys for cursor movement.
    pub fn handle_left_right(&mut self, right: bool) {
        if let Some(field) = self.active_field_mut() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    /// Parsed due date; an empty field means no due date.
    pub fn due_date(&self) -> Result<Option<NaiveDate>, String> {
        let raw = self.due.value.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_due_input_from(raw, self.today())
            .map(Some)
            .ok_or_else(|| format!("Unrecognised due date '{raw}'"))
    }

    /// Build the add action from the current input.
    ///
    /// The description is taken as typed, including when it is empty.
    pub fn to_action(&mut self) -> Result<Action, String> {
        self.roll_prefill();
        Ok(Action::Add {
            description: self.description.value.clone(),
            due_date: self.due_date()?,
        })
    }

    /// Clear the description after a successful add, keeping the chosen due date.
    pub fn reset_description(&mut self) {
        self.description.clear();
        self.current_field = DESCRIPTION_FIELD;
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    #[test]
    fn test_defaults_to_today() {
        let form = TaskForm::for_date(today());
        assert_eq!(form.due.value, "2024-06-05");
        assert_eq!(form.due_date(), Ok(Some(today())));
        assert_eq!(form.current_field, DESCRIPTION_FIELD);
    }

    #[test]
    fn test_field_cycle_wraps() {
        let mut form = TaskForm::for_date(today());
        form.prev_field();
        assert_eq!(form.current_field, SUBMIT_BUTTON);
        form.next_field();
        form.next_field();
        assert_eq!(form.current_field, DUE_FIELD);
    }

    #[test]
    fn test_typing_goes_to_active_field_only() {
        let mut form = TaskForm::for_date(today());
        form.handle_char('x');
        form.current_field = SUBMIT_BUTTON;
        form.handle_char('y');
        assert_eq!(form.description.value, "x");
        assert_eq!(form.due.value, "2024-06-05");
    }

    #[test]
    fn test_due_date_parsing() {
        let mut form = TaskForm::for_date(today());
        form.due = InputField::with_value("tomorrow");
        assert_eq!(form.due_date(), Ok(NaiveDate::from_ymd_opt(2024, 6, 6)));

        form.due.clear();
        assert_eq!(form.due_date(), Ok(None));

        form.due = InputField::with_value("someday");
        assert!(form.due_date().is_err());
        assert!(form.to_action().is_err());
    }

    #[test]
    fn test_empty_description_is_allowed() {
        let mut form = TaskForm::for_date(today());
        assert_eq!(
            form.to_action(),
            Ok(Action::Add {
                description: String::new(),
                due_date: Some(today()),
            })
        );
    }

    #[test]
    fn test_day_change_moves_untouched_default() {
        let mut form = TaskForm::for_date(today());
        let next_day = NaiveDate::from_ymd_opt(2024, 6, 6).unwrap();
        form.pinned_today = Some(next_day);

        assert_eq!(
            form.to_action(),
            Ok(Action::Add {
                description: String::new(),
                due_date: Some(next_day),
            })
        );
        assert_eq!(form.due.value, "2024-06-06");

        form.due = InputField::with_value("tomorrow");
        assert_eq!(form.due_date(), Ok(NaiveDate::from_ymd_opt(2024, 6, 7)));
    }

    #[test]
    fn test_day_change_keeps_edited_due_date() {
        let mut form = TaskForm::for_date(today());
        form.due = InputField::with_value("2024-07-01");
        form.pinned_today = Some(NaiveDate::from_ymd_opt(2024, 6, 6).unwrap());

        form.roll_prefill();
        assert_eq!(form.due.value, "2024-07-01");
    }
}
