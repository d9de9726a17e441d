//! Task data structure.
//!
//! A task is the only record the application keeps: a description, an optional due
//! date, the category inferred when it was added, and whether it has been completed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::Category;

/// A single to-do item as stored in the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub category: Category,
    pub completed: bool,
}
