//! Enumerations and field types for tasks.
//!
//! This module defines the fixed set of categories a task can belong to, along with
//! the text labels used when categories are stored, printed or parsed.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Category inferred from a task description when the task is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Personal,
    Other,
}

impl Category {
    /// Every category, in keyword priority order.
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Other];

    /// Label stored in the `category` column and shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}
