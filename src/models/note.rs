use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default timestamp layout, close to a US-English `toLocaleString`
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// A user-authored note
///
/// Notes are append-only: once created, none of the fields change. The `date`
/// is stored pre-formatted so that notes written with a different
/// `date_format` keep reading the way they did when created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
}

impl Note {
    pub fn new(
        id: String,
        title: String,
        content: String,
        created_at: DateTime<Local>,
        date_format: &str,
    ) -> Self {
        Self {
            id,
            title,
            content,
            date: created_at.format(date_format).to_string(),
        }
    }

    /// Generates a fresh note id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Case-insensitive exact title comparison
    pub fn title_matches(&self, query: &str) -> bool {
        self.title.to_lowercase() == query.to_lowercase()
    }

    /// Case-insensitive partial title comparison
    pub fn title_contains(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}
