use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be between 4 and 150 characters.
    /// Titles are stored lowercased and are unique per user.
    #[validate(length(min = 4, max = 150))]
    pub title: String,

    /// An optional description for the task.
    pub description: Option<String>,
}

/// A task record, owned by exactly one identity via its username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    /// Username (email) of the owning identity.
    #[sqlx(rename = "user_name")]
    pub user: String,
    pub created: DateTime<Utc>,
    pub completed_on: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new `Task` from input for the given owner. The title is
    /// lowercased, `created` is set to now and the task starts incomplete.
    pub fn new(input: TaskInput, user: &str) -> Self {
        Self {
            title: input.title.to_lowercase(),
            description: input.description,
            is_completed: false,
            user: user.to_owned(),
            created: Utc::now(),
            completed_on: None,
        }
    }
}
