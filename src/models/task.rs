use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Rejects text that is empty once surrounding whitespace is removed.
fn not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// What needs doing. Stored trimmed; must not be blank.
    #[validate(custom = "not_blank")]
    pub text: String,
}

/// Body of a partial update. Anything other than `text` and `completed` is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(custom = "not_blank")]
    pub text: Option<String>,

    /// Kept as a raw JSON value: only the boolean `true` marks a task completed,
    /// anything else (including a missing field) resets it.
    #[serde(default)]
    pub completed: Option<Value>,
}

/// The concrete column values a `TaskPatch` resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChanges {
    pub text: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Derives the completion timestamp on the server side.
    pub fn into_changes(self, now: DateTime<Utc>) -> TaskChanges {
        let completed = matches!(self.completed, Some(Value::Bool(true)));
        TaskChanges {
            text: self.text.map(|text| text.trim().to_string()),
            completed,
            completed_at: completed.then_some(now),
        }
    }
}

/// A task record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    /// Set exactly when `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
    /// Identifier of the user who created the task. Only that user can see it.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open task owned by `owner_id`.
    pub fn new(input: TaskInput, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: input.text.trim().to_string(),
            completed: false,
            completed_at: None,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Applies resolved changes in place.
    pub fn apply(&mut self, changes: &TaskChanges) {
        if let Some(text) = &changes.text {
            self.text = text.clone();
        }
        self.completed = changes.completed;
        self.completed_at = changes.completed_at;
    }
}
