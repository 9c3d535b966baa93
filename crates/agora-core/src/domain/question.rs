use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Owner;

/// Question entity - a top-level post on the board.
///
/// Deleting a question cascades to its answers and to every comment
/// hanging off the question or one of its answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub subject: String,
    pub content: String,
    pub owner: Option<Owner>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub created_by: Uuid,
    pub modified_by: Uuid,
}

impl Question {
    /// Create a new question authored and owned by `author`.
    pub fn new(subject: String, content: String, author: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subject,
            content,
            owner: Some(Owner::User(author)),
            created_on: now,
            modified_on: now,
            created_by: author,
            modified_by: author,
        }
    }

    /// Record a modification by `actor`.
    pub fn touch(&mut self, actor: Uuid) {
        self.modified_on = Utc::now();
        self.modified_by = actor;
    }
}

/// A question decorated with the aggregate counts the list view sorts
/// and renders by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question: Question,
    pub answer_count: u64,
    pub voter_count: u64,
}
