use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Owner;

/// Answer entity - belongs to exactly one question and is cascade-deleted
/// with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub owner: Option<Owner>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub created_by: Uuid,
    pub modified_by: Uuid,
}

impl Answer {
    /// Create a new answer authored and owned by `author`.
    pub fn new(question_id: Uuid, content: String, author: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            question_id,
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
