use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Owner;

/// The post a comment hangs off: exactly one question or one answer.
///
/// The source schema used a pair of nullable foreign keys with an implied
/// "exactly one set" invariant; the enum enforces it on write. One
/// variant per parent kind replaces any runtime parent inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CommentParent {
    Question(Uuid),
    Answer(Uuid),
}

impl CommentParent {
    pub fn question_id(&self) -> Option<Uuid> {
        match self {
            CommentParent::Question(id) => Some(*id),
            CommentParent::Answer(_) => None,
        }
    }

    pub fn answer_id(&self) -> Option<Uuid> {
        match self {
            CommentParent::Question(_) => None,
            CommentParent::Answer(id) => Some(*id),
        }
    }
}

/// Comment entity - attached to a question or an answer, cascade-deleted
/// with its parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub parent: CommentParent,
    pub content: String,
    pub owner: Option<Owner>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub created_by: Uuid,
    pub modified_by: Uuid,
}

impl Comment {
    /// Create a comment on a question, authored and owned by `author`.
    pub fn on_question(question_id: Uuid, content: String, author: Uuid) -> Self {
        Self::new(CommentParent::Question(question_id), content, author)
    }

    /// Create a comment on an answer, authored and owned by `author`.
    pub fn on_answer(answer_id: Uuid, content: String, author: Uuid) -> Self {
        Self::new(CommentParent::Answer(answer_id), content, author)
    }

    fn new(parent: CommentParent, content: String, author: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            parent,
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
