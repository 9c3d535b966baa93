//! Data Transfer Objects - form bodies and JSON responses for the API.
//!
//! Form types validate themselves; an `Err` carries one message per
//! failing field, surfaced as a 422 without any state change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Form body for creating or modifying a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionForm {
    pub subject: String,
    pub content: String,
}

impl QuestionForm {
    pub const MAX_SUBJECT_LEN: usize = 200;

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if blank(&self.subject) {
            errors.push("subject is required".to_string());
        } else if self.subject.chars().count() > Self::MAX_SUBJECT_LEN {
            errors.push(format!(
                "subject must be at most {} characters",
                Self::MAX_SUBJECT_LEN
            ));
        }
        if blank(&self.content) {
            errors.push("content is required".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Form body for creating or modifying an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerForm {
    pub content: String,
}

impl AnswerForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if blank(&self.content) {
            Err(vec!["content is required".to_string()])
        } else {
            Ok(())
        }
    }
}

/// Form body for creating or modifying a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub content: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if blank(&self.content) {
            Err(vec!["content is required".to_string()])
        } else {
            Ok(())
        }
    }
}

/// Form body for registering a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if blank(&self.username) {
            errors.push("username is required".to_string());
        }
        if blank(&self.email) || !self.email.contains('@') {
            errors.push("a valid email address is required".to_string());
        }
        if self.password.len() < 8 {
            errors.push("password must be at least 8 characters".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Form body for logging in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// One row of the question list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionListItem {
    pub id: Uuid,
    pub subject: String,
    pub created_by: Uuid,
    pub created_on: DateTime<Utc>,
    pub answer_count: u64,
    pub voter_count: u64,
}

/// Response for `GET /` - one page of questions plus the query echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionListItem>,
    pub page: u64,
    pub page_count: u64,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kw: Option<String>,
    pub so: String,
}

/// A comment as rendered in the detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub created_by: Uuid,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

/// An answer with its voter count and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDetailResponse {
    pub id: Uuid,
    pub content: String,
    pub created_by: Uuid,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub voter_count: u64,
    pub comments: Vec<CommentResponse>,
}

/// Response for `GET /{question_id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetailResponse {
    pub id: Uuid,
    pub subject: String,
    pub content: String,
    pub created_by: Uuid,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub voter_count: u64,
    pub comments: Vec<CommentResponse>,
    pub answers: Vec<AnswerDetailResponse>,
}
