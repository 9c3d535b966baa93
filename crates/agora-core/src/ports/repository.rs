use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Answer, Comment, Question, QuestionSummary, User};
use crate::error::RepoError;
use crate::list::{ListParams, Page};

/// Generic repository trait defining standard CRUD operations.
///
/// Ids are generated by the domain at construction, so create and update
/// are distinct operations rather than a single upsert-style save.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a freshly created entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Dependent children cascade with it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Question repository: CRUD plus the list view and the voter set.
#[async_trait]
pub trait QuestionRepository: BaseRepository<Question, Uuid> {
    /// The sorted, keyword-filtered, paginated question list.
    async fn list(&self, params: &ListParams) -> Result<Page<QuestionSummary>, RepoError>;

    /// Add a user to the voter set. Idempotent: re-adding is a no-op.
    async fn add_voter(&self, question_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;

    async fn voters(&self, question_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}

/// Answer repository.
#[async_trait]
pub trait AnswerRepository: BaseRepository<Answer, Uuid> {
    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Answer>, RepoError>;

    /// Add a user to the voter set. Idempotent: re-adding is a no-op.
    async fn add_voter(&self, answer_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;

    async fn voters(&self, answer_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments attached directly to a question.
    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Comments attached to an answer.
    async fn find_by_answer(&self, answer_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Add a user to the voter set. Idempotent: re-adding is a no-op.
    async fn add_voter(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;

    async fn voters(&self, comment_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}
