//! Application state - shared across all handlers.

use std::sync::Arc;

use agora_core::ports::{AnswerRepository, CommentRepository, QuestionRepository, UserRepository};
use agora_infra::database::{
    DatabaseConfig, DatabaseConnections, MemoryAnswerRepository, MemoryCommentRepository,
    MemoryQuestionRepository, MemoryStore, MemoryUserRepository, PostgresAnswerRepository,
    PostgresCommentRepository, PostgresQuestionRepository, PostgresUserRepository,
};

/// Shared application state: one repository handle per entity type.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub answers: Arc<dyn AnswerRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// With a reachable database the Postgres repositories are used;
    /// otherwise everything runs against the in-memory store, which does
    /// not survive a restart.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        if let Some(config) = db_config {
            match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let db = connections.main;
                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        users: Arc::new(PostgresUserRepository::new(db.clone())),
                        questions: Arc::new(PostgresQuestionRepository::new(db.clone())),
                        answers: Arc::new(PostgresAnswerRepository::new(db.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(db)),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        let state = Self::in_memory();
        tracing::info!("Application state initialized (in-memory)");
        state
    }

    /// State backed entirely by the in-memory store.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(MemoryUserRepository::new(store.clone())),
            questions: Arc::new(MemoryQuestionRepository::new(store.clone())),
            answers: Arc::new(MemoryAnswerRepository::new(store.clone())),
            comments: Arc::new(MemoryCommentRepository::new(store)),
        }
    }
}
