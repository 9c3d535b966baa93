//! PostgreSQL repository implementations.
//!
//! CRUD goes through [`PostgresBaseRepository`]; the question list runs
//! as raw SQL because it mixes aggregate sort keys with an EXISTS-based
//! keyword match that the query builder would only obscure.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DbConn, DbErr, EntityTrait,
    FromQueryResult,
    QueryFilter, QueryOrder, Set, Statement,
};
use uuid::Uuid;

use agora_core::domain::{Answer, Comment, Question, QuestionSummary, User};
use agora_core::error::RepoError;
use agora_core::list::{ListParams, PAGE_SIZE, Page, SortOrder, clamp_page, page_count};
use agora_core::ports::{
    AnswerRepository, BaseRepository, CommentRepository, QuestionRepository, UserRepository,
};

use super::entity::{
    OwnerKind, answer, answer_voter, comment, comment_voter, owner_from_columns, question,
    question_voter, user,
};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<user::Entity>;

/// PostgreSQL question repository.
pub type PostgresQuestionRepository = PostgresBaseRepository<question::Entity>;

/// PostgreSQL answer repository.
pub type PostgresAnswerRepository = PostgresBaseRepository<answer::Entity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// Escape LIKE wildcards in a user-supplied keyword.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// One row of the list query: question columns plus the two aggregates.
#[derive(Debug, FromQueryResult)]
struct QuestionSummaryRow {
    id: Uuid,
    subject: String,
    content: String,
    owner_kind: Option<OwnerKind>,
    owner_id: Option<Uuid>,
    created_on: chrono::DateTime<chrono::FixedOffset>,
    modified_on: chrono::DateTime<chrono::FixedOffset>,
    created_by: Uuid,
    modified_by: Uuid,
    answer_count: i64,
    voter_count: i64,
}

impl From<QuestionSummaryRow> for QuestionSummary {
    fn from(row: QuestionSummaryRow) -> Self {
        Self {
            question: Question {
                id: row.id,
                subject: row.subject,
                content: row.content,
                owner: owner_from_columns(row.owner_kind, row.owner_id),
                created_on: row.created_on.into(),
                modified_on: row.modified_on.into(),
                created_by: row.created_by,
                modified_by: row.modified_by,
            },
            answer_count: row.answer_count.max(0) as u64,
            voter_count: row.voter_count.max(0) as u64,
        }
    }
}

// $1 is the raw keyword ('' disables the filter), $2 the LIKE pattern.
// The EXISTS subqueries cover author-username matches without producing
// one output row per matching answer, so no DISTINCT is needed.
const LIST_FILTER_SQL: &str = r#"
    ($1 = ''
        OR q.subject ILIKE $2
        OR q.content ILIKE $2
        OR EXISTS (SELECT 1 FROM users u
                   WHERE u.id = q.created_by AND u.username ILIKE $2)
        OR EXISTS (SELECT 1 FROM answers a
                   JOIN users au ON au.id = a.created_by
                   WHERE a.question_id = q.id AND au.username ILIKE $2))
"#;

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn list(&self, params: &ListParams) -> Result<Page<QuestionSummary>, RepoError> {
        let keyword = params.keyword.clone().unwrap_or_default();
        let pattern = like_pattern(&keyword);

        let count_sql = format!("SELECT COUNT(*) AS total FROM questions q WHERE {LIST_FILTER_SQL}");
        let count_stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            count_sql.as_str(),
            [keyword.clone().into(), pattern.clone().into()],
        );
        let total = self
            .db
            .query_one(count_stmt)
            .await
            .map_err(map_db_err)?
            .map(|row| row.try_get::<i64>("", "total"))
            .transpose()
            .map_err(map_db_err)?
            .unwrap_or(0)
            .max(0) as u64;

        let page = clamp_page(params.page, total);
        let offset = (page - 1) * PAGE_SIZE;

        let order_by = match params.sort {
            SortOrder::Recommend => "voter_count DESC, q.created_on DESC",
            SortOrder::Popular => "answer_count DESC, q.created_on DESC",
            SortOrder::Recent => "q.created_on DESC",
        };
        let list_sql = format!(
            r#"SELECT q.id, q.subject, q.content, q.owner_kind, q.owner_id,
                      q.created_on, q.modified_on, q.created_by, q.modified_by,
                      (SELECT COUNT(*) FROM answers a
                       WHERE a.question_id = q.id) AS answer_count,
                      (SELECT COUNT(*) FROM question_voters v
                       WHERE v.question_id = q.id) AS voter_count
               FROM questions q
               WHERE {LIST_FILTER_SQL}
               ORDER BY {order_by}
               OFFSET $3 LIMIT $4"#
        );
        let list_stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            list_sql.as_str(),
            [
                keyword.into(),
                pattern.into(),
                (offset as i64).into(),
                (PAGE_SIZE as i64).into(),
            ],
        );

        let rows = QuestionSummaryRow::find_by_statement(list_stmt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            page,
            page_count: page_count(total),
            total,
        })
    }

    async fn add_voter(&self, question_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let membership = question_voter::ActiveModel {
            question_id: Set(question_id),
            user_id: Set(user_id),
        };

        let result = question_voter::Entity::insert(membership)
            .on_conflict(
                OnConflict::columns([
                    question_voter::Column::QuestionId,
                    question_voter::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            // Re-votes hit the conflict clause and insert nothing.
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn voters(&self, question_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let rows = question_voter::Entity::find()
            .filter(question_voter::Column::QuestionId.eq(question_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(|m| m.user_id).collect())
    }
}

#[async_trait]
impl AnswerRepository for PostgresAnswerRepository {
    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Answer>, RepoError> {
        let rows = answer::Entity::find()
            .filter(answer::Column::QuestionId.eq(question_id))
            .order_by_asc(answer::Column::CreatedOn)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_voter(&self, answer_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let membership = answer_voter::ActiveModel {
            answer_id: Set(answer_id),
            user_id: Set(user_id),
        };

        let result = answer_voter::Entity::insert(membership)
            .on_conflict(
                OnConflict::columns([
                    answer_voter::Column::AnswerId,
                    answer_voter::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn voters(&self, answer_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let rows = answer_voter::Entity::find()
            .filter(answer_voter::Column::AnswerId.eq(answer_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(|m| m.user_id).collect())
    }
}

/// PostgreSQL comment repository.
///
/// Not built on the generic base: decoding a comment row is fallible (the
/// parent pair must hold exactly one id), so the infallible `From<Model>`
/// conversion the base requires does not apply.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for PostgresCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        result.map(Comment::try_from).transpose()
    }

    async fn insert(&self, entity: Comment) -> Result<Comment, RepoError> {
        let active_model: comment::ActiveModel = entity.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        Comment::try_from(model)
    }

    async fn update(&self, entity: Comment) -> Result<Comment, RepoError> {
        let active_model: comment::ActiveModel = entity.into();
        let model = active_model.update(&self.db).await.map_err(map_db_err)?;

        Comment::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = comment::Entity::find()
            .filter(comment::Column::QuestionId.eq(question_id))
            .order_by_asc(comment::Column::CreatedOn)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn find_by_answer(&self, answer_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = comment::Entity::find()
            .filter(comment::Column::AnswerId.eq(answer_id))
            .order_by_asc(comment::Column::CreatedOn)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn add_voter(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let membership = comment_voter::ActiveModel {
            comment_id: Set(comment_id),
            user_id: Set(user_id),
        };

        let result = comment_voter::Entity::insert(membership)
            .on_conflict(
                OnConflict::columns([
                    comment_voter::Column::CommentId,
                    comment_voter::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn voters(&self, comment_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let rows = comment_voter::Entity::find()
            .filter(comment_voter::Column::CommentId.eq(comment_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(|m| m.user_id).collect())
    }
}
