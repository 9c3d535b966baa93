use std::collections::BTreeMap;

use agora_core::domain::{Comment, CommentParent, Owner, Question};
use agora_core::error::RepoError;
use agora_core::list::{ListParams, SortOrder};
use agora_core::ports::{BaseRepository, QuestionRepository};
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

use crate::database::entity::{OwnerKind, comment, question};
use crate::database::postgres_repo::{PostgresCommentRepository, PostgresQuestionRepository};

#[tokio::test]
async fn find_question_by_id_maps_owner_columns() {
    let question_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![question::Model {
            id: question_id,
            subject: "How do lifetimes work?".to_owned(),
            content: "Details inside.".to_owned(),
            owner_kind: Some(OwnerKind::User),
            owner_id: Some(owner_id),
            created_on: now.into(),
            modified_on: now.into(),
            created_by: author_id,
            modified_by: author_id,
        }]])
        .into_connection();

    let repo = PostgresQuestionRepository::new(db);

    let result: Option<Question> = repo.find_by_id(question_id).await.unwrap();

    let question = result.unwrap();
    assert_eq!(question.id, question_id);
    assert_eq!(question.subject, "How do lifetimes work?");
    assert_eq!(question.owner, Some(Owner::User(owner_id)));
}

#[tokio::test]
async fn comment_row_with_both_parents_is_corrupt() {
    let comment_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: comment_id,
            question_id: Some(Uuid::new_v4()),
            answer_id: Some(Uuid::new_v4()),
            content: "orphaned".to_owned(),
            owner_kind: Some(OwnerKind::User),
            owner_id: Some(author_id),
            created_on: now.into(),
            modified_on: now.into(),
            created_by: author_id,
            modified_by: author_id,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let result = repo.find_by_id(comment_id).await;

    assert!(matches!(result, Err(RepoError::Corrupt(_))));
}

#[tokio::test]
async fn comment_row_with_answer_parent_decodes() {
    let comment_id = Uuid::new_v4();
    let answer_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: comment_id,
            question_id: None,
            answer_id: Some(answer_id),
            content: "a reply".to_owned(),
            owner_kind: Some(OwnerKind::User),
            owner_id: Some(author_id),
            created_on: now.into(),
            modified_on: now.into(),
            created_by: author_id,
            modified_by: author_id,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let comment: Comment = repo.find_by_id(comment_id).await.unwrap().unwrap();

    assert_eq!(comment.parent, CommentParent::Answer(answer_id));
}

#[tokio::test]
async fn list_query_escapes_keyword_and_orders_by_votes() {
    let question_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = chrono::Utc::now().fixed_offset();

    let count_row = BTreeMap::from([("total", Value::from(1i64))]);
    let list_row = BTreeMap::from([
        ("id", Value::from(question_id)),
        ("subject", Value::from("rust_macros")),
        ("content", Value::from("How do declarative macros expand?")),
        ("owner_kind", Value::from("user")),
        ("owner_id", Value::from(author_id)),
        ("created_on", Value::from(now)),
        ("modified_on", Value::from(now)),
        ("created_by", Value::from(author_id)),
        ("modified_by", Value::from(author_id)),
        ("answer_count", Value::from(3i64)),
        ("voter_count", Value::from(5i64)),
    ]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row]])
        .append_query_results(vec![vec![list_row]])
        .into_connection();

    // `DatabaseConnection` is not `Clone` with the mock feature enabled;
    // give the repository a second handle to the same mock connection so
    // the transaction log can still be inspected afterwards.
    let repo_conn = match &db {
        sea_orm::DatabaseConnection::MockDatabaseConnection(conn) => {
            sea_orm::DatabaseConnection::MockDatabaseConnection(conn.clone())
        }
        _ => unreachable!("mock connection"),
    };
    let repo = PostgresQuestionRepository::new(repo_conn);

    let params = ListParams::new(1, Some("rust_".to_owned()), SortOrder::Recommend);
    let page = repo.list(&params).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_count, 1);
    assert_eq!(page.items.len(), 1);
    let summary = &page.items[0];
    assert_eq!(summary.question.id, question_id);
    assert_eq!(summary.question.owner, Some(Owner::User(author_id)));
    assert_eq!(summary.answer_count, 3);
    assert_eq!(summary.voter_count, 5);

    // The count and list statements both carry the keyword filter; the
    // underscore in the keyword must be escaped in the LIKE pattern.
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("SELECT COUNT(*) AS total FROM questions q"));
    assert!(log.contains("ILIKE"));
    assert!(log.contains(r"%rust\\_%"));
    assert!(log.contains("ORDER BY voter_count DESC, q.created_on DESC"));
    assert!(log.contains("OFFSET $3 LIMIT $4"));
}
