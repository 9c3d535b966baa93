//! Comment handlers.
//!
//! Creation is parent-specific (the parent id is in the path); modify and
//! delete address the comment directly and resolve the question to
//! redirect to from the stored parent, so the two URL families share one
//! handler each.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use agora_core::DomainError;
use agora_core::domain::{Comment, CommentParent};
use agora_core::ports::BaseRepository;
use agora_core::rules::authorize_mutation;
use agora_shared::dto::CommentForm;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::{fetch_answer, fetch_comment, fetch_question, see_other};

/// The question whose detail view shows this comment.
async fn parent_question_id(state: &AppState, comment: &Comment) -> AppResult<Uuid> {
    match comment.parent {
        CommentParent::Question(question_id) => Ok(question_id),
        CommentParent::Answer(answer_id) => {
            Ok(fetch_answer(state, answer_id).await?.question_id)
        }
    }
}

/// POST /comment/create/question/{question_id}/
pub async fn create_on_question(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let question_id = path.into_inner();
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    let question = fetch_question(&state, question_id).await?;
    let comment = Comment::on_question(question.id, form.content, identity.user_id);
    let comment = state.comments.insert(comment).await?;

    Ok(see_other(format!("/{}/#comment_{}", question.id, comment.id)))
}

/// POST /comment/create/answer/{answer_id}/
pub async fn create_on_answer(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let answer_id = path.into_inner();
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    let answer = fetch_answer(&state, answer_id).await?;
    let comment = Comment::on_answer(answer.id, form.content, identity.user_id);
    let comment = state.comments.insert(comment).await?;

    Ok(see_other(format!(
        "/{}/#comment_{}",
        answer.question_id, comment.id
    )))
}

/// POST /comment/modify/question/{comment_id}/ and
/// POST /comment/modify/answer/{comment_id}/
pub async fn modify(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    let mut comment = fetch_comment(&state, comment_id).await?;
    authorize_mutation(&comment, identity.user_id)?;

    comment.content = form.content;
    comment.touch(identity.user_id);
    let comment = state.comments.update(comment).await?;

    let question_id = parent_question_id(&state, &comment).await?;
    Ok(see_other(format!("/{}/#comment_{}", question_id, comment.id)))
}

/// POST /comment/delete/question/{comment_id}/ and
/// POST /comment/delete/answer/{comment_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();
    let comment = fetch_comment(&state, comment_id).await?;
    authorize_mutation(&comment, identity.user_id)?;

    let question_id = parent_question_id(&state, &comment).await?;
    state.comments.delete(comment_id).await?;

    Ok(see_other(format!("/{question_id}/")))
}
