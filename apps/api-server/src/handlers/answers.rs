//! Answer handlers: create, modify, delete.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use agora_core::DomainError;
use agora_core::domain::Answer;
use agora_core::ports::BaseRepository;
use agora_core::rules::authorize_mutation;
use agora_shared::dto::AnswerForm;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::{fetch_answer, fetch_question, see_other};

/// POST /answer/create/{question_id}/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<AnswerForm>,
) -> AppResult<HttpResponse> {
    let question_id = path.into_inner();
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    let question = fetch_question(&state, question_id).await?;
    let answer = Answer::new(question.id, form.content, identity.user_id);
    let answer = state.answers.insert(answer).await?;

    Ok(see_other(format!("/{}/#answer_{}", question.id, answer.id)))
}

/// POST /answer/modify/{answer_id}/
pub async fn modify(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<AnswerForm>,
) -> AppResult<HttpResponse> {
    let answer_id = path.into_inner();
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    let mut answer = fetch_answer(&state, answer_id).await?;
    authorize_mutation(&answer, identity.user_id)?;

    answer.content = form.content;
    answer.touch(identity.user_id);
    let answer = state.answers.update(answer).await?;

    Ok(see_other(format!(
        "/{}/#answer_{}",
        answer.question_id, answer.id
    )))
}

/// POST /answer/delete/{answer_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let answer_id = path.into_inner();
    let answer = fetch_answer(&state, answer_id).await?;
    authorize_mutation(&answer, identity.user_id)?;

    state.answers.delete(answer_id).await?;

    Ok(see_other(format!("/{}/", answer.question_id)))
}
