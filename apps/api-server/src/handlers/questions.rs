//! Question handlers: list, detail, create, modify, delete.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use agora_core::DomainError;
use agora_core::domain::Question;
use agora_core::list::{ListParams, SortOrder};
use agora_core::ports::{AnswerRepository, BaseRepository, CommentRepository, QuestionRepository};
use agora_core::rules::authorize_mutation;
use agora_shared::dto::{
    AnswerDetailResponse, CommentResponse, QuestionDetailResponse, QuestionForm, QuestionListItem,
    QuestionListResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::{fetch_question, see_other};

/// Query string of the list view. Parameters arrive as free-form text;
/// a non-numeric `page` falls back to 1 instead of erroring.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub kw: Option<String>,
    pub so: Option<String>,
}

impl ListQuery {
    fn into_params(self) -> ListParams {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let sort = self.so.as_deref().map(SortOrder::parse).unwrap_or_default();
        ListParams::new(page, self.kw, sort)
    }
}

fn sort_name(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Recent => "recent",
        SortOrder::Recommend => "recommend",
        SortOrder::Popular => "popular",
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner().into_params();
    let page = state.questions.list(&params).await?;

    let questions = page
        .items
        .into_iter()
        .map(|summary| QuestionListItem {
            id: summary.question.id,
            subject: summary.question.subject,
            created_by: summary.question.created_by,
            created_on: summary.question.created_on,
            answer_count: summary.answer_count,
            voter_count: summary.voter_count,
        })
        .collect();

    Ok(HttpResponse::Ok().json(QuestionListResponse {
        questions,
        page: page.page,
        page_count: page.page_count,
        total: page.total,
        kw: params.keyword,
        so: sort_name(params.sort).to_string(),
    }))
}

fn comment_response(comment: agora_core::domain::Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        content: comment.content,
        created_by: comment.created_by,
        created_on: comment.created_on,
        modified_on: comment.modified_on,
    }
}

/// GET /{question_id}/
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let question_id = path.into_inner();
    let question = fetch_question(&state, question_id).await?;

    let voter_count = state.questions.voters(question_id).await?.len() as u64;
    let comments = state
        .comments
        .find_by_question(question_id)
        .await?
        .into_iter()
        .map(comment_response)
        .collect();

    let mut answers = Vec::new();
    for answer in state.answers.find_by_question(question_id).await? {
        let voter_count = state.answers.voters(answer.id).await?.len() as u64;
        let comments = state
            .comments
            .find_by_answer(answer.id)
            .await?
            .into_iter()
            .map(comment_response)
            .collect();

        answers.push(AnswerDetailResponse {
            id: answer.id,
            content: answer.content,
            created_by: answer.created_by,
            created_on: answer.created_on,
            modified_on: answer.modified_on,
            voter_count,
            comments,
        });
    }

    Ok(HttpResponse::Ok().json(QuestionDetailResponse {
        id: question.id,
        subject: question.subject,
        content: question.content,
        created_by: question.created_by,
        created_on: question.created_on,
        modified_on: question.modified_on,
        voter_count,
        comments,
        answers,
    }))
}

/// POST /question/create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<QuestionForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    let question = Question::new(form.subject, form.content, identity.user_id);
    state.questions.insert(question).await?;

    Ok(see_other("/"))
}

/// POST /question/modify/{question_id}/
pub async fn modify(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<QuestionForm>,
) -> AppResult<HttpResponse> {
    let question_id = path.into_inner();
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    let mut question = fetch_question(&state, question_id).await?;
    authorize_mutation(&question, identity.user_id)?;

    question.subject = form.subject;
    question.content = form.content;
    question.touch(identity.user_id);
    state.questions.update(question).await?;

    Ok(see_other(format!("/{question_id}/")))
}

/// POST /question/delete/{question_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let question_id = path.into_inner();
    let question = fetch_question(&state, question_id).await?;
    authorize_mutation(&question, identity.user_id)?;

    state.questions.delete(question_id).await?;

    Ok(see_other("/"))
}
