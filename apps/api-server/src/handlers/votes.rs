//! Recommend-vote handlers.
//!
//! Votes arrive as plain GETs from the detail view. A rejected self-vote
//! is not an API error: the response is still a redirect back to the
//! detail view, carrying the message in the query string, and no state
//! changes.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use agora_core::error::DomainError;
use agora_core::ports::{AnswerRepository, QuestionRepository};
use agora_core::rules::check_vote;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

use super::{fetch_answer, fetch_question, see_other};

const OWN_VOTE_QUERY: &str = "error=cannot+vote+on+your+own+post";

/// GET /vote/question/{question_id}/
pub async fn question(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let question_id = path.into_inner();
    let question = fetch_question(&state, question_id).await?;

    match check_vote(&question, identity.user_id) {
        Ok(()) => {
            state
                .questions
                .add_voter(question_id, identity.user_id)
                .await?;
            Ok(see_other(format!("/{question_id}/")))
        }
        Err(DomainError::OwnVote) => {
            Ok(see_other(format!("/{question_id}/?{OWN_VOTE_QUERY}")))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /vote/answer/{answer_id}/
pub async fn answer(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let answer_id = path.into_inner();
    let answer = fetch_answer(&state, answer_id).await?;
    let question_id = answer.question_id;

    match check_vote(&answer, identity.user_id) {
        Ok(()) => {
            state.answers.add_voter(answer_id, identity.user_id).await?;
            Ok(see_other(format!("/{question_id}/#answer_{answer_id}")))
        }
        Err(DomainError::OwnVote) => {
            Ok(see_other(format!("/{question_id}/?{OWN_VOTE_QUERY}")))
        }
        Err(e) => Err(e.into()),
    }
}
