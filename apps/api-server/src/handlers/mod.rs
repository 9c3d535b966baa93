//! HTTP handlers and route configuration.
//!
//! Mutations take form-encoded bodies and answer 303 redirects; reads
//! return JSON. Paths keep their trailing slashes.

mod answers;
mod auth;
mod comments;
mod health;
mod questions;
mod votes;

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use agora_core::DomainError;
use agora_core::domain::{Answer, Comment, Question};
use agora_core::ports::BaseRepository;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/register/", web::post().to(auth::register))
                .route("/login/", web::post().to(auth::login))
                .route("/logout/", web::get().to(auth::logout)),
        )
        .service(
            web::scope("/question")
                .route("/create/", web::post().to(questions::create))
                .route("/modify/{question_id}/", web::post().to(questions::modify))
                .route("/delete/{question_id}/", web::post().to(questions::delete)),
        )
        .service(
            web::scope("/answer")
                .route("/create/{question_id}/", web::post().to(answers::create))
                .route("/modify/{answer_id}/", web::post().to(answers::modify))
                .route("/delete/{answer_id}/", web::post().to(answers::delete)),
        )
        .service(
            web::scope("/comment")
                .route(
                    "/create/question/{question_id}/",
                    web::post().to(comments::create_on_question),
                )
                .route(
                    "/modify/question/{comment_id}/",
                    web::post().to(comments::modify),
                )
                .route(
                    "/delete/question/{comment_id}/",
                    web::post().to(comments::delete),
                )
                .route(
                    "/create/answer/{answer_id}/",
                    web::post().to(comments::create_on_answer),
                )
                .route(
                    "/modify/answer/{comment_id}/",
                    web::post().to(comments::modify),
                )
                .route(
                    "/delete/answer/{comment_id}/",
                    web::post().to(comments::delete),
                ),
        )
        .service(
            web::scope("/vote")
                .route("/question/{question_id}/", web::get().to(votes::question))
                .route("/answer/{answer_id}/", web::get().to(votes::answer)),
        )
        .route("/", web::get().to(questions::index))
        .route("/{question_id}/", web::get().to(questions::detail));
}

/// 303 See Other to `location`.
pub(crate) fn see_other(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.as_ref().to_string()))
        .finish()
}

pub(crate) async fn fetch_question(state: &AppState, id: Uuid) -> AppResult<Question> {
    state.questions.find_by_id(id).await?.ok_or_else(|| {
        AppError::from(DomainError::NotFound {
            entity_type: "question",
            id,
        })
    })
}

pub(crate) async fn fetch_answer(state: &AppState, id: Uuid) -> AppResult<Answer> {
    state.answers.find_by_id(id).await?.ok_or_else(|| {
        AppError::from(DomainError::NotFound {
            entity_type: "answer",
            id,
        })
    })
}

pub(crate) async fn fetch_comment(state: &AppState, id: Uuid) -> AppResult<Comment> {
    state.comments.find_by_id(id).await?.ok_or_else(|| {
        AppError::from(DomainError::NotFound {
            entity_type: "comment",
            id,
        })
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test, web};

    use agora_core::domain::{Question, User};
    use agora_core::ports::{
        BaseRepository, PasswordService, QuestionRepository, TokenService,
    };
    use agora_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
    use agora_shared::dto::{QuestionForm, QuestionListResponse};

    use crate::state::AppState;

    use super::configure_routes;

    fn services() -> (Arc<dyn TokenService>, Arc<dyn PasswordService>) {
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }));
        let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        (token_service, password_service)
    }

    macro_rules! test_app {
        ($state:expr, $tokens:expr, $passwords:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new($tokens.clone()))
                    .app_data(web::Data::new($passwords.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    async fn seed_user(state: &AppState, username: &str) -> User {
        state
            .users
            .insert(User::new(
                username.to_string(),
                format!("{username}@example.com"),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }

    fn bearer(tokens: &Arc<dyn TokenService>, user: &User) -> (header::HeaderName, String) {
        let token = tokens.generate_token(user.id, &user.username).unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn anonymous_index_serves_page_one_recent() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let author = seed_user(&state, "alice").await;
        for i in 0..3 {
            state
                .questions
                .insert(Question::new(format!("q{i}"), "c".to_string(), author.id))
                .await
                .unwrap();
        }
        let app = test_app!(state, tokens, passwords);

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: QuestionListResponse = test::read_body_json(resp).await;
        assert_eq!(body.page, 1);
        assert_eq!(body.so, "recent");
        assert_eq!(body.total, 3);
        assert_eq!(body.questions.len(), 3);
    }

    #[actix_web::test]
    async fn unauthenticated_mutation_redirects_to_login() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let app = test_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/question/create/")
            .set_form(QuestionForm {
                subject: "s".to_string(),
                content: "c".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/auth/login/"
        );
    }

    #[actix_web::test]
    async fn owner_modifies_non_owner_forbidden() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let owner = seed_user(&state, "alice").await;
        let other = seed_user(&state, "bob").await;
        let question = state
            .questions
            .insert(Question::new("before".to_string(), "c".to_string(), owner.id))
            .await
            .unwrap();
        let app = test_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri(&format!("/question/modify/{}/", question.id))
            .insert_header(bearer(&tokens, &other))
            .set_form(QuestionForm {
                subject: "after".to_string(),
                content: "c".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri(&format!("/question/modify/{}/", question.id))
            .insert_header(bearer(&tokens, &owner))
            .set_form(QuestionForm {
                subject: "after".to_string(),
                content: "c".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let stored = state.questions.find_by_id(question.id).await.unwrap().unwrap();
        assert_eq!(stored.subject, "after");
        assert_eq!(stored.modified_by, owner.id);
    }

    #[actix_web::test]
    async fn blank_form_is_rejected_without_state_change() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let user = seed_user(&state, "alice").await;
        let app = test_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/question/create/")
            .insert_header(bearer(&tokens, &user))
            .set_form(QuestionForm {
                subject: "   ".to_string(),
                content: "".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let page = state
            .questions
            .list(&agora_core::list::ListParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[actix_web::test]
    async fn own_vote_redirects_with_error_and_changes_nothing() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let owner = seed_user(&state, "alice").await;
        let question = state
            .questions
            .insert(Question::new("s".to_string(), "c".to_string(), owner.id))
            .await
            .unwrap();
        let app = test_app!(state, tokens, passwords);

        let req = test::TestRequest::get()
            .uri(&format!("/vote/question/{}/", question.id))
            .insert_header(bearer(&tokens, &owner))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.contains("error=cannot+vote+on+your+own+post"));
        assert!(state.questions.voters(question.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn non_owner_vote_lands_once_even_when_repeated() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let owner = seed_user(&state, "alice").await;
        let voter = seed_user(&state, "bob").await;
        let question = state
            .questions
            .insert(Question::new("s".to_string(), "c".to_string(), owner.id))
            .await
            .unwrap();
        let app = test_app!(state, tokens, passwords);

        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri(&format!("/vote/question/{}/", question.id))
                .insert_header(bearer(&tokens, &voter))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        }

        assert_eq!(
            state.questions.voters(question.id).await.unwrap(),
            vec![voter.id]
        );
    }

    #[actix_web::test]
    async fn register_login_and_post_flow() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let app = test_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/auth/register/")
            .set_form(agora_shared::dto::RegisterForm {
                username: "carol".to_string(),
                email: "carol@example.com".to_string(),
                password: "a-long-password".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_form(agora_shared::dto::LoginForm {
                username: "carol".to_string(),
                password: "a-long-password".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == crate::middleware::auth::SESSION_COOKIE)
            .expect("login sets the session cookie");

        let req = test::TestRequest::post()
            .uri("/question/create/")
            .cookie(cookie.into_owned())
            .set_form(QuestionForm {
                subject: "first".to_string(),
                content: "post".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let page = state
            .questions
            .list(&agora_core::list::ListParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[actix_web::test]
    async fn detail_view_assembles_answers_and_comments() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let author = seed_user(&state, "alice").await;
        let question = state
            .questions
            .insert(Question::new("s".to_string(), "c".to_string(), author.id))
            .await
            .unwrap();
        let answer = state
            .answers
            .insert(agora_core::domain::Answer::new(
                question.id,
                "an answer".to_string(),
                author.id,
            ))
            .await
            .unwrap();
        state
            .comments
            .insert(agora_core::domain::Comment::on_answer(
                answer.id,
                "a remark".to_string(),
                author.id,
            ))
            .await
            .unwrap();
        let app = test_app!(state, tokens, passwords);

        let req = test::TestRequest::get()
            .uri(&format!("/{}/", question.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: agora_shared::dto::QuestionDetailResponse = test::read_body_json(resp).await;
        assert_eq!(body.id, question.id);
        assert_eq!(body.answers.len(), 1);
        assert_eq!(body.answers[0].comments.len(), 1);
    }

    #[actix_web::test]
    async fn unknown_question_detail_is_404() {
        let state = AppState::in_memory();
        let (tokens, passwords) = services();
        let app = test_app!(state, tokens, passwords);

        let missing_id = uuid::Uuid::new_v4();
        let req = test::TestRequest::get()
            .uri(&format!("/{missing_id}/"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("question"));
        assert!(body.contains(&missing_id.to_string()));
    }
}
