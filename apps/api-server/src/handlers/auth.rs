//! Authentication handlers: register, login, logout.

use std::sync::Arc;

use actix_web::cookie::{Cookie, time::Duration};
use actix_web::{HttpResponse, http::header, web};

use agora_core::DomainError;
use agora_core::domain::User;
use agora_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use agora_shared::dto::{LoginForm, RegisterForm};

use crate::middleware::auth::SESSION_COOKIE;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::see_other;

fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// POST /auth/register/ - create an account and start a session.
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    form.validate().map_err(DomainError::Validation)?;

    if state.users.find_by_username(&form.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = password_service
        .hash(&form.password)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let user = User::new(form.username, form.email, password_hash);
    let user = state.users.insert(user).await?;

    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    tracing::info!(username = %user.username, "registered new user");

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(session_cookie(token, token_service.expiration_seconds()))
        .finish())
}

/// POST /auth/login/ - verify credentials and set the session cookie.
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let user = state
        .users
        .find_by_username(&form.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&form.password, &user.password_hash)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(session_cookie(token, token_service.expiration_seconds()))
        .finish())
}

/// GET /auth/logout/ - clear the session cookie.
pub async fn logout() -> AppResult<HttpResponse> {
    let mut response = see_other("/");
    let cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    response
        .add_removal_cookie(&cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}
