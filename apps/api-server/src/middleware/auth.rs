//! Authentication extractor.
//!
//! Mutation handlers take an [`Identity`] parameter; a request without a
//! valid session is answered with a 303 redirect to the login flow
//! rather than a 401, because clients drive the board through redirects.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header};

use agora_core::ports::{TokenClaims, TokenService};

/// Cookie holding the session token.
pub const SESSION_COOKIE: &str = "agora_session";

/// Authenticated user identity, decoded from the session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Missing or invalid session credentials.
///
/// Renders as a redirect to `/auth/login/` regardless of the exact
/// failure; the reason is only logged.
#[derive(Debug)]
pub struct LoginRedirect;

impl std::fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "authentication required")
    }
}

impl actix_web::ResponseError for LoginRedirect {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/auth/login/"))
            .finish()
    }
}

/// Pull the session token from the cookie, or from a Bearer header for
/// non-browser clients.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl FromRequest for Identity {
    type Error = LoginRedirect;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(LoginRedirect));
            }
        };

        let Some(token) = session_token(req) else {
            return ready(Err(LoginRedirect));
        };

        match token_service.validate_token(&token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                ready(Err(LoginRedirect))
            }
        }
    }
}
