//! Session authentication.
//!
//! Clients log in for a session token and send it back as
//! `Authorization: Bearer <token>`. Handlers that need a signed-in user take
//! an [`AuthUser`] argument; a missing, unknown or expired token is a 401.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub mod handlers;

/// The signed-in user behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

impl AuthUser {
    /// The account behind the session. A session can outlive its account,
    /// which is a 404 rather than a 401.
    pub async fn account(&self, state: &AppState) -> Result<User, AppError> {
        state
            .store
            .find_user_by_email(&self.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    Uuid::parse_str(token).ok()
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let session = state
            .store
            .find_session(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.is_expired(Utc::now()) {
            debug!("Rejected expired session for {}", session.email);
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            email: session.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parses_uuid() {
        let token = Uuid::new_v4();
        assert_eq!(bearer_token(&headers(&format!("Bearer {token}"))), Some(token));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer not-a-uuid")), None);
    }
}
