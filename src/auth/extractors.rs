use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use crate::auth::{jwt::JwtKeys, session::session_token};
use crate::error::ApiError;

/// Identity resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Resolves the acting identity. Missing, malformed, forged and expired
/// tokens all yield `None`.
pub fn resolve_identity(jar: &CookieJar, keys: &JwtKeys) -> Option<AuthUser> {
    let token = session_token(jar)?;
    match keys.verify(token) {
        Ok(claims) => Some(AuthUser {
            id: claims.sub,
            email: claims.email,
        }),
        Err(e) => {
            warn!(error = %e, "invalid or expired session token");
            None
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        resolve_identity(&jar, &keys).ok_or_else(ApiError::not_authenticated)
    }
}
