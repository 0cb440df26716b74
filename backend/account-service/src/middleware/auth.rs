/// JWT middleware: validates the Authorization header and stashes the
/// authenticated account id in request extensions for handlers to pick up.
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::security::jwt;
use crate::AppState;

/// Authenticated caller, extracted from request extensions after
/// [`require_auth`] has run.
#[derive(Debug, Clone, Copy)]
pub struct AuthAccount {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthAccount>()
            .copied()
            .ok_or(ApiError::MissingToken)
    }
}

/// Verify the session token and record the caller in extensions.
///
/// The header carries the raw token; a `Bearer ` prefix is tolerated for
/// standard clients. A missing or empty header is unauthorized; a present
/// but unverifiable token is a bad request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::MissingToken)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value);
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    let claims = jwt::verify_token(token, &state.settings.jwt_secret)?;

    req.extensions_mut().insert(AuthAccount { id: claims.id });
    Ok(next.run(req).await)
}
