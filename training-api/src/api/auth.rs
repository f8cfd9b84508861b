//! Authentication middleware for training-api
//!
//! Every resource route requires a token, sent either as
//! `Authorization: Bearer <token>` or in the `X-Auth-Token` header. The
//! token is resolved through the [`Directory`](crate::directory::Directory)
//! and the resulting [`Caller`] is stored in the request extensions.
//!
//! **Note:** `/health` does NOT use this middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::directory::{Caller, DirectoryError, AUTH_TOKEN_HEADER};
use crate::error::ApiError;
use crate::AppState;

/// Extract the caller's token from the request headers
///
/// `Authorization: Bearer` wins when both headers are present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let token = bearer.or_else(|| {
        headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    })?;

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Authentication middleware
///
/// Returns 401 when no token is sent or the directory rejects it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("no token in request".to_string()))?;

    let caller: Caller = match state.directory.authenticate(&token).await {
        Ok(caller) => caller,
        Err(DirectoryError::Rejected(status)) => {
            return Err(ApiError::Unauthorized(format!(
                "membership service rejected token (HTTP {})",
                status
            )));
        }
        Err(e) => {
            warn!("Token lookup failed: {}", e);
            return Err(ApiError::Internal(e.to_string()));
        }
    };

    debug!(
        user_id = caller.user_id,
        member_id = caller.member_id,
        "Request authenticated"
    );
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}
