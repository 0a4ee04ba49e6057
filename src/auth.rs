use crate::{error::AppError, handlers::AppState};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authentication information attached to each authenticated request
#[derive(Debug, Clone)]
pub struct AuthInfo {
    /// Session token presented by the client
    pub token: Uuid,
    /// User logged in on that session
    pub username: String,
}

/// Authentication middleware
/// Resolves the Bearer session token and requires a logged-in session
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(req.headers())?
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let session = state.sessions.get(&token);
    let username = session
        .username()
        .ok_or_else(|| AppError::Unauthorized("Please log in first".to_string()))?
        .to_string();

    req.extensions_mut().insert(AuthInfo { token, username });

    Ok(next.run(req).await)
}

/// Session token from the Authorization header, if one is present
pub fn session_token(headers: &HeaderMap) -> Result<Option<Uuid>, AppError> {
    let Some(header) = headers.get("Authorization") else {
        return Ok(None);
    };

    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Authorization header is not valid text".to_string()))?;
    let token = extract_bearer_token(header)?;

    Uuid::parse_str(token)
        .map(Some)
        .map_err(|_| AppError::Unauthorized("Malformed session token".to_string()))
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    const BEARER_PREFIX: &str = "Bearer ";

    let Some(token) = auth_header.strip_prefix(BEARER_PREFIX) else {
        return Err(AppError::Unauthorized(
            "Authorization header must use Bearer scheme".to_string(),
        ));
    };

    if token.is_empty() {
        return Err(AppError::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token)
}
