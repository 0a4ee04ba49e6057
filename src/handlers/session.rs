use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::{
    auth::{session_token, AuthInfo},
    credentials::SessionView,
    error::AppError,
    metrics,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub username: String,
    pub message: String,
}

/// Handle POST /api/login
/// A Bearer token already held by the client is replaced by the new one
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;
    let previous = session_token(&headers)?;

    let Some(token) = state.sessions.login(
        &state.credentials,
        &request.username,
        &request.password,
        previous.as_ref(),
    ) else {
        metrics::record_login("failure");
        return Err(AppError::InvalidCredentials);
    };

    metrics::record_login("success");

    Ok(Json(LoginResponse {
        token,
        message: format!("Welcome, {}!", request.username),
        username: request.username,
    }))
}

/// Handle POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
) -> Json<SessionView> {
    state.sessions.logout(&auth.token);
    tracing::info!(username = %auth.username, "Session closed");

    Json(SessionView {
        logged_in: false,
        username: None,
    })
}

/// Handle GET /api/session
/// Requests without a token report an anonymous session
pub async fn session_info(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionView>, AppError> {
    let session = match session_token(&headers)? {
        Some(token) => state.sessions.get(&token),
        None => Default::default(),
    };

    Ok(Json(SessionView::from(&session)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{artifacts::ArtifactCache, credentials::CredentialStore};

    fn create_test_state() -> AppState {
        AppState::new(
            CredentialStore::new([("admin", "password123")]),
            ArtifactCache::new("."),
        )
    }

    #[tokio::test]
    async fn test_login_success_registers_session() {
        let state = create_test_state();
        let response = login(
            State(state.clone()),
            HeaderMap::new(),
            Ok(Json(LoginRequest {
                username: "admin".to_string(),
                password: "password123".to_string(),
            })),
        )
        .await
        .unwrap();

        assert_eq!(response.username, "admin");
        assert_eq!(response.message, "Welcome, admin!");
        assert!(state.sessions.get(&response.token).logged_in());
    }

    #[tokio::test]
    async fn test_login_failure() {
        let state = create_test_state();
        let result = login(
            State(state.clone()),
            HeaderMap::new(),
            Ok(Json(LoginRequest {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            })),
        )
        .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_session_info_without_token() {
        let state = create_test_state();
        let view = session_info(State(state), HeaderMap::new()).await.unwrap();
        assert!(!view.logged_in);
        assert!(view.username.is_none());
    }
}
