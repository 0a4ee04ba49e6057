use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::artifacts::ArtifactError;
use crate::ranking::RankingError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Configuration error
    ConfigError(String),
    /// Model or encoder file could not be loaded
    MissingArtifact(String),
    /// Login attempt with a wrong username or password
    InvalidCredentials,
    /// Request without a logged-in session
    Unauthorized(String),
    /// Label outside the encoder's trained set
    UnknownLabel(String),
    /// Encoding or model inference failed
    PredictionFailed(String),
    /// Malformed request input
    BadRequest(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::MissingArtifact(msg) => {
                write!(f, "Unable to load models or encoders: {}", msg)
            }
            Self::InvalidCredentials => write!(f, "Invalid username or password"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::UnknownLabel(msg) => write!(f, "Unknown label: {}", msg),
            Self::PredictionFailed(msg) => write!(f, "Prediction failed: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingArtifact(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::UnknownLabel(_) => StatusCode::BAD_REQUEST,
            Self::PredictionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

pub fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigError(_) => "config_error",
        AppError::MissingArtifact(_) => "missing_artifact",
        AppError::InvalidCredentials => "invalid_credentials",
        AppError::Unauthorized(_) => "unauthorized",
        AppError::UnknownLabel(_) => "unknown_label",
        AppError::PredictionFailed(_) => "prediction_failed",
        AppError::BadRequest(_) => "bad_request",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<ArtifactError> for AppError {
    fn from(err: ArtifactError) -> Self {
        Self::MissingArtifact(err.to_string())
    }
}

impl From<RankingError> for AppError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::UnknownLabel(e) => Self::UnknownLabel(e.to_string()),
            RankingError::PredictionFailed(msg) => Self::PredictionFailed(msg),
        }
    }
}

/// Unparseable or incomplete JSON bodies surface as 400s in the usual error shape
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncoderError;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        let error = AppError::PredictionFailed("model returned 3 predictions for 100 rows".to_string());
        assert_eq!(
            error.to_string(),
            "Prediction failed: model returned 3 predictions for 100 rows"
        );
        assert_eq!(AppError::InvalidCredentials.to_string(), "Invalid username or password");
    }

    #[test]
    fn test_error_type_name() {
        assert_eq!(error_type_name(&AppError::InvalidCredentials), "invalid_credentials");
        assert_eq!(error_type_name(&AppError::UnknownLabel("x".to_string())), "unknown_label");
    }

    #[test]
    fn test_ranking_error_conversion_keeps_kind() {
        let unknown = RankingError::UnknownLabel(EncoderError::UnknownLabel {
            encoder: "inpatient-state".to_string(),
            label: "ZZ".to_string(),
        });
        assert!(matches!(AppError::from(unknown), AppError::UnknownLabel(_)));

        let failed = RankingError::PredictionFailed("boom".to_string());
        assert!(matches!(AppError::from(failed), AppError::PredictionFailed(m) if m == "boom"));
    }

    #[test]
    fn test_artifact_error_maps_to_missing_artifact() {
        let err = ArtifactError::Missing {
            path: PathBuf::from("inpatient_model.json"),
        };
        let app: AppError = err.into();
        assert!(app.to_string().contains("inpatient_model.json"));
    }

    #[tokio::test]
    async fn test_json_rejection_maps_to_bad_request() {
        use axum::{body::Body, extract::FromRequest, http::Request};

        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"username":"admin"}"#))
            .unwrap();
        let rejection = Json::<crate::handlers::session::LoginRequest>::from_request(request, &())
            .await
            .unwrap_err();

        let error = AppError::from(rejection);
        assert!(matches!(&error, AppError::BadRequest(msg) if msg.contains("password")));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_error_response() {
        let response = AppError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::MissingArtifact("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
