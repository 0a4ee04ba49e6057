use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::AppState;
use crate::{
    auth::AuthInfo,
    error::{error_type_name, AppError},
    metrics,
    ranking::{self, RankedProvider, SelectorOptions, ServiceType},
};

#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    pub service_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub service_type: String,
    pub procedure: String,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankResponse {
    pub service_type: ServiceType,
    pub procedure: String,
    pub state: String,
    pub results: Vec<RankedProvider>,
}

fn parse_service_type(raw: &str) -> Result<ServiceType, AppError> {
    raw.parse().map_err(AppError::BadRequest)
}

/// Handle GET /api/options
/// Returns the procedure and state labels for a service type (Inpatient by default)
pub async fn options(
    State(state): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<SelectorOptions>, AppError> {
    let service_type = match query.service_type.as_deref() {
        Some(raw) => parse_service_type(raw)?,
        None => ServiceType::Inpatient,
    };

    let artifacts = state.artifacts.artifacts()?;
    Ok(Json(ranking::selector_options(&artifacts, service_type)))
}

/// Handle POST /api/rank
pub async fn rank(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<RankResponse>, AppError> {
    let Json(request) = payload?;
    let start = Instant::now();
    let service_type = parse_service_type(&request.service_type)?;

    tracing::info!(
        username = %auth.username,
        service_type = %service_type,
        procedure = %request.procedure,
        state = %request.state,
        "Handling ranking request"
    );

    let artifacts = state.artifacts.artifacts()?;

    let results = ranking::rank_top3(&artifacts, service_type, &request.procedure, &request.state)
        .map_err(AppError::from);

    metrics::record_ranking_duration(service_type.as_str(), start.elapsed());

    let results = match results {
        Ok(results) => {
            metrics::record_ranking(service_type.as_str(), "success");
            results
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ranking failed");
            metrics::record_ranking(service_type.as_str(), error_type_name(&e));
            return Err(e);
        }
    };

    Ok(Json(RankResponse {
        service_type,
        procedure: request.procedure,
        state: request.state,
        results,
    }))
}
