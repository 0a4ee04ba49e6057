//! Ranking pipeline: predict the cost of one hypothetical visit at every
//! candidate provider and keep the cheapest three.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::artifacts::Artifacts;
use crate::encoder::{EncoderError, LabelEncoder};
use crate::model::{FeatureRow, ModelError, RegressionModel};

/// First synthetic provider ID
pub const PROVIDER_ID_START: i64 = 520_000;
/// Number of contiguous synthetic provider IDs
pub const PROVIDER_COUNT: i64 = 100;
/// Placeholder discharge volume shared by every candidate row
pub const TOTAL_DISCHARGE: i64 = 100;
/// Placeholder covered charges shared by every candidate row
pub const AVG_COVERED_CHARGES: i64 = 15_000;
pub const TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    #[error(transparent)]
    UnknownLabel(#[from] EncoderError),

    #[error("prediction failed: {0}")]
    PredictionFailed(String),
}

impl From<ModelError> for RankingError {
    fn from(err: ModelError) -> Self {
        Self::PredictionFailed(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Inpatient,
    Outpatient,
}

impl ServiceType {
    pub const ALL: [ServiceType; 2] = [ServiceType::Inpatient, ServiceType::Outpatient];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Inpatient => "Inpatient",
            ServiceType::Outpatient => "Outpatient",
        }
    }

    /// Label of the procedure coding system used by this service type
    pub fn procedure_code_system(&self) -> &'static str {
        match self {
            ServiceType::Inpatient => "DRG",
            ServiceType::Outpatient => "APC",
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inpatient" => Ok(ServiceType::Inpatient),
            "outpatient" => Ok(ServiceType::Outpatient),
            _ => Err(format!(
                "Invalid service type '{}': expected Inpatient or Outpatient",
                s
            )),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the ranking result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProvider {
    #[serde(rename = "Rank")]
    pub rank: u32,
    #[serde(rename = "Provider_Id")]
    pub provider_id: i64,
    #[serde(rename = "Average_Total_Payments")]
    pub average_total_payments: f64,
}

/// Labels available to the procedure and state selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    pub service_type: ServiceType,
    pub procedures: Vec<String>,
    pub states: Vec<String>,
}

struct Selection<'a> {
    model: &'a dyn RegressionModel,
    procedures: &'a LabelEncoder,
    states: &'a LabelEncoder,
}

fn select(artifacts: &Artifacts, service_type: ServiceType) -> Selection<'_> {
    let models = artifacts.models.as_ref();
    let encoders = artifacts.encoders.as_ref();
    match service_type {
        ServiceType::Inpatient => Selection {
            model: models.inpatient.as_ref(),
            procedures: &encoders.inpatient_drg,
            states: &encoders.inpatient_state,
        },
        ServiceType::Outpatient => Selection {
            model: models.outpatient.as_ref(),
            procedures: &encoders.outpatient_apc,
            states: &encoders.outpatient_state,
        },
    }
}

pub fn selector_options(artifacts: &Artifacts, service_type: ServiceType) -> SelectorOptions {
    let selection = select(artifacts, service_type);
    SelectorOptions {
        service_type,
        procedures: selection.procedures.classes().to_vec(),
        states: selection.states.classes().to_vec(),
    }
}

/// The synthetic provider ID range
pub fn provider_ids() -> impl Iterator<Item = i64> {
    PROVIDER_ID_START..PROVIDER_ID_START + PROVIDER_COUNT
}

/// Candidate table: the same visit at every synthetic provider
pub fn candidate_rows(procedure: i64, state: i64) -> Vec<FeatureRow> {
    provider_ids()
        .map(|provider_id| FeatureRow {
            procedure,
            provider_id,
            provider_state: state,
            total_discharge: TOTAL_DISCHARGE,
            avg_covered_charges: AVG_COVERED_CHARGES,
        })
        .collect()
}

/// Sort predictions ascending (stable, so ties keep table order), assign
/// dense 1-based ranks and keep the first `limit`.
pub fn rank_predictions(
    rows: &[FeatureRow],
    predictions: &[f64],
    limit: usize,
) -> Result<Vec<RankedProvider>, RankingError> {
    if rows.len() != predictions.len() {
        return Err(RankingError::PredictionFailed(format!(
            "model returned {} predictions for {} rows",
            predictions.len(),
            rows.len()
        )));
    }
    if let Some(idx) = predictions.iter().position(|p| !p.is_finite()) {
        return Err(RankingError::PredictionFailed(format!(
            "non-finite prediction for provider {}",
            rows[idx].provider_id
        )));
    }

    let mut scored: Vec<(&FeatureRow, f64)> = rows.iter().zip(predictions.iter().copied()).collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(pos, (row, cost))| RankedProvider {
            rank: pos as u32 + 1,
            provider_id: row.provider_id,
            average_total_payments: cost,
        })
        .collect())
}

/// Rank the three cheapest predicted providers for a procedure and state
pub fn rank_top3(
    artifacts: &Artifacts,
    service_type: ServiceType,
    procedure_label: &str,
    state_label: &str,
) -> Result<Vec<RankedProvider>, RankingError> {
    let selection = select(artifacts, service_type);

    let procedure = selection.procedures.encode(procedure_label)?;
    let state = selection.states.encode(state_label)?;

    let rows = candidate_rows(procedure, state);
    let predictions = selection.model.predict(&rows)?;

    tracing::debug!(
        service_type = %service_type,
        model = selection.model.kind(),
        procedure = procedure,
        state = state,
        candidates = rows.len(),
        "Scored candidate providers"
    );

    rank_predictions(&rows, &predictions, TOP_N)
}
