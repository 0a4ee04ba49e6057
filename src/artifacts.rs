//! Loading and caching of the model and encoder artifacts.
//!
//! Artifacts live under a single directory with fixed file names. They are
//! read at most once per [`ArtifactCache`]; every later call gets the same
//! `Arc` (or the same cached error) back without touching the disk.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{error, info};

use crate::encoder::LabelEncoder;
use crate::model::{ModelArtifact, RegressionModel};

pub const INPATIENT_MODEL_FILE: &str = "inpatient_model.json";
pub const OUTPATIENT_MODEL_FILE: &str = "outpatient_model.json";
pub const INPATIENT_DRG_ENCODER_FILE: &str = "le_drg.json";
pub const INPATIENT_STATE_ENCODER_FILE: &str = "le_state.json";
pub const OUTPATIENT_APC_ENCODER_FILE: &str = "le_drg_outpatient.json";
pub const OUTPATIENT_STATE_ENCODER_FILE: &str = "le_state_outpatient.json";

/// Every file the loader needs, in load order
pub const ARTIFACT_FILES: [&str; 6] = [
    INPATIENT_MODEL_FILE,
    OUTPATIENT_MODEL_FILE,
    INPATIENT_DRG_ENCODER_FILE,
    INPATIENT_STATE_ENCODER_FILE,
    OUTPATIENT_APC_ENCODER_FILE,
    OUTPATIENT_STATE_ENCODER_FILE,
];

#[derive(Debug, Clone, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read artifact {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("malformed artifact {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

impl ArtifactError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Missing { path } | Self::Io { path, .. } | Self::Malformed { path, .. } => path,
        }
    }
}

/// Regression models, one per service type
#[derive(Debug, Clone)]
pub struct ModelPair {
    pub inpatient: Arc<dyn RegressionModel>,
    pub outpatient: Arc<dyn RegressionModel>,
}

/// Label encoders, one per (service type, feature) pair
#[derive(Debug, Clone)]
pub struct EncoderSet {
    pub inpatient_drg: LabelEncoder,
    pub inpatient_state: LabelEncoder,
    pub outpatient_apc: LabelEncoder,
    pub outpatient_state: LabelEncoder,
}

/// Everything the ranking pipeline needs
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub models: Arc<ModelPair>,
    pub encoders: Arc<EncoderSet>,
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ArtifactError> {
    let path = dir.join(file);

    let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::Missing { path: path.clone() },
        _ => ArtifactError::Io {
            path: path.clone(),
            message: e.to_string(),
        },
    })?;

    serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Malformed {
        path,
        message: e.to_string(),
    })
}

fn read_encoder(dir: &Path, file: &str, name: &str) -> Result<LabelEncoder, ArtifactError> {
    read_json::<LabelEncoder>(dir, file).map(|enc| enc.named(name))
}

pub fn load_models(dir: &Path) -> Result<ModelPair, ArtifactError> {
    let inpatient: ModelArtifact = read_json(dir, INPATIENT_MODEL_FILE)?;
    let outpatient: ModelArtifact = read_json(dir, OUTPATIENT_MODEL_FILE)?;

    Ok(ModelPair {
        inpatient: Arc::new(inpatient),
        outpatient: Arc::new(outpatient),
    })
}

pub fn load_encoders(dir: &Path) -> Result<EncoderSet, ArtifactError> {
    Ok(EncoderSet {
        inpatient_drg: read_encoder(dir, INPATIENT_DRG_ENCODER_FILE, "inpatient-procedure")?,
        inpatient_state: read_encoder(dir, INPATIENT_STATE_ENCODER_FILE, "inpatient-state")?,
        outpatient_apc: read_encoder(dir, OUTPATIENT_APC_ENCODER_FILE, "outpatient-procedure")?,
        outpatient_state: read_encoder(dir, OUTPATIENT_STATE_ENCODER_FILE, "outpatient-state")?,
    })
}

/// Once-initialized holder for loaded artifacts
#[derive(Debug)]
pub struct ArtifactCache {
    dir: PathBuf,
    models: OnceLock<Result<Arc<ModelPair>, ArtifactError>>,
    encoders: OnceLock<Result<Arc<EncoderSet>, ArtifactError>>,
}

impl ArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            models: OnceLock::new(),
            encoders: OnceLock::new(),
        }
    }

    pub fn models(&self) -> Result<Arc<ModelPair>, ArtifactError> {
        self.models
            .get_or_init(|| {
                let loaded = load_models(&self.dir).map(Arc::new);
                match &loaded {
                    Ok(m) => info!(
                        dir = %self.dir.display(),
                        inpatient = m.inpatient.kind(),
                        outpatient = m.outpatient.kind(),
                        "Loaded regression models"
                    ),
                    Err(e) => error!(error = %e, "Model files not found or unreadable"),
                }
                loaded
            })
            .clone()
    }

    pub fn encoders(&self) -> Result<Arc<EncoderSet>, ArtifactError> {
        self.encoders
            .get_or_init(|| {
                let loaded = load_encoders(&self.dir).map(Arc::new);
                match &loaded {
                    Ok(e) => info!(
                        dir = %self.dir.display(),
                        drg_labels = e.inpatient_drg.len(),
                        apc_labels = e.outpatient_apc.len(),
                        "Loaded label encoders"
                    ),
                    Err(e) => error!(error = %e, "Encoder files not found or unreadable"),
                }
                loaded
            })
            .clone()
    }

    /// Models and encoders together, or the first load failure
    pub fn artifacts(&self) -> Result<Artifacts, ArtifactError> {
        let models = self.models()?;
        let encoders = self.encoders()?;
        Ok(Artifacts { models, encoders })
    }
}
