//! Regression models over the provider candidate feature schema.
//!
//! Models are opaque to the ranking pipeline: it only calls
//! [`RegressionModel::predict`] on a batch of [`FeatureRow`]s. Two
//! backends can be loaded from artifact files, a linear model and a
//! decision-tree ensemble (forest or boosted trees).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("feature '{0}' listed more than once")]
    DuplicateFeature(String),

    #[error("expected {expected} coefficients, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("tree ensemble has no trees")]
    EmptyEnsemble,

    #[error("tree {tree}, node {node}: {reason}")]
    InvalidTree {
        tree: usize,
        node: usize,
        reason: String,
    },

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Columns of the candidate table, in the order the models were trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Procedure,
    ProviderId,
    ProviderState,
    TotalDischarge,
    AvgCoveredCharges,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Procedure,
        Feature::ProviderId,
        Feature::ProviderState,
        Feature::TotalDischarge,
        Feature::AvgCoveredCharges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Procedure => "Procedure",
            Feature::ProviderId => "Provider_Id",
            Feature::ProviderState => "Provider_State",
            Feature::TotalDischarge => "Total_Discharge",
            Feature::AvgCoveredCharges => "Avg_covered_charges",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Feature::Procedure => 0,
            Feature::ProviderId => 1,
            Feature::ProviderState => 2,
            Feature::TotalDischarge => 3,
            Feature::AvgCoveredCharges => 4,
        }
    }
}

impl FromStr for Feature {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ModelError::UnknownFeature(s.to_string()))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the candidate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRow {
    #[serde(rename = "Procedure")]
    pub procedure: i64,
    #[serde(rename = "Provider_Id")]
    pub provider_id: i64,
    #[serde(rename = "Provider_State")]
    pub provider_state: i64,
    #[serde(rename = "Total_Discharge")]
    pub total_discharge: i64,
    #[serde(rename = "Avg_covered_charges")]
    pub avg_covered_charges: i64,
}

impl FeatureRow {
    pub fn get(&self, feature: Feature) -> f64 {
        let value = match feature {
            Feature::Procedure => self.procedure,
            Feature::ProviderId => self.provider_id,
            Feature::ProviderState => self.provider_state,
            Feature::TotalDischarge => self.total_discharge,
            Feature::AvgCoveredCharges => self.avg_covered_charges,
        };
        value as f64
    }

    pub fn as_array(&self) -> [f64; 5] {
        Feature::ALL.map(|f| self.get(f))
    }
}

/// A frozen regression model: one predicted cost per input row
pub trait RegressionModel: Send + Sync + fmt::Debug {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError>;

    /// Backend identifier used in logs
    fn kind(&self) -> &str;
}

// ============================================================
// Linear model
// ============================================================

#[derive(Debug, Clone, Deserialize)]
struct LinearFile {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "LinearFile")]
pub struct LinearModel {
    weights: [f64; 5],
    intercept: f64,
}

impl LinearModel {
    /// Weights indexed by [`Feature::index`]
    pub fn new(weights: [f64; 5], intercept: f64) -> Self {
        Self { weights, intercept }
    }

    fn predict_row(&self, row: &FeatureRow) -> f64 {
        row.as_array()
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept
    }
}

impl TryFrom<LinearFile> for LinearModel {
    type Error = ModelError;

    fn try_from(file: LinearFile) -> Result<Self, Self::Error> {
        if file.feature_names.len() != file.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                expected: file.feature_names.len(),
                actual: file.coefficients.len(),
            });
        }

        let mut weights = [0.0; 5];
        let mut seen = [false; 5];
        for (name, coef) in file.feature_names.iter().zip(file.coefficients) {
            let idx = name.parse::<Feature>()?.index();
            if seen[idx] {
                return Err(ModelError::DuplicateFeature(name.clone()));
            }
            seen[idx] = true;
            weights[idx] = coef;
        }

        Ok(Self::new(weights, file.intercept))
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        Ok(rows.iter().map(|r| self.predict_row(r)).collect())
    }

    fn kind(&self) -> &str {
        "linear"
    }
}

// ============================================================
// Tree ensemble
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Average of tree outputs (random forest)
    #[default]
    Mean,
    /// Sum of tree outputs (gradient boosting)
    Sum,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NodeFile {
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct TreeFile {
    nodes: Vec<NodeFile>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnsembleFile {
    #[serde(default)]
    aggregation: Aggregation,
    #[serde(default)]
    base_score: f64,
    trees: Vec<TreeFile>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: Feature,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

#[derive(Debug, Clone, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_file(tree_idx: usize, file: TreeFile) -> Result<Self, ModelError> {
        let len = file.nodes.len();
        if len == 0 {
            return Err(ModelError::InvalidTree {
                tree: tree_idx,
                node: 0,
                reason: "tree has no nodes".to_string(),
            });
        }

        let mut nodes = Vec::with_capacity(len);
        for (idx, node) in file.nodes.into_iter().enumerate() {
            let node = match node {
                NodeFile::Leaf { value } => Node::Leaf(value),
                NodeFile::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Children must point forward so traversal always terminates
                    for child in [left, right] {
                        if child <= idx || child >= len {
                            return Err(ModelError::InvalidTree {
                                tree: tree_idx,
                                node: idx,
                                reason: format!("child index {} out of range", child),
                            });
                        }
                    }
                    Node::Split {
                        feature: feature.parse()?,
                        threshold,
                        left,
                        right,
                    }
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    fn evaluate(&self, row: &FeatureRow) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "EnsembleFile")]
pub struct TreeEnsemble {
    aggregation: Aggregation,
    base_score: f64,
    trees: Vec<Tree>,
}

impl TryFrom<EnsembleFile> for TreeEnsemble {
    type Error = ModelError;

    fn try_from(file: EnsembleFile) -> Result<Self, Self::Error> {
        if file.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble);
        }

        let trees = file
            .trees
            .into_iter()
            .enumerate()
            .map(|(idx, tree)| Tree::from_file(idx, tree))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            aggregation: file.aggregation,
            base_score: file.base_score,
            trees,
        })
    }
}

impl TreeEnsemble {
    fn predict_row(&self, row: &FeatureRow) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        match self.aggregation {
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + total,
        }
    }
}

impl RegressionModel for TreeEnsemble {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        Ok(rows.iter().map(|r| self.predict_row(r)).collect())
    }

    fn kind(&self) -> &str {
        match self.aggregation {
            Aggregation::Mean => "random_forest",
            Aggregation::Sum => "gradient_boosting",
        }
    }
}

// ============================================================
// Artifact envelope
// ============================================================

/// Model artifact as stored on disk, tagged by `type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl RegressionModel for ModelArtifact {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        match self {
            ModelArtifact::Linear(m) => m.predict(rows),
            ModelArtifact::TreeEnsemble(m) => m.predict(rows),
        }
    }

    fn kind(&self) -> &str {
        match self {
            ModelArtifact::Linear(m) => m.kind(),
            ModelArtifact::TreeEnsemble(m) => m.kind(),
        }
    }
}
