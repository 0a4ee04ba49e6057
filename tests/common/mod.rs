//! Shared fixtures: a small but complete artifact directory.
#![allow(dead_code)]

use medirank::artifacts::{
    INPATIENT_DRG_ENCODER_FILE, INPATIENT_MODEL_FILE, INPATIENT_STATE_ENCODER_FILE,
    OUTPATIENT_APC_ENCODER_FILE, OUTPATIENT_MODEL_FILE, OUTPATIENT_STATE_ENCODER_FILE,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Forest whose cost depends on provider ID, procedure and state.
///
/// For DRG-001 in CA: IDs 520000..=520010 cost 8750, 520011..=520049 cost
/// 9300, 520050..=520099 cost 8900.
pub const INPATIENT_MODEL: &str = r#"{
    "type": "tree_ensemble",
    "aggregation": "mean",
    "trees": [
        {"nodes": [
            {"feature": "Provider_Id", "threshold": 520049.5, "left": 1, "right": 4},
            {"feature": "Procedure", "threshold": 0.5, "left": 2, "right": 3},
            {"value": 9500.0},
            {"value": 11000.0},
            {"value": 8700.0}
        ]},
        {"nodes": [
            {"feature": "Provider_Id", "threshold": 520010.5, "left": 1, "right": 2},
            {"value": 8000.0},
            {"feature": "Provider_State", "threshold": 3.5, "left": 3, "right": 4},
            {"value": 9100.0},
            {"value": 9300.0}
        ]}
    ]
}"#;

/// Cost rises by 1.5 per provider ID step; APC-0012 in NY starts at 1010
pub const OUTPATIENT_MODEL: &str = r#"{
    "type": "linear",
    "feature_names": ["Procedure", "Provider_Id", "Provider_State", "Total_Discharge", "Avg_covered_charges"],
    "coefficients": [40.0, 1.5, 10.0, 0.0, 0.0],
    "intercept": -779000.0
}"#;

pub const DRG_CLASSES: &str = r#"{"classes": ["DRG-001", "DRG-039", "DRG-057", "DRG-064"]}"#;
pub const INPATIENT_STATES: &str = r#"{"classes": ["AL", "CA", "FL", "NY", "TX"]}"#;
pub const APC_CLASSES: &str = r#"{"classes": ["APC-0012", "APC-0013", "APC-0015"]}"#;
pub const OUTPATIENT_STATES: &str = r#"{"classes": ["CA", "NY"]}"#;

pub fn write_artifacts(dir: &Path) {
    fs::write(dir.join(INPATIENT_MODEL_FILE), INPATIENT_MODEL).unwrap();
    fs::write(dir.join(OUTPATIENT_MODEL_FILE), OUTPATIENT_MODEL).unwrap();
    fs::write(dir.join(INPATIENT_DRG_ENCODER_FILE), DRG_CLASSES).unwrap();
    fs::write(dir.join(INPATIENT_STATE_ENCODER_FILE), INPATIENT_STATES).unwrap();
    fs::write(dir.join(OUTPATIENT_APC_ENCODER_FILE), APC_CLASSES).unwrap();
    fs::write(dir.join(OUTPATIENT_STATE_ENCODER_FILE), OUTPATIENT_STATES).unwrap();
}

pub fn artifact_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    dir
}
