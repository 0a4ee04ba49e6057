//! Label encoding for categorical features.
//!
//! A [`LabelEncoder`] maps each trained label to its position in the
//! class list. Only labels seen at training time can be encoded; there is
//! no fallback code for unseen input.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("unknown label '{label}' for encoder '{encoder}'")]
    UnknownLabel { encoder: String, label: String },

    #[error("unknown code {code} for encoder '{encoder}' ({size} classes)")]
    UnknownCode {
        encoder: String,
        code: i64,
        size: usize,
    },

    #[error("duplicate label '{0}' in encoder classes")]
    DuplicateLabel(String),
}

/// On-disk shape of an encoder artifact
#[derive(Debug, Clone, Deserialize, Serialize)]
struct EncoderFile {
    classes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(try_from = "EncoderFile", into = "EncoderFile")]
pub struct LabelEncoder {
    name: String,
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl TryFrom<EncoderFile> for LabelEncoder {
    type Error = EncoderError;

    fn try_from(file: EncoderFile) -> Result<Self, Self::Error> {
        Self::from_classes(file.classes)
    }
}

impl From<LabelEncoder> for EncoderFile {
    fn from(encoder: LabelEncoder) -> Self {
        EncoderFile {
            classes: encoder.classes,
        }
    }
}

impl LabelEncoder {
    /// Build an encoder from an ordered class list. Labels must be unique.
    pub fn from_classes<I, S>(classes: I) -> Result<Self, EncoderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(classes.len());

        for (code, label) in classes.iter().enumerate() {
            if index.insert(label.clone(), code).is_some() {
                return Err(EncoderError::DuplicateLabel(label.clone()));
            }
        }

        Ok(Self {
            name: String::from("unnamed"),
            classes,
            index,
        })
    }

    /// Attach a name used in error messages
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trained labels in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn encode(&self, label: &str) -> Result<i64, EncoderError> {
        self.index
            .get(label)
            .map(|&code| code as i64)
            .ok_or_else(|| EncoderError::UnknownLabel {
                encoder: self.name.clone(),
                label: label.to_string(),
            })
    }

    pub fn decode(&self, code: i64) -> Result<&str, EncoderError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .ok_or_else(|| EncoderError::UnknownCode {
                encoder: self.name.clone(),
                code,
                size: self.classes.len(),
            })
    }

    /// Encode a batch of labels, failing on the first unseen one
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<i64>, EncoderError> {
        labels.iter().map(|l| self.encode(l.as_ref())).collect()
    }

    pub fn inverse_transform(&self, codes: &[i64]) -> Result<Vec<&str>, EncoderError> {
        codes.iter().map(|&c| self.decode(c)).collect()
    }
}
