use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictorError>;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact file could not be decoded
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("unknown category '{category}' for feature '{feature}'")]
    UnknownCategory { feature: String, category: String },

    #[error("code {code} is outside the {len} known classes")]
    UnknownCode { code: usize, len: usize },

    /// Feature vector width does not match the classifier input width
    #[error("feature vector has {actual} values, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no label encoder for feature '{0}'")]
    MissingEncoder(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("report generation failed: {0}")]
    Report(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
