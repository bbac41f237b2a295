use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::data::encoder::LabelEncoders;
use crate::data::schema::{FeatureSchema, TARGET_COLUMN};
use crate::error::{PredictorError, Result};
use crate::model::{Classifier, ModelArtifact};

/// Where the three pre-built artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub encoders: PathBuf,
    pub features: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        ArtifactPaths {
            model: PathBuf::from("ensemble_model.bin"),
            encoders: PathBuf::from("label_encoders.bin"),
            features: PathBuf::from("features.bin"),
        }
    }
}

/// Everything the prediction form needs, loaded once at start-up.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub model: ModelArtifact,
    pub encoders: LabelEncoders,
    pub schema: FeatureSchema,
}

impl Artifacts {
    pub fn new(model: ModelArtifact, encoders: LabelEncoders, schema: FeatureSchema) -> Result<Self> {
        let artifacts = Artifacts {
            model,
            encoders,
            schema,
        };
        artifacts.validate()?;
        Ok(artifacts)
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let model: ModelArtifact = load_artifact(&paths.model)?;
        let encoders: LabelEncoders = load_artifact(&paths.encoders)?;
        let schema: FeatureSchema = load_artifact(&paths.features)?;

        let artifacts = Artifacts::new(model, encoders, schema)?;
        info!(
            model = artifacts.model.kind(),
            features = artifacts.schema.width(),
            encoders = artifacts.encoders.len(),
            "artifacts loaded"
        );
        Ok(artifacts)
    }

    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        save_artifact(&paths.model, &self.model)?;
        save_artifact(&paths.encoders, &self.encoders)?;
        save_artifact(&paths.features, &self.schema)
    }

    fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if self.schema.width() != self.model.n_features() {
            return Err(PredictorError::DimensionMismatch {
                expected: self.model.n_features(),
                actual: self.schema.width(),
            });
        }
        if let Some(target) = self.encoders.get(TARGET_COLUMN) {
            if target.len() < self.model.n_classes() {
                return Err(PredictorError::InvalidModel(format!(
                    "model predicts {} classes but the {} encoder has {}",
                    self.model.n_classes(),
                    TARGET_COLUMN,
                    target.len()
                )));
            }
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Reads a `.json` artifact with serde_json, anything else with bincode.
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "reading artifact");
    let data = std::fs::read(path)?;
    let decoded = if is_json(path) {
        serde_json::from_slice(&data).map_err(|e| e.to_string())
    } else {
        bincode::deserialize(&data).map_err(|e| e.to_string())
    };
    decoded.map_err(|reason| PredictorError::Decode {
        path: path.to_path_buf(),
        reason,
    })
}

pub fn save_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let encoded = if is_json(path) {
        serde_json::to_vec_pretty(value).map_err(|e| e.to_string())
    } else {
        bincode::serialize(value).map_err(|e| e.to_string())
    };
    let data = encoded.map_err(|reason| PredictorError::Encode {
        path: path.to_path_buf(),
        reason,
    })?;
    std::fs::write(path, data)?;
    Ok(())
}
