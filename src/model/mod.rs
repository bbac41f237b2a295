pub mod forest;
pub mod layers;
pub mod network;

use serde::{Deserialize, Serialize};

use crate::data::preprocessing::FeatureVector;
use crate::error::{PredictorError, Result};
use forest::RandomForest;
use network::NeuralNetwork;

/// Raw classifier output for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Class code, decoded through the target encoder for display.
    pub class: usize,
    /// Probability or vote share per class code.
    pub probabilities: Vec<f64>,
}

/// Single-row classifier over an assembled feature vector.
pub trait Classifier {
    fn n_features(&self) -> usize;
    fn n_classes(&self) -> usize;
    fn predict(&self, input: &FeatureVector) -> Result<PredictionResult>;
}

/// Serialized classifier artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelArtifact {
    NeuralNetwork(NeuralNetwork),
    RandomForest(RandomForest),
    /// Hard-vote ensemble; ties go to the lowest class code.
    Voting(Vec<ModelArtifact>),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::NeuralNetwork(_) => "neural network",
            ModelArtifact::RandomForest(_) => "random forest",
            ModelArtifact::Voting(_) => "voting ensemble",
        }
    }

    /// Checks internal shapes of a freshly decoded artifact.
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::NeuralNetwork(nn) => nn.validate(),
            ModelArtifact::RandomForest(forest) => forest.validate(),
            ModelArtifact::Voting(members) => {
                let first = members
                    .first()
                    .ok_or_else(|| PredictorError::InvalidModel("empty voting ensemble".into()))?;
                for member in members {
                    member.validate()?;
                    if member.n_features() != first.n_features()
                        || member.n_classes() != first.n_classes()
                    {
                        return Err(PredictorError::InvalidModel(
                            "voting members disagree on input or class count".into(),
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

impl Classifier for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::NeuralNetwork(nn) => nn.input_size(),
            ModelArtifact::RandomForest(forest) => forest.n_features,
            ModelArtifact::Voting(members) => members.first().map_or(0, |m| m.n_features()),
        }
    }

    fn n_classes(&self) -> usize {
        match self {
            ModelArtifact::NeuralNetwork(nn) => nn.output_size(),
            ModelArtifact::RandomForest(forest) => forest.n_classes,
            ModelArtifact::Voting(members) => members.first().map_or(0, |m| m.n_classes()),
        }
    }

    fn predict(&self, input: &FeatureVector) -> Result<PredictionResult> {
        match self {
            ModelArtifact::NeuralNetwork(nn) => nn.predict(input),
            ModelArtifact::RandomForest(forest) => forest.predict(input),
            ModelArtifact::Voting(members) => {
                let mut votes = vec![0usize; self.n_classes()];
                for member in members {
                    let result = member.predict(input)?;
                    if let Some(slot) = votes.get_mut(result.class) {
                        *slot += 1;
                    }
                }
                let total = members.len().max(1) as f64;
                let probabilities: Vec<f64> = votes.iter().map(|&v| v as f64 / total).collect();
                let class = argmax(&probabilities).ok_or_else(|| {
                    PredictorError::InvalidModel("voting ensemble has no classes".into())
                })?;
                Ok(PredictionResult {
                    class,
                    probabilities,
                })
            }
        }
    }
}

/// Index of the largest value; the first one wins on ties.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
