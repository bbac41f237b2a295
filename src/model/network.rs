use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::layers::{relu, softmax};
use super::{argmax, PredictionResult};
use crate::data::preprocessing::{DataStats, FeatureVector};
use crate::error::{PredictorError, Result};

#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct DenseLayer {
    pub weights: Array2<f64>,
    pub bias: Array2<f64>,
}

/// Feed-forward classifier: ReLU hidden layers, softmax output.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub stats: DataStats,
}

impl fmt::Debug for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shapes: Vec<_> = self.layers.iter().map(|l| l.weights.dim()).collect();
        f.debug_struct("NeuralNetwork")
            .field("layers", &shapes)
            .finish()
    }
}

impl NeuralNetwork {
    pub fn new(layers: Vec<DenseLayer>, stats: DataStats) -> Result<Self> {
        let nn = NeuralNetwork { layers, stats };
        nn.validate()?;
        Ok(nn)
    }

    pub fn validate(&self) -> Result<()> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| PredictorError::InvalidModel("network has no layers".into()))?;
        if first.weights.nrows() != self.stats.mean.len() {
            return Err(PredictorError::InvalidModel(format!(
                "normalization covers {} columns, first layer takes {}",
                self.stats.mean.len(),
                first.weights.nrows()
            )));
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].weights.ncols() != pair[1].weights.nrows() {
                return Err(PredictorError::InvalidModel(format!(
                    "layer {} outputs {} values, layer {} takes {}",
                    i,
                    pair[0].weights.ncols(),
                    i + 1,
                    pair[1].weights.nrows()
                )));
            }
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.bias.dim() != (1, layer.weights.ncols()) {
                return Err(PredictorError::InvalidModel(format!(
                    "layer {} bias has shape {:?}",
                    i,
                    layer.bias.dim()
                )));
            }
        }
        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.weights.nrows())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.weights.ncols())
    }

    pub fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        let last = self.layers.len().saturating_sub(1);
        let mut activation = x.to_owned();
        for (i, layer) in self.layers.iter().enumerate() {
            let z = activation.dot(&layer.weights) + &layer.bias;
            activation = if i == last { softmax(&z) } else { relu(&z) };
        }
        activation
    }

    pub fn predict(&self, input: &FeatureVector) -> Result<PredictionResult> {
        if input.len() != self.input_size() {
            return Err(PredictorError::DimensionMismatch {
                expected: self.input_size(),
                actual: input.len(),
            });
        }

        let input_normalized = self.stats.normalize(&input.to_row())?;
        let output = self.forward(&input_normalized);

        let probabilities = output.row(0).to_vec();
        let class = argmax(&probabilities)
            .ok_or_else(|| PredictorError::InvalidModel("network has no outputs".into()))?;

        Ok(PredictionResult {
            class,
            probabilities,
        })
    }
}
