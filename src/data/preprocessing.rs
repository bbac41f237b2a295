use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::encoder::LabelEncoders;
use super::schema::FieldSpec;
use crate::error::{PredictorError, Result};

/// Per-column normalization captured when the network was trained.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataStats {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl DataStats {
    /// Identity normalization for `width` columns.
    pub fn identity(width: usize) -> Self {
        DataStats {
            mean: Array1::zeros(width),
            std: Array1::ones(width),
        }
    }

    pub fn normalize(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        if input.ncols() != self.mean.len() || input.ncols() != self.std.len() {
            return Err(PredictorError::DimensionMismatch {
                expected: self.mean.len(),
                actual: input.ncols(),
            });
        }
        // Constant columns have zero spread; leave them centered only.
        let std = self.std.mapv(|s| if s == 0.0 { 1.0 } else { s });
        let mean = self.mean.view().insert_axis(Axis(0));
        let std = std.view().insert_axis(Axis(0));
        Ok((input - &mean) / &std)
    }
}

/// A value submitted through one form widget.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Choice(String),
    Integer(i64),
    Decimal(f64),
}

/// One classifier input row, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-row matrix, shape `(1, len)`.
    pub fn to_row(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, self.0.len()), |(_, j)| self.0[j])
    }
}

/// Encodes widget values into the classifier row, one value per field.
pub fn encode_inputs(
    fields: &[FieldSpec],
    values: &[FieldValue],
    encoders: &LabelEncoders,
) -> Result<FeatureVector> {
    if fields.len() != values.len() {
        return Err(PredictorError::DimensionMismatch {
            expected: fields.len(),
            actual: values.len(),
        });
    }

    let mut row = Vec::with_capacity(fields.len());
    for (field, value) in fields.iter().zip(values) {
        let encoded = match value {
            FieldValue::Choice(category) => {
                let encoder = encoders
                    .get(&field.name)
                    .ok_or_else(|| PredictorError::MissingEncoder(field.name.clone()))?;
                encoder
                    .transform(category)
                    .ok_or_else(|| PredictorError::UnknownCategory {
                        feature: field.name.clone(),
                        category: category.clone(),
                    })? as f64
            }
            FieldValue::Integer(v) => *v as f64,
            FieldValue::Decimal(v) => *v,
        };
        row.push(encoded);
    }

    Ok(FeatureVector(row))
}
