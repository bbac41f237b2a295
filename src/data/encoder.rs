use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PredictorError, Result};

/// Categorical feature name -> fitted encoder.
pub type LabelEncoders = BTreeMap<String, LabelEncoder>;

/// Fixed mapping between category strings and codes `0..classes.len()`.
///
/// Codes are positions in `classes`, so the order stored in the artifact is
/// the order the classifier was trained with and is never changed on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Builds an encoder the way it is fitted offline: sorted, unique classes.
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        LabelEncoder { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn transform(&self, category: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == category)
    }

    pub fn inverse_transform(&self, code: usize) -> Result<&str> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(PredictorError::UnknownCode {
                code,
                len: self.classes.len(),
            })
    }
}
