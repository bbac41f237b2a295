//! Decision-tree ensembles exported from the offline training run.

use serde::{Deserialize, Serialize};

use super::{argmax, PredictionResult};
use crate::data::preprocessing::FeatureVector;
use crate::error::{PredictorError, Result};

/// A node in a CART tree: samples with `row[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        class: usize,
    },
}

impl TreeNode {
    pub fn leaf(class: usize) -> Self {
        TreeNode::Leaf { class }
    }

    pub fn split(feature: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn predict_one(&self, row: &[f64]) -> usize {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { class } => return *class,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    fn check(&self, n_features: usize, n_classes: usize) -> Result<()> {
        match self {
            TreeNode::Leaf { class } if *class >= n_classes => Err(PredictorError::InvalidModel(
                format!("leaf class {} but only {} classes", class, n_classes),
            )),
            TreeNode::Leaf { .. } => Ok(()),
            TreeNode::Split { feature, .. } if *feature >= n_features => {
                Err(PredictorError::InvalidModel(format!(
                    "split on feature {} but only {} features",
                    feature, n_features
                )))
            }
            TreeNode::Split { left, right, .. } => {
                left.check(n_features, n_classes)?;
                right.check(n_features, n_classes)
            }
        }
    }
}

/// Majority vote over CART trees; ties go to the lowest class code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<TreeNode>,
}

impl RandomForest {
    pub fn new(n_features: usize, n_classes: usize, trees: Vec<TreeNode>) -> Result<Self> {
        let forest = RandomForest {
            n_features,
            n_classes,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(PredictorError::InvalidModel("forest has no trees".into()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.check(self.n_features, self.n_classes))
    }

    pub fn predict(&self, input: &FeatureVector) -> Result<PredictionResult> {
        if input.len() != self.n_features {
            return Err(PredictorError::DimensionMismatch {
                expected: self.n_features,
                actual: input.len(),
            });
        }

        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict_one(input.as_slice())] += 1;
        }

        let total = self.trees.len() as f64;
        let probabilities: Vec<f64> = votes.iter().map(|&v| v as f64 / total).collect();
        let class = argmax(&probabilities)
            .ok_or_else(|| PredictorError::InvalidModel("forest has no classes".into()))?;

        Ok(PredictionResult {
            class,
            probabilities,
        })
    }
}
