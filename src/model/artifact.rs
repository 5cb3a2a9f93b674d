//! Serialized classifier artifact.
//!
//! Models are exported by the training pipeline as JSON. Two estimator
//! families are supported: a (optionally standardized) logistic regression
//! and a random forest of binary decision trees. Both produce a two-class
//! probability row.

use crate::domain::ports::ProbabilityModel;
use crate::utils::error::{Result, RiskError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    /// Schema id the model was trained against. Older exports omit it.
    #[serde(default)]
    pub feature_schema: Option<String>,
    pub n_features: usize,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        scaler: Option<StandardScaler>,
    },
    RandomForest {
        trees: Vec<DecisionTree>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights at the leaf; normalized on use.
    Leaf { value: [f64; 2] },
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)
            .map_err(|e| RiskError::decode(format!("not a model artifact: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Structural checks so that a loaded model can never index out of bounds
    /// or loop while predicting.
    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(RiskError::decode("n_features must be at least 1"));
        }

        match &self.estimator {
            Estimator::LogisticRegression {
                coefficients,
                intercept,
                scaler,
            } => {
                if coefficients.len() != self.n_features {
                    return Err(RiskError::decode(format!(
                        "{} coefficients for {} features",
                        coefficients.len(),
                        self.n_features
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(RiskError::decode("non-finite coefficient"));
                }
                if let Some(scaler) = scaler {
                    if scaler.mean.len() != self.n_features || scaler.scale.len() != self.n_features {
                        return Err(RiskError::decode("scaler length does not match n_features"));
                    }
                    if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite())
                        || scaler.mean.iter().any(|m| !m.is_finite())
                    {
                        return Err(RiskError::decode("scaler has zero or non-finite entries"));
                    }
                }
            }
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(RiskError::decode("random forest has no trees"));
                }
                for (t, tree) in trees.iter().enumerate() {
                    tree.validate(self.n_features)
                        .map_err(|reason| RiskError::decode(format!("tree {}: {}", t, reason)))?;
                }
            }
        }

        Ok(())
    }
}

impl DecisionTree {
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {}", i, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    // 子節點必須在後面，保證走訪一定會結束
                    if *left <= i || *right <= i || *left >= self.nodes.len() || *right >= self.nodes.len() {
                        return Err(format!("node {} has invalid children", i));
                    }
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    if value.iter().any(|v| *v < 0.0 || !v.is_finite()) || total <= 0.0 {
                        return Err(format!("leaf {} has invalid class weights", i));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_proba(&self, features: &[f64]) -> [f64; 2] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return [value[0] / total, value[1] / total];
                }
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl ProbabilityModel for ModelArtifact {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_schema(&self) -> Option<&str> {
        self.feature_schema.as_deref()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        if features.len() != self.n_features {
            return Err(RiskError::inference(format!(
                "model '{}' expects {} features, got {}",
                self.name,
                self.n_features,
                features.len()
            )));
        }
        if features.iter().any(|x| !x.is_finite()) {
            return Err(RiskError::inference("feature vector contains non-finite values"));
        }

        match &self.estimator {
            Estimator::LogisticRegression {
                coefficients,
                intercept,
                scaler,
            } => {
                let z = features
                    .iter()
                    .enumerate()
                    .map(|(i, x)| {
                        let x = match scaler {
                            Some(s) => (x - s.mean[i]) / s.scale[i],
                            None => *x,
                        };
                        coefficients[i] * x
                    })
                    .sum::<f64>()
                    + intercept;
                let p1 = sigmoid(z);
                Ok([1.0 - p1, p1])
            }
            Estimator::RandomForest { trees } => {
                let mut sum = [0.0, 0.0];
                for tree in trees {
                    let [p0, p1] = tree.leaf_proba(features);
                    sum[0] += p0;
                    sum[1] += p1;
                }
                let n = trees.len() as f64;
                Ok([sum[0] / n, sum[1] / n])
            }
        }
    }
}
