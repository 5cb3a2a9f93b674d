use crate::utils::error::{Result, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where the serialized model lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelLocation {
    Url(String),
    Path(PathBuf),
}

impl fmt::Display for ModelLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLocation::Url(url) => write!(f, "{}", url),
            ModelLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One collected input, kept alongside its encoded value for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub label: String,
    pub value: f64,
}

/// Ordered model input. Field order is the schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub schema_id: String,
    pub fields: Vec<FieldValue>,
}

impl FeatureVector {
    pub fn values(&self) -> Vec<f64> {
        self.fields.iter().map(|f| f.value).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Two-class probability output: (no recurrence, recurrence).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub no_recurrence: f64,
    pub recurrence: f64,
}

pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

impl PredictionResult {
    /// Build from a raw `predict_proba` row, rejecting anything that is not a
    /// proper two-class distribution.
    pub fn from_proba(proba: &[f64]) -> Result<Self> {
        let [p0, p1] = match proba {
            [p0, p1] => [*p0, *p1],
            _ => {
                return Err(RiskError::inference(format!(
                    "expected 2 class probabilities, got {}",
                    proba.len()
                )))
            }
        };

        for p in [p0, p1] {
            if !p.is_finite() || !(-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&p)
            {
                return Err(RiskError::inference(format!(
                    "probability {} is outside [0, 1]",
                    p
                )));
            }
        }

        if ((p0 + p1) - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(RiskError::inference(format!(
                "class probabilities sum to {} instead of 1",
                p0 + p1
            )));
        }

        Ok(Self {
            no_recurrence: p0.clamp(0.0, 1.0),
            recurrence: p1.clamp(0.0, 1.0),
        })
    }

    pub fn no_recurrence_percent(&self) -> f64 {
        self.no_recurrence * 100.0
    }

    pub fn recurrence_percent(&self) -> f64 {
        self.recurrence * 100.0
    }
}
