pub mod batch;
pub mod collector;
pub mod engine;
pub mod predictor;
pub mod presenter;

pub use crate::domain::model::{FeatureVector, FieldValue, ModelLocation, PredictionResult};
pub use crate::domain::ports::{ConfigProvider, ModelSource, ProbabilityModel};
pub use crate::utils::error::Result;
