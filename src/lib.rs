pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod model;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{AnyModelSource, FileModelSource, HttpModelSource};
pub use crate::config::{RiskSettings, TomlConfig};
pub use crate::core::{
    collector::FeatureCollector,
    engine::{Prediction, PredictionEngine},
    predictor::Predictor,
};
pub use crate::domain::schema::FeatureSchema;
pub use crate::utils::error::{Result, RiskError};
