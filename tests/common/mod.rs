#![allow(dead_code)]

use std::collections::HashMap;

/// Logistic regression over the staging-v2 field order.
pub fn staging_model_json() -> String {
    serde_json::json!({
        "name": "thyroid_model_1",
        "feature_schema": "staging-v2",
        "n_features": 6,
        "estimator": {
            "type": "logistic_regression",
            "coefficients": [0.8, 0.9, 0.5, 0.7, 0.6, 1.4],
            "intercept": -2.0,
            "scaler": {
                "mean": [41.0, 0.3, 2.0, 0.6, 0.7, 0.5],
                "scale": [15.0, 0.7, 1.6, 0.9, 1.2, 0.9]
            }
        }
    })
    .to_string()
}

/// Random forest over the smoking-v1 field order.
pub fn smoking_model_json() -> String {
    serde_json::json!({
        "name": "thyroid_model_smoking",
        "feature_schema": "smoking-v1",
        "n_features": 6,
        "estimator": {
            "type": "random_forest",
            "trees": [
                { "nodes": [
                    { "feature": 2, "threshold": 0.5, "left": 1, "right": 2 },
                    { "value": [40.0, 4.0] },
                    { "feature": 0, "threshold": 55.0, "left": 3, "right": 4 },
                    { "value": [10.0, 12.0] },
                    { "value": [2.0, 14.0] }
                ]},
                { "nodes": [
                    { "feature": 4, "threshold": 1.5, "left": 1, "right": 2 },
                    { "value": [0.9, 0.1] },
                    { "value": [0.2, 0.8] }
                ]}
            ]
        }
    })
    .to_string()
}

pub fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn staging_baseline() -> HashMap<String, String> {
    inputs(&[
        ("age", "45"),
        ("stage", "I"),
        ("t_stage", "T1a"),
        ("n_stage", "N0"),
        ("adenopathy", "No"),
        ("response", "Excellent"),
    ])
}
