//! Formatting of prediction results: text, terminal bars, SVG chart, JSON report.

use crate::domain::model::{FeatureVector, FieldValue, PredictionResult};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NO_RECURRENCE_LABEL: &str = "No Recurrence";
pub const RECURRENCE_LABEL: &str = "Recurrence";
pub const NO_RECURRENCE_COLOR: &str = "#2e7d32";
pub const RECURRENCE_COLOR: &str = "#c62828";

pub fn summary_lines(result: &PredictionResult) -> Vec<String> {
    vec![
        format!(
            "Confidence in {}: {:.2}%",
            NO_RECURRENCE_LABEL,
            result.no_recurrence_percent()
        ),
        format!(
            "Confidence in {}: {:.2}%",
            RECURRENCE_LABEL,
            result.recurrence_percent()
        ),
    ]
}

fn bars(result: &PredictionResult) -> [(&'static str, f64); 2] {
    [
        (NO_RECURRENCE_LABEL, result.no_recurrence_percent()),
        (RECURRENCE_LABEL, result.recurrence_percent()),
    ]
}

pub fn bar_chart_text(result: &PredictionResult, max_width: usize) -> Vec<String> {
    let label_width = NO_RECURRENCE_LABEL.len();
    bars(result)
        .iter()
        .map(|(label, percent)| {
            let filled = ((percent / 100.0) * max_width as f64).round() as usize;
            let filled = filled.min(max_width);
            format!(
                "{:<width$} |{}{}| {:>6.2}%",
                label,
                "#".repeat(filled),
                " ".repeat(max_width - filled),
                percent,
                width = label_width
            )
        })
        .collect()
}

/// Two-bar comparison chart on a 0-100% axis.
pub fn bar_chart_svg(result: &PredictionResult, width: u32, height: u32) -> String {
    if width == 0 || height == 0 {
        return String::new();
    }

    let w = width as f64;
    let h = height as f64;
    let top = 30.0;
    let bottom = 30.0;
    let plot_h = (h - top - bottom).max(1.0);
    let slot = w / 2.0;
    let bar_w = slot * 0.5;

    let mut body = String::new();
    for (i, ((label, percent), color)) in bars(result)
        .iter()
        .zip([NO_RECURRENCE_COLOR, RECURRENCE_COLOR])
        .enumerate()
    {
        let bar_h = plot_h * percent / 100.0;
        let x = slot * i as f64 + (slot - bar_w) / 2.0;
        let y = top + plot_h - bar_h;
        let cx = x + bar_w / 2.0;
        body.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{bar_w:.2}\" height=\"{bar_h:.2}\" fill=\"{color}\" />"
        ));
        body.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{percent:.2}%</text>",
            y - 6.0
        ));
        body.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{label}</text>",
            h - 10.0
        ));
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" font-family=\"sans-serif\" font-size=\"12\">{body}</svg>"
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub schema_id: String,
    pub inputs: Vec<FieldValue>,
    pub features: Vec<f64>,
    pub no_recurrence: f64,
    pub recurrence: f64,
}

impl PredictionReport {
    pub fn new(model: &str, features: &FeatureVector, result: &PredictionResult) -> Self {
        Self {
            generated_at: Utc::now(),
            model: model.to_string(),
            schema_id: features.schema_id.clone(),
            inputs: features.fields.clone(),
            features: features.values(),
            no_recurrence: result.no_recurrence,
            recurrence: result.recurrence,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
