use crate::core::collector::FieldInputs;
use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Predict recurrence risk for one patient
    Predict(PredictArgs),
    /// Score every row of a CSV file
    Batch(BatchArgs),
    /// List fields and accepted values of the feature schemas
    Schema,
}

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub age: Option<String>,

    #[arg(long)]
    pub smoking: Option<String>,

    #[arg(long)]
    pub hx_smoking: Option<String>,

    /// N (node involvement), e.g. N0
    #[arg(long)]
    pub n_stage: Option<String>,

    /// T (tumor size/stage), e.g. T1a
    #[arg(long)]
    pub t_stage: Option<String>,

    /// Overall stage, e.g. I
    #[arg(long)]
    pub stage: Option<String>,

    #[arg(long)]
    pub adenopathy: Option<String>,

    /// Treatment response, e.g. Excellent
    #[arg(long)]
    pub response: Option<String>,

    /// Any field as name=value; wins over the named flags
    #[arg(long = "field", value_parser = parse_key_val)]
    pub fields: Vec<(String, String)>,

    /// Write the bar chart as SVG
    #[arg(long)]
    pub chart: Option<String>,

    /// Write the JSON report to a file
    #[arg(long)]
    pub report: Option<String>,

    /// Print the JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    pub fn inputs(&self) -> FieldInputs {
        let named = [
            ("age", &self.age),
            ("smoking", &self.smoking),
            ("hx_smoking", &self.hx_smoking),
            ("n_stage", &self.n_stage),
            ("t_stage", &self.t_stage),
            ("stage", &self.stage),
            ("adenopathy", &self.adenopathy),
            ("response", &self.response),
        ];

        let mut inputs: FieldInputs = named
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
            .collect();

        for (name, value) in &self.fields {
            inputs.insert(name.clone(), value.clone());
        }
        inputs
    }
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// CSV file with one patient per row and field names as header
    #[arg(short, long)]
    pub input: String,

    /// Output CSV; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
