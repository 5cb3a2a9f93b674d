use crate::config::toml_config::TomlConfig;
use crate::domain::model::ModelLocation;
use crate::domain::ports::ConfigProvider;
use crate::domain::schema::{FeatureSchema, DEFAULT_SCHEMA_ID};
use crate::utils::error::{Result, RiskError};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_CHART_WIDTH: u32 = 480;
pub const DEFAULT_CHART_HEIGHT: u32 = 320;

/// Fully resolved runtime settings (config file plus command line overrides).
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSettings {
    pub model: ModelLocation,
    pub schema_id: String,
    pub timeout_seconds: Option<u64>,
    pub chart_path: Option<String>,
    pub report_path: Option<String>,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl RiskSettings {
    pub fn new(model: ModelLocation) -> Self {
        Self {
            model,
            schema_id: DEFAULT_SCHEMA_ID.to_string(),
            timeout_seconds: None,
            chart_path: None,
            report_path: None,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
        }
    }

    /// Settings from a config file alone. Fails if it names no model.
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let location = match (&config.model.url, &config.model.path) {
            (Some(url), None) => ModelLocation::Url(url.clone()),
            (None, Some(path)) => ModelLocation::Path(path.into()),
            (Some(_), Some(_)) => {
                return Err(RiskError::ConfigValidationError {
                    field: "model".to_string(),
                    message: "set either model.url or model.path, not both".to_string(),
                })
            }
            (None, None) => return Err(missing_model()),
        };

        let mut settings = Self::new(location);
        settings.apply_toml(config);
        Ok(settings)
    }

    pub(crate) fn apply_toml(&mut self, config: &TomlConfig) {
        if let Some(schema) = &config.model.schema {
            self.schema_id = schema.clone();
        }
        if config.model.timeout_seconds.is_some() {
            self.timeout_seconds = config.model.timeout_seconds;
        }
        if let Some(output) = &config.output {
            if output.chart_path.is_some() {
                self.chart_path = output.chart_path.clone();
            }
            if output.report_path.is_some() {
                self.report_path = output.report_path.clone();
            }
            if let Some(width) = output.chart_width {
                self.chart_width = width;
            }
            if let Some(height) = output.chart_height {
                self.chart_height = height;
            }
        }
    }

    pub fn schema(&self) -> Result<&'static FeatureSchema> {
        FeatureSchema::by_id(&self.schema_id)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

pub(crate) fn missing_model() -> RiskError {
    RiskError::ConfigValidationError {
        field: "model".to_string(),
        message: "no model source configured (use --model-url or --model-path)".to_string(),
    }
}

impl ConfigProvider for RiskSettings {
    fn model_location(&self) -> &ModelLocation {
        &self.model
    }

    fn schema_id(&self) -> &str {
        &self.schema_id
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for RiskSettings {
    fn validate(&self) -> Result<()> {
        match &self.model {
            ModelLocation::Url(url) => validation::validate_url("model.url", url)?,
            ModelLocation::Path(path) => {
                validation::validate_path("model.path", &path.to_string_lossy())?
            }
        }

        self.schema()?;

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("model.timeout_seconds", timeout, 1)?;
        }
        if let Some(chart) = &self.chart_path {
            validation::validate_file_extension("chart", chart, &["svg"])?;
        }
        if let Some(report) = &self.report_path {
            validation::validate_file_extension("report", report, &["json"])?;
        }
        validation::validate_positive_number("chart_width", self.chart_width as u64, 1)?;
        validation::validate_positive_number("chart_height", self.chart_height as u64, 1)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_applies_overrides() {
        let config = TomlConfig::from_toml_str(
            r#"
[model]
path = "./m.json"
schema = "smoking-v1"
timeout_seconds = 10

[output]
chart_width = 640
"#,
        )
        .unwrap();

        let settings = RiskSettings::from_toml(&config).unwrap();

        assert_eq!(settings.model, ModelLocation::Path("./m.json".into()));
        assert_eq!(settings.schema_id(), "smoking-v1");
        assert_eq!(settings.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(settings.chart_width, 640);
        assert_eq!(settings.chart_height, DEFAULT_CHART_HEIGHT);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_toml_requires_model() {
        let config = TomlConfig::from_toml_str("[model]\nschema = \"staging-v2\"\n").unwrap();
        assert!(RiskSettings::from_toml(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = RiskSettings::new(ModelLocation::Url("ftp://example.com/m".to_string()));
        assert!(settings.validate().is_err());

        settings.model = ModelLocation::Url("https://example.com/m.json".to_string());
        assert!(settings.validate().is_ok());

        settings.timeout_seconds = Some(0);
        assert!(settings.validate().is_err());

        settings.timeout_seconds = None;
        settings.schema_id = "unknown".to_string();
        assert!(matches!(
            settings.validate(),
            Err(RiskError::UnknownSchemaError { .. })
        ));
    }
}
