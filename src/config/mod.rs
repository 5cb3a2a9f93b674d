#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod toml_config;

pub use settings::RiskSettings;
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::config::{cli::Command, settings::missing_model};
#[cfg(feature = "cli")]
use crate::domain::model::ModelLocation;
#[cfg(feature = "cli")]
use crate::utils::{error::Result, validation::Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "thyroid-risk")]
#[command(about = "Predict thyroid cancer recurrence risk from clinical features")]
#[command(version)]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// URL of the model artifact (HTTP GET, must answer 200)
    #[arg(long, global = true, conflicts_with = "model_path")]
    pub model_url: Option<String>,

    /// Local path of the model artifact
    #[arg(long, global = true)]
    pub model_path: Option<String>,

    /// Feature schema id (smoking-v1 or staging-v2)
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Timeout for the model download
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn file_config(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                Ok(config)
            }
            None => Ok(TomlConfig::default()),
        }
    }

    /// 合併設定檔與命令列參數，命令列優先
    pub fn settings(&self, file: &TomlConfig) -> Result<RiskSettings> {
        let location = match (&self.model_url, &self.model_path) {
            (Some(url), _) => Some(ModelLocation::Url(url.clone())),
            (None, Some(path)) => Some(ModelLocation::Path(path.into())),
            (None, None) => None,
        };

        let mut settings = match location {
            Some(location) => {
                let mut settings = RiskSettings::new(location);
                settings.apply_toml(file);
                settings
            }
            None if file.model.url.is_some() || file.model.path.is_some() => {
                RiskSettings::from_toml(file)?
            }
            None => return Err(missing_model()),
        };

        if let Some(schema) = &self.schema {
            settings.schema_id = schema.clone();
        }
        if self.timeout_seconds.is_some() {
            settings.timeout_seconds = self.timeout_seconds;
        }
        if let Command::Predict(args) = &self.command {
            if args.chart.is_some() {
                settings.chart_path = args.chart.clone();
            }
            if args.report.is_some() {
                settings.report_path = args.report.clone();
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Schema chosen by flag, falling back to `[model].schema` in the file.
    pub fn schema_id<'a>(&'a self, file: &'a TomlConfig) -> Option<&'a str> {
        self.schema.as_deref().or(file.model.schema.as_deref())
    }

    pub fn verbose(&self, file: &TomlConfig) -> bool {
        self.verbose || file.verbose()
    }

    pub fn json_logs(&self, file: &TomlConfig) -> bool {
        self.json_logs || file.json_logs()
    }
}
