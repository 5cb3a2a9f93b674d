use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Model download failed: {0}")]
    ModelFetchError(#[from] reqwest::Error),

    #[error("Model download from {url} returned HTTP {status}")]
    ModelStatusError { url: String, status: u16 },

    #[error("Model artifact could not be read from {path}: {source}")]
    ModelReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact is invalid: {message}")]
    ModelDecodeError { message: String },

    #[error("Inference failed: {message}")]
    InferenceError { message: String },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    FieldValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Unknown feature schema: {schema}")]
    UnknownSchemaError { schema: String },

    #[error("Invalid config value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Load,
    Inference,
    Validation,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl RiskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RiskError::ModelFetchError(_)
            | RiskError::ModelStatusError { .. }
            | RiskError::ModelReadError { .. }
            | RiskError::ModelDecodeError { .. } => ErrorCategory::Load,
            RiskError::InferenceError { .. } => ErrorCategory::Inference,
            RiskError::FieldValidationError { .. } | RiskError::MissingFieldError { .. } => {
                ErrorCategory::Validation
            }
            RiskError::UnknownSchemaError { .. }
            | RiskError::InvalidConfigValueError { .. }
            | RiskError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            RiskError::CsvError(_) | RiskError::IoError(_) | RiskError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Load | ErrorCategory::Inference | ErrorCategory::Output => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼，錯誤一律非零
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 給使用者的簡短訊息，不含底層錯誤鏈
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Load => format!("Error loading model: {}", self),
            ErrorCategory::Inference => format!("Prediction failed: {}", self),
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Output => format!("Could not write results: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RiskError::ModelFetchError(_) => "Check network connectivity and the model URL",
            RiskError::ModelStatusError { .. } => {
                "Verify that the model URL points to an existing artifact"
            }
            RiskError::ModelReadError { .. } => "Verify that the model path exists and is readable",
            RiskError::ModelDecodeError { .. } => {
                "Re-export the model artifact in the expected JSON format"
            }
            RiskError::InferenceError { .. } => {
                "Make sure the model was trained on the selected feature schema"
            }
            RiskError::FieldValidationError { .. } | RiskError::MissingFieldError { .. } => {
                "Run `thyroid-risk schema` to list accepted values for each field"
            }
            RiskError::UnknownSchemaError { .. } => "Use one of: smoking-v1, staging-v2",
            RiskError::InvalidConfigValueError { .. } | RiskError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line flags"
            }
            RiskError::CsvError(_) => "Check that the input CSV has a header row with field names",
            RiskError::IoError(_) | RiskError::SerializationError(_) => {
                "Check output paths and permissions"
            }
        }
    }

    pub(crate) fn inference(message: impl Into<String>) -> Self {
        RiskError::InferenceError {
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        RiskError::ModelDecodeError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;
