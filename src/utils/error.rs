use std::collections::BTreeMap;
use thiserror::Error;

/// Text shown when the server does not explain a failure.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation failed for {} field(s)", .fields.len())]
    ValidationError { fields: BTreeMap<String, String> },

    #[error("'{event}' is not allowed while at step '{from}'")]
    InvalidTransition { from: &'static str, event: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Configuration,
    Validation,
    Workflow,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdminError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AdminError::Http(_) => ErrorCategory::Network,
            AdminError::Api { .. } => ErrorCategory::Server,
            AdminError::ConfigError { .. }
            | AdminError::InvalidConfigValueError { .. }
            | AdminError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AdminError::ValidationError { .. } => ErrorCategory::Validation,
            AdminError::InvalidTransition { .. } => ErrorCategory::Workflow,
            AdminError::CsvError(_) | AdminError::SerializationError(_) => ErrorCategory::Data,
            AdminError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Workflow => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Server => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// The message a toast should carry for this error.
    pub fn user_friendly_message(&self) -> String {
        match self {
            AdminError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            AdminError::Api { .. } | AdminError::Http(_) => FALLBACK_ERROR_MESSAGE.to_string(),
            AdminError::ValidationError { fields } => {
                let summary: Vec<String> = fields
                    .iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect();
                format!("Please fix the highlighted fields ({})", summary.join("; "))
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API base URL and your network connection, then try again",
            ErrorCategory::Server => "Resubmit the request; contact support if the problem persists",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::Validation => "Correct the listed fields and submit again",
            ErrorCategory::Workflow => "Complete the current step before moving on",
            ErrorCategory::Data => "The server returned data in an unexpected shape",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
