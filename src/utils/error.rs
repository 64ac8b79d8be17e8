use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvcError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    StatusError { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    /// An error that was also reported to the service's failure observers.
    #[error("Operation '{operation}' failed: {source}")]
    OperationFailed {
        operation: String,
        source: Arc<SvcError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
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

impl SvcError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SvcError::OperationFailed { source, .. } => source.category(),
            SvcError::HttpError(_) | SvcError::StatusError { .. } => ErrorCategory::Network,
            SvcError::UrlError(_)
            | SvcError::TomlParseError(_)
            | SvcError::InvalidConfigValueError { .. }
            | SvcError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SvcError::SerializationError(_) => ErrorCategory::Data,
            SvcError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SvcError::OperationFailed { source, .. } => source.severity(),
            // 5xx and transport failures are usually worth retrying
            SvcError::HttpError(_) => ErrorSeverity::Medium,
            SvcError::StatusError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            SvcError::StatusError { .. } => ErrorSeverity::High,
            SvcError::SerializationError(_) => ErrorSeverity::High,
            SvcError::UrlError(_)
            | SvcError::TomlParseError(_)
            | SvcError::InvalidConfigValueError { .. }
            | SvcError::MissingConfigError { .. } => ErrorSeverity::High,
            SvcError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the remote service: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Data => format!("The service returned unreadable data: {}", self),
            ErrorCategory::System => format!("A local system error occurred: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SvcError::OperationFailed { source, .. } => source.recovery_suggestion(),
            SvcError::HttpError(_) => "Check network connectivity and that the endpoint is up",
            SvcError::StatusError { status, .. } if *status >= 500 => {
                "The service is failing; try again later"
            }
            SvcError::StatusError { .. } => "Check the request path, parameters and headers",
            SvcError::UrlError(_) => "Use an absolute http(s) URL such as https://api.example.com",
            SvcError::TomlParseError(_) => "Fix the syntax of the TOML configuration file",
            SvcError::SerializationError(_) => "Make sure the endpoint returns JSON",
            SvcError::InvalidConfigValueError { .. }
            | SvcError::MissingConfigError { .. } => "Run with --help to see the expected flags",
            SvcError::IoError(_) => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, SvcError>;
