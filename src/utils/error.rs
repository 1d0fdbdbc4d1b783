use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudentApiError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Environment file error: {0}")]
    EnvFileError(#[from] dotenv::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Checksum error: {message}")]
    ChecksumError { message: String },

    #[error("Snapshot error: {message}")]
    SnapshotError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl StudentApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::SnapshotError { .. } => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::ChecksumError { .. } => ErrorCategory::Data,
            Self::EnvFileError(_)
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::HttpError(e) if e.is_timeout() => {
                "The server did not answer in time; retry or raise STUDENT_API_TIMEOUT".to_string()
            }
            Self::HttpError(_) => "Check network connectivity and BASE_URL, then retry".to_string(),
            Self::IoError(_) => "Check that the output directory exists and is writable".to_string(),
            Self::SerializationError(_) => "The server returned data that could not be encoded".to_string(),
            Self::EnvFileError(_) => "Copy .env.example to .env and fill in the values".to_string(),
            Self::MissingConfigError { field } => {
                format!("Set {} in your .env file or environment", field)
            }
            Self::InvalidConfigValueError { field, .. } | Self::ConfigValidationError { field, .. } => {
                format!("Fix the value of {}", field)
            }
            Self::ChecksumError { .. } => "Verify the SECRET_KEY_* values".to_string(),
            Self::SnapshotError { .. } => "Re-run the snapshot with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the student API: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Storage => format!("Could not write results: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StudentApiError>;
