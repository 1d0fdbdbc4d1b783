#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::checksum::Secrets;
use crate::utils::error::{Result, StudentApiError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use std::fmt;
use std::path::Path;
use toml_config::FileConfig;

pub const DEFAULT_USER_AGENT: &str = "okhttp/3.12.1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 4;
pub const DEFAULT_SNAPSHOT_PATH: &str = "./snapshots";

/// Fully resolved client configuration.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub survey_url: Option<String>,
    pub authen_key: String,
    pub secrets: Secrets,
    pub default_campus_code: Option<String>,
    pub default_roll_number: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub snapshot_path: String,
    pub concurrent_requests: usize,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("survey_url", &self.survey_url)
            .field("authen_key", &"<redacted>")
            .field("secrets", &self.secrets)
            .field("default_campus_code", &self.default_campus_code)
            .field("default_roll_number", &self.default_roll_number)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("snapshot_path", &self.snapshot_path)
            .field("concurrent_requests", &self.concurrent_requests)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_parts(&FileConfig::default(), lookup)
    }

    /// Environment values win over the file; secrets come only from the environment.
    pub fn from_parts<F>(file: &FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = validate_required_field(
            "BASE_URL",
            non_blank("BASE_URL").or_else(|| file.api.base_url.clone()),
        )?;
        let survey_url = non_blank("GOOGLE_AUTH_URL").or_else(|| file.api.survey_url.clone());

        let authen_key = validate_required_field("AUTHEN_KEY", lookup("AUTHEN_KEY"))?;
        let secrets = Secrets {
            main_key: validate_required_field("SECRET_KEY_MAIN", lookup("SECRET_KEY_MAIN"))?,
            alt_key: validate_required_field("SECRET_KEY_ALT", lookup("SECRET_KEY_ALT"))?,
            long_key: validate_required_field("SECRET_KEY_LONG", lookup("SECRET_KEY_LONG"))?,
            secret_code: validate_required_field("SUPER_SECRET_CODE", lookup("SUPER_SECRET_CODE"))?,
        };

        let timeout_seconds = match non_blank("STUDENT_API_TIMEOUT") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                StudentApiError::InvalidConfigValueError {
                    field: "STUDENT_API_TIMEOUT".to_string(),
                    value: raw.clone(),
                    reason: format!("not a number of seconds: {}", e),
                }
            })?,
            None => file.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        };

        Ok(Self {
            base_url,
            survey_url,
            authen_key,
            secrets,
            default_campus_code: non_blank("CAMPUS_CODE"),
            default_roll_number: non_blank("ROLL_NUMBER"),
            timeout_seconds,
            user_agent: file
                .api
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            snapshot_path: file
                .snapshot
                .output_path
                .clone()
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string()),
            concurrent_requests: file
                .snapshot
                .concurrent_requests
                .unwrap_or(DEFAULT_CONCURRENT_REQUESTS),
        })
    }

    /// Loads the `.env` file, the optional TOML file, then reads the environment.
    ///
    /// Without an explicit `env_file`, `./.env` is used when present.
    pub fn load(env_file: Option<&Path>, config_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path)?;
                tracing::debug!("Loaded environment from {}", path.display());
            }
            None => {
                if let Ok(path) = dotenv::dotenv() {
                    tracing::debug!("Loaded environment from {}", path.display());
                }
            }
        }

        let file = match config_file {
            Some(path) => {
                tracing::debug!("Reading configuration file {}", path.display());
                FileConfig::from_file(path)?
            }
            None => FileConfig::default(),
        };

        let config = Self::from_parts(&file, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<()> {
        validate_url("BASE_URL", &self.base_url)?;
        if let Some(survey_url) = &self.survey_url {
            validate_url("GOOGLE_AUTH_URL", survey_url)?;
        }
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        validate_path("snapshot.output_path", &self.snapshot_path)?;
        validate_positive_number("snapshot.concurrent_requests", self.concurrent_requests, 1)?;
        Ok(())
    }
}
