//! Configuration module
//!
//! Configuration is read once from the environment at startup and validated before any
//! service is constructed. Missing deployment identifiers (bucket, key, project) abort startup.

use std::env;
use std::time::Duration;

use crate::constants::{
    ALLOWED_EXTENSIONS, BREAKER_FAILURE_THRESHOLD, DEFAULT_BUCKET_FOLDER, DEFAULT_SECRET_VERSION,
    FINANCIAL_KEYWORDS, GOOGLE_SECRET_MANAGER_ENDPOINT, GOOGLE_VISION_ENDPOINT, MAX_FILE_SIZE_MB,
    UPLOAD_MAX_ATTEMPTS, UPLOAD_RETRY_DELAY_SECS,
};
use crate::storage_types::{SecretBackend, StorageBackend};

const SERVER_PORT: u16 = 8080;

/// Log output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Settings shared by every HTTP service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Ingestion pipeline configuration
#[derive(Clone, Debug)]
pub struct IngestionConfig {
    pub base: BaseConfig,
    // Deployment identifiers
    pub bucket_name: String,
    pub bucket_folder_name: String,
    pub key_name: String,
    pub secret_version: String,
    pub project_id: String,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    // Capabilities
    pub secret_backend: SecretBackend,
    pub google_vision_api_key: Option<String>,
    pub google_access_token: Option<String>,
    pub vision_endpoint: String,
    pub secret_manager_endpoint: String,
    // Validation and classification
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub financial_keywords: Vec<String>,
    // Fault isolation
    pub upload_max_attempts: u32,
    pub upload_retry_delay_secs: u64,
    pub breaker_failure_threshold: u32,
    pub breaker_reset_timeout_secs: Option<u64>,
    pub breaker_count_client_errors: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestionConfig>);

impl Config {
    fn inner(&self) -> &IngestionConfig {
        &self.0
    }

    /// Load from the process environment (and `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable source. Used by tests to avoid mutating the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = IngestionConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().base.log_format
    }

    pub fn bucket_name(&self) -> &str {
        &self.inner().bucket_name
    }

    pub fn bucket_folder_name(&self) -> &str {
        &self.inner().bucket_folder_name
    }

    pub fn key_name(&self) -> &str {
        &self.inner().key_name
    }

    pub fn secret_version(&self) -> &str {
        &self.inner().secret_version
    }

    pub fn project_id(&self) -> &str {
        &self.inner().project_id
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn secret_backend(&self) -> SecretBackend {
        self.inner().secret_backend
    }

    pub fn google_vision_api_key(&self) -> Option<&str> {
        self.inner().google_vision_api_key.as_deref()
    }

    pub fn google_access_token(&self) -> Option<&str> {
        self.inner().google_access_token.as_deref()
    }

    pub fn vision_endpoint(&self) -> &str {
        &self.inner().vision_endpoint
    }

    pub fn secret_manager_endpoint(&self) -> &str {
        &self.inner().secret_manager_endpoint
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }

    pub fn financial_keywords(&self) -> &[String] {
        &self.inner().financial_keywords
    }

    pub fn upload_max_attempts(&self) -> u32 {
        self.inner().upload_max_attempts
    }

    pub fn upload_retry_delay(&self) -> Duration {
        Duration::from_secs(self.inner().upload_retry_delay_secs)
    }

    pub fn breaker_failure_threshold(&self) -> u32 {
        self.inner().breaker_failure_threshold
    }

    pub fn breaker_reset_timeout(&self) -> Option<Duration> {
        self.inner()
            .breaker_reset_timeout_secs
            .map(Duration::from_secs)
    }

    pub fn breaker_count_client_errors(&self) -> bool {
        self.inner().breaker_count_client_errors
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn csv_lowercase(value: String) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(name)) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid value, got '{}'", name, raw)),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl IngestionConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            non_empty(lookup(name))
                .ok_or_else(|| anyhow::anyhow!("{} must be set", name))
        };

        let missing: Vec<&str> = ["BUCKET_NAME", "KEY_NAME", "PROJECT_ID"]
            .into_iter()
            .filter(|name| non_empty(lookup(name)).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        let environment = non_empty(lookup("ENVIRONMENT"))
            .or_else(|| non_empty(lookup("APP_ENV")))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = non_empty(lookup("CORS_ORIGINS")).unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match non_empty(lookup("LOG_FORMAT")).as_deref() {
            Some("json") => LogFormat::Json,
            Some("compact") | None => LogFormat::Compact,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                    other
                ))
            }
        };

        let base = BaseConfig {
            server_port: parse_or(&lookup, "PORT", SERVER_PORT)?,
            cors_origins,
            environment,
            log_format,
        };

        let max_file_size_mb: usize = parse_or(&lookup, "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;

        let allowed_extensions = non_empty(lookup("ALLOWED_EXTENSIONS"))
            .map(csv_lowercase)
            .unwrap_or_else(|| ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect());

        let financial_keywords = non_empty(lookup("FINANCIAL_KEYWORDS"))
            .map(csv_lowercase)
            .unwrap_or_else(|| FINANCIAL_KEYWORDS.iter().map(|s| s.to_string()).collect());

        let breaker_count_client_errors = match non_empty(lookup("BREAKER_COUNT_CLIENT_ERRORS")) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                anyhow::anyhow!("BREAKER_COUNT_CLIENT_ERRORS must be a boolean, got '{}'", raw)
            })?,
            None => false,
        };

        let breaker_reset_timeout_secs = match non_empty(lookup("BREAKER_RESET_TIMEOUT_SECS")) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("BREAKER_RESET_TIMEOUT_SECS must be a number, got '{}'", raw)
            })?),
            None => None,
        };

        Ok(IngestionConfig {
            base,
            bucket_name: required("BUCKET_NAME")?,
            bucket_folder_name: non_empty(lookup("BUCKET_FOLDER_NAME"))
                .unwrap_or_else(|| DEFAULT_BUCKET_FOLDER.to_string()),
            key_name: required("KEY_NAME")?,
            secret_version: non_empty(lookup("SECRET_VERSION"))
                .unwrap_or_else(|| DEFAULT_SECRET_VERSION.to_string()),
            project_id: required("PROJECT_ID")?,
            storage_backend: parse_or(&lookup, "STORAGE_BACKEND", StorageBackend::Gcs)?,
            s3_region: non_empty(lookup("S3_REGION")).or_else(|| non_empty(lookup("AWS_REGION"))),
            s3_endpoint: non_empty(lookup("S3_ENDPOINT")),
            local_storage_path: non_empty(lookup("LOCAL_STORAGE_PATH")),
            secret_backend: parse_or(&lookup, "SECRET_BACKEND", SecretBackend::SecretManager)?,
            google_vision_api_key: non_empty(lookup("GOOGLE_VISION_API_KEY")),
            google_access_token: non_empty(lookup("GOOGLE_ACCESS_TOKEN")),
            vision_endpoint: non_empty(lookup("VISION_API_ENDPOINT"))
                .unwrap_or_else(|| GOOGLE_VISION_ENDPOINT.to_string()),
            secret_manager_endpoint: non_empty(lookup("SECRET_MANAGER_ENDPOINT"))
                .unwrap_or_else(|| GOOGLE_SECRET_MANAGER_ENDPOINT.to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            financial_keywords,
            upload_max_attempts: parse_or(&lookup, "UPLOAD_MAX_ATTEMPTS", UPLOAD_MAX_ATTEMPTS)?,
            upload_retry_delay_secs: parse_or(
                &lookup,
                "UPLOAD_RETRY_DELAY_SECS",
                UPLOAD_RETRY_DELAY_SECS,
            )?,
            breaker_failure_threshold: parse_or(
                &lookup,
                "BREAKER_FAILURE_THRESHOLD",
                BREAKER_FAILURE_THRESHOLD,
            )?,
            breaker_reset_timeout_secs,
            breaker_count_client_errors,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.bucket_folder_name.starts_with('/') || self.bucket_folder_name.ends_with('/') {
            return Err(anyhow::anyhow!(
                "BUCKET_FOLDER_NAME must not start or end with '/'"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }

        if self.financial_keywords.is_empty() {
            return Err(anyhow::anyhow!("FINANCIAL_KEYWORDS must not be empty"));
        }

        if self.upload_max_attempts == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_ATTEMPTS must be at least 1"));
        }

        if self.breaker_failure_threshold == 0 {
            return Err(anyhow::anyhow!(
                "BREAKER_FAILURE_THRESHOLD must be at least 1"
            ));
        }

        match self.storage_backend {
            StorageBackend::Gcs => {}
            StorageBackend::S3 => {
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
