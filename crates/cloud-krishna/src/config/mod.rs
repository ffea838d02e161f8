use std::env;
use std::fmt;
use std::path::PathBuf;

use reqwest::Url;

use crate::workflows::registration::submission::DEFAULT_RESUME_FOLDER;

const DEFAULT_HOST_SERVER: &str = "http://127.0.0.1:5000";
const DEFAULT_UPLOAD_ENDPOINT: &str = "https://upload.imagekit.io/api/v1/files/upload";
const DEFAULT_STATE_DIR: &str = ".cloud-krishna";

/// Distinguishes runtime behavior for different stages of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Log filter used when `APP_LOG_LEVEL` is unset.
    pub fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }
}

/// Top-level configuration passed into the registration workflow.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host_server = url_var("CK_HOST_SERVER", DEFAULT_HOST_SERVER)?;
        let upload_endpoint = url_var("CK_UPLOAD_ENDPOINT", DEFAULT_UPLOAD_ENDPOINT)?;
        let upload_public_key = env::var("CK_UPLOAD_PUBLIC_KEY").unwrap_or_default();
        let upload_folder =
            env::var("CK_UPLOAD_FOLDER").unwrap_or_else(|_| DEFAULT_RESUME_FOLDER.to_string());

        let state_dir = env::var("CK_STATE_DIR").unwrap_or_else(|_| DEFAULT_STATE_DIR.to_string());
        if state_dir.trim().is_empty() {
            return Err(ConfigError::InvalidStateDir);
        }

        let log_level = env::var("APP_LOG_LEVEL")
            .unwrap_or_else(|_| environment.default_log_level().to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                host_server,
                upload_endpoint,
                upload_public_key,
                upload_folder,
            },
            storage: StorageConfig {
                state_dir: PathBuf::from(state_dir),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn url_var(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        var: name,
        reason: err.to_string(),
    })?;
    Ok(trimmed.to_string())
}

/// Remote collaborators used by the registration workflow.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the registration and form-field backend.
    pub host_server: String,
    pub upload_endpoint: String,
    pub upload_public_key: String,
    pub upload_folder: String,
}

/// Where local client state (the application marker) lives.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub state_dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidUrl { var: &'static str, reason: String },
    InvalidStateDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl { var, reason } => {
                write!(f, "{var} must be an absolute URL ({reason})")
            }
            ConfigError::InvalidStateDir => write!(f, "CK_STATE_DIR must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in [
            "APP_ENV",
            "APP_LOG_LEVEL",
            "CK_HOST_SERVER",
            "CK_UPLOAD_ENDPOINT",
            "CK_UPLOAD_PUBLIC_KEY",
            "CK_UPLOAD_FOLDER",
            "CK_STATE_DIR",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.api.host_server, "http://127.0.0.1:5000");
        assert_eq!(config.api.upload_folder, "cloudkrishna/student_resumes");
        assert_eq!(config.storage.state_dir, PathBuf::from(".cloud-krishna"));
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn log_level_defaults_follow_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        assert_eq!(AppConfig::load().expect("config loads").telemetry.log_level, "info");

        env::set_var("APP_ENV", "ci");
        assert_eq!(AppConfig::load().expect("config loads").telemetry.log_level, "warn");

        env::set_var("APP_LOG_LEVEL", "trace");
        assert_eq!(AppConfig::load().expect("config loads").telemetry.log_level, "trace");
        reset_env();
    }

    #[test]
    fn host_server_drops_trailing_slash() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CK_HOST_SERVER", "https://api.cloudkrishna.in/");
        env::set_var("APP_ENV", "prod");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.api.host_server, "https://api.cloudkrishna.in");
        assert_eq!(config.environment, AppEnvironment::Production);
        reset_env();
    }

    #[test]
    fn rejects_relative_host_server() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CK_HOST_SERVER", "api/register");
        let err = AppConfig::load().expect_err("relative url rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                var: "CK_HOST_SERVER",
                ..
            }
        ));
        reset_env();
    }
}
