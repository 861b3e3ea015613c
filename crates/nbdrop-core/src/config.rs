//! Configuration module
//!
//! All settings come from the environment (optionally seeded from a `.env`
//! file). Google Drive settings are optional: without credentials the remote
//! mirror is disabled for the whole process lifetime.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_SAVE_DIR: &str = "saved_results";
const DEFAULT_SERVICE_ACCOUNT_FILE: &str = "service_account.json";
const MAX_UPLOAD_SIZE_MB: usize = 50;

/// Remote mirror settings, handed to the storage crate at startup.
#[derive(Clone, Debug, Default)]
pub struct MirrorConfig {
    /// Inline service-account key (`GOOGLE_SERVICE_ACCOUNT_JSON`). Preferred.
    pub service_account_json: Option<String>,
    /// Key file used for local development when no inline key is set.
    pub service_account_file: Option<PathBuf>,
    /// Destination folder (`GOOGLE_DRIVE_FOLDER_ID`).
    pub folder_id: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub save_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub mirror: MirrorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            mirror: MirrorConfig::default(),
        }
    }
}

/// Read an env var, treating blank values as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = match non_empty_var("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", port, e))?,
            None => DEFAULT_PORT,
        };

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let save_dir = non_empty_var("SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR));

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let mirror = MirrorConfig {
            service_account_json: non_empty_var("GOOGLE_SERVICE_ACCOUNT_JSON"),
            service_account_file: Some(PathBuf::from(
                non_empty_var("GOOGLE_SERVICE_ACCOUNT_FILE")
                    .unwrap_or_else(|| DEFAULT_SERVICE_ACCOUNT_FILE.to_string()),
            )),
            folder_id: non_empty_var("GOOGLE_DRIVE_FOLDER_ID"),
        };

        let config = Config {
            server_port,
            environment,
            cors_origins,
            save_dir,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            mirror,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be between 1 and 65535"));
        }
        if self.save_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("SAVE_DIR must not be empty"));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_port, 5001);
        assert_eq!(config.save_dir, PathBuf::from("saved_results"));
        assert!(!config.is_production());
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let config = Config {
            environment: "Production".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            environment: "prod".to_string(),
            cors_origins: vec!["https://study.example.org".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_values_rejected() {
        let config = Config {
            server_port: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_upload_size_bytes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            save_dir: PathBuf::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
