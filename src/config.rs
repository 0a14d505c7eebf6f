use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::PaletteError;
use crate::pipeline::stages::DedupPolicy;

pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_UPLOAD_PRESET: &str = "alamo Tees";

/// Credentials and endpoints for the Cloudinary store. Read from the
/// `CLOUDINARY_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_preset: String,
    pub base_url: String,
}

impl CloudinaryConfig {
    pub fn from_env() -> Result<Self, PaletteError> {
        let config: CloudinaryConfig = Config::builder()
            .set_default("upload_preset", DEFAULT_UPLOAD_PRESET)?
            .set_default("base_url", DEFAULT_CLOUDINARY_BASE_URL)?
            .add_source(Environment::with_prefix("CLOUDINARY"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.cloud_name.trim().is_empty() {
            return Err(PaletteError::Configuration(
                "CLOUDINARY_CLOUD_NAME must not be empty".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() || self.api_secret.trim().is_empty() {
            return Err(PaletteError::Configuration(
                "CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Process-level settings. Per-request bounds are fixed constants and do
/// not live here.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub log_level: String,
    pub backend_timeout_ms: Option<u64>,
    pub dedup_policy: DedupPolicy,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            backend_timeout_ms: None,
            dedup_policy: DedupPolicy::FirstSeen,
        }
    }
}

impl Configuration {
    /// Defaults, then `palette.toml` (or `path`) if present, then
    /// `PALETTE_*` environment variables such as `PALETTE_BACKEND_TIMEOUT_MS`.
    pub fn load(path: Option<&Path>) -> Result<Self, PaletteError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("palette").required(false),
        };
        let configuration: Configuration = Config::builder()
            .set_default("log_level", "info")?
            .set_default("dedup_policy", "first_seen")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("PALETTE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.backend_timeout_ms == Some(0) {
            return Err(PaletteError::Configuration(
                "backend_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(PaletteError::Configuration(format!(
                "unknown log level {:?}",
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend_timeout_ms.map(Duration::from_millis)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_valid() {
        let configuration = Configuration::default();
        assert!(configuration.validate().is_ok());
        assert_eq!(configuration.backend_timeout(), None);
        assert_eq!(configuration.dedup_policy, DedupPolicy::FirstSeen);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let configuration = Configuration {
            backend_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(configuration.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let configuration = Configuration {
            log_level: "chatty".to_string(),
            ..Default::default()
        };
        assert!(configuration.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_source() {
        let configuration: Configuration = Config::builder()
            .set_default("log_level", "info")
            .unwrap()
            .set_default("dedup_policy", "first_seen")
            .unwrap()
            .add_source(File::from_str(
                "log_level = \"debug\"\nbackend_timeout_ms = 2500\ndedup_policy = \"max_dominance\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(configuration.log_level(), tracing::Level::DEBUG);
        assert_eq!(configuration.backend_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(configuration.dedup_policy, DedupPolicy::MaxDominance);
    }

    #[test]
    fn test_cloudinary_validation() {
        let config = CloudinaryConfig {
            cloud_name: String::new(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            base_url: DEFAULT_CLOUDINARY_BASE_URL.to_string(),
        };
        assert!(config.validate().is_err());
    }
}
