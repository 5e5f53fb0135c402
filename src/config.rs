use std::{net::SocketAddr, path::PathBuf};

use thiserror::Error;

use crate::domain::models::image::DEFAULT_MAX_IMAGE_BYTES;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("upload directory {path} is unusable: {source}")]
    UploadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Settings read once at startup and handed to the components that need them
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub max_image_bytes: usize,
}

impl AppConfig {
    /// Read settings from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let upload_dir = lookup("UPLOAD_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("UPLOAD_DIR"))?;

        let max_image_bytes = match lookup("MAX_IMAGE_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|&bytes| bytes > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "MAX_IMAGE_BYTES",
                    reason: format!("expected a positive byte count, got {:?}", raw),
                })?,
            None => DEFAULT_MAX_IMAGE_BYTES,
        };

        Ok(Self {
            database_url,
            bind_addr,
            upload_dir,
            max_image_bytes,
        })
    }

    /// Create the upload directory if needed so a misconfigured path fails at startup
    pub fn ensure_upload_dir(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.upload_dir).map_err(|source| ConfigError::UploadDir {
            path: self.upload_dir.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_for_optional_settings() {
        let config = config_from(&[
            ("DATABASE_URL", "mysql://localhost/voice"),
            ("UPLOAD_DIR", "/var/uploads"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.upload_dir, PathBuf::from("/var/uploads"));
        assert_eq!(config.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn upload_dir_is_required() {
        let err = config_from(&[("DATABASE_URL", "mysql://localhost/voice"), ("UPLOAD_DIR", " ")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("UPLOAD_DIR")));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = config_from(&[
            ("DATABASE_URL", "mysql://localhost/voice"),
            ("UPLOAD_DIR", "/var/uploads"),
            ("MAX_IMAGE_BYTES", "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "MAX_IMAGE_BYTES",
                ..
            }
        ));
    }

    #[test]
    fn ensure_upload_dir_creates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let config = config_from(&[
            ("DATABASE_URL", "mysql://localhost/voice"),
            ("UPLOAD_DIR", root.path().join("nested/uploads").to_str().unwrap()),
        ])
        .unwrap();

        config.ensure_upload_dir().unwrap();
        assert!(config.upload_dir.is_dir());
    }
}
