use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name offered to the browser for the generated PDF.
pub const DOWNLOAD_FILENAME: &str = "converted_images.pdf";

/// Multipart field carrying the uploaded images.
pub const UPLOAD_FIELD: &str = "images";

/// How transparency is removed when normalizing to RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaHandling {
    /// Drop the alpha channel and keep the color channels untouched.
    #[default]
    Discard,
    /// Composite every pixel over a white background.
    Flatten,
}

impl std::fmt::Display for AlphaHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discard => write!(f, "discard"),
            Self::Flatten => write!(f, "flatten"),
        }
    }
}

/// Image conversion options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default)]
    pub alpha: AlphaHandling,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Verbose request logging
    #[serde(default)]
    pub debug: bool,

    /// Maximum request body size for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_upload_bytes() -> usize {
    64 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub conversion: ConversionConfig,
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/img2pdf/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::from_file(&user_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", user_config.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                }
            }
        }

        // Try local config
        let local_config = PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigInvalid {
                field: "server.port".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }

        if self.server.max_upload_bytes == 0 {
            return Err(Error::ConfigInvalid {
                field: "server.max_upload_bytes".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/img2pdf/config.toml`, falling back to `$HOME/.config`.
fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("img2pdf").join("config.toml"))
}
