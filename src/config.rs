//! Configuration management for Resume Roaster.
//!
//! Loads settings from `~/.config/resume-roaster/config.toml` with environment
//! overrides. The loaded [`Config`] is passed explicitly to the pieces that
//! need it (the model client at construction, the server at startup); nothing
//! reads configuration through a global.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_verbosity")]
    pub log_verbosity: LogVerbosity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Gemini model identifier used for both roast flows.
    #[serde(default = "default_model")]
    pub name: String,
    /// Base URL of the `generateContent` endpoint family.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Per-call timeout in seconds for the outbound API request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdfConfig {
    /// Cap on the longest edge of the rendered first page, in pixels.
    /// Bounds memory for oversized pages regardless of their physical size.
    #[serde(default = "default_max_render_pixels")]
    pub max_render_pixels: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ApiKeysConfig {
    #[serde(default)]
    pub google: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogVerbosity {
    Minimal,
    #[default]
    Compact,
    Verbose,
}

// Default value functions
fn default_port() -> u16 {
    8501
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_max_output_tokens() -> u32 {
    2048
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_render_pixels() -> u32 {
    2000
}
fn default_verbosity() -> LogVerbosity {
    LogVerbosity::Compact
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_verbosity: default_verbosity(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            endpoint: default_endpoint(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_render_pixels: default_max_render_pixels(),
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resume-roaster")
            .join("config.toml")
    }

    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config with environment overrides applied (convenience method).
    pub fn load_with_env() -> Self {
        Self::load().unwrap_or_default().with_env_overrides()
    }

    /// Load config from a specific path.
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// `GOOGLE_API_KEY` is the same variable the hosted Gemini tooling reads,
    /// so a key exported for other tools works here unchanged. The key is not
    /// validated eagerly; a missing or bad key surfaces on the first roast.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.api_keys.google = Some(key);
        }
        if let Ok(val) = std::env::var("RESUME_ROASTER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(model) = std::env::var("RESUME_ROASTER_MODEL") {
            self.model.name = model;
        }
        self
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, content).map_err(ConfigError::Io)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
