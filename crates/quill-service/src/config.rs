//! Configuration management for Quill servers.
//!
//! Supports multiple configuration sources with precedence:
//! 1. Environment variables (highest priority)
//! 2. TOML configuration file
//! 3. Default values (lowest priority)

use quill_llm::{BackendKind, GenerationSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Quill servers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation backends and the default backend name
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Credential store bootstrap
    #[serde(default)]
    pub auth: AuthSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration (bind address, outbound timeout)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout for each backend round-trip in seconds (default: 60)
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

/// Credential store bootstrap settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    /// JSON file with client and session records loaded at startup
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty (default: "pretty")
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file doesn't exist or has invalid TOML syntax.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::TomlError { path, source: e })
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Reads `path` when given, otherwise `config.toml` if it exists,
    /// otherwise defaults. Environment variables then override, and the
    /// result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new("config.toml").exists() => Self::from_file("config.toml")?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key/value lookup.
    ///
    /// Supported keys:
    /// - `QUILL_HOST`, `QUILL_PORT`, `QUILL_REQUEST_TIMEOUT_SECONDS`
    /// - `QUILL_DEFAULT_BACKEND`
    /// - `QUILL_<BACKEND>_API_KEY`, `_MODEL`, `_ENDPOINT`, `_MAX_TOKENS`
    ///   for `OPENAI`, `ANTHROPIC` and `GEMINI`
    /// - `QUILL_ANTHROPIC_VERSION`
    /// - `QUILL_SEED_FILE`
    /// - `QUILL_LOG_LEVEL`, `QUILL_LOG_FORMAT`
    ///
    /// Numeric values that fail to parse are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("QUILL_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("QUILL_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        if let Some(timeout) = lookup("QUILL_REQUEST_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.server.request_timeout_seconds = timeout;
        }

        if let Some(backend) = lookup("QUILL_DEFAULT_BACKEND") {
            self.generation.default_backend = backend;
        }

        for kind in BackendKind::ALL {
            let prefix = format!("QUILL_{}", kind.as_str().to_uppercase());
            let backend = self.generation.config_for_mut(kind);

            if let Some(api_key) = lookup(&format!("{prefix}_API_KEY")) {
                backend.api_key = api_key;
            }
            if let Some(model) = lookup(&format!("{prefix}_MODEL")) {
                backend.model = model;
            }
            if let Some(endpoint) = lookup(&format!("{prefix}_ENDPOINT")) {
                backend.endpoint = endpoint;
            }
            if let Some(max_tokens) =
                lookup(&format!("{prefix}_MAX_TOKENS")).and_then(|v| v.parse().ok())
            {
                backend.max_tokens = max_tokens;
            }
        }

        if let Some(version) = lookup("QUILL_ANTHROPIC_VERSION") {
            self.generation.anthropic.version = Some(version);
        }

        if let Some(seed_file) = lookup("QUILL_SEED_FILE") {
            self.auth.seed_file = Some(PathBuf::from(seed_file));
        }

        if let Some(level) = lookup("QUILL_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("QUILL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate the configuration.
    ///
    /// Backends without credentials are allowed; they report themselves
    /// unavailable at generation time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "server.request_timeout_seconds must be > 0".to_string(),
            ));
        }

        if self.generation.default_backend.parse::<BackendKind>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "generation.default_backend `{}` is not one of: {}",
                self.generation.default_backend,
                BackendKind::names().join(", ")
            )));
        }

        for kind in BackendKind::ALL {
            if self.generation.config_for(kind).max_tokens == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "generation.{kind}.max_tokens must be > 0"
                )));
            }
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be `json` or `pretty`, got `{}`",
                self.logging.format
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config file {path}: {source}")]
    TomlError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.generation.default_backend, "openai");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[generation]
default_backend = "anthropic"

[generation.anthropic]
api_key = "ak-file"
model = "claude-test"
endpoint = "https://llm.test/v1/messages"
max_tokens = 256
version = "2023-06-01"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.generation.default_backend, "anthropic");
        assert_eq!(config.generation.anthropic.api_key, "ak-file");
        assert_eq!(config.generation.anthropic.max_tokens, 256);
        assert_eq!(config.generation.openai.model, "gpt-4o-mini");
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::TomlError { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/quill.toml"),
            Err(ConfigError::IoError { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(overrides(&[
            ("QUILL_PORT", "7000"),
            ("QUILL_DEFAULT_BACKEND", "gemini"),
            ("QUILL_GEMINI_API_KEY", "g-env"),
            ("QUILL_GEMINI_MAX_TOKENS", "512"),
            ("QUILL_OPENAI_ENDPOINT", "http://localhost:11434/v1/chat/completions"),
            ("QUILL_ANTHROPIC_VERSION", "2024-10-22"),
            ("QUILL_SEED_FILE", "/etc/quill/seed.json"),
        ]));

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.generation.default_backend, "gemini");
        assert_eq!(config.generation.gemini.api_key, "g-env");
        assert_eq!(config.generation.gemini.max_tokens, 512);
        assert_eq!(
            config.generation.openai.endpoint,
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(config.generation.anthropic.version.as_deref(), Some("2024-10-22"));
        assert_eq!(config.auth.seed_file, Some(PathBuf::from("/etc/quill/seed.json")));
    }

    #[test]
    fn test_unparseable_numeric_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(overrides(&[("QUILL_PORT", "eighty")]));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_validate_rejects_unknown_default_backend() {
        let mut config = Config::default();
        config.generation.default_backend = "cohere".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.request_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.openai.max_tokens = 0;
        assert!(config.validate().is_err());
    }
}
