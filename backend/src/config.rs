use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::i18n::{DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
use crate::timezone::{DEFAULT_TIMEZONE, TimezoneResolver};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub grpc: GrpcConfig,
    pub logging: LoggingConfig,
    pub i18n: I18nConfig,
    pub timezone: TimezoneConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// gRPC listener and the Greeter endpoint the HTTP side calls
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    pub host: String,
    pub port: u16,
    /// Greeter server used by `/hello-with-grpc/`, e.g. "http://127.0.0.1:50051"
    pub upstream: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Message bundle location and the supported language set
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Directory holding one `active.<tag>.toml` per language
    pub translations_dir: String,
    pub default_language: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    /// IANA name used when a request carries no valid timezone
    pub default: String,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the given path, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
        // 1. Load from config file
        let mut config = match path.map(str::to_string).or_else(Self::find_config_file) {
            Some(config_path) => {
                tracing::info!("Loading configuration from {}", config_path);
                Self::from_toml(&config_path)?
            },
            None => {
                tracing::warn!("Configuration file not found, using defaults");
                Config::default()
            },
        };

        // 2. Override with environment variables
        config.apply_env_overrides();

        // 3. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_GRPC_PORT: gRPC server port (default: 50051)
    /// - APP_GRPC_UPSTREAM: Greeter endpoint for /hello-with-grpc/
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,locale_gate=debug")
    /// - APP_LOG_FILE: Log file path
    /// - APP_TRANSLATIONS_DIR: Directory with the message files
    /// - APP_DEFAULT_LANGUAGE: Default language tag (e.g., "en-US")
    /// - APP_DEFAULT_TIMEZONE: Default IANA timezone (e.g., "Asia/Shanghai")
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(port) = std::env::var("APP_GRPC_PORT")
            && let Ok(port) = port.parse()
        {
            self.grpc.port = port;
            tracing::info!("Override grpc.port from env: {}", self.grpc.port);
        }

        if let Ok(upstream) = std::env::var("APP_GRPC_UPSTREAM") {
            self.grpc.upstream = upstream;
            tracing::info!("Override grpc.upstream from env: {}", self.grpc.upstream);
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(file) = std::env::var("APP_LOG_FILE") {
            tracing::info!("Override logging.file from env: {}", file);
            self.logging.file = Some(file).filter(|f| !f.is_empty());
        }

        if let Ok(dir) = std::env::var("APP_TRANSLATIONS_DIR") {
            self.i18n.translations_dir = dir;
            tracing::info!("Override i18n.translations_dir from env: {}", self.i18n.translations_dir);
        }

        if let Ok(language) = std::env::var("APP_DEFAULT_LANGUAGE") {
            self.i18n.default_language = language;
            tracing::info!("Override i18n.default_language from env: {}", self.i18n.default_language);
        }

        if let Ok(tz) = std::env::var("APP_DEFAULT_TIMEZONE") {
            self.timezone.default = tz;
            tracing::info!("Override timezone.default from env: {}", self.timezone.default);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        // Validate server port
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.grpc.port == 0 {
            anyhow::bail!("gRPC port cannot be 0");
        }

        if self.grpc.port == self.server.port && self.grpc.host == self.server.host {
            anyhow::bail!("grpc and server cannot listen on the same address");
        }

        if let Err(e) = self.grpc_upstream() {
            anyhow::bail!("Invalid grpc.upstream {:?}: {}", self.grpc.upstream, e);
        }

        if self.i18n.translations_dir.is_empty() {
            anyhow::bail!("i18n.translations_dir cannot be empty");
        }

        if self.i18n.languages.is_empty() {
            anyhow::bail!("i18n.languages must list at least one language");
        }

        if !self.i18n.languages.contains(&self.i18n.default_language) {
            anyhow::bail!(
                "i18n.default_language {} is not in i18n.languages {:?}",
                self.i18n.default_language,
                self.i18n.languages
            );
        }

        if let Err(e) = TimezoneResolver::new(&self.timezone.default) {
            anyhow::bail!("Invalid timezone.default: {}", e);
        }

        Ok(())
    }

    /// Endpoint for `grpc.upstream`; connects lazily on first use.
    pub fn grpc_upstream(&self) -> Result<tonic::transport::Endpoint, tonic::transport::Error> {
        tonic::transport::Endpoint::from_shared(self.grpc.upstream.clone())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
            upstream: "http://127.0.0.1:50051".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,locale_gate=debug".to_string(), file: None }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            translations_dir: "translations".to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            languages: SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self { default: DEFAULT_TIMEZONE.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.i18n.languages, vec!["en-US", "zh-CN"]);
        assert_eq!(config.timezone.default, "Asia/Shanghai");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
[server]
port = 9090

[timezone]
default = "Europe/Paris"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.timezone.default, "Europe/Paris");
        assert_eq!(config.i18n.default_language, "en-US");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shipped_config_file_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/conf/config.toml");
        let config = Config::from_toml(path).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.file.as_deref(), Some("logs/locale-gate.log"));
    }

    #[test]
    fn test_invalid_default_timezone_is_rejected() {
        let mut config = Config::default();
        config.timezone.default = "Atlantis/Capital".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_language_must_be_listed() {
        let mut config = Config::default();
        config.i18n.default_language = "fr".to_string();
        assert!(config.validate().is_err());

        config.i18n.languages.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_grpc_section() {
        let config = Config::from_toml_str(
            r#"
[grpc]
port = 6000
upstream = "http://greeter.internal:6000"
"#,
        )
        .unwrap();
        assert_eq!(config.grpc.host, "0.0.0.0");
        assert!(config.validate().is_ok());
        assert_eq!(config.grpc_upstream().unwrap().uri().port_u16(), Some(6000));

        let mut config = Config::default();
        config.grpc.upstream = "not a uri".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grpc.port = config.server.port;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
