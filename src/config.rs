//! Configuration management for the city recipes service
//!
//! Settings come from defaults, an optional TOML file, `CITYRECIPES__*`
//! environment variables and finally the plain deployment variables
//! (`API_KEY`, `PORT`, `HOST`, `RENDER_EXTERNAL_URL`, `RENDER_GIT_REPO_SLUG`).

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// City data API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Startup submission configuration
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// City data API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the city data service
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Key sent as the `apiKey` query parameter
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u32,
}

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Explicit bind host
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the one-shot submission made after startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Public URL of this service; submission is skipped when unset
    pub public_url: Option<String>,
    /// Repository slug reported alongside the URL
    pub git_repo: Option<String>,
    /// Delay before submitting, letting the listener settle
    #[serde(default = "default_submission_delay")]
    pub delay_seconds: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_api_base_url() -> String {
    "https://api-ugi2pflmha-ew.a.run.app".to_string()
}

fn default_api_timeout() -> u32 {
    30
}

fn default_port() -> u16 {
    3000
}

fn default_submission_delay() -> u64 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            api_key: None,
            timeout_seconds: default_api_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            public_url: None,
            git_repo: None,
            delay_seconds: default_submission_delay(),
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

impl AppConfig {
    /// Load configuration from `config.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        let mut builder = Config::builder();
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("CITYRECIPES")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder
            .set_override_option("api.api_key", env::var("API_KEY").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("server.host", env::var("HOST").ok())?
            .set_override_option(
                "submission.public_url",
                env::var("RENDER_EXTERNAL_URL").ok(),
            )?
            .set_override_option(
                "submission.git_repo",
                env::var("RENDER_GIT_REPO_SLUG").ok(),
            )?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Replace blank values with their defaults
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_api_base_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_api_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.host.as_deref().is_some_and(str::is_empty) {
            self.server.host = None;
        }
        if self.submission.public_url.as_deref().is_some_and(str::is_empty) {
            self.submission.public_url = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_api(&self) -> Result<()> {
        if let Some(api_key) = &self.api.api_key {
            if api_key.trim().is_empty() {
                bail!("API key cannot be empty if provided. Either remove it or provide a valid key.");
            }
        }

        if self.api.timeout_seconds > 300 {
            bail!("API timeout cannot exceed 300 seconds");
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            bail!("API base URL must be a valid HTTP or HTTPS URL");
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            );
        }

        Ok(())
    }

    /// Host the listener binds to.
    ///
    /// A publicly reachable deployment always listens on all interfaces and
    /// ignores `server.host`. Otherwise the configured host, or `localhost`.
    #[must_use]
    pub fn bind_host(&self) -> String {
        match (&self.submission.public_url, &self.server.host) {
            (Some(_), _) => "0.0.0.0".to_string(),
            (None, Some(host)) => host.clone(),
            (None, None) => "localhost".to_string(),
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host(), self.server.port)
    }
}
