use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::error::StartupError;

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to listen on
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// API key for the Gemini endpoint
    pub api_key: Option<String>,
    /// Model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Base URL of the generative language API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for scraping a website, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Timeout for a single model call, in seconds
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            fetch_timeout_secs: default_fetch_timeout(),
            model_timeout_secs: default_model_timeout(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_model_timeout() -> u64 {
    60
}

impl ServerConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Plain `GOOGLE_API_KEY`, `HOST` and `PORT` environment variables
    /// 2. Environment variables with BON_AIPPETIT__ prefix
    /// 3. config.toml file in current directory
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Check that the server can start with this configuration.
    pub fn validate(&self) -> Result<(), StartupError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(StartupError::MissingApiKey),
        }
        if self.fetch_timeout_secs == 0 {
            return Err(StartupError::InvalidSetting {
                key: "fetch_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.model_timeout_secs == 0 {
            return Err(StartupError::InvalidSetting {
                key: "model_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(StartupError::InvalidSetting {
                key: "temperature",
                reason: format!("{} is outside 0.0-2.0", self.temperature),
            });
        }
        Ok(())
    }

    /// Socket address string the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: BON_AIPPETIT__MODEL, BON_AIPPETIT__FETCH_TIMEOUT_SECS
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("BON_AIPPETIT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        // Plain variables used by hosting platforms win over everything else
        .set_override_option("api_key", std::env::var("GOOGLE_API_KEY").ok())?
        .set_override_option("host", std::env::var("HOST").ok())?
        .set_override_option("port", std::env::var("PORT").ok())?
        .build()?;

    settings.try_deserialize()
}
