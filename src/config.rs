//! Configuration management for FlashAI
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Every section except `[server]` is optional and falls back to the defaults
//! the generation pipeline was designed around (50/8000 characters, 15s budget,
//! 800ms debounce).

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Upper bound for any configured timeout, in milliseconds (5 minutes)
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Socket address to bind; `host` must be an IP literal
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip = self.host.trim().parse::<IpAddr>().map_err(|_| {
            AppError::Config(format!(
                "server.host '{}' must be an IP address such as 127.0.0.1 or 0.0.0.0",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Text-generation provider configuration
///
/// Holds only settings, never the credential itself. The credential is read
/// from the environment variable named by `api_key_env` when the provider is
/// constructed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ProviderConfig {
    /// Hard wall-clock budget for one provider call
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_tokens() -> u32 {
    800
}

fn default_timeout_ms() -> u64 {
    15_000
}

/// Input length bounds, counted in characters
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
        }
    }
}

fn default_min_chars() -> usize {
    50
}

fn default_max_chars() -> usize {
    8000
}

/// Settings for the study client (`flashai study`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Minimum spacing between two accepted submissions
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Round-trip budget enforced by the client, independent of the server's
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            debounce_ms: default_debounce_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_debounce_ms() -> u64 {
    800
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn check_timeout(name: &str, timeout_ms: u64) -> AppResult<()> {
    if timeout_ms == 0 {
        return Err(AppError::Config(format!(
            "{} must be greater than 0",
            name
        )));
    }
    if timeout_ms > MAX_TIMEOUT_MS {
        return Err(AppError::Config(format!(
            "{} cannot exceed {} ms (5 minutes), got {}",
            name, MAX_TIMEOUT_MS, timeout_ms
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display.clone(),
            source,
        })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; call it explicitly when
    /// building a `Config` by hand.
    pub fn validate(&self) -> AppResult<()> {
        self.server.socket_addr()?;

        let provider = &self.provider;

        if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "provider.base_url '{}' must start with 'http://' or 'https://'",
                provider.base_url
            )));
        }

        if provider.model.trim().is_empty() {
            return Err(AppError::Config(
                "provider.model cannot be empty".to_string(),
            ));
        }

        if provider.api_key_env.trim().is_empty() {
            return Err(AppError::Config(
                "provider.api_key_env cannot be empty".to_string(),
            ));
        }

        if !provider.temperature.is_finite()
            || provider.temperature < 0.0
            || provider.temperature > 2.0
        {
            return Err(AppError::Config(format!(
                "provider.temperature must be a finite number between 0.0 and 2.0, got {}",
                provider.temperature
            )));
        }

        if provider.max_tokens == 0 {
            return Err(AppError::Config(
                "provider.max_tokens must be greater than 0".to_string(),
            ));
        }

        check_timeout("provider.timeout_ms", provider.timeout_ms)?;
        check_timeout("client.timeout_ms", self.client.timeout_ms)?;

        if self.limits.min_chars == 0 {
            return Err(AppError::Config(
                "limits.min_chars must be greater than 0".to_string(),
            ));
        }
        if self.limits.min_chars > self.limits.max_chars {
            return Err(AppError::Config(format!(
                "limits.min_chars ({}) cannot exceed limits.max_chars ({})",
                self.limits.min_chars, self.limits.max_chars
            )));
        }

        if !self.client.server_url.starts_with("http://")
            && !self.client.server_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "client.server_url '{}' must start with 'http://' or 'https://'",
                self.client.server_url
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
