//! Configuration for the classifier client

use serde::{Deserialize, Serialize};
use xedout_core::{Error, Result};

/// Default chat-completion endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default number of images forwarded per post
pub const DEFAULT_MAX_IMAGES: usize = 2;

/// Settings for calls to the moderation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Chat-completion endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Images beyond this count are not sent
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// Overall request timeout; the HTTP client default applies when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_images: default_max_images(),
            request_timeout_secs: None,
        }
    }
}

impl ClassifierConfig {
    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings before any request is made
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| Error::config(format!("invalid endpoint '{}': {}", self.endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint scheme '{}' is not supported",
                endpoint.scheme()
            )));
        }

        if self.model.trim().is_empty() {
            return Err(Error::config("model must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::config(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }

        if self.max_images == 0 {
            return Err(Error::config("max_images must be at least 1"));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(Error::config("request_timeout_secs must be positive"));
        }

        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_images() -> usize {
    DEFAULT_MAX_IMAGES
}
