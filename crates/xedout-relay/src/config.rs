//! Relay configuration

use crate::codec::DEFAULT_MAX_INBOUND_BYTES;
use crate::host::HostOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use xedout_classifier::ClassifierConfig;

/// Relay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Moderation model settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Requests processed concurrently by the host loop
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Largest inbound native message accepted
    #[serde(default = "default_max_inbound_bytes")]
    pub max_inbound_bytes: usize,
}

/// Values given on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_in_flight: Option<usize>,
}

impl RelayConfig {
    /// Load configuration from file and CLI overrides.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(config_path: impl AsRef<Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default()
        };

        if let Some(endpoint) = &overrides.endpoint {
            config.classifier.endpoint = endpoint.clone();
        }

        if let Some(model) = &overrides.model {
            config.classifier.model = model.clone();
        }

        if let Some(max_in_flight) = overrides.max_in_flight {
            config.max_in_flight = max_in_flight;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check all settings
    pub fn validate(&self) -> xedout_core::Result<()> {
        self.classifier.validate()?;

        if self.max_in_flight == 0 {
            return Err(xedout_core::Error::config("max_in_flight must be at least 1"));
        }

        if self.max_inbound_bytes == 0 || self.max_inbound_bytes > u32::MAX as usize {
            return Err(xedout_core::Error::config(
                "max_inbound_bytes must be between 1 and 4294967295",
            ));
        }

        Ok(())
    }

    /// Limits for the host loop
    pub fn host_options(&self) -> HostOptions {
        HostOptions {
            max_in_flight: self.max_in_flight,
            max_inbound_bytes: self.max_inbound_bytes,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            max_in_flight: default_max_in_flight(),
            max_inbound_bytes: default_max_inbound_bytes(),
        }
    }
}

fn default_max_in_flight() -> usize {
    8
}

fn default_max_inbound_bytes() -> usize {
    DEFAULT_MAX_INBOUND_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            RelayConfig::load("/nonexistent/xedout.yaml", &ConfigOverrides::default()).unwrap();
        assert_eq!(config, RelayConfig::default());
    }

    #[test]
    fn test_file_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "classifier:\n  model: gpt-4o\n  temperature: 0.1\nmax_in_flight: 2"
        )
        .unwrap();

        let overrides = ConfigOverrides {
            endpoint: Some("http://127.0.0.1:9000/v1/chat/completions".to_string()),
            model: None,
            max_in_flight: Some(4),
        };
        let config = RelayConfig::load(file.path(), &overrides).unwrap();

        assert_eq!(config.classifier.model, "gpt-4o");
        assert_eq!(config.classifier.temperature, 0.1);
        assert_eq!(config.classifier.max_images, 2);
        assert_eq!(
            config.classifier.endpoint,
            "http://127.0.0.1:9000/v1/chat/completions"
        );
        assert_eq!(config.max_in_flight, 4);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let overrides = ConfigOverrides {
            max_in_flight: Some(0),
            ..Default::default()
        };
        assert!(RelayConfig::load("/nonexistent/xedout.yaml", &overrides).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "classifier:\n  temperature: 9").unwrap();
        assert!(RelayConfig::load(file.path(), &ConfigOverrides::default()).is_err());
    }
}
