//! Configuration provider trait

use async_trait::async_trait;

use super::settings::Settings;

/// Source of settings
///
/// Implementations:
/// - `MemoryConfigProvider`: fixed settings, for tests and embedding
/// - `FileConfigProvider`: YAML file (~/.config/toolweave/config.yaml)
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Load and validate the settings
    async fn load(&self) -> ConfigResult<Settings>;
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
