//! In-memory configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::Settings;
use super::traits::{ConfigProvider, ConfigResult};

/// Settings held in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    settings: RwLock<Settings>,
}

impl MemoryConfigProvider {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Replace the held settings
    pub fn set(&self, settings: Settings) {
        *self.settings.write() = settings;
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn load(&self) -> ConfigResult<Settings> {
        let settings = self.settings.read().clone();
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderConfig;

    #[tokio::test]
    async fn test_memory_provider() {
        let provider = MemoryConfigProvider::default();
        assert!(provider.load().await.unwrap().providers.is_empty());

        let mut settings = Settings::default();
        settings.providers.push(ProviderConfig::new("pdb", "localhost", 8000));
        provider.set(settings);
        assert_eq!(provider.load().await.unwrap().providers.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_provider_validates() {
        let mut settings = Settings::default();
        settings.providers.push(ProviderConfig::new("pdb", "localhost", 8000));
        settings.providers.push(ProviderConfig::new("pdb", "localhost", 8001));
        let provider = MemoryConfigProvider::new(settings);
        assert!(provider.load().await.is_err());
    }
}
