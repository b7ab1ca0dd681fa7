//! Settings file schema

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::backend::ModelConfig;
use crate::orchestrator::{OrchestratorConfig, DEFAULT_HISTORY_WINDOW};
use crate::tools::DEFAULT_RESULT_CHAR_LIMIT;
use crate::types::{ProviderConfig, DEFAULT_MCP_PATH};

use super::traits::{ConfigError, ConfigResult};

/// Default model, served by a local Ollama
pub const DEFAULT_MODEL: &str = "llama3.1";

/// Language model settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model name as understood by genai (selects the adapter)
    pub name: String,
    /// Endpoint override, e.g. a remote Ollama host
    pub api_base: Option<String>,
    /// Explicit API key; otherwise the adapter's environment variable is used
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            api_base: None,
            api_key: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Complete toolweave settings
///
/// ```yaml
/// model:
///   name: llama3.1
/// history_window: 10
/// providers:
///   pdb:    { host: localhost, port: 8000 }
///   chembl: { host: localhost, port: 8001, path: /mcp }
/// ```
///
/// Provider order in the file is the catalog merge order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    pub history_window: usize,
    pub result_char_limit: usize,
    /// Stream the final answer
    pub stream: bool,
    #[serde(deserialize_with = "ordered_providers")]
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            history_window: DEFAULT_HISTORY_WINDOW,
            result_char_limit: DEFAULT_RESULT_CHAR_LIMIT,
            stream: true,
            providers: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse and validate YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        // An empty document is null, which does not deserialize into a struct
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::invalid("model.name must not be empty"));
        }
        if self.history_window == 0 {
            return Err(ConfigError::invalid("history_window must be greater than 0"));
        }
        if self.result_char_limit == 0 {
            return Err(ConfigError::invalid("result_char_limit must be greater than 0"));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.name.trim().is_empty() {
                return Err(ConfigError::invalid("provider name must not be empty"));
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(ConfigError::invalid(format!("provider '{}' is listed twice", provider.name)));
            }
            if provider.host.trim().is_empty() {
                return Err(ConfigError::invalid(format!("provider '{}' has an empty host", provider.name)));
            }
            if provider.port == 0 {
                return Err(ConfigError::invalid(format!("provider '{}' has port 0", provider.name)));
            }
        }
        Ok(())
    }

    /// Backend settings for `GenaiBackend`
    pub fn model_config(&self) -> ModelConfig {
        let mut config = ModelConfig::new(&self.model.name);
        if let Some(key) = &self.model.api_key {
            config = config.with_api_key(key);
        }
        if let Some(base) = &self.model.api_base {
            config = config.with_api_base(base);
        }
        config
    }

    /// Orchestrator settings, with default prompts
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let mut config = OrchestratorConfig::default()
            .with_history_window(self.history_window)
            .with_result_char_limit(self.result_char_limit)
            .with_stream_final(self.stream);
        config.temperature = self.model.temperature;
        config.max_tokens = self.model.max_tokens;
        config
    }
}

#[derive(Deserialize)]
struct ProviderEntry {
    host: String,
    port: u16,
    path: Option<String>,
}

/// Deserialize `name: {host, port, path?}` keeping the file order
fn ordered_providers<'de, D>(deserializer: D) -> Result<Vec<ProviderConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ProvidersVisitor;

    impl<'de> Visitor<'de> for ProvidersVisitor {
        type Value = Vec<ProviderConfig>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of provider name to {host, port, path}")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut providers = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, entry)) = map.next_entry::<String, ProviderEntry>()? {
                let path = entry.path.unwrap_or_else(|| DEFAULT_MCP_PATH.to_string());
                providers.push(ProviderConfig::new(name, entry.host, entry.port).with_path(path));
            }
            Ok(providers)
        }
    }

    deserializer.deserialize_any(ProvidersVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let settings = Settings::from_yaml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.history_window, 10);
        assert_eq!(settings.result_char_limit, 10_000);
        assert!(settings.stream);
        assert!(settings.providers.is_empty());
    }

    #[test]
    fn test_providers_keep_file_order() {
        let yaml = r#"
model:
  name: gpt-4o-mini
  temperature: 0.2
history_window: 4
stream: false
providers:
  zeta: { host: zeta.local, port: 9000 }
  chembl: { host: localhost, port: 8001, path: /chembl/mcp }
  alpha: { host: localhost, port: 8002 }
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        let names: Vec<&str> = settings.providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "chembl", "alpha"]);
        assert_eq!(settings.providers[0].path, "/mcp");
        assert_eq!(settings.providers[1].endpoint(), "http://localhost:8001/chembl/mcp");
        assert_eq!(settings.model.name, "gpt-4o-mini");
        assert_eq!(settings.history_window, 4);
        assert!(!settings.stream);

        let orchestrator = settings.orchestrator_config();
        assert_eq!(orchestrator.history_window, 4);
        assert!(!orchestrator.stream_final);
        assert_eq!(orchestrator.temperature, Some(0.2));
    }

    #[test]
    fn test_null_providers() {
        let settings = Settings::from_yaml("providers:\n").unwrap();
        assert!(settings.providers.is_empty());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let zero_window = "history_window: 0\n";
        assert!(matches!(Settings::from_yaml(zero_window), Err(ConfigError::Invalid(_))));

        let zero_port = "providers:\n  pdb: { host: localhost, port: 0 }\n";
        assert!(matches!(Settings::from_yaml(zero_port), Err(ConfigError::Invalid(_))));

        let empty_host = "providers:\n  pdb: { host: '', port: 8000 }\n";
        assert!(matches!(Settings::from_yaml(empty_host), Err(ConfigError::Invalid(_))));

        let missing_port = "providers:\n  pdb: { host: localhost }\n";
        assert!(matches!(Settings::from_yaml(missing_port), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_model_config() {
        let yaml = "model:\n  name: llama3.1\n  api_base: http://gpu-box:11434/\n";
        let model = Settings::from_yaml(yaml).unwrap().model_config();
        assert_eq!(model.model, "llama3.1");
        assert_eq!(model.api_base.as_deref(), Some("http://gpu-box:11434/"));
        assert!(model.api_key.is_none());
    }
}
