//! Configuration schema for membridge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root config for the memory bridge.
///
/// Provider blocks are optional; without a `vector_store` the bridge runs on
/// the in-process engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MembridgeConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub llm: Option<ProviderConfig>,
    #[serde(default)]
    pub embedder: Option<ProviderConfig>,
    #[serde(default)]
    pub vector_store: Option<ProviderConfig>,
    #[serde(default)]
    pub search: SearchConfig,
}

impl MembridgeConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MembridgeConfigBuilder {
        MembridgeConfigBuilder::new()
    }
}

/// Builder for assembling a `MembridgeConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MembridgeConfigBuilder {
    config: MembridgeConfig,
}

impl MembridgeConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MembridgeConfig::default(),
        }
    }

    /// Set the language-model provider.
    pub fn llm(mut self, llm: ProviderConfig) -> Self {
        self.config.llm = Some(llm);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: ProviderConfig) -> Self {
        self.config.embedder = Some(embedder);
        self
    }

    /// Set the vector store provider.
    pub fn vector_store(mut self, vector_store: ProviderConfig) -> Self {
        self.config.vector_store = Some(vector_store);
        self
    }

    /// Replace the search settings.
    pub fn search(mut self, search: SearchConfig) -> Self {
        self.config.search = search;
        self
    }

    /// Finalize and return the built `MembridgeConfig`.
    pub fn build(self) -> MembridgeConfig {
        self.config
    }
}

/// External provider selection plus provider-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub provider: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl ProviderConfig {
    /// Provider with no extra settings.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            config: Map::new(),
        }
    }

    /// Add a provider-specific setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Read a string setting.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}

/// Search defaults applied by the bridge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
        }
    }
}

/// Default number of search results.
fn default_search_limit() -> usize {
    5
}
