use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetsightError, Result};

/// Completion endpoint configuration. Credentials come from here or the
/// environment, never from source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantConfig {
    /// `openai-compat` (Groq, OpenAI, ...) or `anthropic`.
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for openai-compat providers, full endpoint for anthropic.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: "openai-compat".into(),
            model: "llama-3.3-70b-versatile".into(),
            api_key: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AssistantConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| NetsightError::Config(format!("failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        if let Ok(provider) = env::var("NETSIGHT_PROVIDER") {
            cfg.provider = provider;
        }
        if let Ok(model) = env::var("NETSIGHT_MODEL") {
            cfg.model = model;
        }
        if let Ok(key) = env::var("NETSIGHT_API_KEY") {
            cfg.api_key = Some(key);
        }
        if let Ok(base_url) = env::var("NETSIGHT_BASE_URL") {
            cfg.base_url = Some(base_url);
        }
        if let Ok(temperature) = env::var("NETSIGHT_TEMPERATURE") {
            if let Ok(parsed) = temperature.parse::<f64>() {
                cfg.temperature = parsed;
            }
        }
        if let Ok(max_tokens) = env::var("NETSIGHT_MAX_TOKENS") {
            if let Ok(parsed) = max_tokens.parse::<u32>() {
                cfg.max_tokens = parsed;
            }
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "provider='anthropic'\nmodel='claude-sonnet-4-20250514'").unwrap();

        let cfg = AssistantConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.provider, "anthropic");
        assert_eq!(cfg.max_tokens, 1000);
        assert!((cfg.temperature - 0.7).abs() < f64::EPSILON);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "provider='openai-compat'\nmodel='llama-3.3-70b-versatile'").unwrap();

        env::set_var("NETSIGHT_API_KEY", "from-env");
        env::set_var("NETSIGHT_MAX_TOKENS", "512");
        let cfg = AssistantConfig::from_env_or_file(file.path()).unwrap();
        env::remove_var("NETSIGHT_API_KEY");
        env::remove_var("NETSIGHT_MAX_TOKENS");

        assert_eq!(cfg.api_key.as_deref(), Some("from-env"));
        assert_eq!(cfg.max_tokens, 512);
    }
}
