//! Judge configuration and oracle factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use relevance_core::traits::Oracle;

use crate::anthropic::AnthropicProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "relevance-judge.toml";

/// Configuration for a single oracle backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level relevance-judge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used when none is given on the command line.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Judge model used when none is given on the command line.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature; unset leaves the backend default.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Token cap for each judgment.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Pause between consecutive oracle calls, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    /// Per-request HTTP timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Input table.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Output table.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_max_tokens() -> u32 {
    256
}
fn default_delay_secs() -> u64 {
    20
}
fn default_timeout_secs() -> u64 {
    crate::openai::DEFAULT_TIMEOUT_SECS
}
fn default_input() -> PathBuf {
    PathBuf::from("prompt_response_dataset.csv")
}
fn default_output() -> PathBuf {
    PathBuf::from("evaluated_responses.csv")
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: None,
            max_tokens: default_max_tokens(),
            delay_secs: default_delay_secs(),
            timeout_secs: default_timeout_secs(),
            input: default_input(),
            output: default_output(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Apply API keys from the environment (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`).
///
/// A key creates the provider entry if the config file has none, and
/// overrides the configured key otherwise.
fn apply_key_overrides(config: &mut JudgeConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup("OPENAI_API_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Some(key) = lookup("ANTHROPIC_API_KEY") {
        let entry = config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Anthropic { api_key, .. } = entry {
            *api_key = key;
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `relevance-judge.toml` in the current directory
/// 2. `~/.config/relevance-judge/config.toml`
///
/// Environment variable overrides: `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`.
pub fn load_config() -> Result<JudgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<JudgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<JudgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => JudgeConfig::default(),
    };

    apply_key_overrides(&mut config, |name| {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    });

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("relevance-judge"))
}

/// Create an oracle instance from its configuration.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
    timeout_secs: u64,
) -> Result<Box<dyn Oracle>> {
    let oracle: Box<dyn Oracle> = match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            anyhow::ensure!(
                !api_key.is_empty(),
                "provider '{name}' has an empty API key; set OPENAI_API_KEY"
            );
            Box::new(OpenAiProvider::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
                timeout_secs,
            )?)
        }
        ProviderConfig::Anthropic { api_key, base_url } => {
            anyhow::ensure!(
                !api_key.is_empty(),
                "provider '{name}' has an empty API key; set ANTHROPIC_API_KEY"
            );
            Box::new(AnthropicProvider::new(
                api_key,
                base_url.clone(),
                timeout_secs,
            )?)
        }
        ProviderConfig::Ollama { base_url } => {
            Box::new(OllamaProvider::new(base_url, timeout_secs)?)
        }
    };
    Ok(oracle)
}
