//! Project configuration, stored at `.ralph/config.yaml`.

use crate::error::{RalphError, Result};
use crate::io;
use crate::ratelimit::RouteLimit;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub fn ralph_dir(root: &Path) -> PathBuf {
    root.join(".ralph")
}

pub fn config_path(root: &Path) -> PathBuf {
    ralph_dir(root).join("config.yaml")
}

pub fn store_path(root: &Path) -> PathBuf {
    ralph_dir(root).join("prds.redb")
}

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Which text-generation provider to construct. Selected once at startup;
/// call sites never branch on the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Local {
        #[serde(default = "default_local_endpoint")]
        endpoint: String,
        #[serde(default = "default_local_model")]
        model: String,
    },
    Remote {
        #[serde(default = "default_remote_endpoint")]
        endpoint: String,
        #[serde(default = "default_remote_model")]
        model: String,
        /// Name of the environment variable holding the API key.
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
    },
}

fn default_local_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_local_model() -> String {
    "llama3.1".to_string()
}

fn default_remote_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_remote_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Local {
            endpoint: default_local_endpoint(),
            model: default_local_model(),
        }
    }
}

impl ProviderConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderConfig::Local { .. } => "local",
            ProviderConfig::Remote { .. } => "remote",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::Local { model, .. } => model,
            ProviderConfig::Remote { model, .. } => model,
        }
    }

    /// Resolve the API key for a remote provider. A missing secret is a
    /// configuration error and is fatal at process start.
    pub fn api_key(&self) -> Result<Option<String>> {
        match self {
            ProviderConfig::Local { .. } => Ok(None),
            ProviderConfig::Remote { api_key_env, .. } => std::env::var(api_key_env)
                .map(Some)
                .map_err(|_| {
                    RalphError::Config(format!(
                        "remote provider requires the {api_key_env} environment variable"
                    ))
                }),
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_min_tasks")]
    pub min_tasks: u32,
    #[serde(default = "default_max_tasks")]
    pub max_tasks: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total provider calls per generation, including the first attempt.
    #[serde(default = "default_repair_attempts")]
    pub repair_attempts: u32,
}

fn default_min_tasks() -> u32 {
    10
}

fn default_max_tasks() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_repair_attempts() -> u32 {
    2
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_tasks: default_min_tasks(),
            max_tasks: default_max_tasks(),
            timeout_secs: default_timeout_secs(),
            repair_attempts: default_repair_attempts(),
        }
    }
}

// ---------------------------------------------------------------------------
// LimitsConfig / OcrConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_generate_limit")]
    pub generate: RouteLimit,
    #[serde(default = "default_ocr_limit")]
    pub ocr: RouteLimit,
}

fn default_generate_limit() -> RouteLimit {
    RouteLimit {
        window_secs: 60,
        max_requests: 10,
    }
}

fn default_ocr_limit() -> RouteLimit {
    RouteLimit {
        window_secs: 60,
        max_requests: 20,
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            generate: default_generate_limit(),
            ocr: default_ocr_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_binary")]
    pub binary: String,
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

fn default_ocr_binary() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: default_ocr_binary(),
            language: default_ocr_language(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl Config {
    /// Load `.ralph/config.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        io::atomic_write(&config_path(root), yaml.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.provider.kind(), "local");
        assert_eq!(config.generation.min_tasks, 10);
        assert_eq!(config.generation.max_tasks, 100);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.generation.timeout_secs = 30;
        config.limits.generate.max_requests = 3;
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let yaml = "provider:\n  kind: remote\n  model: gpt-4o\n";
        std::fs::create_dir_all(ralph_dir(dir.path())).unwrap();
        std::fs::write(config_path(dir.path()), yaml).unwrap();

        let config = Config::load(dir.path()).unwrap();
        match &config.provider {
            ProviderConfig::Remote {
                endpoint,
                model,
                api_key_env,
            } => {
                assert_eq!(model, "gpt-4o");
                assert_eq!(endpoint, "https://api.openai.com");
                assert_eq!(api_key_env, "OPENAI_API_KEY");
            }
            other => panic!("expected remote provider, got {other:?}"),
        }
        assert_eq!(config.generation, GenerationConfig::default());
    }

    #[test]
    fn local_provider_needs_no_api_key() {
        let config = Config::default();
        assert_eq!(config.provider.api_key().unwrap(), None);
    }

    #[test]
    fn remote_provider_with_unset_env_is_config_error() {
        let provider = ProviderConfig::Remote {
            endpoint: default_remote_endpoint(),
            model: default_remote_model(),
            api_key_env: "RALPH_TEST_KEY_THAT_IS_NOT_SET".to_string(),
        };
        let err = provider.api_key().unwrap_err();
        assert!(matches!(err, RalphError::Config(_)));
        assert!(err.to_string().contains("RALPH_TEST_KEY_THAT_IS_NOT_SET"));
    }
}
