//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `{PROVIDER}_API_KEY`, then `ARTGEN_{PROVIDER}_API_KEY`
//! 2. Project-local: `.artgen/config.toml`
//! 3. Global: `~/.artgen/config.toml`

use artgen_core::{ArtgenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Providers whose API keys can come from the environment
pub const KNOWN_PROVIDERS: [&str; 2] = ["maginary", "pixellab"];

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Poll loop budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    60
}
fn default_delay_secs() -> u64 {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_root")]
    pub root: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
        }
    }
}

fn default_output_root() -> String {
    "public/assets/images".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteConfig {
    #[serde(default = "default_frame_size")]
    pub frame_size: u32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            frame_size: default_frame_size(),
        }
    }
}

fn default_frame_size() -> u32 {
    64
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtgenConfigFile {
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sprites: SpriteConfig,
}

/// Attempt budget and fixed delay for one poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: Duration::from_secs(default_delay_secs()),
        }
    }
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct ArtgenConfig {
    pub providers: HashMap<String, ProviderConfig>,
    pub polling: PollingConfig,
    pub output: OutputConfig,
    pub sprites: SpriteConfig,
}

impl ArtgenConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = ArtgenConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".artgen/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config);
        Ok(config.into())
    }

    /// Load config from a specific file path only (plus env overrides)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(config.into())
    }

    /// Defaults plus environment variables, for when no config file can be read
    pub fn from_env() -> Self {
        let mut config = ArtgenConfigFile::default();
        Self::apply_env_overrides(&mut config);
        config.into()
    }

    /// Get API key for a provider
    pub fn api_key(&self, provider_name: &str) -> Option<&str> {
        self.providers
            .get(provider_name)
            .and_then(|p| p.api_key.as_deref())
            .filter(|k| !k.is_empty())
    }

    /// Get API key for a provider, failing if it is absent
    pub fn require_api_key(&self, provider_name: &str) -> Result<&str> {
        self.api_key(provider_name)
            .ok_or_else(|| ArtgenError::MissingApiKey {
                provider: provider_name.to_string(),
                env_var: format!("{}_API_KEY", provider_name.to_uppercase()),
            })
    }

    /// Get the API URL override for a provider
    pub fn api_url(&self, provider_name: &str) -> Option<&str> {
        self.providers
            .get(provider_name)
            .and_then(|p| p.api_url.as_deref())
    }

    pub fn is_enabled(&self, provider_name: &str) -> bool {
        self.providers
            .get(provider_name)
            .map(|p| p.enabled)
            .unwrap_or(true)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            max_attempts: self.polling.max_attempts,
            delay: Duration::from_secs(self.polling.delay_secs),
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".artgen").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ArtgenConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            ArtgenError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut ArtgenConfigFile, overlay: ArtgenConfigFile) {
        for (name, provider) in overlay.providers {
            let entry = base.providers.entry(name).or_default();
            if provider.api_key.is_some() {
                entry.api_key = provider.api_key;
            }
            if provider.api_url.is_some() {
                entry.api_url = provider.api_url;
            }
            entry.enabled = provider.enabled;
        }

        if overlay.polling.max_attempts != default_max_attempts() {
            base.polling.max_attempts = overlay.polling.max_attempts;
        }
        if overlay.polling.delay_secs != default_delay_secs() {
            base.polling.delay_secs = overlay.polling.delay_secs;
        }
        if overlay.output.root != default_output_root() {
            base.output.root = overlay.output.root;
        }
        if overlay.sprites.frame_size != default_frame_size() {
            base.sprites.frame_size = overlay.sprites.frame_size;
        }
    }

    fn apply_env_overrides(config: &mut ArtgenConfigFile) {
        for name in &KNOWN_PROVIDERS {
            let upper = name.to_uppercase();
            let candidates = [
                format!("{}_API_KEY", upper),
                format!("ARTGEN_{}_API_KEY", upper),
            ];
            for env_key in &candidates {
                // An empty variable must not mask a key from a config file
                if let Some(key) = std::env::var(env_key).ok().filter(|k| !k.is_empty()) {
                    let entry = config.providers.entry(name.to_string()).or_default();
                    entry.api_key = Some(key);
                }
            }
        }
    }
}

impl From<ArtgenConfigFile> for ArtgenConfig {
    fn from(file: ArtgenConfigFile) -> Self {
        Self {
            providers: file.providers,
            polling: file.polling,
            output: file.output,
            sprites: file.sprites,
        }
    }
}
