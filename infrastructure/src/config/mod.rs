//! Configuration file loading with multi-source merging

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use roundtable_domain::{ProviderId, SubscriptionTier};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Defaults applied when the command line leaves them unspecified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Personas used when none are selected explicitly
    #[serde(default = "default_personas")]
    pub personas: Vec<String>,
    /// Subscription tier to gate persona access with
    #[serde(default)]
    pub tier: SubscriptionTier,
    /// Provider to try first, ahead of the priority order
    #[serde(default)]
    pub provider: Option<ProviderId>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            personas: default_personas(),
            tier: SubscriptionTier::default(),
            provider: None,
        }
    }
}

fn default_personas() -> Vec<String> {
    vec![
        "strategist".to_string(),
        "simplifier".to_string(),
        "mentor".to_string(),
    ]
}

/// Conversation storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for conversation files; defaults to the platform data dir
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./roundtable.toml` or `./.roundtable.toml`
    /// 3. Global: `~/.config/roundtable/config.toml` (or platform equivalent)
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        for filename in &["roundtable.toml", ".roundtable.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// The global config file path, if the platform has a config dir.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("roundtable").join("config.toml"))
    }
}
