mod basic;
mod media;

pub use basic::BasicConfig;
pub use media::{MediaConfig, UploadConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server and session configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Media host credentials (see `media` table in config.toml).
    #[serde(default)]
    pub media: MediaConfig,

    /// Clinic image upload limits (see `upload` table in config.toml).
    #[serde(default)]
    pub upload: UploadConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "CLINICDESK_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and
    /// `CLINICDESK_`-prefixed environment variables (`__` separates tables).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from defaults, `config.toml` (if present) and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        let cfg: Self = Self::figment().extract()?;
        Ok(cfg.normalized())
    }

    /// Blank strings coming from env files are treated as unset.
    fn normalized(mut self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        self.basic.admin_username = blank_to_none(self.basic.admin_username);
        self.basic.admin_password = blank_to_none(self.basic.admin_password);
        self.basic.session_secret = blank_to_none(self.basic.session_secret);
        self
    }
}
