//! JSON configuration source.
//!
//! The firmware embeds `config/prop.json` at build time; this adapter
//! parses and validates it through [`ConfigPort`].

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::PropConfig;
use crate::error::ConfigError;

pub struct JsonConfigSource<'a> {
    text: &'a str,
}

impl<'a> JsonConfigSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl ConfigPort for JsonConfigSource<'_> {
    fn load(&self) -> Result<PropConfig, ConfigError> {
        if self.text.trim().is_empty() {
            return Err(ConfigError::NotFound);
        }
        PropConfig::from_json(self.text)
    }
}

/// Load from `port`, falling back to the default profile.
pub fn load_or_default(port: &impl ConfigPort) -> PropConfig {
    match port.load() {
        Ok(config) => {
            info!("Config loaded");
            config
        }
        Err(e) => {
            warn!("Config unusable ({e}), using defaults");
            PropConfig::default()
        }
    }
}
