use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

/// The single station this player is bound to.  The URL is treated as an
/// opaque playback source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_stream_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

/// Share-link inputs: the page to link back to and the phrase that goes with
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_page_url")]
    pub page_url: String,
    #[serde(default = "default_share_text")]
    pub text: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: default_stream_url(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            text: default_share_text(),
        }
    }
}

fn default_stream_url() -> String {
    "https://stream.radiojar.com/8s5u5tpdtwzuv".to_string()
}

fn default_volume() -> f32 {
    0.75
}

fn default_page_url() -> String {
    "https://quran-radio.app/".to_string()
}

fn default_share_text() -> String {
    "استمع إلى إذاعة القرآن الكريم من القاهرة بث مباشر".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
