//! Configuration management for sonos-say.
//!
//! Defaults reproduce the stock setup (speaker at 192.168.0.73, share at
//! //nas/music). A YAML file in one of the standard locations can override
//! any section.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeakerConfig {
    /// IP or hostname of the Sonos player.
    pub address: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            address: "192.168.0.73".into(),
            port: 1400,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Directory the speech file is written to. Must be readable by the speaker.
    pub path: String,
    /// Optional alert file (relative to `path`) prepended to the speech.
    pub alert: Option<String>,
    pub file_name: String,
    /// Network name of `path` as the speaker sees it, when the local mount
    /// point differs. Defaults to `path`.
    pub uri_base: Option<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            path: "//nas/music".into(),
            alert: Some("alert4.mp3".into()),
            file_name: "speech.mp3".into(),
            uri_base: None,
        }
    }
}

impl ShareConfig {
    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.path).join(&self.file_name)
    }

    pub fn alert_path(&self) -> Option<PathBuf> {
        self.alert
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(|a| Path::new(&self.path).join(a))
    }

    /// `x-file-cifs:` URI of the speech file as the speaker should fetch it.
    pub fn speech_uri(&self) -> String {
        let base = self.uri_base.as_deref().unwrap_or(&self.path);
        format!(
            "x-file-cifs:{}/{}",
            base.trim_end_matches('/'),
            self.file_name
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub language: String,
    pub endpoint: String,
    pub user_agent: String,
    /// Texts shorter than this go out in a single request.
    pub max_chars: usize,
    /// Pause after each request when the text is split.
    pub chunk_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            language: "en".into(),
            endpoint: "http://translate.google.com/translate_tts".into(),
            user_agent: "Mozilla/5.0".into(),
            max_chars: 100,
            chunk_delay_ms: 100,
            timeout_secs: 30,
        }
    }
}

impl TtsConfig {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub speaker: SpeakerConfig,
    pub share: ShareConfig,
    pub tts: TtsConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read sonos-say config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid sonos-say config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

impl Config {
    /// Candidate config files, in search order.
    pub fn search_paths() -> Vec<PathBuf> {
        [
            std::env::current_dir().ok().map(|d| d.join("config.yaml")),
            dirs::config_dir().map(|c| c.join("sonos-say/config.yaml")),
            Some(PathBuf::from("/etc/sonos-say/config.yaml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`, or the first existing file from [`Config::search_paths`].
    ///
    /// A missing, unreadable or invalid file leaves the built-in speaker and
    /// share defaults in place.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path
            .map(PathBuf::from)
            .or_else(|| Self::search_paths().into_iter().find(|p| p.exists()));

        let Some(config_path) = resolved else {
            info!("No sonos-say config file found, using built-in defaults");
            return Self::default();
        };

        match Self::from_file(&config_path) {
            Ok(config) => {
                info!("Loaded sonos-say config from {}", config_path.display());
                config
            }
            Err(e) => {
                warn!("{e}; using built-in defaults");
                Self::default()
            }
        }
    }
}
