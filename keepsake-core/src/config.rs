//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/keepsake/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/keepsake/` (~/.config/keepsake/)
//! - State/Logs: `$XDG_STATE_HOME/keepsake/` (~/.local/state/keepsake/)
//!
//! Every field has a default, so an absent or partial file still produces a
//! complete card. The copy text, screen order, and photo lists live here;
//! the widgets never hard-code them.

use crate::audio::Track;
use crate::error::{Error, Result};
use crate::reveal::MIN_PHOTOS;
use crate::types::{Photo, Screen};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Background music
    #[serde(default)]
    pub audio: AudioConfig,

    /// Multi-section greeting page
    #[serde(default)]
    pub page: PageConfig,

    /// Envelope / letter / album card
    #[serde(default)]
    pub letter: LetterConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Background music configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    /// Master switch; false behaves as if no track were configured
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Audio file to loop (mp3). No track means no music button effect.
    #[serde(default)]
    pub track: Option<PathBuf>,

    /// Playback volume in `[0.0, 1.0]`
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            track: None,
            volume: default_volume(),
        }
    }
}

impl AudioConfig {
    /// The looping track to hand to the audio controller, if any.
    pub fn track(&self) -> Option<Track> {
        if !self.enabled {
            return None;
        }
        self.track.as_ref().map(|source| Track {
            source: source.clone(),
            looping: true,
            volume: self.volume,
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f32 {
    0.5
}

/// Greeting page copy and layout
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Screen order; navigation cycles through these
    pub screens: Vec<Screen>,
    pub title: String,
    pub subtitle: String,
    pub memories_title: String,
    pub memories: Vec<Photo>,
    pub message_title: String,
    pub message: String,
    pub gift_title: String,
    pub gift_prompt: String,
    pub gift_button: String,
    /// Shown on the wrapped gift before it is clicked
    pub gift_unwrap_hint: String,
    pub gift_reveal_title: String,
    pub gift_reveal_text: String,
    pub gift_photo: Photo,
    pub close_button: String,
    /// Twinkling background stars
    pub star_count: usize,
    /// Try to start the music on the first click
    pub autoplay: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            screens: Screen::all(),
            title: "Happy Women's Day 20/10!".to_string(),
            subtitle: "To the most wonderful girl in my life".to_string(),
            memories_title: "Our Beautiful Memories".to_string(),
            memories: (1..=6)
                .map(|i| Photo::new("photos/us.jpeg", format!("Memory {i}")))
                .collect(),
            message_title: "A Message of Love".to_string(),
            message: "My love, every day beside you is a wonderful journey through our galaxy \
                      of love. Thank you for always being by my side, for sharing the \
                      beautiful moments and the hard ones too. You are the brightest star in \
                      my universe. I love you so much!"
                .to_string(),
            gift_title: "A Special Gift".to_string(),
            gift_prompt: "Press the button below to open your gift".to_string(),
            gift_button: "Open Gift".to_string(),
            gift_unwrap_hint: "Click the box to unwrap it".to_string(),
            gift_reveal_title: "Your Gift".to_string(),
            gift_reveal_text: "This is [gift description]. I hope you love it!".to_string(),
            gift_photo: Photo::new("photos/us.jpeg", "The gift"),
            close_button: "Close".to_string(),
            star_count: 100,
            autoplay: true,
        }
    }
}

/// Envelope card copy and album
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LetterConfig {
    pub envelope_hint: String,
    pub heading: String,
    pub letter_photo: Photo,
    pub body: String,
    pub letter_hint: String,
    pub album_title: String,
    pub album_hint: String,
    /// Banner shown once every photo has been seen
    pub completion_text: String,
    pub photos: Vec<Photo>,
    pub petal_count: usize,
    pub heart_count: usize,
    /// Seconds between petal regenerations
    pub petal_refresh_secs: u64,
    pub autoplay: bool,
}

impl Default for LetterConfig {
    fn default() -> Self {
        Self {
            envelope_hint: "Click the envelope to open it".to_string(),
            heading: "My Dearest Love".to_string(),
            letter_photo: Photo::new("photos/us.jpeg", "Romantic"),
            body: "Your love is the most beautiful thing in my life. Every moment with you \
                   is a treasure I cherish deeply. You are the rose in my garden of life, the \
                   melody in my heart's song. With each passing day, my love for you grows \
                   stronger, deeper, and more profound."
                .to_string(),
            letter_hint: "Click to see our memories".to_string(),
            album_title: "Our Love Album".to_string(),
            album_hint: "Click to see the next beautiful moment we've shared together."
                .to_string(),
            completion_text: "Happy 20/10".to_string(),
            photos: (1..=5)
                .map(|i| {
                    Photo::new(
                        format!("photos/moment-{i}.jpg"),
                        format!("Romantic Moment {i}"),
                    )
                })
                .collect(),
            petal_count: 30,
            heart_count: 20,
            petal_refresh_secs: 20,
            autoplay: false,
        }
    }
}

impl LetterConfig {
    pub fn petal_refresh(&self) -> Duration {
        Duration::from_secs(self.petal_refresh_secs)
    }
}

impl Config {
    /// Load configuration from the default path, or defaults when there is
    /// no file. Runs before logging is up, so the caller logs the outcome.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints, returning the first violation
    pub fn validate(&self) -> Result<()> {
        if self.page.screens.is_empty() {
            return Err(Error::Config(
                "page.screens must list at least one screen".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for screen in &self.page.screens {
            if !seen.insert(screen) {
                return Err(Error::Config(format!(
                    "page.screens lists \"{}\" more than once",
                    screen
                )));
            }
        }
        if self.letter.photos.len() < MIN_PHOTOS {
            return Err(Error::Config(format!(
                "letter.photos needs at least {} photo(s)",
                MIN_PHOTOS
            )));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(Error::Config(
                "audio.volume must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.letter.petal_refresh_secs == 0 {
            return Err(Error::Config(
                "letter.petal_refresh_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the resolved configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/keepsake/config.toml` (~/.config/keepsake/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("keepsake").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/keepsake/` (~/.local/state/keepsake/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("keepsake")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.page.screens, Screen::all());
        assert_eq!(config.page.star_count, 100);
        assert!(config.page.autoplay);
        assert_eq!(config.letter.photos.len(), 5);
        assert_eq!(config.letter.petal_count, 30);
        assert_eq!(config.letter.heart_count, 20);
        assert_eq!(config.letter.petal_refresh(), Duration::from_secs(20));
        assert!(!config.letter.autoplay);
        assert!(config.audio.track().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[logging]
level = "debug"

[audio]
track = "music/theme.mp3"
volume = 0.8

[page]
screens = ["gift", "home"]
title = "Happy Birthday!"

[letter]
photos = [{ source = "a.jpg", label = "A" }]
petal_refresh_secs = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.page.screens, vec![Screen::Gift, Screen::Home]);
        assert_eq!(config.page.title, "Happy Birthday!");
        // Untouched fields keep their defaults.
        assert_eq!(config.page.gift_button, "Open Gift");
        assert_eq!(config.letter.photos, vec![Photo::new("a.jpg", "A")]);
        assert_eq!(config.letter.petal_refresh(), Duration::from_secs(5));

        let track = config.audio.track().unwrap();
        assert_eq!(track.source, PathBuf::from("music/theme.mp3"));
        assert!(track.looping);
        assert_eq!(track.volume, 0.8);
    }

    #[test]
    fn test_disabled_audio_has_no_track() {
        let config: Config = toml::from_str(
            r#"
[audio]
enabled = false
track = "music/theme.mp3"
"#,
        )
        .unwrap();
        assert!(config.audio.track().is_none());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.page.screens.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.page.screens = vec![Screen::Home, Screen::Home];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.letter.photos.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.audio.volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.letter.petal_refresh_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_screen_rejected() {
        let parsed: std::result::Result<Config, _> = toml::from_str(
            r#"
[page]
screens = ["home", "credits"]
"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_from_file_and_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[page]\nstar_count = 12\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.page.star_count, 12);

        let dumped = config.to_toml_string().unwrap();
        let reparsed: Config = toml::from_str(&dumped).unwrap();
        assert_eq!(reparsed.page.star_count, 12);
        assert_eq!(reparsed.page.screens, Screen::all());
    }

    #[test]
    fn test_load_from_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[letter]\nphotos = []\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
