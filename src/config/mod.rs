//! Configuration management module
//!
//! Handles loading, saving, and validation of the application
//! configuration and the lookup of on-disk assets.

use crate::app::state::Screen;
use crate::{CmpMenuError, Result, APP_NAME, CONFIG_FILE, LEGACY_CONFIG_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod assets;

pub use assets::{Asset, AssetResolver, AssetSource};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Identifier of the screen shown at startup
    pub start_screen: String,
    /// Duration of the simulated file creation
    #[serde(with = "duration_text")]
    pub action_delay: Duration,
    /// UI redraw/poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Directory searched first for icon assets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<PathBuf>,
    /// Default log level when RUST_LOG is not set
    pub log_level: String,
    /// Physical display description used by the layout scaler
    pub display: DisplayConfig,
}

/// Display size override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Horizontal resolution in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
    /// Horizontal physical size in millimetres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_mm: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_screen: Screen::MainMenu.id().to_string(),
            action_delay: Duration::from_secs(2),
            tick_rate_ms: 250,
            assets_dir: None,
            log_level: "info".to_string(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        Screen::from_id(&self.start_screen).map_err(|_| {
            CmpMenuError::ConfigError(format!("Unknown start screen: {}", self.start_screen))
        })?;

        if self.action_delay.is_zero() {
            return Err(CmpMenuError::ConfigError(
                "Action delay must be greater than 0".to_string(),
            ));
        }

        const MAX_ACTION_DELAY: Duration = Duration::from_secs(600);
        if self.action_delay > MAX_ACTION_DELAY {
            return Err(CmpMenuError::ConfigError(format!(
                "Action delay too long: {}s (max: {}s)",
                self.action_delay.as_secs(),
                MAX_ACTION_DELAY.as_secs()
            )));
        }

        if self.tick_rate_ms == 0 {
            return Err(CmpMenuError::ConfigError(
                "Tick rate must be greater than 0".to_string(),
            ));
        }

        if self.display.width_px == Some(0) {
            return Err(CmpMenuError::ConfigError(
                "Display width in pixels must be greater than 0".to_string(),
            ));
        }

        if let Some(mm) = self.display.width_mm {
            if !(mm.is_finite() && mm > 0.0) {
                return Err(CmpMenuError::ConfigError(format!(
                    "Display width in millimetres must be positive, got {}",
                    mm
                )));
            }
        }

        Ok(())
    }

    /// The screen to open at startup
    pub fn start_screen(&self) -> Result<Screen> {
        Screen::from_id(&self.start_screen)
    }

    /// UI tick interval
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Set the start screen
    pub fn with_start_screen(mut self, screen: Screen) -> Self {
        self.start_screen = screen.id().to_string();
        self
    }

    /// Set the simulated action delay
    pub fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = delay;
        self
    }

    /// Set the assets directory
    pub fn with_assets_dir(mut self, dir: PathBuf) -> Self {
        self.assets_dir = Some(dir);
        self
    }

    /// Set the display description
    pub fn with_display(mut self, width_px: u32, width_mm: f64) -> Self {
        self.display = DisplayConfig {
            width_px: Some(width_px),
            width_mm: Some(width_mm),
        };
        self
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise the first existing file among
    /// [`AppConfig::candidate_paths`] is used, and defaults when none exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::resolve_path(explicit)? {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The file [`AppConfig::load`] reads, or `None` when defaults apply
    pub fn resolve_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CmpMenuError::ConfigError(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }

        Ok(Self::candidate_paths().into_iter().find(|p| p.exists()))
    }

    /// Load and validate a single file. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CmpMenuError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config: Self = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                CmpMenuError::ConfigError(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            toml::from_str(&content).map_err(|e| {
                CmpMenuError::ConfigError(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            })?
        };

        config.validate()?;
        tracing::info!("loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CmpMenuError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|e| {
            CmpMenuError::ConfigError(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Files searched for configuration, in priority order:
    /// `cmpmenu.toml` and `config.json` beside the executable, then
    /// `$CONFIG_HOME/cmpmenu/cmpmenu.toml`.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let running_dir = running_directory();
        let mut paths = vec![
            running_dir.join(CONFIG_FILE),
            running_dir.join(LEGACY_CONFIG_FILE),
        ];
        if let Ok(path) = Self::config_file_path() {
            paths.push(path);
        }
        paths
    }

    /// Get the standard configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            CmpMenuError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

/// Directory the running executable lives in, or the current directory
/// when it cannot be determined.
pub fn running_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Human readable durations ("2s", "500ms") in config files
mod duration_text {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
