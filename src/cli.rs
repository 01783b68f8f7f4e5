//! Command line interface
//!
//! Flags override the loaded [`AppConfig`] field by field.

use crate::app::state::Screen;
use crate::config::AppConfig;
use crate::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "cmpmenu",
    version,
    about = "Comparison and file creation menu with DPI-aware layout"
)]
pub struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Screen shown at startup (main_menu, comparison_options, create_file_options)
    #[arg(long)]
    pub start_screen: Option<String>,

    /// Horizontal display resolution in pixels
    #[arg(long, requires = "width_mm")]
    pub width_px: Option<u32>,

    /// Horizontal physical display size in millimetres
    #[arg(long)]
    pub width_mm: Option<f64>,

    /// Duration of the simulated file creation, e.g. 2s or 500ms
    #[arg(long)]
    pub action_delay: Option<humantime::Duration>,

    /// Log level or filter directive when RUST_LOG is not set
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for the log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Directory searched first for icon assets
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,
}

impl Cli {
    /// Load the configuration named by `--config` (or the default lookup)
    /// and apply the remaining flags on top.
    pub fn load_config(&self) -> Result<AppConfig> {
        let config = AppConfig::load(self.config.as_deref())?;
        self.apply(config)
    }

    /// Path of the configuration file `load_config` reads, if any
    pub fn config_source(&self) -> Result<Option<PathBuf>> {
        AppConfig::resolve_path(self.config.as_deref())
    }

    /// Apply flags onto `config` and validate the result
    pub fn apply(&self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(id) = &self.start_screen {
            config = config.with_start_screen(Screen::from_id(id)?);
        }
        if let Some(px) = self.width_px {
            config.display.width_px = Some(px);
        }
        if let Some(mm) = self.width_mm {
            config.display.width_mm = Some(mm);
        }
        if let Some(delay) = &self.action_delay {
            config = config.with_action_delay(**delay);
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &self.assets_dir {
            config = config.with_assets_dir(dir.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
