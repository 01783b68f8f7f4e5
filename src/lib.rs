//! CMPMENU - comparison and file creation menu
//!
//! A terminal menu that routes between screens, scales its layout to the
//! display density and runs long file operations off the UI thread.

use std::fmt;

// Public re-exports
pub mod action;
pub mod app;
pub mod cli;
pub mod config;
pub mod layout;
pub mod logging;

// Common error types
#[derive(Debug)]
pub enum CmpMenuError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// The display could not report its size
    DisplayQueryFailure(String),
    /// A screen was addressed by an identifier the router does not know
    UnknownScreenIdentifier(String),
    /// The long-running action failed
    ActionFailure(String),
    /// The long-running action was cancelled
    Cancelled(String),
    /// TUI rendering or interaction error
    TuiError(String),
    /// Asset lookup error
    AssetError(String),
}

impl fmt::Display for CmpMenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmpMenuError::IoError(err) => write!(f, "I/O error: {}", err),
            CmpMenuError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            CmpMenuError::DisplayQueryFailure(msg) => write!(f, "Display query failed: {}", msg),
            CmpMenuError::UnknownScreenIdentifier(id) => {
                write!(f, "Unknown screen identifier: {}", id)
            }
            CmpMenuError::ActionFailure(msg) => write!(f, "Action failed: {}", msg),
            CmpMenuError::Cancelled(msg) => write!(f, "Cancelled: {}", msg),
            CmpMenuError::TuiError(msg) => write!(f, "TUI error: {}", msg),
            CmpMenuError::AssetError(msg) => write!(f, "Asset error: {}", msg),
        }
    }
}

impl std::error::Error for CmpMenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CmpMenuError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CmpMenuError {
    fn from(err: std::io::Error) -> Self {
        CmpMenuError::IoError(err)
    }
}

impl From<serde_json::Error> for CmpMenuError {
    fn from(err: serde_json::Error) -> Self {
        CmpMenuError::ConfigError(format!("JSON parsing error: {}", err))
    }
}

impl From<toml::de::Error> for CmpMenuError {
    fn from(err: toml::de::Error) -> Self {
        CmpMenuError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CmpMenuError {
    fn from(err: toml::ser::Error) -> Self {
        CmpMenuError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for CMPMENU operations
pub type Result<T> = std::result::Result<T, CmpMenuError>;

/// Error handling utilities
pub mod error {
    use super::CmpMenuError;

    /// Errors that indicate broken wiring rather than a runtime condition.
    /// The application stops on these instead of showing a dialog.
    pub fn is_fatal(error: &CmpMenuError) -> bool {
        matches!(
            error,
            CmpMenuError::UnknownScreenIdentifier(_) | CmpMenuError::TuiError(_)
        )
    }

    /// Convert error to the message shown in the UI dialog
    pub fn user_friendly_message(error: &CmpMenuError) -> String {
        match error {
            CmpMenuError::ActionFailure(reason) => {
                format!("Не удалось создать файл: {}", reason)
            }
            CmpMenuError::Cancelled(_) => "Операция отменена.".to_string(),
            CmpMenuError::DisplayQueryFailure(_) => {
                "Не удалось определить параметры экрана, используется масштаб 1:1.".to_string()
            }
            CmpMenuError::AssetError(_) => {
                "Не найден файл ресурса, используется пустой значок.".to_string()
            }
            CmpMenuError::ConfigError(msg) => {
                format!("Ошибка конфигурации: {}. Проверьте настройки.", msg)
            }
            _ => error.to_string(),
        }
    }

    /// Describe what the application does instead when the error occurs
    pub fn create_fallback_strategy(error: &CmpMenuError) -> Option<String> {
        match error {
            CmpMenuError::DisplayQueryFailure(_) => {
                Some("Falling back to a scale factor of 1.0.".to_string())
            }
            CmpMenuError::AssetError(_) => {
                Some("Using a blank icon in place of the missing asset.".to_string())
            }
            CmpMenuError::ActionFailure(_) | CmpMenuError::Cancelled(_) => Some(
                "Returning to the originating screen with the entered values kept.".to_string(),
            ),
            _ => None,
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "cmpmenu";
pub const CONFIG_FILE: &str = "cmpmenu.toml";
pub const LEGACY_CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "cmpmenu.log";
pub const ASSETS_DIR: &str = "assets";
