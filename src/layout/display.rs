//! Display size queries
//!
//! The scaler only needs the horizontal resolution and the physical width
//! of the primary display. Where those numbers come from is behind
//! [`DisplayQuery`].

use crate::config::DisplayConfig;
use crate::{CmpMenuError, Result};

/// Horizontal size of a display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Horizontal resolution in pixels
    pub width_px: u32,
    /// Horizontal physical size in millimetres
    pub width_mm: f64,
}

impl DisplayMetrics {
    pub fn new(width_px: u32, width_mm: f64) -> Self {
        Self { width_px, width_mm }
    }
}

/// Source of display metrics
pub trait DisplayQuery {
    fn query(&self) -> Result<DisplayMetrics>;
}

/// Metrics supplied by configuration or the command line
#[derive(Debug, Clone, Default)]
pub struct FixedDisplay {
    metrics: Option<DisplayMetrics>,
}

impl FixedDisplay {
    pub fn new(metrics: DisplayMetrics) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    /// A display that cannot be queried
    pub fn unavailable() -> Self {
        Self { metrics: None }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        match (config.width_px, config.width_mm) {
            (Some(px), Some(mm)) => Self::new(DisplayMetrics::new(px, mm)),
            _ => Self::unavailable(),
        }
    }
}

impl DisplayQuery for FixedDisplay {
    fn query(&self) -> Result<DisplayMetrics> {
        self.metrics.ok_or_else(|| {
            CmpMenuError::DisplayQueryFailure("no display size configured".to_string())
        })
    }
}

/// Pixel width reported by the terminal emulator, paired with the
/// configured physical width of the screen it is shown on.
#[derive(Debug, Clone, Default)]
pub struct TerminalDisplay {
    width_mm: Option<f64>,
}

impl TerminalDisplay {
    pub fn new(width_mm: Option<f64>) -> Self {
        Self { width_mm }
    }
}

impl DisplayQuery for TerminalDisplay {
    fn query(&self) -> Result<DisplayMetrics> {
        let width_mm = self.width_mm.ok_or_else(|| {
            CmpMenuError::DisplayQueryFailure("physical display width is unknown".to_string())
        })?;

        let size = crossterm::terminal::window_size()
            .map_err(|e| CmpMenuError::DisplayQueryFailure(format!("window size: {}", e)))?;

        if size.width == 0 {
            return Err(CmpMenuError::DisplayQueryFailure(
                "terminal does not report its pixel size".to_string(),
            ));
        }

        Ok(DisplayMetrics::new(u32::from(size.width), width_mm))
    }
}

/// Pick the query for a configuration: a fully configured display wins,
/// otherwise ask the terminal.
pub fn from_config(config: &DisplayConfig) -> Box<dyn DisplayQuery> {
    match (config.width_px, config.width_mm) {
        (Some(_), Some(_)) => Box::new(FixedDisplay::from_config(config)),
        (_, width_mm) => Box::new(TerminalDisplay::new(width_mm)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_display_reports_configured_size() {
        let config = DisplayConfig {
            width_px: Some(1920),
            width_mm: Some(508.0),
        };
        let metrics = FixedDisplay::from_config(&config).query().unwrap();
        assert_eq!(metrics, DisplayMetrics::new(1920, 508.0));
    }

    #[test]
    fn test_partial_config_is_unavailable() {
        let config = DisplayConfig {
            width_px: Some(1920),
            width_mm: None,
        };
        assert!(matches!(
            FixedDisplay::from_config(&config).query(),
            Err(CmpMenuError::DisplayQueryFailure(_))
        ));
    }

    #[test]
    fn test_terminal_display_needs_physical_width() {
        assert!(matches!(
            TerminalDisplay::new(None).query(),
            Err(CmpMenuError::DisplayQueryFailure(_))
        ));
    }
}
