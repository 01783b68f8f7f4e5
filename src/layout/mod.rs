//! Layout scaling
//!
//! Every spacing and size constant of the UI is multiplied by a scale
//! factor derived once from the primary display's pixel density, so the
//! menu keeps its proportions across monitors.

pub mod display;

pub use display::{DisplayMetrics, DisplayQuery, FixedDisplay, TerminalDisplay};

use crate::{CmpMenuError, Result};
use std::sync::OnceLock;

/// Density the layout constants are designed for
pub const REFERENCE_DPI: f64 = 96.0;
pub const MM_PER_INCH: f64 = 25.4;

/// Base layout constants, in terminal cells at [`REFERENCE_DPI`]
pub const BASE_MARGIN: u16 = 1;
pub const BASE_BUTTON_WIDTH: u16 = 32;
pub const BASE_CONTROL_HEIGHT: u16 = 3;
pub const BASE_SPACING: u16 = 1;
pub const BASE_STATUS_WIDTH: u16 = 44;

static GLOBAL_SCALER: OnceLock<LayoutScaler> = OnceLock::new();

/// Positive multiplier normalising layout constants to a display density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    /// `(width_px / (width_mm / 25.4)) / 96`
    pub fn from_metrics(metrics: DisplayMetrics) -> Result<Self> {
        if metrics.width_px == 0 || !(metrics.width_mm.is_finite() && metrics.width_mm > 0.0) {
            return Err(CmpMenuError::DisplayQueryFailure(format!(
                "unusable display size: {} px / {} mm",
                metrics.width_px, metrics.width_mm
            )));
        }

        let dpi = f64::from(metrics.width_px) / (metrics.width_mm / MM_PER_INCH);
        Ok(Self(dpi / REFERENCE_DPI))
    }

    /// Query the display, falling back to 1.0 on any failure
    pub fn detect(query: &dyn DisplayQuery) -> Self {
        match query.query().and_then(Self::from_metrics) {
            Ok(factor) => {
                tracing::info!("display scale factor {:.3}", factor.0);
                factor
            }
            Err(err) => {
                tracing::warn!(
                    "{}. {}",
                    err,
                    crate::error::create_fallback_strategy(&err).unwrap_or_default()
                );
                Self::IDENTITY
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Applies a fixed [`ScaleFactor`] to layout values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutScaler {
    factor: ScaleFactor,
}

impl LayoutScaler {
    pub fn new(factor: ScaleFactor) -> Self {
        Self { factor }
    }

    pub fn from_display(query: &dyn DisplayQuery) -> Self {
        Self::new(ScaleFactor::detect(query))
    }

    /// Process-wide scaler. The display is queried on the first call only;
    /// later calls return the same instance whatever query they pass.
    pub fn global(query: &dyn DisplayQuery) -> &'static LayoutScaler {
        GLOBAL_SCALER.get_or_init(|| Self::from_display(query))
    }

    pub fn factor(&self) -> ScaleFactor {
        self.factor
    }

    /// `round(value * factor)`, clamped to the `i32` range
    pub fn scale(&self, value: f64) -> i32 {
        (value * self.factor.0)
            .round()
            .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }

    /// Scale a cell count, saturating into `u16`
    pub fn scale_cells(&self, value: u16) -> u16 {
        self.scale(f64::from(value)).clamp(0, i32::from(u16::MAX)) as u16
    }

    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics::from_scaler(self)
    }
}

/// The scaled layout constants used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub margin: u16,
    pub button_width: u16,
    pub control_height: u16,
    pub spacing: u16,
    pub status_width: u16,
}

impl LayoutMetrics {
    pub fn from_scaler(scaler: &LayoutScaler) -> Self {
        Self {
            margin: scaler.scale_cells(BASE_MARGIN),
            button_width: scaler.scale_cells(BASE_BUTTON_WIDTH).max(1),
            // a bordered control needs three rows to show its label
            control_height: scaler.scale_cells(BASE_CONTROL_HEIGHT).max(3),
            spacing: scaler.scale_cells(BASE_SPACING),
            status_width: scaler.scale_cells(BASE_STATUS_WIDTH).max(1),
        }
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from_scaler(&LayoutScaler::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_display_has_unit_factor() {
        // 96 px across one inch
        let factor = ScaleFactor::from_metrics(DisplayMetrics::new(96, 25.4)).unwrap();
        assert!((factor.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_factor_formula() {
        // 27" 4K panel: 3840 px over 597 mm
        let factor = ScaleFactor::from_metrics(DisplayMetrics::new(3840, 597.0)).unwrap();
        let expected = (3840.0 / (597.0 / 25.4)) / 96.0;
        assert!((factor.value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_scale_rounds_product() {
        let factor = ScaleFactor::from_metrics(DisplayMetrics::new(3840, 597.0)).unwrap();
        let scaler = LayoutScaler::new(factor);
        for value in [1.0, 2.5, 10.0, 32.0, 44.0, 123.4] {
            assert_eq!(scaler.scale(value), (value * factor.value()).round() as i32);
        }
    }

    #[test]
    fn test_unusable_metrics_fall_back_to_identity() {
        assert!(ScaleFactor::from_metrics(DisplayMetrics::new(0, 500.0)).is_err());
        assert!(ScaleFactor::from_metrics(DisplayMetrics::new(1920, 0.0)).is_err());
        assert!(ScaleFactor::from_metrics(DisplayMetrics::new(1920, f64::NAN)).is_err());

        let scaler = LayoutScaler::from_display(&FixedDisplay::unavailable());
        assert_eq!(scaler.factor(), ScaleFactor::IDENTITY);
        assert_eq!(scaler.scale(17.0), 17);
    }

    #[test]
    fn test_scale_clamps_to_i32_range() {
        let scaler = LayoutScaler::new(ScaleFactor(4.0));
        assert_eq!(scaler.scale(1e12), i32::MAX);
        assert_eq!(scaler.scale(-1e12), i32::MIN);
        assert_eq!(scaler.scale_cells(u16::MAX), u16::MAX);
    }

    #[test]
    fn test_scale_is_deterministic() {
        let display = FixedDisplay::new(DisplayMetrics::new(2560, 597.0));
        let a = LayoutScaler::from_display(&display);
        let b = LayoutScaler::from_display(&display);
        assert_eq!(a, b);
        assert_eq!(a.scale(32.0), a.scale(32.0));
    }

    #[test]
    fn test_metrics_keep_minimum_control_height() {
        let tiny = LayoutScaler::new(ScaleFactor(0.25));
        let metrics = tiny.metrics();
        assert_eq!(metrics.control_height, 3);
        assert_eq!(metrics.margin, 0);
        assert_eq!(metrics.button_width, 8);

        assert_eq!(LayoutMetrics::default().button_width, BASE_BUTTON_WIDTH);
    }
}
