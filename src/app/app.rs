//! Main application controller
//!
//! Owns the terminal and the controller state and runs the UI loop:
//! drain worker messages, draw, handle one key.

use crate::{
    action::ActionRunner,
    app::{app_state::AppState, tui::Tui},
    config::{AppConfig, AssetResolver},
    layout::LayoutScaler,
    error, CmpMenuError, Result,
};

/// TUI application
pub struct App {
    tui: Tui,
    state: AppState,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &AppConfig, scaler: LayoutScaler) -> Result<Self> {
        let state = AppState::new(
            config,
            scaler,
            AssetResolver::new(config.assets_dir.clone()),
            ActionRunner::simulated(config.action_delay),
        )?;

        Ok(Self {
            tui: Tui::new(config.tick_rate())?,
            state,
        })
    }

    /// Initialize the terminal
    pub fn init(&mut self) -> Result<()> {
        self.tui.init()?;
        if !self.tui.is_size_adequate()? {
            tracing::warn!("terminal is smaller than the recommended size");
        }
        Ok(())
    }

    /// Run the main application loop until the user quits. Fatal errors
    /// leave the loop, the rest are shown in a dialog.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(screen = %self.state.active_screen(), "ui loop started");

        while !self.state.should_quit() {
            self.state.drain_messages();

            let state = &mut self.state;
            self.tui
                .draw(|f| state.render(f))
                .map_err(|e| CmpMenuError::TuiError(format!("draw failed: {}", e)))?;

            if let Some(key) = self.tui.poll_key()? {
                if let Err(e) = self.state.handle_key_event(key) {
                    if error::is_fatal(&e) {
                        return Err(e);
                    }
                    self.state.show_error(&e);
                }
            }

            // let worker tasks progress between ticks
            tokio::task::yield_now().await;
        }

        self.state.cancel_action();
        tracing::info!("ui loop finished");
        Ok(())
    }

    /// Restore the terminal
    pub fn restore(&mut self) -> Result<()> {
        self.tui.restore()?;
        Ok(())
    }
}
