//! TUI application module
//!
//! Contains the terminal user interface, the screen router and the
//! controller state.

pub mod app;
pub mod app_state;
pub mod screens;
pub mod state;
pub mod tui;

pub use app::App;
pub use app_state::AppState;
pub use screens::{ControlId, ScreenParams, ScreenView};
pub use state::{NavigationAction, Router, Screen};
pub use tui::Tui;
