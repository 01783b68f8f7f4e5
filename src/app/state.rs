//! Screen routing
//!
//! Handles screen transitions, navigation logic, and keyboard event
//! processing. Exactly one screen is active; activating another rebuilds
//! the element set from scratch.

use crate::app::screens::{self, ControlId, ScreenParams, ScreenView};
use crate::{CmpMenuError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::str::FromStr;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Entry menu: comparison, export, exit
    #[default]
    MainMenu,
    /// Compare files or go on to create one
    ComparisonOptions,
    /// Version/subversion/date form for file creation
    CreateFileOptions,
}

impl Screen {
    pub fn all() -> [Screen; 3] {
        [
            Screen::MainMenu,
            Screen::ComparisonOptions,
            Screen::CreateFileOptions,
        ]
    }

    /// Stable identifier used in configuration and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Screen::MainMenu => "main_menu",
            Screen::ComparisonOptions => "comparison_options",
            Screen::CreateFileOptions => "create_file_options",
        }
    }

    pub fn from_id(id: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|screen| screen.id() == id)
            .ok_or_else(|| CmpMenuError::UnknownScreenIdentifier(id.to_string()))
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Screen {
    type Err = CmpMenuError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_id(s)
    }
}

/// Navigation actions that can be triggered by keyboard input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Move focus up (arrow up, k)
    Up,
    /// Move focus down (arrow down, j)
    Down,
    /// Previous dropdown option (arrow left, h)
    Left,
    /// Next dropdown option (arrow right, l)
    Right,
    /// Activate the focused control (Enter, Space)
    Select,
    /// Go back/cancel (Esc, Backspace)
    Back,
    /// Next control (Tab)
    Next,
    /// Previous control (Shift+Tab)
    Previous,
    /// Type a character into the focused text input
    Input(char),
    /// Delete the last character of the focused text input
    Erase,
    /// Quit application (q, Q, Ctrl+C)
    Quit,
    /// No action
    None,
}

/// Owns the active screen and its element set
#[derive(Debug)]
pub struct Router {
    active: Screen,
    view: ScreenView,
    should_quit: bool,
}

impl Router {
    /// Create a router showing `start`
    pub fn new(start: Screen) -> Self {
        Self {
            active: start,
            view: ScreenView::build(&screens::descriptor(start), None),
            should_quit: false,
        }
    }

    /// The active screen
    pub fn active(&self) -> Screen {
        self.active
    }

    /// The element set of the active screen
    pub fn view(&self) -> &ScreenView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ScreenView {
        &mut self.view
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Set the quit flag
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Tear down the current elements and build `screen`, pre-filled
    /// with `params`. Navigating to the active screen rebuilds it too.
    pub fn navigate_to(&mut self, screen: Screen, params: Option<&ScreenParams>) {
        tracing::info!("navigate {} -> {}", self.active, screen);
        self.view = ScreenView::build(&screens::descriptor(screen), params);
        self.active = screen;
    }

    /// Navigate by identifier. An unknown identifier is a wiring bug and
    /// is reported as [`CmpMenuError::UnknownScreenIdentifier`].
    pub fn navigate_to_id(&mut self, id: &str, params: Option<&ScreenParams>) -> Result<()> {
        let screen = Screen::from_id(id)?;
        self.navigate_to(screen, params);
        Ok(())
    }

    /// There is no history: back always lands on the main menu
    pub fn go_back(&mut self) {
        self.navigate_to(Screen::MainMenu, None);
    }

    /// Apply a navigation action. Returns the control activated by
    /// `Select`, which the caller dispatches.
    pub fn handle_navigation(&mut self, action: NavigationAction) -> Option<ControlId> {
        match action {
            NavigationAction::Quit => self.quit(),
            NavigationAction::Back => match self.active {
                Screen::MainMenu => self.quit(),
                _ => self.go_back(),
            },
            NavigationAction::Up | NavigationAction::Previous => self.view.focus_previous(),
            NavigationAction::Down | NavigationAction::Next => self.view.focus_next(),
            NavigationAction::Left => self.view.cycle_option(false),
            NavigationAction::Right => self.view.cycle_option(true),
            NavigationAction::Input(c) => self.view.input_char(c),
            NavigationAction::Erase => self.view.erase(),
            NavigationAction::Select => return self.view.focused().map(|el| el.id()),
            NavigationAction::None => {}
        }
        None
    }

    /// Convert keyboard event to navigation action. While a text input is
    /// focused, printable characters and Backspace edit it.
    pub fn key_to_navigation(key: KeyEvent, text_focused: bool) -> NavigationAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return NavigationAction::Quit;
        }

        if text_focused {
            match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return NavigationAction::Input(c);
                }
                KeyCode::Backspace => return NavigationAction::Erase,
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => NavigationAction::Quit,

            KeyCode::Up | KeyCode::Char('k') => NavigationAction::Up,
            KeyCode::Down | KeyCode::Char('j') => NavigationAction::Down,
            KeyCode::Left | KeyCode::Char('h') => NavigationAction::Left,
            KeyCode::Right | KeyCode::Char('l') => NavigationAction::Right,

            KeyCode::Enter | KeyCode::Char(' ') => NavigationAction::Select,

            KeyCode::Esc | KeyCode::Backspace => NavigationAction::Back,

            KeyCode::BackTab => NavigationAction::Previous,
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    NavigationAction::Previous
                } else {
                    NavigationAction::Next
                }
            }

            _ => NavigationAction::None,
        }
    }

    /// Handle a keyboard event and update state accordingly
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<ControlId> {
        let action = Self::key_to_navigation(key, self.view.focused_is_text());
        self.handle_navigation(action)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Screen::MainMenu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new(Screen::MainMenu);
        assert_eq!(router.active(), Screen::MainMenu);
        assert!(!router.should_quit());
        assert_eq!(router.view().screen(), Screen::MainMenu);
    }

    #[test]
    fn test_screen_ids_round_trip() {
        for screen in Screen::all() {
            assert_eq!(Screen::from_id(screen.id()).unwrap(), screen);
            assert_eq!(screen.to_string().parse::<Screen>().unwrap(), screen);
        }
    }

    #[test]
    fn test_unknown_screen_id() {
        let mut router = Router::new(Screen::MainMenu);
        let err = router.navigate_to_id("settings", None).unwrap_err();
        assert!(matches!(err, CmpMenuError::UnknownScreenIdentifier(ref id) if id == "settings"));
        assert_eq!(router.active(), Screen::MainMenu);
    }

    #[test]
    fn test_back_always_returns_to_main_menu() {
        let mut router = Router::new(Screen::MainMenu);
        router.navigate_to(Screen::ComparisonOptions, None);
        router.navigate_to(Screen::CreateFileOptions, None);

        router.handle_navigation(NavigationAction::Back);
        assert_eq!(router.active(), Screen::MainMenu);
        assert!(!router.should_quit());
    }

    #[test]
    fn test_back_from_main_menu_quits() {
        let mut router = Router::new(Screen::MainMenu);
        router.handle_navigation(NavigationAction::Back);
        assert!(router.should_quit());
    }

    #[test]
    fn test_navigation_replaces_element_set() {
        let mut router = Router::new(Screen::CreateFileOptions);
        router.handle_navigation(NavigationAction::Input('x'));
        router.navigate_to(Screen::ComparisonOptions, None);

        let ids = router.view().element_ids();
        assert_eq!(
            ids,
            screens::descriptor(Screen::ComparisonOptions)
                .controls
                .iter()
                .map(|c| c.id)
                .collect::<Vec<_>>()
        );
        assert_eq!(router.view().focus_index(), 0);
    }

    #[test]
    fn test_select_returns_focused_control() {
        let mut router = Router::new(Screen::MainMenu);
        assert_eq!(
            router.handle_navigation(NavigationAction::Select),
            Some(ControlId::StartComparison)
        );
        router.handle_navigation(NavigationAction::Down);
        assert_eq!(
            router.handle_navigation(NavigationAction::Select),
            Some(ControlId::Export)
        );
    }

    #[test]
    fn test_key_to_navigation() {
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Char('q')), false),
            NavigationAction::Quit
        );
        assert_eq!(
            Router::key_to_navigation(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                true
            ),
            NavigationAction::Quit
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Char('k')), false),
            NavigationAction::Up
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Down), false),
            NavigationAction::Down
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Enter), false),
            NavigationAction::Select
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Esc), false),
            NavigationAction::Back
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Tab), false),
            NavigationAction::Next
        );
        assert_eq!(
            Router::key_to_navigation(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT), false),
            NavigationAction::Previous
        );
    }

    #[test]
    fn test_text_focus_captures_characters() {
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Char('q')), true),
            NavigationAction::Input('q')
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Backspace), true),
            NavigationAction::Erase
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Esc), true),
            NavigationAction::Back
        );
        assert_eq!(
            Router::key_to_navigation(key(KeyCode::Enter), true),
            NavigationAction::Select
        );
    }
}
