//! Application controller state
//!
//! `AppState` is the single owner of everything the UI shows: the router
//! and its element set, the scaled layout, the status window, the dialog
//! and the handle of the running action. It lives on the UI task; worker
//! tasks reach it only through the [`UiMessage`] channel drained by
//! [`AppState::drain_messages`].

use crate::action::{ActionHandle, ActionRunner, ActionStatus, FileCreationRequest, UiMessage};
use crate::app::screens::{
    render_screen, ControlId, Dialog, RenderContext, ScreenView, StatusWindow,
};
use crate::app::state::{NavigationAction, Router, Screen};
use crate::config::{assets::BACK_ICON, AppConfig, AssetResolver};
use crate::layout::{LayoutMetrics, LayoutScaler};
use crate::{error, CmpMenuError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct AppState {
    router: Router,
    scaler: LayoutScaler,
    metrics: LayoutMetrics,
    assets: AssetResolver,
    runner: ActionRunner,
    active_run: Option<ActionHandle>,
    status_window: Option<StatusWindow>,
    last_statuses: Vec<ActionStatus>,
    dialog: Option<Dialog>,
    ui_tx: UnboundedSender<UiMessage>,
    ui_rx: UnboundedReceiver<UiMessage>,
}

impl AppState {
    /// Build the controller. Fails only when the configured start screen
    /// is unknown.
    pub fn new(
        config: &AppConfig,
        scaler: LayoutScaler,
        assets: AssetResolver,
        runner: ActionRunner,
    ) -> Result<Self> {
        let start = config.start_screen()?;
        Ok(Self::assemble(start, scaler, assets, runner))
    }

    /// Controller on the main menu with unit scale and a simulated action
    /// of `delay`
    pub fn with_action_delay(delay: std::time::Duration) -> Self {
        Self::assemble(
            Screen::MainMenu,
            LayoutScaler::default(),
            AssetResolver::new(None),
            ActionRunner::simulated(delay),
        )
    }

    fn assemble(
        start: Screen,
        scaler: LayoutScaler,
        assets: AssetResolver,
        runner: ActionRunner,
    ) -> Self {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        Self {
            router: Router::new(start),
            scaler,
            metrics: scaler.metrics(),
            assets,
            runner,
            active_run: None,
            status_window: None,
            last_statuses: Vec::new(),
            dialog: None,
            ui_tx,
            ui_rx,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn active_screen(&self) -> Screen {
        self.router.active()
    }

    pub fn view(&self) -> &ScreenView {
        self.router.view()
    }

    pub fn scaler(&self) -> &LayoutScaler {
        &self.scaler
    }

    pub fn status_window(&self) -> Option<&StatusWindow> {
        self.status_window.as_ref()
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// Statuses of the most recently finished run, in arrival order
    pub fn last_statuses(&self) -> &[ActionStatus] {
        &self.last_statuses
    }

    pub fn is_running(&self) -> bool {
        self.active_run.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.router.should_quit()
    }

    /// Route a key press. An open dialog or status window captures input,
    /// except Ctrl+C which always quits.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.cancel_action();
            self.router.quit();
            return Ok(());
        }

        if self.dialog.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialog = None;
            }
            return Ok(());
        }

        if self.status_window.is_some() {
            if key.code == KeyCode::Esc {
                self.cancel_action();
            }
            return Ok(());
        }

        let action = Router::key_to_navigation(key, self.router.view().focused_is_text());
        self.handle_navigation(action)
    }

    /// Apply a navigation action to the active screen
    pub fn handle_navigation(&mut self, action: NavigationAction) -> Result<()> {
        if let Some(control) = self.router.handle_navigation(action) {
            self.activate(control)?;
        }
        Ok(())
    }

    /// Perform what a control does when pressed
    pub fn activate(&mut self, control: ControlId) -> Result<()> {
        tracing::debug!(?control, screen = %self.router.active(), "activate");
        match control {
            ControlId::StartComparison => {
                self.router.navigate_to(Screen::ComparisonOptions, None)
            }
            ControlId::CreateFile => self.router.navigate_to(Screen::CreateFileOptions, None),
            ControlId::Back => self.router.go_back(),
            ControlId::Exit => self.router.quit(),
            ControlId::Export => {
                self.dialog = Some(Dialog::info("Выгрузка", "Выгрузка пока недоступна."))
            }
            ControlId::CompareFiles => {
                self.dialog = Some(Dialog::info("Сравнение", "Сравнение файлов пока недоступно."))
            }
            ControlId::Version | ControlId::Subversion => self.router.view_mut().cycle_option(true),
            ControlId::Date => self.router.view_mut().focus_next(),
            ControlId::Submit => self.submit()?,
        }
        Ok(())
    }

    /// Collect the form and start the action. Ignored while a run is
    /// active.
    pub fn submit(&mut self) -> Result<()> {
        if let Some(run) = &self.active_run {
            tracing::warn!(run_id = run.run_id(), "submit ignored, an action is already running");
            return Ok(());
        }

        let request = self.collect_request()?;
        let handle = self
            .runner
            .run(request.clone(), self.router.active(), self.ui_tx.clone());

        self.status_window = Some(StatusWindow::open(handle.run_id(), request));
        self.active_run = Some(handle);
        Ok(())
    }

    fn collect_request(&self) -> Result<FileCreationRequest> {
        let view = self.router.view();
        let field = |id: ControlId| {
            view.value_of(id).map(str::to_string).ok_or_else(|| {
                CmpMenuError::ActionFailure(format!(
                    "{:?} is not present on {}",
                    id,
                    view.screen()
                ))
            })
        };

        Ok(FileCreationRequest::new(
            field(ControlId::Version)?,
            field(ControlId::Subversion)?,
            field(ControlId::Date)?,
        ))
    }

    /// Show a non-fatal error in a dialog
    pub fn show_error(&mut self, err: &CmpMenuError) {
        tracing::warn!("{}", err);
        self.dialog = Some(Dialog::error("Ошибка", error::user_friendly_message(err)));
    }

    /// Request cancellation of the running action
    pub fn cancel_action(&mut self) {
        if let Some(run) = &self.active_run {
            run.cancel();
            if let Some(window) = self.status_window.as_mut() {
                window.mark_cancel_requested();
            }
        }
    }

    /// Apply every pending worker message. Returns how many were applied.
    pub fn drain_messages(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.ui_rx.try_recv() {
            if self.apply_message(message) {
                applied += 1;
            }
        }
        applied
    }

    fn apply_message(&mut self, message: UiMessage) -> bool {
        let current = self.active_run.as_ref().map(ActionHandle::run_id);

        match message {
            UiMessage::Status { run_id, status } if Some(run_id) == current => {
                tracing::debug!(run_id, ?status, "status received");
                let terminal = status.is_terminal();

                match &status {
                    ActionStatus::Failed(reason) => {
                        let err = CmpMenuError::ActionFailure(reason.clone());
                        self.dialog = Some(Dialog::error("Ошибка", error::user_friendly_message(&err)));
                    }
                    ActionStatus::Cancelled => {
                        let err = CmpMenuError::Cancelled(String::new());
                        self.dialog = Some(Dialog::info("Отмена", error::user_friendly_message(&err)));
                    }
                    _ => {}
                }

                if let Some(window) = self.status_window.as_mut() {
                    window.push(status);
                }
                if terminal {
                    // the window closes on every terminal status
                    if let Some(window) = self.status_window.take() {
                        self.last_statuses = window.into_history();
                    }
                }
                true
            }
            UiMessage::Navigate {
                run_id,
                screen,
                params,
            } if Some(run_id) == current => {
                self.active_run = None;
                if let Some(window) = self.status_window.take() {
                    self.last_statuses = window.into_history();
                }
                self.router.navigate_to(screen, params.as_ref());
                true
            }
            stale => {
                tracing::debug!(?stale, "ignoring message from a finished run");
                false
            }
        }
    }

    /// Draw the active screen and overlays
    pub fn render(&mut self, f: &mut Frame) {
        let back_glyph = self.assets.resolve(BACK_ICON).glyph.clone();
        let ctx = RenderContext {
            metrics: self.metrics,
            back_glyph: &back_glyph,
            status: self.status_window.as_ref(),
            dialog: self.dialog.as_ref(),
        };
        render_screen(f, self.router.view(), &ctx);
    }
}
