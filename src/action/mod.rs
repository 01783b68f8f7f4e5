//! Background file creation
//!
//! Runs the long file operation on a tokio worker task and streams staged
//! status updates to the UI loop over an unbounded channel. The worker
//! never touches UI state: it only sends [`UiMessage`]s, and the UI loop
//! applies them.

pub mod task;

pub use task::{FileTask, SimulatedFileTask, TaskFuture};

use crate::app::screens::{ControlId, ScreenParams};
use crate::app::state::Screen;
use crate::{CmpMenuError, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Parameters collected from the file creation form. Values are taken
/// verbatim from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCreationRequest {
    pub version: String,
    pub subversion: String,
    pub date: String,
}

impl FileCreationRequest {
    pub fn new(
        version: impl Into<String>,
        subversion: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            subversion: subversion.into(),
            date: date.into(),
        }
    }

    /// Form values for re-opening the creation screen with this request
    pub fn to_params(&self) -> ScreenParams {
        ScreenParams::new()
            .with(ControlId::Version, self.version.as_str())
            .with(ControlId::Subversion, self.subversion.as_str())
            .with(ControlId::Date, self.date.as_str())
    }
}

impl fmt::Display for FileCreationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.version, self.subversion, self.date)
    }
}

/// Stage of one action run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Started,
    InProgress,
    Completed,
    Failed(String),
    Cancelled,
}

impl ActionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionStatus::Completed | ActionStatus::Failed(_) | ActionStatus::Cancelled
        )
    }

    /// Text shown in the status window
    pub fn label(&self) -> String {
        match self {
            ActionStatus::Started => "Начато".to_string(),
            ActionStatus::InProgress => "В процессе...".to_string(),
            ActionStatus::Completed => "Завершено".to_string(),
            ActionStatus::Failed(reason) => format!("Ошибка: {}", reason),
            ActionStatus::Cancelled => "Отменено".to_string(),
        }
    }
}

/// Worker-to-UI messages
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// Update the status window of run `run_id`
    Status { run_id: u64, status: ActionStatus },
    /// Run `run_id` is over; show `screen`
    Navigate {
        run_id: u64,
        screen: Screen,
        params: Option<ScreenParams>,
    },
}

/// Shared cancellation flag, checked by the worker at every status
/// boundary and raced against the work itself.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Handle to one running action
#[derive(Debug)]
pub struct ActionHandle {
    run_id: u64,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl ActionHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Ask the worker to stop at its next status boundary
    pub fn cancel(&self) {
        tracing::info!(run_id = self.run_id, "cancellation requested");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the worker task to exit
    pub async fn wait(self) -> Result<()> {
        self.join
            .await
            .map_err(|e| CmpMenuError::ActionFailure(format!("worker join failed: {}", e)))
    }
}

/// Spawns one worker task per invocation
pub struct ActionRunner {
    task: Arc<dyn FileTask>,
    next_run_id: u64,
}

impl ActionRunner {
    pub fn new(task: Arc<dyn FileTask>) -> Self {
        Self {
            task,
            next_run_id: 1,
        }
    }

    /// Runner whose work is a fixed delay
    pub fn simulated(delay: Duration) -> Self {
        Self::new(Arc::new(SimulatedFileTask::new(delay)))
    }

    /// Start `request` in the background. Must be called from within a
    /// tokio runtime.
    ///
    /// The worker emits `Started`, `InProgress`, then exactly one terminal
    /// status, followed by a `Navigate`: to `ComparisonOptions` on
    /// success, or back to `origin` with the request as pre-fill on
    /// failure or cancellation.
    pub fn run(
        &mut self,
        request: FileCreationRequest,
        origin: Screen,
        ui_tx: UnboundedSender<UiMessage>,
    ) -> ActionHandle {
        let run_id = self.next_run_id;
        self.next_run_id += 1;

        let token = CancellationToken::new();
        let worker_token = token.clone();
        let task = Arc::clone(&self.task);

        tracing::info!(run_id, %request, "starting file creation");

        let join = tokio::spawn(async move {
            let mut reporter = StatusReporter::new(run_id, ui_tx, origin, request.to_params());
            reporter.send(ActionStatus::Started);

            if worker_token.is_cancelled() {
                reporter.cancel();
                return;
            }
            reporter.send(ActionStatus::InProgress);

            let outcome = tokio::select! {
                result = task.execute(&request) => result,
                _ = worker_token.cancelled() => Err(CmpMenuError::Cancelled(
                    "cancelled during work".to_string(),
                )),
            };

            match outcome {
                Ok(()) if !worker_token.is_cancelled() => reporter.complete(),
                Ok(()) | Err(CmpMenuError::Cancelled(_)) => reporter.cancel(),
                Err(CmpMenuError::ActionFailure(reason)) => reporter.fail(reason),
                Err(err) => reporter.fail(err.to_string()),
            }
        });

        ActionHandle { run_id, token, join }
    }
}

/// Sends a run's messages and guarantees a terminal status: if it is
/// dropped before one was sent (early return or panic in the task), it
/// reports a failure so the status window always closes.
struct StatusReporter {
    run_id: u64,
    tx: UnboundedSender<UiMessage>,
    origin: Screen,
    params: ScreenParams,
    finished: bool,
}

impl StatusReporter {
    fn new(run_id: u64, tx: UnboundedSender<UiMessage>, origin: Screen, params: ScreenParams) -> Self {
        Self {
            run_id,
            tx,
            origin,
            params,
            finished: false,
        }
    }

    fn send(&self, status: ActionStatus) {
        tracing::debug!(run_id = self.run_id, ?status, "status");
        // a closed channel means the UI is gone; nothing left to update
        let _ = self.tx.send(UiMessage::Status {
            run_id: self.run_id,
            status,
        });
    }

    fn navigate(&self, screen: Screen, params: Option<ScreenParams>) {
        let _ = self.tx.send(UiMessage::Navigate {
            run_id: self.run_id,
            screen,
            params,
        });
    }

    fn complete(&mut self) {
        self.finished = true;
        tracing::info!(run_id = self.run_id, "file creation completed");
        self.send(ActionStatus::Completed);
        self.navigate(Screen::ComparisonOptions, None);
    }

    fn fail(&mut self, reason: String) {
        self.finished = true;
        tracing::warn!(run_id = self.run_id, %reason, "file creation failed");
        self.send(ActionStatus::Failed(reason));
        self.navigate(self.origin, Some(self.params.clone()));
    }

    fn cancel(&mut self) {
        self.finished = true;
        tracing::info!(run_id = self.run_id, "file creation cancelled");
        self.send(ActionStatus::Cancelled);
        self.navigate(self.origin, Some(self.params.clone()));
    }
}

impl Drop for StatusReporter {
    fn drop(&mut self) {
        if !self.finished {
            self.fail("worker stopped unexpectedly".to_string());
        }
    }
}
