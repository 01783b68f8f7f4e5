//! Transient overlays: the action status window and message dialogs

use crate::action::{ActionStatus, FileCreationRequest};
use std::time::{Duration, Instant};

/// Status window shown while an action runs
#[derive(Debug, Clone)]
pub struct StatusWindow {
    run_id: u64,
    request: FileCreationRequest,
    history: Vec<ActionStatus>,
    opened_at: Instant,
    cancel_requested: bool,
}

impl StatusWindow {
    pub fn open(run_id: u64, request: FileCreationRequest) -> Self {
        Self {
            run_id,
            request,
            history: Vec::new(),
            opened_at: Instant::now(),
            cancel_requested: false,
        }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn request(&self) -> &FileCreationRequest {
        &self.request
    }

    pub fn push(&mut self, status: ActionStatus) {
        self.history.push(status);
    }

    pub fn current(&self) -> Option<&ActionStatus> {
        self.history.last()
    }

    pub fn history(&self) -> &[ActionStatus] {
        &self.history
    }

    pub fn into_history(self) -> Vec<ActionStatus> {
        self.history
    }

    pub fn elapsed(&self) -> Duration {
        self.opened_at.elapsed()
    }

    pub fn mark_cancel_requested(&mut self) {
        self.cancel_requested = true;
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// Modal message box, dismissed with Enter or Esc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}
