//! The work performed by an action run

use super::FileCreationRequest;
use crate::Result;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A long-running file operation
pub trait FileTask: Send + Sync + 'static {
    fn execute<'a>(&'a self, request: &'a FileCreationRequest) -> TaskFuture<'a>;
}

/// Stand-in for real file generation: waits for a fixed delay and
/// always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedFileTask {
    delay: Duration,
}

impl SimulatedFileTask {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl FileTask for SimulatedFileTask {
    fn execute<'a>(&'a self, request: &'a FileCreationRequest) -> TaskFuture<'a> {
        Box::pin(async move {
            tracing::debug!(
                "simulating file creation for {} ({})",
                request,
                humantime::format_duration(self.delay)
            );
            tokio::time::sleep(self.delay).await;
            Ok(())
        })
    }
}
