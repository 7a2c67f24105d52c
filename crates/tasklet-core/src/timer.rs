//! One-shot timers as owned handles.
//!
//! [`schedule`] runs an action once after a delay on the current tokio
//! runtime. The returned [`TimerHandle`] cancels the action when it is
//! cancelled or dropped, so a timer never outlives whoever scheduled it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

/// Must be called from within a tokio runtime.
pub fn schedule<F>(delay: Duration, action: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        trace!(?delay, "timer fired");
        action();
    });
    TimerHandle { task: Some(task) }
}

impl TimerHandle {
    /// Stops the action if it has not run yet. Has no effect afterwards.
    pub fn cancel(mut self) {
        self.abort();
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                trace!("timer cancelled");
            }
            task.abort();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.abort();
    }
}
