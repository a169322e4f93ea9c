// crates/geofilter-core/src/task.rs

//! # Cancellable tasks
//!
//! One [`TaskSlot`] per logical operation ("forward lookup", "reverse
//! lookup"). Starting a task in a slot cancels whatever the slot was still
//! waiting on, so only the latest request can ever deliver a result.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct TaskSlot {
    current: Mutex<Option<CancellationToken>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the pending task, if any, and hand out a handle for a new one.
    pub fn begin(&self) -> TaskHandle {
        let token = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        TaskHandle { token }
    }

    /// Cancel the pending task without starting another (teardown).
    pub fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.take() {
            previous.cancel();
        }
    }

    /// Whether the most recent task is still allowed to deliver.
    pub fn has_live_task(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Handle to one scheduled or in-flight task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` unless the task is cancelled first.
    ///
    /// Returns `None` when cancelled, including when cancellation lands in
    /// the same poll in which `fut` completed; a superseded result is never
    /// delivered.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => (!self.token.is_cancelled()).then_some(out),
        }
    }

    /// Wait out a quiet `window`, then [`run`](Self::run) `fut`.
    ///
    /// A newer task in the same slot during the window resets the timer by
    /// cancelling this one.
    pub async fn debounce<F: Future>(&self, window: Duration, fut: F) -> Option<F::Output> {
        self.run(tokio::time::sleep(window)).await?;
        self.run(fut).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn begin_cancels_the_previous_task() {
        let slot = TaskSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(first.run(async { 1 }).await, None);
        assert_eq!(second.run(async { 2 }).await, Some(2));
    }

    #[tokio::test]
    async fn explicit_cancel_clears_the_slot() {
        let slot = TaskSlot::new();
        let handle = slot.begin();
        assert!(slot.has_live_task());
        slot.cancel();
        assert!(handle.is_cancelled());
        assert!(!slot.has_live_task());
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_fires_after_quiet_window() {
        let slot = TaskSlot::new();
        let handle = slot.begin();
        let started = tokio::time::Instant::now();
        let out = handle.debounce(Duration::from_millis(600), async { "go" }).await;
        assert_eq!(out, Some("go"));
        assert!(started.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn newer_task_resets_the_debounce_timer() {
        let slot = Arc::new(TaskSlot::new());

        let first = {
            let handle = slot.begin();
            tokio::spawn(async move { handle.debounce(Duration::from_millis(600), async { 1 }).await })
        };
        tokio::time::sleep(Duration::from_millis(300)).await;
        let second = {
            let handle = slot.begin();
            tokio::spawn(async move { handle.debounce(Duration::from_millis(600), async { 2 }).await })
        };

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn dropping_the_slot_cancels_pending_work() {
        let handle = {
            let slot = TaskSlot::new();
            slot.begin()
        };
        assert!(handle.is_cancelled());
    }
}
