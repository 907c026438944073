use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Runs the most recently scheduled action once things have been quiet for
/// `delay`. Scheduling again before then cancels the pending action.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending action with `action`, to run after the delay.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // Mark as fired so `is_pending` reports false.
                    token.cancel();
                    action.await;
                }
            }
        });
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// An action is scheduled and has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::sleep;

    use super::*;

    fn recorder(
        fired: &Arc<AtomicUsize>,
        last: &Arc<AtomicUsize>,
        id: usize,
    ) -> impl Future<Output = ()> + Send + use<> {
        let fired = Arc::clone(fired);
        let last = Arc::clone(last);
        async move {
            fired.fetch_add(1, Ordering::SeqCst);
            last.store(id, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::default();

        for id in 1..=3 {
            debouncer.schedule(recorder(&fired, &last, id));
            sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.schedule(recorder(&fired, &last, 1));
        debouncer.cancel();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_schedules_each_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::default();

        debouncer.schedule(recorder(&fired, &last, 1));
        sleep(Duration::from_millis(150)).await;
        debouncer.schedule(recorder(&fired, &last, 2));
        sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(last.load(Ordering::SeqCst), 2);
    }
}
