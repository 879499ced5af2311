//! Tokio driver for the skeleton delay.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::NavigationError;
use crate::loading::{LoadingState, LoadingTimer};

/// Runs a `LoadingTimer` against the tokio clock. State is published on a
/// watch channel and `show_skeleton` flips from a task sleeping until the
/// timer's deadline. The task is aborted on resolve and on drop.
#[derive(Debug)]
pub struct SkeletonTimer {
    model: LoadingTimer,
    state: Arc<watch::Sender<LoadingState>>,
    task: Option<JoinHandle<()>>,
    handle: Handle,
}

impl SkeletonTimer {
    /// Create a timer on the current tokio runtime.
    pub fn new(delay: Duration) -> Result<Self, NavigationError> {
        let handle = Handle::try_current().map_err(|_| NavigationError::NoRuntime)?;
        let (state, _) = watch::channel(LoadingState::default());
        Ok(Self {
            model: LoadingTimer::new(delay),
            state: Arc::new(state),
            task: None,
            handle,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LoadingState {
        *self.state.borrow()
    }

    /// Whether the delay task is still scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// A navigation was requested.
    pub fn start(&mut self) {
        if self.model.is_pending() {
            return;
        }
        let now = Instant::now().into_std();
        self.model.request(now);
        self.state.send_replace(self.model.state(now));

        let Some(deadline) = self.model.deadline() else {
            return;
        };
        let state = Arc::clone(&self.state);
        let delay = self.model.delay();
        self.task = Some(self.handle.spawn(async move {
            tokio::time::sleep_until(Instant::from_std(deadline)).await;
            state.send_if_modified(|current| {
                if current.is_pending && !current.show_skeleton {
                    tracing::trace!(delay_ms = delay.as_millis() as u64, "showing loading skeleton");
                    current.show_skeleton = true;
                    true
                } else {
                    false
                }
            });
        }));
    }

    /// The address bar changed; reset both signals.
    pub fn resolve(&mut self) {
        self.cancel();
        self.model.resolve();
        let next = self.model.state(Instant::now().into_std());
        self.state.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SkeletonTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_requires_runtime() {
        assert!(matches!(SkeletonTimer::new(DELAY), Err(NavigationError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_navigation_shows_skeleton() {
        let mut timer = SkeletonTimer::new(DELAY).unwrap();
        let mut rx = timer.subscribe();

        timer.start();
        assert!(timer.state().is_pending);
        assert!(!timer.state().show_skeleton);

        sleep(Duration::from_millis(150)).await;
        assert!(timer.state().show_skeleton);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().show_skeleton);

        timer.resolve();
        assert_eq!(timer.state(), LoadingState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_navigation_never_shows_skeleton() {
        let mut timer = SkeletonTimer::new(DELAY).unwrap();
        timer.start();

        for _ in 0..4 {
            sleep(Duration::from_millis(20)).await;
            assert!(!timer.state().show_skeleton);
        }
        timer.resolve();
        assert!(!timer.is_scheduled());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(timer.state(), LoadingState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_while_pending_keeps_deadline() {
        let mut timer = SkeletonTimer::new(DELAY).unwrap();
        timer.start();
        sleep(Duration::from_millis(80)).await;
        timer.start();
        sleep(Duration::from_millis(30)).await;
        assert!(timer.state().show_skeleton);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skeleton_follows_model_deadline() {
        let mut timer = SkeletonTimer::new(DELAY).unwrap();
        let started = Instant::now();
        timer.start();

        sleep(Duration::from_millis(99)).await;
        assert!(!timer.state().show_skeleton);
        assert_eq!(timer.model.deadline(), Some((started + DELAY).into_std()));

        sleep(Duration::from_millis(2)).await;
        assert!(timer.state().show_skeleton);
        assert_eq!(timer.state(), timer.model.state(Instant::now().into_std()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_delay() {
        let mut timer = SkeletonTimer::new(DELAY).unwrap();
        let rx = timer.subscribe();
        timer.start();
        drop(timer);

        sleep(Duration::from_millis(500)).await;
        assert!(!rx.borrow().show_skeleton);
    }
}
