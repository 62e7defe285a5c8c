//! Fixed-delay polling tasks.
//!
//! Each loop runs its tick to completion, waits the configured delay and goes
//! again, for the life of the process or until stopped. Errors are logged and
//! swallowed; there is no backoff.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

pub struct Poller {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn a loop that runs `tick`, sleeps `delay`, and repeats.
    pub fn spawn<F, Fut>(name: &'static str, delay: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send,
    {
        let handle = tokio::spawn(async move {
            loop {
                if let Err(err) = tick().await {
                    warn!("{name} poll failed: {err:#}");
                }
                tokio::time::sleep(delay).await;
            }
        });
        Self { name, handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn reschedules_after_each_tick() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let poller = Poller::spawn("test", Duration::from_secs(1), move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        assert_eq!(poller.name(), "test");

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_do_not_stop_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let _poller = Poller::spawn("failing", Duration::from_secs(1), move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("boom");
            }
        });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let poller = Poller::spawn("stopped", Duration::from_secs(1), move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        poller.stop();
        let before = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), before);
    }
}
