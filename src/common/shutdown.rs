//! Shutdown coordination for graceful termination.

use tokio::sync::watch;

/// One-shot shutdown signal shared between tasks.
///
/// Any holder may trigger the shutdown; all waiters observe it, including
/// waiters that subscribe after the signal fired.
#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    /// create a new shutdown coordinator
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// signal shutdown to all waiters
    pub fn shutdown(&self) {
        self.sender.send_replace(true);
    }

    /// check whether shutdown has been signalled
    pub fn is_terminated(&self) -> bool {
        *self.sender.borrow()
    }

    /// wait for the shutdown signal
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.sender.subscribe();
        async move {
            // wait_for re-checks the current value before parking, so a
            // signal landing between subscribe and await is not lost
            let _ = receiver.wait_for(|terminated| *terminated).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_wakes_waiter() {
        let shutdown = Shutdown::new();
        let waiter = shutdown.wait();

        shutdown.shutdown();
        waiter.await;
        assert!(shutdown.is_terminated());
    }

    #[tokio::test]
    async fn test_wait_after_shutdown_returns_immediately() {
        let shutdown = Shutdown::new();
        shutdown.shutdown();
        shutdown.wait().await;
    }

    #[tokio::test]
    async fn test_signal_before_first_poll_is_not_lost() {
        let shutdown = Shutdown::new();
        let waiter = shutdown.wait();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            waiter.await;
        });

        shutdown.shutdown();
        handle.await.unwrap();
    }
}
