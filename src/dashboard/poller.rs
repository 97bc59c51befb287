use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// A background task that re-runs a fetch on a fixed period and publishes
/// the latest result. The first fetch runs immediately.
///
/// The task is owned by the `Poller`: `stop` ends it and waits for it to
/// finish, and dropping the `Poller` cancels it. A poller can publish into a
/// channel it does not own, so successive pollers can feed the same
/// subscribers.
#[derive(Debug)]
pub struct Poller<T> {
    token: CancellationToken,
    handle: JoinHandle<()>,
    latest: watch::Receiver<Option<T>>,
}

impl<T> Poller<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (tx, _) = watch::channel(None);
        Self::spawn_into(name, period, tx, fetch)
    }

    /// Like `spawn`, but publishes into an existing channel.
    pub fn spawn_into<F, Fut>(name: &'static str, period: Duration, tx: watch::Sender<Option<T>>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let latest = tx.subscribe();
        let cancelled = token.clone();

        let handle = tokio::spawn(
            async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        () = cancelled.cancelled() => break,
                        _ = interval.tick() => {}
                    }
                    tokio::select! {
                        () = cancelled.cancelled() => break,
                        value = fetch() => {
                            tx.send_replace(Some(value));
                        }
                    }
                }
                tracing::debug!("Poller stopped");
            }
            .instrument(tracing::debug_span!("poller", name)),
        );

        Self { token, handle, latest }
    }

    /// The most recent result, if any fetch has completed.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    /// A receiver notified on every completed fetch.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.latest.clone()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancels the task and waits for it to exit.
    pub async fn stop(&mut self) {
        self.token.cancel();
        if self.handle.is_finished() {
            return;
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::warn!(error = %e, "Poller task ended abnormally");
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
