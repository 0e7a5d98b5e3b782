use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
};

use crate::api::{Api, Transport};
use crate::error::{Error, Result};
use crate::model::statistics::Statistics;

/// A fetch repeated every `period`, starting immediately.
/// It can be triggered early or cancelled, and stops by itself once the
/// session expires.
pub struct RefreshTask<T> {
    task_handle: JoinHandle<Result<()>>,
    signal: Arc<Notify>,
    latest: watch::Receiver<Option<T>>,
}

impl<T> RefreshTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(period: Duration, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send,
    {
        let signal = Arc::new(Notify::new());
        let (sender, latest) = watch::channel(None);

        let task_signal = signal.clone();
        let task_handle = tokio::spawn(async move {
            loop {
                match fetch().await {
                    Ok(value) => {
                        sender.send_replace(Some(value));
                    }
                    Err(e) if e.is_session_expiry() => {
                        warn!("Stopping refresh: {e}");
                        return Err(e);
                    }
                    Err(e) => warn!("Refresh failed, retrying next period: {e}"),
                }

                // Wait for the next period, or for an early trigger.
                tokio::select! {
                    _ = tokio::time::sleep(period) => {}
                    _ = task_signal.notified() => debug!("Refresh triggered early"),
                }
            }
        });

        Self {
            task_handle,
            signal,
            latest,
        }
    }

    /// The most recently fetched value.
    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    /// A receiver that is notified of every new value, including any already
    /// published.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.latest.clone()
    }

    /// Fetch now instead of waiting for the period to elapse.
    pub fn trigger_now(&self) {
        self.signal.notify_one();
    }

    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }

    /// Stop the task. Returns true iff it had already stopped by itself.
    pub async fn cancel(self) -> bool {
        self.task_handle.abort();
        self.task_handle.await.is_ok()
    }

    /// Wait for the task to stop by itself. The only way it does is a
    /// session expiry, which is returned as the error.
    pub async fn join(self) -> Result<()> {
        self.task_handle
            .await
            .map_err(|e| Error::InvalidState(format!("Refresh task ended abnormally: {e}")))?
    }
}

/// Live statistics for one election, refetched every `period`.
pub fn watch_statistics<T>(
    api: Arc<Api<T>>,
    access_token: Option<String>,
    election_id: String,
    period: Duration,
) -> RefreshTask<Statistics>
where
    T: Transport + 'static,
{
    RefreshTask::new(period, move || {
        let api = api.clone();
        let access_token = access_token.clone();
        let election_id = election_id.clone();
        async move {
            api.election_statistics(&access_token, &election_id)
                .await
                .map(|response| response.statistics)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::testing::MockTransport;

    const PERIOD: Duration = Duration::from_secs(30);

    fn counter() -> (
        Arc<AtomicUsize>,
        impl FnMut() -> std::future::Ready<Result<usize>> + Send + 'static,
    ) {
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = count.clone();
        (count, move || {
            std::future::ready(Ok(task_count.fetch_add(1, Ordering::SeqCst) + 1))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_every_period() {
        let (_, fetch) = counter();
        let start = Instant::now();
        let task = RefreshTask::new(PERIOD, fetch);
        let mut updates = task.subscribe();

        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow_and_update(), Some(1));
        assert!(start.elapsed() < PERIOD);

        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow_and_update(), Some(2));
        assert!(start.elapsed() >= PERIOD);
        assert_eq!(task.latest(), Some(2));

        assert!(!task.cancel().await);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_now_skips_the_wait() {
        let (count, fetch) = counter();
        let start = Instant::now();
        let task = RefreshTask::new(PERIOD, fetch);
        let mut updates = task.subscribe();
        updates.changed().await.unwrap();

        task.trigger_now();
        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow(), Some(2));
        assert!(start.elapsed() < PERIOD);
        assert_eq!(count.load(Ordering::SeqCst), 2);

        task.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_stops_polling() {
        let api = Arc::new(Api::new(MockTransport::new()));
        api.transport().respond(
            200,
            json!({"success": true, "statistics": {
                "total_voters": 120,
                "votes_cast": 45,
                "pending_votes": 75,
                "turnout_percentage": 37.5,
                "votes_by_position": {"President": 45},
                "voting_trend": [],
                "last_updated": "2026-10-14T09:30:00Z"
            }}),
        );
        api.transport().fail_network("connection reset");
        api.transport().respond(401, json!({"message": "Token has expired"}));

        let task = watch_statistics(
            api.clone(),
            Some("admin-token".to_string()),
            "E1".to_string(),
            PERIOD,
        );
        let mut updates = task.subscribe();
        updates.changed().await.unwrap();
        assert_eq!(task.latest().map(|s| s.votes_cast), Some(45));

        let result = task.join().await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));

        let sent = api.transport().requests();
        assert_eq!(sent.len(), 3);
        assert!(sent
            .iter()
            .all(|request| request.path == "/admin/elections/E1/statistics"));
    }
}
