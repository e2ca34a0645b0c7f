//! Change Feed
//!
//! Collection-level change notifications. Writers publish a [`Topic`] after
//! every successful mutation; watchers hold a [`Subscription`] that delivers
//! a fresh full snapshot whenever a relevant topic fires. Snapshots rather
//! than deltas: a subscriber that falls behind resynchronizes by re-query,
//! so missed notifications never leave it permanently stale.

use shared::AppResult;
use std::future::Future;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// What changed. Conversation-scoped topics carry their request id so
/// watchers of one conversation ignore traffic on others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    Requests,
    Messages { request_id: String },
    Offers { request_id: String },
    Rows { request_id: String },
    Menus,
    Orders,
}

const FEED_CAPACITY: usize = 256;
const SNAPSHOT_BUFFER: usize = 16;

/// Broadcast hub for mutation notifications
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<Topic>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Publish a change. Never fails; with no live subscribers the
    /// notification is simply dropped.
    pub fn publish(&self, topic: Topic) {
        let _ = self.tx.send(topic);
    }

    /// Watch a query: deliver its current snapshot immediately, then a new
    /// snapshot after every topic `matches` accepts. Dropping the returned
    /// subscription stops the worker.
    pub fn watch<T, M, F, Fut>(&self, matches: M, fetch: F) -> Subscription<T>
    where
        T: Send + 'static,
        M: Fn(&Topic) -> bool + Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<Vec<T>>> + Send,
    {
        let mut feed_rx = self.tx.subscribe();
        let (snap_tx, snap_rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        tokio::spawn(async move {
            // Initial snapshot before any notification
            if snap_tx.send(fetch().await).await.is_err() {
                return;
            }
            loop {
                tokio::select! {
                    _ = worker_cancel.cancelled() => break,
                    event = feed_rx.recv() => {
                        let relevant = match event {
                            Ok(topic) => matches(&topic),
                            // Fell behind the feed: resync unconditionally
                            Err(broadcast::error::RecvError::Lagged(_)) => true,
                            Err(broadcast::error::RecvError::Closed) => break,
                        };
                        if relevant && snap_tx.send(fetch().await).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Subscription {
            rx: snap_rx,
            cancel,
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// A live query handle. Each `recv` yields a full snapshot of the watched
/// collection, or the error the refresh query hit.
pub struct Subscription<T> {
    rx: mpsc::Receiver<AppResult<Vec<T>>>,
    cancel: CancellationToken,
}

impl<T> Subscription<T> {
    /// Next snapshot; `None` once the feed shuts down
    pub async fn recv(&mut self) -> Option<AppResult<Vec<T>>> {
        self.rx.recv().await
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn initial_snapshot_arrives_without_any_publish() {
        let feed = ChangeFeed::new();
        let mut sub = feed.watch(|_| true, || async { Ok(vec![1, 2, 3]) });
        let snap = sub.recv().await.unwrap().unwrap();
        assert_eq!(snap, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn relevant_topics_trigger_refresh_and_irrelevant_do_not() {
        let feed = ChangeFeed::new();
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let mut sub = feed.watch(
            |t| matches!(t, Topic::Menus),
            move || {
                let c = c.clone();
                async move { Ok(vec![c.fetch_add(1, Ordering::SeqCst)]) }
            },
        );
        assert_eq!(sub.recv().await.unwrap().unwrap(), vec![0]);

        feed.publish(Topic::Requests);
        feed.publish(Topic::Menus);
        // Only the Menus publish produces a snapshot
        assert_eq!(sub.recv().await.unwrap().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn dropping_subscription_stops_the_worker() {
        let feed = ChangeFeed::new();
        let sub = feed.watch(|_| true, || async { Ok(Vec::<u8>::new()) });
        drop(sub);
        tokio::task::yield_now().await;
        // Publishing into a feed with no live watchers must not panic
        feed.publish(Topic::Orders);
    }
}
