//! Background polling for the notification feed.
//!
//! The server has no push channel, so a small task fetches the feed on an
//! interval and publishes it through a [`watch`] channel for whatever parts
//! of the UI care about the unread badge.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::domain::entities::NotificationFeed;
use crate::domain::session::Session;
use crate::infra::api::ToolShareClient;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to the polling task. Dropping it without calling
/// [`NotificationPoller::shutdown`] also stops the loop at its next wakeup.
pub struct NotificationPoller {
    task: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    feed: watch::Receiver<Option<NotificationFeed>>,
}

impl NotificationPoller {
    /// Starts polling on the current Tokio runtime. The first fetch happens
    /// immediately, then once per `interval`. Failed polls are logged and
    /// the previous feed stays published.
    pub fn spawn(client: ToolShareClient, session: &Session, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let (feed_tx, feed) = watch::channel(None);
        let session = session.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match client.get_notifications(&session).await {
                            Ok(feed) => {
                                debug!(unread = feed.unread_count, "notification feed refreshed");
                                let _ = feed_tx.send(Some(feed));
                            }
                            Err(err) => warn!(error = %err, "notification poll failed"),
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        Self {
            task,
            shutdown,
            feed,
        }
    }

    /// A receiver over the freshest feed; holds `None` until the first
    /// successful poll.
    pub fn feed(&self) -> watch::Receiver<Option<NotificationFeed>> {
        self.feed.clone()
    }

    pub fn latest(&self) -> Option<NotificationFeed> {
        self.feed.borrow().clone()
    }

    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "notification poller did not stop cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserProfile;

    fn unroutable_client() -> ToolShareClient {
        // nothing listens on the discard port, so every poll fails fast
        ToolShareClient::with_base_url("http://127.0.0.1:9/api/").unwrap()
    }

    fn session() -> Session {
        Session::new(UserProfile {
            id: 3,
            username: "ines".to_string(),
            email: "ines@example.com".to_string(),
            full_name: "Ines Dubois".to_string(),
            phone_number: None,
            location: None,
            profile_picture_url: None,
            is_verified: true,
            created_at: None,
            updated_at: None,
        })
    }

    #[tokio::test]
    async fn latest_is_none_before_any_successful_poll() {
        let poller =
            NotificationPoller::spawn(unroutable_client(), &session(), Duration::from_secs(60));
        assert!(poller.latest().is_none());
        poller.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_returns_promptly() {
        let poller =
            NotificationPoller::spawn(unroutable_client(), &session(), Duration::from_secs(60));
        tokio::time::timeout(Duration::from_secs(5), poller.shutdown())
            .await
            .expect("poller should stop well within the timeout");
    }
}
