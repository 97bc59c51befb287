//! In-process dashboard session.
//!
//! A session owns two pollers, one for the statistics snapshot and one for
//! the inbox listing. Both stop when the session is stopped or dropped, and
//! changing the inbox filter restarts only the inbox poller. Restarted inbox
//! pollers publish into the session's channel, so subscribers keep receiving
//! updates across filter changes.

use crate::domain::inbox::{InboxView, SortOrder, sort_views};
use crate::domain::stats::StatisticsSnapshot;
use crate::services::inbox_service::InboxService;
use crate::services::stats_service::StatsService;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

pub mod poller;

pub use poller::Poller;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshError {
    #[error("Failed to fetch SES statistics")]
    Stats,
    #[error("Failed to fetch SES messages. Please try again.")]
    Messages,
}

pub type StatsState = Result<StatisticsSnapshot, RefreshError>;
pub type InboxState = Result<Vec<InboxView>, RefreshError>;

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub stats_interval: Duration,
    pub messages_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { stats_interval: Duration::from_secs(60), messages_interval: Duration::from_secs(60) }
    }
}

#[derive(Debug)]
pub struct DashboardSession {
    inbox: InboxService,
    config: PollConfig,
    filter: Option<String>,
    sort: SortOrder,
    inbox_tx: watch::Sender<Option<InboxState>>,
    stats_poller: Poller<StatsState>,
    inbox_poller: Poller<InboxState>,
}

impl DashboardSession {
    /// Starts both pollers. Each fetches once immediately.
    #[must_use]
    pub fn start(stats: StatsService, inbox: InboxService, config: PollConfig) -> Self {
        let stats_poller = Poller::spawn("stats", config.stats_interval, move || {
            let stats = stats.clone();
            async move {
                stats.fetch_snapshot().await.map_err(|e| {
                    tracing::warn!(error = %e, "Dashboard statistics refresh failed");
                    RefreshError::Stats
                })
            }
        });
        let (inbox_tx, _) = watch::channel(None);
        let inbox_poller = spawn_inbox_poller(inbox.clone(), config.messages_interval, inbox_tx.clone(), None);

        Self { inbox, config, filter: None, sort: SortOrder::default(), inbox_tx, stats_poller, inbox_poller }
    }

    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Replaces the recipient filter and restarts the inbox poller with it.
    /// Setting the current filter again is a no-op.
    ///
    /// The listing reads as `None` until the first filtered fetch completes.
    pub async fn set_filter(&mut self, filter: Option<String>) {
        let filter = filter.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
        if filter == self.filter {
            return;
        }

        // The old poller must be gone before the channel is cleared, or a late
        // unfiltered fetch could land after it.
        self.inbox_poller.stop().await;
        self.inbox_tx.send_replace(None);
        self.inbox_poller =
            spawn_inbox_poller(self.inbox.clone(), self.config.messages_interval, self.inbox_tx.clone(), filter.clone());
        self.filter = filter;
    }

    pub const fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort
    }

    #[must_use]
    pub fn stats(&self) -> Option<StatsState> {
        self.stats_poller.latest()
    }

    /// Latest inbox listing, ordered by the session's sort order.
    #[must_use]
    pub fn messages(&self) -> Option<InboxState> {
        self.inbox_tx.borrow().clone().map(|state| {
            state.map(|mut views| {
                sort_views(&mut views, self.sort);
                views
            })
        })
    }

    #[must_use]
    pub fn stats_updates(&self) -> watch::Receiver<Option<StatsState>> {
        self.stats_poller.subscribe()
    }

    #[must_use]
    pub fn message_updates(&self) -> watch::Receiver<Option<InboxState>> {
        self.inbox_tx.subscribe()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.stats_poller.is_running() && self.inbox_poller.is_running()
    }

    /// Stops both pollers and waits for them to exit.
    pub async fn stop(mut self) {
        tokio::join!(self.stats_poller.stop(), self.inbox_poller.stop());
    }
}

fn spawn_inbox_poller(
    inbox: InboxService,
    period: Duration,
    tx: watch::Sender<Option<InboxState>>,
    filter: Option<String>,
) -> Poller<InboxState> {
    Poller::spawn_into("messages", period, tx, move || {
        let inbox = inbox.clone();
        let filter = filter.clone();
        async move {
            match inbox.list_inbox(filter.as_deref()).await {
                Ok(messages) => Ok(messages.iter().map(InboxView::from).collect()),
                Err(e) => {
                    tracing::warn!(error = %e, "Dashboard message refresh failed");
                    Err(RefreshError::Messages)
                }
            }
        }
    })
}
