//! Review-request poll loop and watermark tracking.
//!
//! The poller fetches the tracker's pending listing on a fixed interval and
//! relays every request updated since the watermark, oldest first. The
//! watermark advances after each non-error dispatch outcome, so an error
//! mid-cycle leaves it at the last request that was actually handled and the
//! next cycle picks up from there.

use std::time::Duration;

use chrono::{DateTime, Utc};

use herald_common::config::AppConfig;
use herald_common::error::HeraldError;
use herald_common::http::HttpFetcher;
use herald_common::types::{DispatchOutcome, ReviewRequest};
use herald_decoders::decode_review_requests;
use herald_notifier::allowlist::EmployeeAllowlist;
use herald_notifier::dispatch::NotificationDispatcher;

/// Per-cycle dispatch counters, logged after every poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Requests reported by the tracker this cycle.
    pub fetched: usize,
    /// Requests newer than the watermark that reached the dispatcher.
    pub dispatched: usize,
    /// Dispatched requests the webhook accepted.
    pub sent: usize,
    /// Dispatched requests skipped as duplicate or internal.
    pub skipped: usize,
}

/// Review-request poller.
///
/// All mutable state — the watermark, the suppression set inside the
/// dispatcher, and the allowlist — lives on this struct and is touched only
/// by the single poll task. Nothing survives a process restart.
#[derive(Debug)]
pub struct ReviewPoller {
    fetcher: HttpFetcher,
    dispatcher: NotificationDispatcher,
    tracker_url: String,
    tracker_group: String,
    poll_interval: Duration,
    last_updated: DateTime<Utc>,
}

impl ReviewPoller {
    /// Fetch once, seed the watermark from the newest pending request, and
    /// load the employee allowlist.
    ///
    /// A tracker reporting zero pending requests here is a startup
    /// precondition failure: there is no timestamp to seed the watermark from.
    pub async fn initialize(config: &AppConfig) -> Result<Self, HeraldError> {
        let fetcher = HttpFetcher::new(Duration::from_secs(config.request_timeout_secs))?;

        let requests = fetch_pending(&fetcher, &config.tracker_url, &config.tracker_group).await?;
        let newest = requests.first().ok_or_else(|| {
            HeraldError::Startup("tracker returned no pending review requests".to_string())
        })?;
        let last_updated = newest.last_updated;

        let allowlist = match &config.employee_list_url {
            Some(url) => EmployeeAllowlist::load(&fetcher, url).await?,
            None => EmployeeAllowlist::empty(),
        };

        tracing::info!(
            tracker_url = %config.tracker_url,
            tracker_group = %config.tracker_group,
            webhook_url = %config.webhook_url,
            channel = %config.channel,
            poll_interval_secs = config.poll_interval_secs,
            suppression_capacity = config.suppression_capacity,
            allowlist_len = allowlist.len(),
            watermark = %last_updated,
            pending = requests.len(),
            "Review poller initialized"
        );

        let dispatcher = NotificationDispatcher::new(
            fetcher.clone(),
            config.webhook_endpoint(),
            config.channel.clone(),
            config.suppression_capacity,
            allowlist,
        );

        Ok(Self {
            fetcher,
            dispatcher,
            tracker_url: config.tracker_url.clone(),
            tracker_group: config.tracker_group.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            last_updated,
        })
    }

    /// Poll forever. Iteration failures are logged and retried after the
    /// normal sleep interval; nothing short of process termination stops
    /// the loop.
    pub async fn run(&mut self) {
        loop {
            match self.poll_cycle().await {
                Ok(stats) => {
                    tracing::info!(
                        fetched = stats.fetched,
                        dispatched = stats.dispatched,
                        sent = stats.sent,
                        skipped = stats.skipped,
                        watermark = %self.last_updated,
                        "Poll cycle complete"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        watermark = %self.last_updated,
                        "Poll cycle failed"
                    );
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One fetch-and-dispatch pass.
    ///
    /// The first error aborts the rest of the cycle; whatever was dispatched
    /// before it stays dispatched and the watermark stays where it got to.
    pub async fn poll_cycle(&mut self) -> Result<CycleStats, HeraldError> {
        let requests =
            fetch_pending(&self.fetcher, &self.tracker_url, &self.tracker_group).await?;

        let mut stats = CycleStats {
            fetched: requests.len(),
            ..CycleStats::default()
        };

        for request in chronological(&requests) {
            if request.last_updated <= self.last_updated {
                continue;
            }

            match self.dispatcher.notify(request).await? {
                DispatchOutcome::Sent => stats.sent += 1,
                DispatchOutcome::Skipped(reason) => {
                    tracing::debug!(id = request.id, reason = %reason, "Dispatch skipped");
                    stats.skipped += 1;
                }
            }
            stats.dispatched += 1;
            self.last_updated = request.last_updated;
        }

        Ok(stats)
    }

    /// Current watermark: the `last_updated` of the newest handled request.
    pub fn watermark(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

/// The tracker lists newest first; dispatch wants oldest first.
fn chronological(requests: &[ReviewRequest]) -> impl Iterator<Item = &ReviewRequest> {
    requests.iter().rev()
}

/// GET the pending review-request listing and decode it, newest first.
async fn fetch_pending(
    fetcher: &HttpFetcher,
    tracker_url: &str,
    group: &str,
) -> Result<Vec<ReviewRequest>, HeraldError> {
    let body = fetcher
        .get(tracker_url, &[("to-groups", group), ("status", "pending")])
        .await?;
    let requests = decode_review_requests(&body)?;
    tracing::debug!(count = requests.len(), "Fetched pending review requests");
    Ok(requests)
}
