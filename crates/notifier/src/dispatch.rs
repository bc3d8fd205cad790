//! Webhook dispatcher for individual review requests.
//!
//! Each request passes two filters before anything goes over the wire: the
//! suppression set (already posted) and the employee allowlist (internal
//! submitter). Only a send the webhook accepted records the id, so a failed
//! send stays eligible for a retry on a later cycle.

use serde::Serialize;

use herald_common::error::HeraldError;
use herald_common::http::HttpFetcher;
use herald_common::types::{DispatchOutcome, ReviewRequest, SkipReason};

use crate::allowlist::EmployeeAllowlist;
use crate::suppress::SuppressionSet;

/// Icon shown next to relayed messages in the chat client.
const ICON_EMOJI: &str = ":space_invader:";

/// Chat message payload for the incoming webhook.
#[derive(Debug, Serialize)]
struct WebhookMessage {
    channel: String,
    username: String,
    text: String,
    icon_emoji: String,
}

/// Formats and posts one chat message per unseen review request.
#[derive(Debug)]
pub struct NotificationDispatcher {
    fetcher: HttpFetcher,
    webhook_url: String,
    channel: String,
    posted: SuppressionSet,
    allowlist: EmployeeAllowlist,
}

impl NotificationDispatcher {
    pub fn new(
        fetcher: HttpFetcher,
        webhook_url: String,
        channel: String,
        suppression_capacity: usize,
        allowlist: EmployeeAllowlist,
    ) -> Self {
        Self {
            fetcher,
            webhook_url,
            channel,
            posted: SuppressionSet::with_capacity(suppression_capacity),
            allowlist,
        }
    }

    /// Post a chat message for `request` unless it was posted before or comes
    /// from an internal submitter.
    pub async fn notify(
        &mut self,
        request: &ReviewRequest,
    ) -> Result<DispatchOutcome, HeraldError> {
        if self.posted.contains(request.id) {
            tracing::debug!(id = request.id, "Already posted, skipping");
            return Ok(DispatchOutcome::Skipped(SkipReason::Duplicate));
        }
        if self.allowlist.contains(&request.submitter) {
            tracing::debug!(
                id = request.id,
                submitter = %request.submitter,
                "Internal submitter, skipping"
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::InternalSubmitter));
        }

        let message = WebhookMessage {
            channel: self.channel.clone(),
            username: format!("{} [Review Board]", request.submitter),
            text: format!(
                "{} [<{}|#{}>]",
                request.summary, request.absolute_url, request.id
            ),
            icon_emoji: ICON_EMOJI.to_string(),
        };
        let payload = serde_json::to_string(&message)
            .map_err(|e| HeraldError::Decode(format!("encoding webhook payload: {e}")))?;

        self.fetcher
            .post_form(&self.webhook_url, &[("payload", payload)])
            .await?;

        self.posted.record(request.id);
        tracing::info!(
            id = request.id,
            submitter = %request.submitter,
            "Notification sent"
        );
        Ok(DispatchOutcome::Sent)
    }

    /// Number of ids currently held in the suppression set.
    pub fn posted_count(&self) -> usize {
        self.posted.len()
    }
}
