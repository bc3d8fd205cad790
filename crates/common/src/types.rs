use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending code-review submission reported by the tracker.
///
/// Built once per poll cycle from the decoded listing and never mutated
/// afterwards. Processing order is ascending by `last_updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Tracker-assigned id, unique per tracker instance.
    pub id: u64,
    /// Submitter display name (`links.submitter.title` on the wire).
    pub submitter: String,
    pub time_added: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub absolute_url: String,
    pub summary: String,
    pub status: String,
}

/// Outcome of a single dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The webhook accepted the message.
    Sent,
    /// Nothing was posted; the request was filtered before the send.
    Skipped(SkipReason),
}

/// Why a request was skipped without contacting the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Id already present in the suppression set.
    Duplicate,
    /// Submitter is on the employee allowlist.
    InternalSubmitter,
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Sent => write!(f, "sent"),
            DispatchOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Duplicate => write!(f, "duplicate"),
            SkipReason::InternalSubmitter => write!(f, "internal submitter"),
        }
    }
}
