//! Review-request payload decoding.
//!
//! The tracker returns a JSON envelope with a `review_requests` array, newest
//! first. Decoding is all-or-nothing: one malformed element discards the
//! whole response, so a half-parsed listing never reaches the dispatcher.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use herald_common::error::HeraldError;
use herald_common::types::ReviewRequest;

/// Envelope of the tracker's review-request listing.
#[derive(Debug, Deserialize)]
struct Envelope {
    review_requests: Vec<WireReviewRequest>,
}

/// One review request as it appears on the wire.
#[derive(Debug, Deserialize)]
struct WireReviewRequest {
    id: u64,
    links: WireLinks,
    time_added: String,
    last_updated: String,
    absolute_url: String,
    summary: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct WireLinks {
    submitter: WireSubmitter,
}

#[derive(Debug, Deserialize)]
struct WireSubmitter {
    title: String,
}

/// Decode a tracker response body into review requests, preserving the
/// tracker's newest-first ordering.
pub fn decode_review_requests(body: &[u8]) -> Result<Vec<ReviewRequest>, HeraldError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| HeraldError::Decode(format!("malformed review-request listing: {e}")))?;

    envelope.review_requests.into_iter().map(convert).collect()
}

fn convert(wire: WireReviewRequest) -> Result<ReviewRequest, HeraldError> {
    Ok(ReviewRequest {
        id: wire.id,
        submitter: wire.links.submitter.title,
        time_added: parse_timestamp(&wire.time_added)?,
        last_updated: parse_timestamp(&wire.last_updated)?,
        absolute_url: wire.absolute_url,
        summary: wire.summary,
        status: wire.status,
    })
}

/// Parse a tracker timestamp.
///
/// Recent tracker versions emit RFC 3339; older deployments emit
/// `YYYY-MM-DD HH:MM:SS` with an implicit UTC zone.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, HeraldError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| HeraldError::Decode(format!("unparseable timestamp {raw:?}: {e}")))
}

#[cfg(test)]
mod decoder_tests;
