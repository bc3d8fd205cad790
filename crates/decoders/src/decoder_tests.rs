//! Decoder tests against realistic tracker payloads.

use chrono::{TimeZone, Utc};
use serde_json::json;

use herald_common::error::HeraldError;

use crate::decode_review_requests;

// ───────────────────────────── helpers ──────────────────────────────

/// One wire-shaped review request element.
fn wire_request(id: u64, submitter: &str, last_updated: &str) -> serde_json::Value {
    json!({
        "id": id,
        "links": {
            "submitter": {
                "title": submitter,
                "href": format!("https://tracker.example.com/api/users/{submitter}/"),
            },
        },
        "time_added": "2014-05-19T22:01:22Z",
        "last_updated": last_updated,
        "absolute_url": format!("https://tracker.example.com/r/{id}/"),
        "summary": format!("Change #{id}"),
        "status": "pending",
    })
}

fn listing(requests: Vec<serde_json::Value>) -> Vec<u8> {
    json!({ "review_requests": requests }).to_string().into_bytes()
}

// ────────────────────────────── tests ───────────────────────────────

#[test]
fn test_decode_full_listing() {
    let body = listing(vec![wire_request(17077, "bmahler", "2014-05-20T12:54:05Z")]);
    let requests = decode_review_requests(&body).unwrap();

    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.id, 17077);
    assert_eq!(request.submitter, "bmahler");
    assert_eq!(
        request.time_added,
        Utc.with_ymd_and_hms(2014, 5, 19, 22, 1, 22).unwrap()
    );
    assert_eq!(
        request.last_updated,
        Utc.with_ymd_and_hms(2014, 5, 20, 12, 54, 5).unwrap()
    );
    assert_eq!(request.absolute_url, "https://tracker.example.com/r/17077/");
    assert_eq!(request.summary, "Change #17077");
    assert_eq!(request.status, "pending");
}

#[test]
fn test_decode_preserves_source_order() {
    let body = listing(vec![
        wire_request(3, "carol", "2014-05-22T00:00:00Z"),
        wire_request(2, "bob", "2014-05-21T00:00:00Z"),
        wire_request(1, "alice", "2014-05-20T00:00:00Z"),
    ]);
    let requests = decode_review_requests(&body).unwrap();

    let ids: Vec<u64> = requests.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn test_decode_empty_listing() {
    let requests = decode_review_requests(&listing(vec![])).unwrap();
    assert!(requests.is_empty());
}

#[test]
fn test_decode_accepts_legacy_timestamp_format() {
    let body = listing(vec![wire_request(5, "dave", "2014-05-20 12:54:05")]);
    let requests = decode_review_requests(&body).unwrap();

    assert_eq!(
        requests[0].last_updated,
        Utc.with_ymd_and_hms(2014, 5, 20, 12, 54, 5).unwrap()
    );
}

#[test]
fn test_decode_normalizes_offset_timestamps_to_utc() {
    let body = listing(vec![wire_request(6, "erin", "2014-05-20T12:54:05+02:00")]);
    let requests = decode_review_requests(&body).unwrap();

    assert_eq!(
        requests[0].last_updated,
        Utc.with_ymd_and_hms(2014, 5, 20, 10, 54, 5).unwrap()
    );
}

#[test]
fn test_one_bad_timestamp_fails_the_whole_decode() {
    let body = listing(vec![
        wire_request(2, "bob", "2014-05-21T00:00:00Z"),
        wire_request(1, "alice", "next tuesday"),
    ]);

    let err = decode_review_requests(&body).unwrap_err();
    assert!(matches!(err, HeraldError::Decode(_)));
    assert!(err.to_string().contains("next tuesday"));
}

#[test]
fn test_missing_field_fails_the_whole_decode() {
    let mut bad = wire_request(1, "alice", "2014-05-20T00:00:00Z");
    bad.as_object_mut().unwrap().remove("summary");
    let body = listing(vec![wire_request(2, "bob", "2014-05-21T00:00:00Z"), bad]);

    let err = decode_review_requests(&body).unwrap_err();
    assert!(matches!(err, HeraldError::Decode(_)));
}

#[test]
fn test_missing_submitter_link_fails_the_whole_decode() {
    let mut bad = wire_request(1, "alice", "2014-05-20T00:00:00Z");
    bad["links"].as_object_mut().unwrap().remove("submitter");
    let body = listing(vec![bad]);

    let err = decode_review_requests(&body).unwrap_err();
    assert!(matches!(err, HeraldError::Decode(_)));
}

#[test]
fn test_non_json_body_fails() {
    let err = decode_review_requests(b"<html>gateway timeout</html>").unwrap_err();
    assert!(matches!(err, HeraldError::Decode(_)));
}
