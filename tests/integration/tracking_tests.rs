//! End-to-end tracking lifecycle tests against on-disk JSON files

use crate::common::Fixture;
use chrono::{Duration, Utc};
use package_tracker::storage::Storage;
use package_tracker::tracker::{Freshness, RefreshMode};
use package_tracker::{Carrier, Tracker, TrackerError, TrackingStatus};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEDEX: &str = "123456789012";
const USPS: &str = "9400111899223197428490";

fn tracking_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "<html><head><script>var s = 'delivered';</script></head><body>{}</body></html>",
        body
    ))
}

#[tokio::test]
async fn test_add_persists_package_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fedex/track"))
        .and(query_param("trknbr", FEDEX))
        .respond_with(tracking_page(
            "<div>In transit</div><div>Arrived at Memphis, TN on Oct 18</div>\
             <div>Estimated delivery: Oct 21, 2026</div>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();

    let outcome = tracker
        .add("1234-5678-9012", Some("Books".to_string()))
        .await
        .unwrap();
    let record = outcome.record.unwrap();
    assert_eq!(record.status, TrackingStatus::InTransit);
    assert_eq!(record.location.as_deref(), Some("Memphis, Tn"));
    assert_eq!(record.expected_delivery.unwrap().to_string(), "2026-10-21");

    let tracked = fixture.tracked_json();
    assert_eq!(tracked[0]["tracking_number"], FEDEX);
    assert_eq!(tracked[0]["carrier"], "FedEx");
    assert_eq!(tracked[0]["name"], "Books");

    let cache = fixture.cache_json();
    assert_eq!(cache[FEDEX]["status"], "in_transit");
    assert_eq!(cache[FEDEX]["carrier"], "FedEx");
}

#[tokio::test]
async fn test_add_unrecognized_number_is_rejected() {
    let server = MockServer::start().await;
    let fixture = Fixture::new(&server.uri());
    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();

    let result = tracker.add("hello world", None).await;
    assert!(matches!(result, Err(TrackerError::InvalidTrackingNumber(_))));
    assert!(tracker.tracked().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_entry_is_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/usps/track"))
        .respond_with(tracking_page("<p>Your item was delivered at 2:14 pm</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([{"tracking_number": USPS, "carrier": "USPS"}]));
    fixture.write_cache(json!({
        USPS: {
            "carrier": "USPS",
            "status": "in_transit",
            "location": null,
            "expected_delivery": null,
            "last_fetched": (Utc::now() - Duration::minutes(10)).to_rfc3339(),
        }
    }));

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();

    assert_eq!(views[0].status(), TrackingStatus::Delivered);
    assert_eq!(views[0].freshness, Freshness::Fresh);
    assert_eq!(fixture.cache_json()[USPS]["status"], "delivered");
}

#[tokio::test]
async fn test_fresh_entry_is_not_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(tracking_page("<p>Delivered</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([{"tracking_number": USPS, "carrier": "USPS"}]));
    fixture.write_cache(json!({
        USPS: {
            "carrier": "USPS",
            "status": "pending",
            "last_fetched": (Utc::now() - Duration::minutes(2)).to_rfc3339(),
        }
    }));

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();

    assert_eq!(views[0].status(), TrackingStatus::Pending);
    assert_eq!(views[0].freshness, Freshness::Fresh);
}

#[tokio::test]
async fn test_failed_refresh_leaves_cache_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([{"tracking_number": FEDEX, "carrier": "FedEx"}]));
    let fetched = (Utc::now() - Duration::hours(1)).to_rfc3339();
    fixture.write_cache(json!({
        FEDEX: {
            "carrier": "FedEx",
            "status": "out_for_delivery",
            "location": "Austin, Tx",
            "expected_delivery": "2026-10-19",
            "last_fetched": fetched,
        }
    }));
    let before = fixture.storage().load_cache().unwrap();

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();

    assert_eq!(views[0].freshness, Freshness::Stale);
    assert_eq!(views[0].status(), TrackingStatus::OutForDelivery);
    assert_eq!(views[0].record.as_ref(), before.get(FEDEX));
    assert_eq!(fixture.storage().load_cache().unwrap(), before);
}

#[tokio::test]
async fn test_remove_deletes_cache_and_list_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(tracking_page("<p>Label created</p>"))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    tracker.add(FEDEX, None).await.unwrap();
    tracker.add(USPS, None).await.unwrap();

    assert!(tracker.remove(FEDEX).unwrap());

    let tracked = fixture.tracked_json();
    assert_eq!(tracked.as_array().unwrap().len(), 1);
    assert_eq!(tracked[0]["tracking_number"], USPS);

    let cache = fixture.cache_json();
    assert!(cache.get(FEDEX).is_none());
    assert_eq!(cache[USPS]["status"], "pending");
}

#[tokio::test]
async fn test_clear_empties_both_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(tracking_page("<p>In transit</p>"))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    tracker.add(FEDEX, None).await.unwrap();

    assert_eq!(tracker.clear().unwrap(), 1);
    assert_eq!(fixture.tracked_json(), json!([]));
    assert!(fixture.storage().load_cache().unwrap().is_empty());
}

#[tokio::test]
async fn test_legacy_tracking_list_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fedex/track"))
        .respond_with(tracking_page("<p>On vehicle for delivery</p>"))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([
        "1234 5678 9012",
        {"tracking_number": USPS, "name": "", "added": "2025-11-02T09:15:00.123456"}
    ]));

    let tracked = fixture.storage().load_tracked().unwrap();
    assert_eq!(tracked[0].tracking_number, FEDEX);
    assert_eq!(tracked[0].carrier, Carrier::FedEx);
    assert_eq!(tracked[1].carrier, Carrier::Usps);
    assert!(tracked[1].added.is_some());

    Mock::given(method("GET"))
        .and(path("/usps/track"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();
    assert_eq!(views[0].status(), TrackingStatus::OutForDelivery);
    assert_eq!(views[1].freshness, Freshness::Missing);
}

#[tokio::test]
async fn test_corrupt_cache_is_treated_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(tracking_page("<p>Delivered</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([{"tracking_number": FEDEX, "carrier": "FedEx"}]));
    std::fs::write(fixture.dir.path().join("cache.json"), "{not json").unwrap();

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();

    assert_eq!(views[0].status(), TrackingStatus::Delivered);
    assert_eq!(fixture.cache_json()[FEDEX]["status"], "delivered");
}

#[tokio::test]
async fn test_lowercase_legacy_entry_can_be_removed() {
    let server = MockServer::start().await;
    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([
        {"tracking_number": "1z999aa10123456784", "carrier": "UPS", "name": ""}
    ]));

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let listed = tracker.tracked().unwrap();
    assert!(tracker.remove(&listed[0].tracking_number).unwrap());
    assert_eq!(fixture.tracked_json(), json!([]));
}

#[tokio::test]
async fn test_lowercase_legacy_entry_blocks_duplicate_add() {
    let server = MockServer::start().await;
    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([
        {"tracking_number": "1z999aa10123456784", "carrier": "UPS", "name": ""}
    ]));

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let result = tracker.add("1Z999AA10123456784", None).await;

    assert!(matches!(result, Err(TrackerError::DuplicateTrackingNumber(_))));
    assert_eq!(tracker.tracked().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unfamiliar_carrier_entry_survives_add() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(tracking_page("<p>In transit</p>"))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([
        {"tracking_number": FEDEX, "carrier": "FedEx"},
        {"tracking_number": USPS, "carrier": "Amazon"}
    ]));

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    tracker.add("JD014600003828394701", None).await.unwrap();

    let tracked = fixture.tracked_json();
    let numbers: Vec<&str> = tracked
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["tracking_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec![FEDEX, USPS, "JD014600003828394701"]);
    assert_eq!(tracked[1]["carrier"], "USPS");
}

#[tokio::test]
async fn test_unreadable_tracking_list_is_left_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(tracking_page("<p>In transit</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    let list_path = fixture.dir.path().join("tracking_numbers.json");
    std::fs::write(&list_path, "[{\"tracking_number\": ").unwrap();

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    assert!(matches!(
        tracker.add(FEDEX, None).await,
        Err(TrackerError::Storage(_))
    ));
    assert!(tracker.refresh_all(RefreshMode::IfStale).await.is_err());
    assert_eq!(
        std::fs::read_to_string(&list_path).unwrap(),
        "[{\"tracking_number\": "
    );
}
