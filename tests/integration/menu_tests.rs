//! Menu rendering over a real refresh pass

use crate::common::Fixture;
use chrono::{Duration, NaiveTime, Utc};
use package_tracker::output::{format_menu, MenuContext};
use package_tracker::tracker::RefreshMode;
use package_tracker::Tracker;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEDEX: &str = "123456789012";
const DHL: &str = "JD014600003828394701";

fn context(fixture: &Fixture) -> MenuContext<'_> {
    MenuContext {
        executable: "/plugins/package-tracker.5m".to_string(),
        endpoints: &fixture.config.endpoints,
        updated_at: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_render_after_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fedex/track"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Delivered</p>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dhl/track"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Shipment in transit</p>"))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([
        {"tracking_number": FEDEX, "carrier": "FedEx", "name": "Camera"},
        {"tracking_number": DHL, "carrier": "DHL"}
    ]));

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();
    let menu = format_menu(&views, &context(&fixture));
    let lines: Vec<&str> = menu.lines().collect();

    assert_eq!(lines[0], "📦 2 (1 delivered)");
    assert_eq!(lines[1], "---");
    assert_eq!(lines[2], "✅ Camera | color=green");
    assert!(menu.contains("🚚 DHL JD014600... | color=blue\n"));
    assert!(menu.contains(&format!(
        "--Open in Browser | href={}/fedex/track?trknbr={}\n",
        server.uri(),
        FEDEX
    )));
    assert!(menu.contains(&format!(
        "--Remove | bash=/plugins/package-tracker.5m param1=remove param2={} terminal=false refresh=true\n",
        DHL
    )));
    assert_eq!(lines[lines.len() - 1], "Last updated: 09:30:00");
}

#[tokio::test]
async fn test_render_marks_failed_refresh_stale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Please try again later</p>"))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server.uri());
    fixture.write_tracked(json!([{"tracking_number": FEDEX, "carrier": "FedEx"}]));
    fixture.write_cache(json!({
        FEDEX: {
            "carrier": "FedEx",
            "status": "in_transit",
            "last_fetched": (Utc::now() - Duration::minutes(20)).to_rfc3339(),
        }
    }));

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();
    let menu = format_menu(&views, &context(&fixture));

    assert!(menu.starts_with("📦 1 (🚚 1 in transit)\n"));
    assert!(menu.contains("--Status: In Transit (stale)\n"));
}

#[tokio::test]
async fn test_render_empty_list() {
    let server = MockServer::start().await;
    let fixture = Fixture::new(&server.uri());

    let mut tracker = Tracker::new(fixture.config.clone(), fixture.storage()).unwrap();
    let views = tracker.refresh_all(RefreshMode::IfStale).await.unwrap();
    let menu = format_menu(&views, &context(&fixture));

    assert!(menu.starts_with("📦\n---\nNo packages to track\n"));
}
