#![allow(clippy::unwrap_used)]
// Entry setup and teardown through the hub.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pantry_core::{
    ConfigEntry, CoreError, Entity, EntityState, EntryData, Hub, PantryConfig, ResolveStrategy,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn hub() -> Hub {
    Hub::new(PantryConfig {
        timeout: Duration::from_secs(5),
        ..PantryConfig::default()
    })
}

fn entry_for(server: &MockServer) -> ConfigEntry {
    let url = Url::parse(&format!("{}/api/pantry", server.uri())).unwrap();
    ConfigEntry::new(
        "Bogyi Konyha (Add-on)",
        EntryData {
            strategy: ResolveStrategy::Discover,
            base_url: Some(url),
        },
    )
}

async fn mount_inventory(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/pantry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "milk", "quantity": 2, "unit": "l"},
            {"id": 2, "name": "flour", "quantity": 500, "unit": "g"},
            {"name": "nameless id"}
        ])))
        .mount(server)
        .await;
}

// ── Setup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_setup_registers_entry_and_sensors() {
    let server = MockServer::start().await;
    mount_inventory(&server).await;
    let hub = hub();
    let entry = entry_for(&server);

    let sensors = hub.setup_entry(&entry).await.unwrap();

    assert_eq!(sensors.len(), 2);
    assert!(hub.is_loaded(&entry.entry_id));
    assert_eq!(hub.loaded_entries(), vec![entry.clone()]);
    assert_eq!(hub.entities(&entry.entry_id).unwrap().len(), 2);

    let coordinator = hub.coordinator(&entry.entry_id).unwrap();
    assert!(coordinator.is_running().await);
    assert!(coordinator.last_update_success());
    assert_eq!(sensors[1].state(), EntityState::Value(500.0));
    assert_eq!(sensors[1].unit_of_measurement().as_deref(), Some("grams"));

    hub.shutdown().await;
    assert!(hub.loaded_entries().is_empty());
    assert!(!coordinator.is_running().await);
}

#[tokio::test]
async fn test_registered_sensors_match_returned_sensors() {
    let server = MockServer::start().await;
    mount_inventory(&server).await;
    let hub = hub();
    let entry = entry_for(&server);

    let returned: Vec<String> = hub
        .setup_entry(&entry)
        .await
        .unwrap()
        .iter()
        .map(|s| s.unique_id().to_owned())
        .collect();
    let registered: Vec<String> = hub
        .entities(&entry.entry_id)
        .unwrap()
        .iter()
        .map(|s| s.unique_id().to_owned())
        .collect();

    assert_eq!(returned, vec!["bogyikonya_pantry_1", "bogyikonya_pantry_2"]);
    assert_eq!(registered, returned);

    hub.shutdown().await;
}

#[tokio::test]
async fn test_empty_inventory_still_registers_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pantry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let hub = hub();
    let entry = entry_for(&server);

    let sensors = hub.setup_entry(&entry).await.unwrap();

    assert!(sensors.is_empty());
    assert!(hub.is_loaded(&entry.entry_id));
    assert_eq!(hub.entities(&entry.entry_id).unwrap().len(), 0);

    hub.shutdown().await;
}

#[tokio::test]
async fn test_setup_twice_is_rejected() {
    let server = MockServer::start().await;
    mount_inventory(&server).await;
    let hub = hub();
    let entry = entry_for(&server);

    hub.setup_entry(&entry).await.unwrap();
    let err = hub.setup_entry(&entry).await.unwrap_err();
    assert!(matches!(err, CoreError::AlreadyLoaded { .. }));

    hub.shutdown().await;
}

#[tokio::test]
async fn test_failed_first_refresh_registers_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pantry"))
        .respond_with(ResponseTemplate::new(503).set_body_string("addon error"))
        .mount(&server)
        .await;
    let hub = hub();
    let entry = entry_for(&server);

    let err = hub.setup_entry(&entry).await.unwrap_err();

    let CoreError::SetupFailed { message, .. } = err else {
        panic!("expected setup failure, got {err:?}");
    };
    assert!(message.contains("503"), "{message}");
    assert!(!hub.is_loaded(&entry.entry_id));
    assert!(hub.entities(&entry.entry_id).is_none());
}

#[tokio::test]
async fn test_proxy_entry_without_supervisor_is_config_error() {
    let hub = hub();
    let entry = ConfigEntry::new(
        "Bogyi Konyha (Add-on)",
        EntryData {
            strategy: ResolveStrategy::SupervisorProxy,
            base_url: None,
        },
    );

    let err = hub.setup_entry(&entry).await.unwrap_err();
    assert!(matches!(err, CoreError::Config { .. }));
}

// ── Unload / refresh ────────────────────────────────────────────────

#[tokio::test]
async fn test_unload() {
    let server = MockServer::start().await;
    mount_inventory(&server).await;
    let hub = hub();
    let entry = entry_for(&server);
    hub.setup_entry(&entry).await.unwrap();

    assert!(hub.unload_entry(&entry.entry_id).await);
    assert!(!hub.unload_entry(&entry.entry_id).await);
    assert!(hub.coordinator(&entry.entry_id).is_none());

    let err = hub.refresh_entry(&entry.entry_id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotLoaded { .. }));
}

#[tokio::test]
async fn test_manual_refresh() {
    let server = MockServer::start().await;
    mount_inventory(&server).await;
    let hub = hub();
    let entry = entry_for(&server);
    hub.setup_entry(&entry).await.unwrap();

    let snapshot = hub.refresh_entry(&entry.entry_id).await.unwrap();
    assert_eq!(snapshot.len(), 3);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    hub.shutdown().await;
}
