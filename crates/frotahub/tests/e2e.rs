// SPDX-FileCopyrightText: 2026 Frotahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: real SQLite store, real HTTP transport, mock endpoint.
//!
//! Each test creates an isolated temp database and its own mock server.
//! Tests are independent and order-insensitive.

use std::sync::Arc;

use frotahub_config::{StorageConfig, SyncConfig, DEFAULT_ENDPOINT_PLACEHOLDER};
use frotahub_core::traits::{SubmissionStore, SyncTransport};
use frotahub_core::types::{
    OperationalProblem, ServiceCenter, SpotOffers, Submission, SyncStatus, Vehicle,
};
use frotahub_storage::SqliteStore;
use frotahub_sync::{CycleOutcome, HttpTransport, SyncEngine};
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    store: Arc<SqliteStore>,
    transport: Arc<HttpTransport>,
    engine: SyncEngine,
    _dir: tempfile::TempDir,
}

async fn harness(endpoint_url: &str) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::new(StorageConfig {
        database_path: dir.path().join("e2e.db").to_string_lossy().into_owned(),
        wal_mode: true,
    }));
    store.initialize().await.unwrap();

    let sync_config = SyncConfig {
        endpoint_url: endpoint_url.to_string(),
        request_timeout_secs: 2,
        ..SyncConfig::default()
    };
    let transport = Arc::new(HttpTransport::new(&sync_config).unwrap());
    let engine = SyncEngine::new(
        Arc::clone(&store) as Arc<dyn SubmissionStore>,
        Arc::clone(&transport) as Arc<dyn SyncTransport>,
        sync_config,
    );
    Harness {
        store,
        transport,
        engine,
        _dir: dir,
    }
}

/// Pad the mock server's short URL past the endpoint usability length guard.
fn padded_url(server: &MockServer) -> String {
    format!("{}/sync-endpoint/exec-aaaaaaaaaaaaaaaa", server.uri())
}

fn report(id: &str, day: &str) -> Submission {
    Submission {
        id: id.to_string(),
        timestamp: format!("{day}T18:30:00Z"),
        operational_date: day.to_string(),
        service_center_id: "centro-norte".to_string(),
        fleet_status: vec![],
        spot_offers: SpotOffers {
            van: 2,
            ..SpotOffers::default()
        },
        problems: OperationalProblem::default(),
        weekly_acceptance: None,
        sync_status: SyncStatus::Pending,
    }
}

// ---- Save offline, drain when the endpoint comes up ----

#[tokio::test]
async fn reports_queue_offline_and_drain_on_reconnect() {
    let h = harness(DEFAULT_ENDPOINT_PLACEHOLDER).await;

    for (i, day) in ["2024-05-01", "2024-05-02", "2024-05-03"].iter().enumerate() {
        h.store.save(&report(&format!("r{i}"), day)).await.unwrap();
        assert_eq!(h.engine.run_cycle().await.unwrap(), CycleOutcome::Skipped);
    }
    assert_eq!(h.store.get_pending().await.unwrap().len(), 3);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;
    h.transport.set_endpoint(&padded_url(&server));

    let outcome = h.engine.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Completed { pushed: 3 });
    assert!(h.store.get_pending().await.unwrap().is_empty());

    // Drain order is insertion order.
    let requests = server.received_requests().await.unwrap();
    let bodies: Vec<String> = requests
        .iter()
        .map(|r| String::from_utf8(r.body.clone()).unwrap())
        .collect();
    assert!(bodies[0].contains("\"id\":\"r0\""));
    assert!(bodies[1].contains("\"id\":\"r1\""));
    assert!(bodies[2].contains("\"id\":\"r2\""));

    h.store.close().await.unwrap();
}

// ---- Wire contract ----

#[tokio::test]
async fn pushed_report_carries_the_tagged_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("\"type\":\"report\""))
        .and(body_string_contains("\"operationalDate\":\"2024-05-01\""))
        .and(body_string_contains("\"spotOffers\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&padded_url(&server)).await;
    h.store.save(&report("r1", "2024-05-01")).await.unwrap();
    assert_eq!(
        h.engine.run_cycle().await.unwrap(),
        CycleOutcome::Completed { pushed: 1 }
    );
    h.store.close().await.unwrap();
}

// ---- Partial failure keeps durable progress ----

#[tokio::test]
async fn synced_marks_survive_a_mid_cycle_outage() {
    // A bare (non-pooled) server so that dropping it actually closes the
    // listener; pooled `MockServer::start` keeps the port alive on drop.
    let server = MockServer::builder().start().await;
    // Exactly one successful push, then the server goes away.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&padded_url(&server)).await;
    h.store.save(&report("first", "2024-05-01")).await.unwrap();
    assert_eq!(
        h.engine.run_cycle().await.unwrap(),
        CycleOutcome::Completed { pushed: 1 }
    );

    // Endpoint dies; two more reports queue up.
    drop(server);
    h.store.save(&report("second", "2024-05-02")).await.unwrap();
    h.store.save(&report("third", "2024-05-03")).await.unwrap();

    let outcome = h.engine.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Aborted { pushed: 0 });
    assert!(h.engine.state().has_error());

    let all = h.store.get_all().await.unwrap();
    let first = all.iter().find(|s| s.id == "first").unwrap();
    assert_eq!(first.sync_status, SyncStatus::Synced);
    assert_eq!(h.store.get_pending().await.unwrap().len(), 2);

    h.store.close().await.unwrap();
}

// ---- Roster publish ----

#[tokio::test]
async fn roster_publish_sends_config_update() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("\"type\":\"config_update\""))
        .and(body_string_contains("\"name\":\"CENTRO NORTE\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&padded_url(&server)).await;
    let roster = vec![ServiceCenter::new(
        "Centro Norte",
        vec![Vehicle {
            plate: "ABC1D23".to_string(),
            category: "VUC".to_string(),
        }],
    )];
    h.store.replace_roster(&roster).await.unwrap();
    h.engine.publish_roster(&roster).await.unwrap();

    assert_eq!(h.store.load_roster().await.unwrap(), roster);
    h.store.close().await.unwrap();
}

// ---- Pull refresh ----

#[tokio::test]
async fn pull_refresh_mirrors_the_remote_list() {
    let server = MockServer::start().await;
    let mut remote = report("remote-1", "2024-05-09");
    remote.sync_status = SyncStatus::Synced;
    let body = serde_json::to_string(&vec![remote]).unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let h = harness(&padded_url(&server)).await;
    h.store.save(&report("local-only", "2024-05-01")).await.unwrap();

    let count = h.engine.pull_refresh().await.unwrap();
    assert_eq!(count, 1);

    let all = h.store.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "remote-1");
    assert_eq!(all[0].sync_status, SyncStatus::Synced);

    h.store.close().await.unwrap();
}
