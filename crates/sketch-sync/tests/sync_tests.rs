use std::sync::Arc;
use std::time::Duration;

use feature_engine::types::{CadDocument, ExtrudeFeature, ExtrudeOperation};
use sketch_sync::{
    ClientConfig, ConnectionState, HubConfig, LocalTransport, RestApi, RestResponse, RetryConfig,
    SketchUpdate, SyncClient, SyncError, SyncHub,
};
use sketcher_types::SketchEntity;
use tokio::sync::mpsc;
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(2);

/// A document with one body holding an un-rebuilt 4x4x2 block.
fn block_document() -> (CadDocument, Uuid) {
    let mut doc = CadDocument::create_default();
    let sketch = doc.active_sketch_id;
    let corners = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
    let points: Vec<Uuid> = corners
        .iter()
        .map(|&(x, y)| doc.add_entity(sketch, SketchEntity::point(x, y)).unwrap())
        .collect();
    let edges: Vec<Uuid> = (0..4)
        .map(|i| {
            doc.add_entity(sketch, SketchEntity::line(points[i], points[(i + 1) % 4]))
                .unwrap()
        })
        .collect();
    let body = doc.create_body(doc.root_component_id, "Body").unwrap();
    doc.add_extrude(
        body,
        "Block",
        ExtrudeFeature {
            sketch_id: sketch,
            selected_edge_ids: edges,
            height: 2.0,
            operation: ExtrudeOperation::Join,
        },
    )
    .unwrap();
    (doc, body)
}

fn hub() -> Arc<SyncHub> {
    Arc::new(SyncHub::new(HubConfig::default()))
}

fn client(transport: &Arc<LocalTransport>, id: &str) -> SyncClient<LocalTransport> {
    SyncClient::new(Arc::clone(transport), ClientConfig::new().with_client_id(id))
}

/// Forward every delivered update into a channel.
fn collect(client: &SyncClient<LocalTransport>) -> mpsc::UnboundedReceiver<SketchUpdate> {
    let (tx, rx) = mpsc::unbounded_channel();
    client.on_update(move |update| {
        let _ = tx.send(update);
    });
    rx
}

async fn next(rx: &mut mpsc::UnboundedReceiver<SketchUpdate>) -> SketchUpdate {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("update within timeout")
        .expect("channel open")
}

async fn wait_for_state(client: &SyncClient<LocalTransport>, state: ConnectionState) {
    for _ in 0..200 {
        if client.state() == state {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("client never reached {state:?}, still {:?}", client.state());
}

// ── Hub ────────────────────────────────────────────────────────────────────

#[test]
fn hub_rebuilds_before_storing() {
    let hub = hub();
    let (doc, body) = block_document();
    assert!(doc.body(body).unwrap().mesh.is_none());

    let stored = hub.publish(SketchUpdate::new("doc", 1, "a", doc));
    let mesh = stored.document.body(body).unwrap().mesh.as_ref().unwrap();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(hub.get_current("doc").unwrap(), stored);
}

#[test]
fn last_write_wins_not_highest_revision() {
    let hub = hub();
    let (doc, _) = block_document();

    // Revision 6 reaches the hub first, revision 5 second.
    hub.publish(SketchUpdate::new("doc", 6, "b", doc.clone()));
    let last = hub.publish(SketchUpdate::new("doc", 5, "a", doc));

    let current = hub.get_current("doc").unwrap();
    assert_eq!(current, last);
    assert_eq!(current.revision, 5);
    assert_eq!(current.source_client_id, "a");
}

#[test]
fn unknown_document_is_absent() {
    assert!(hub().get_current("never").is_none());
}

#[tokio::test]
async fn hub_broadcasts_stored_update_to_subscribers() {
    let hub = hub();
    let mut rx = hub.subscribe();
    let (doc, body) = block_document();
    hub.publish(SketchUpdate::new("doc", 1, "a", doc));

    let received = rx.recv().await.unwrap();
    assert!(received.document.body(body).unwrap().mesh.is_some());
}

#[test]
fn concurrent_publishes_broadcast_in_store_order() {
    for round in 0..300 {
        let hub = hub();
        let mut rx = hub.subscribe();
        let publishers: Vec<_> = (0..4)
            .map(|i| {
                let hub = Arc::clone(&hub);
                std::thread::spawn(move || {
                    hub.publish(SketchUpdate::new("doc", 1, format!("c{i}"), CadDocument::create_default()));
                })
            })
            .collect();
        for publisher in publishers {
            publisher.join().unwrap();
        }

        let mut last = None;
        while let Ok(update) = rx.try_recv() {
            last = Some(update.source_client_id);
        }
        let stored = hub.get_current("doc").unwrap().source_client_id;
        assert_eq!(last.as_deref(), Some(stored.as_str()), "round {round}");
    }
}

// ── REST ───────────────────────────────────────────────────────────────────

#[test]
fn rest_get_missing_is_404() {
    let api = RestApi::new(hub());
    let response = api.get("nope");
    assert_eq!(response.status, RestResponse::NOT_FOUND);
    assert!(response.body.is_none());
}

#[test]
fn rest_put_forces_path_id_and_rebuilds() {
    let hub = hub();
    let api = RestApi::new(Arc::clone(&hub));
    let (doc, body) = block_document();

    let response = api.put("path-id", SketchUpdate::new("body-id", 2, "cli", doc));
    assert!(response.is_success());
    assert!(hub.get_current("body-id").is_none());

    let fetched = api.get("path-id");
    assert_eq!(fetched.status, RestResponse::OK);
    let update = SketchUpdate::from_json(&fetched.body.unwrap()).unwrap();
    assert_eq!(update.document_id, "path-id");
    assert!(update.document.body(body).unwrap().mesh.is_some());
}

#[test]
fn rest_put_json_rejects_garbage() {
    let api = RestApi::new(hub());
    let response = api.put_json("doc", "{ nope");
    assert_eq!(response.status, RestResponse::BAD_REQUEST);
}

// ── Client ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn peers_receive_updates_and_own_echo_is_ignored() {
    let transport = Arc::new(LocalTransport::new(hub()));
    let alice = client(&transport, "alice");
    let bob = client(&transport, "bob");
    let mut alice_rx = collect(&alice);
    let mut bob_rx = collect(&bob);
    alice.connect().await.unwrap();
    bob.connect().await.unwrap();

    let (doc, body) = block_document();
    let sent = alice.publish("doc", doc.clone()).await.unwrap();
    assert_eq!(sent.revision, 1);
    assert_eq!(sent.source_client_id, "alice");
    assert_eq!(alice.revision(), 1);

    let received = next(&mut bob_rx).await;
    assert_eq!(received.source_client_id, "alice");
    assert!(received.document.body(body).unwrap().mesh.is_some());
    assert_eq!(bob.revision(), 1);

    // Alice's first delivery must be Bob's reply, not her own echo.
    bob.publish("doc", received.document).await.unwrap();
    let reply = next(&mut alice_rx).await;
    assert_eq!(reply.source_client_id, "bob");
    assert_eq!(reply.revision, 2);
    assert_eq!(alice.revision(), 2);
}

#[tokio::test]
async fn publish_stamps_own_client_id() {
    let hub = hub();
    let transport = Arc::new(LocalTransport::new(Arc::clone(&hub)));
    let alice = client(&transport, "alice");
    alice.connect().await.unwrap();

    let forged = SketchUpdate::new("doc", 9, "mallory", CadDocument::create_default());
    let sent = alice.publish_update(forged).await.unwrap();
    assert_eq!(sent.source_client_id, "alice");
    assert_eq!(hub.get_current("doc").unwrap().source_client_id, "alice");
    assert_eq!(alice.revision(), 9);
}

#[tokio::test]
async fn publish_while_disconnected_is_unavailable() {
    let hub = hub();
    let transport = Arc::new(LocalTransport::new(Arc::clone(&hub)));
    let alice = client(&transport, "alice");

    let err = alice
        .publish("doc", CadDocument::create_default())
        .await
        .unwrap_err();
    assert!(err.is_transport_unavailable());
    assert_eq!(alice.revision(), 0);
    assert!(hub.store().is_empty());
}

#[tokio::test]
async fn connect_fails_when_link_is_down() {
    let transport = Arc::new(LocalTransport::new(hub()));
    transport.set_available(false);
    let alice = client(&transport, "alice");

    assert!(!alice.try_connect().await);
    assert_eq!(alice.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn link_drop_is_reported_as_lost() {
    let transport = Arc::new(LocalTransport::new(hub()));
    let alice = client(&transport, "alice");
    alice.connect().await.unwrap();
    assert_eq!(alice.state(), ConnectionState::Connected);

    transport.set_available(false);
    wait_for_state(&alice, ConnectionState::Lost).await;

    let err = alice
        .publish("doc", CadDocument::create_default())
        .await
        .unwrap_err();
    assert!(err.is_transport_unavailable());

    transport.set_available(true);
    alice.connect().await.unwrap();
    assert!(alice.is_connected());
}

#[tokio::test]
async fn pull_reports_not_found() {
    let transport = Arc::new(LocalTransport::new(hub()));
    let alice = client(&transport, "alice");
    let err = alice.get_current("missing").await.unwrap_err();
    assert_eq!(
        err,
        SyncError::NotFound {
            document_id: "missing".to_string()
        }
    );
}

#[tokio::test]
async fn pull_returns_latest_snapshot() {
    let hub = hub();
    hub.publish(SketchUpdate::new("doc", 4, "x", CadDocument::create_default()));
    let transport = Arc::new(LocalTransport::new(hub));
    let alice = client(&transport, "alice");
    assert_eq!(alice.get_current("doc").await.unwrap().revision, 4);
}

// ── Cancellation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn slow_connect_times_out_and_leaves_client_disconnected() {
    let hub = hub();
    let transport = Arc::new(LocalTransport::new(Arc::clone(&hub)).with_latency(Duration::from_millis(500)));
    let config = ClientConfig::new().with_connect_timeout(Duration::from_millis(20));
    let alice = SyncClient::new(Arc::clone(&transport), config);

    let err = alice.connect().await.unwrap_err();
    assert_eq!(err, SyncError::Cancelled { operation: "connect" });
    assert_eq!(alice.state(), ConnectionState::Disconnected);
    assert_eq!(hub.subscriber_count(), 0);

    transport.set_latency(Duration::ZERO);
    alice.connect().await.unwrap();
    assert!(alice.is_connected());
}

#[tokio::test]
async fn dropping_a_connect_future_has_no_effect() {
    let transport = Arc::new(LocalTransport::new(hub()).with_latency(Duration::from_millis(500)));
    let alice = client(&transport, "alice");

    let outcome = tokio::time::timeout(Duration::from_millis(10), alice.connect()).await;
    assert!(outcome.is_err());
    assert_eq!(alice.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn slow_publish_times_out_without_sending() {
    let hub = hub();
    let transport = Arc::new(LocalTransport::new(Arc::clone(&hub)));
    let config = ClientConfig::new().with_publish_timeout(Duration::from_millis(20));
    let alice = SyncClient::new(Arc::clone(&transport), config);
    alice.connect().await.unwrap();

    transport.set_latency(Duration::from_millis(500));
    let err = alice
        .publish("doc", CadDocument::create_default())
        .await
        .unwrap_err();
    assert_eq!(err, SyncError::Cancelled { operation: "publish" });
    assert!(hub.store().is_empty());
    assert_eq!(alice.revision(), 0);
    assert!(alice.is_connected());
}

#[tokio::test]
async fn retry_connects_once_link_returns() {
    let transport = Arc::new(LocalTransport::new(hub()));
    transport.set_available(false);
    let alice = client(&transport, "alice");

    let restore = Arc::clone(&transport);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        restore.set_available(true);
    });

    let retry = RetryConfig::new(10)
        .with_initial_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_millis(50));
    alice.connect_with_retry(&retry).await.unwrap();
    assert!(alice.is_connected());
}

#[tokio::test]
async fn retry_gives_up_after_max_attempts() {
    let transport = Arc::new(LocalTransport::new(hub()));
    transport.set_available(false);
    let alice = client(&transport, "alice");

    let retry = RetryConfig::new(2).with_initial_delay(Duration::from_millis(1));
    let err = alice.connect_with_retry(&retry).await.unwrap_err();
    assert!(err.is_transport_unavailable());
}
