//! Moves driven end to end against a mocked board service.

use kanban_api::HttpKanbanApi;
use kanban_board::{BoardSync, BoardView, MoveStatus, Notice, RecordingNotifier};
use kanban_domain::{CardStatus, Location, MoveIntent, MoveRules};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOARD: i64 = 1;

fn card(id: i64, column: i64, title: &str, order: i32, status: &str) -> Value {
    json!({
        "id": id,
        "column": column,
        "title": title,
        "delivery_date": "10/04/2025",
        "status": status,
        "assignee": null,
        "assignee_email": null,
        "created_at": "2025-03-01T12:00:00Z",
        "order": order
    })
}

fn two_columns(second_name: &str) -> Value {
    json!([
        {"id": 10, "board": BOARD, "name": "A", "order": 1, "cards": [
            card(100, 10, "X", 1, "pending"),
            card(101, 10, "Y", 2, "on_time")
        ]},
        {"id": 20, "board": BOARD, "name": second_name, "order": 2, "cards": []}
    ])
}

async fn mount_columns(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/columns/"))
        .and(query_param("board", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn open_board(
    server: &MockServer,
) -> (BoardSync<HttpKanbanApi>, Arc<RecordingNotifier>) {
    let api = HttpKanbanApi::new(server.uri(), Duration::from_secs(5))
        .unwrap()
        .with_token("Token", "secret");
    let notifier = Arc::new(RecordingNotifier::new());
    let mut sync = BoardSync::new(Arc::new(api), notifier.clone(), MoveRules::default());
    sync.load_board(BOARD).await.unwrap();
    (sync, notifier)
}

fn card_ids(sync: &BoardSync<HttpKanbanApi>, column: i64) -> Vec<i64> {
    sync.snapshot()
        .unwrap()
        .column(column)
        .unwrap()
        .cards
        .iter()
        .map(|c| c.id)
        .collect()
}

#[tokio::test]
async fn test_card_into_production_is_marked_done() {
    let server = MockServer::start().await;
    mount_columns(&server, two_columns("Producao")).await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/cards/100/"))
        .and(header("authorization", "Token secret"))
        .and(body_json(json!({"column": 20, "order": 1, "status": "done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut sync, notifier) = open_board(&server).await;
    let intent = MoveIntent::card(100, Location::new(10, 0), Location::new(20, 0));
    let report = sync.perform_move(intent).await.unwrap();

    assert_eq!(report.status, MoveStatus::RemoteOk);
    assert_eq!(card_ids(&sync, 10), vec![101]);
    assert_eq!(card_ids(&sync, 20), vec![100]);
    let moved = sync.snapshot().unwrap().card(100).unwrap();
    assert_eq!(moved.column, 20);
    assert_eq!(moved.order, 1);
    assert_eq!(moved.status, CardStatus::Done);
    assert_eq!(notifier.notices(), vec![Notice::StatusUpdated]);
}

#[tokio::test]
async fn test_card_into_ordinary_column_keeps_status() {
    let server = MockServer::start().await;
    mount_columns(&server, two_columns("Review")).await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/cards/100/"))
        .and(body_json(json!({"column": 20, "order": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut sync, notifier) = open_board(&server).await;
    let intent = MoveIntent::card(100, Location::new(10, 0), Location::new(20, 0));
    sync.perform_move(intent).await.unwrap();

    assert_eq!(
        sync.snapshot().unwrap().card(100).unwrap().status,
        CardStatus::Pending
    );
    assert_eq!(notifier.notices(), vec![Notice::CardMoved]);
}

#[tokio::test]
async fn test_dropping_in_place_sends_nothing() {
    let server = MockServer::start().await;
    mount_columns(&server, two_columns("B")).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (mut sync, notifier) = open_board(&server).await;
    let before = sync.snapshot().cloned();
    let intent = MoveIntent::card(101, Location::new(10, 1), Location::new(10, 1));

    assert!(sync.perform_move(intent).await.is_none());
    assert_eq!(sync.snapshot().cloned(), before);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_exhausted_gap_patches_every_sibling_then_resyncs() {
    let server = MockServer::start().await;
    let columns = json!([
        {"id": 10, "board": BOARD, "name": "A", "order": 1, "cards": [
            card(1, 10, "a", 1, "pending")
        ]},
        {"id": 20, "board": BOARD, "name": "B", "order": 2, "cards": [
            card(2, 20, "b", 2, "pending"),
            card(3, 20, "c", 3, "pending")
        ]}
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/columns/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(columns))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/cards/1/"))
        .and(body_json(json!({"column": 20, "order": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/cards/2/"))
        .and(body_json(json!({"order": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/cards/3/"))
        .and(body_json(json!({"order": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut sync, _notifier) = open_board(&server).await;
    let intent = MoveIntent::card(1, Location::new(10, 0), Location::new(20, 1));
    let report = sync.perform_move(intent).await.unwrap();

    assert!(report.is_ok());
    assert!(report.effects.renumbered);
    assert!(!sync.resync_requested());
}

#[tokio::test]
async fn test_rejected_move_restores_previous_board() {
    let server = MockServer::start().await;
    mount_columns(&server, two_columns("B")).await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/cards/100/"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"detail": "You do not have permission."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (mut sync, notifier) = open_board(&server).await;
    let before = sync.snapshot().cloned();
    let intent = MoveIntent::card(100, Location::new(10, 0), Location::new(20, 0));
    let report = sync.perform_move(intent).await.unwrap();

    assert_eq!(report.status, MoveStatus::RemoteFailed);
    assert_eq!(sync.snapshot().cloned(), before);
    assert_eq!(
        notifier.notices(),
        vec![Notice::CardMoveFailed("You do not have permission.".into())]
    );
}

#[tokio::test]
async fn test_column_move_patches_order_only() {
    let server = MockServer::start().await;
    mount_columns(&server, two_columns("B")).await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/columns/10/"))
        .and(body_json(json!({"order": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut sync, notifier) = open_board(&server).await;
    sync.perform_move(MoveIntent::column(10, BOARD, 0, 1))
        .await
        .unwrap();

    let ids: Vec<i64> = sync.snapshot().unwrap().columns.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![20, 10]);
    assert_eq!(notifier.notices(), vec![Notice::ColumnMoved]);
}

#[tokio::test]
async fn test_failed_load_shows_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/columns/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = HttpKanbanApi::new(server.uri(), Duration::from_secs(5)).unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let mut sync = BoardSync::new(Arc::new(api), notifier.clone(), MoveRules::default());

    assert!(sync.load_board(BOARD).await.is_err());
    assert_eq!(sync.view(), &BoardView::Failed);
    assert!(notifier.has_errors());
}
