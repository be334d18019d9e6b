use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use backend_application::AppState;
use backend_domain::{
    Attendance, Event, EventId, EventRepository, EventStatus, EventType, EventTypeId,
    HealthCheckService, Preference, Presence, RuntimeConfig, SuggestionBatchId, UserId,
};
use backend_infrastructure::{build_state, MemoryStore};
use backend_interfaces_http::build_router;

struct DownHealth;

#[async_trait]
impl HealthCheckService for DownHealth {
    async fn check_database(&self) -> anyhow::Result<bool> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

fn setup() -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    let state = build_state(RuntimeConfig::default(), store.clone());
    (store, state)
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec();
    (status, body)
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

#[tokio::test]
async fn generate_event_answers_success() {
    let (store, state) = setup();
    let (status, body) = send(build_router(state), Method::POST, "/generateEvent/2022-01-19").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"success");
    let events = store.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, EventStatus::Enlist);
}

#[tokio::test]
async fn bad_date_is_a_500_with_its_kind() {
    let (store, state) = setup();
    let (status, body) = send(build_router(state), Method::POST, "/generateEvent/not-a-date").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["kind"], "invalid_input");
    assert!(store.events().await.is_empty());
}

#[tokio::test]
async fn missing_event_is_a_500_for_actions() {
    let (_, state) = setup();
    let uri = format!("/{}/generatePrezo", EventId::new());
    let (status, body) = send(build_router(state), Method::PATCH, &uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["kind"], "not_found");

    let (status, body) = send(
        build_router(setup().1),
        Method::PATCH,
        "/42/generateEventTypeSuggestions",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["kind"], "invalid_input");
}

#[tokio::test]
async fn suggestions_and_prezo_go_through_the_router() {
    let (store, state) = setup();
    let event = Event::new(
        chrono::NaiveDate::from_ymd_opt(2022, 1, 19).expect("date"),
        EventStatus::Enlist,
    );
    store.insert_event(&event).await.expect("insert");
    store
        .put_event_type(EventType {
            id: EventTypeId::from("bowling"),
            name: "Bowling".to_string(),
        })
        .await;
    store
        .put_presence(Presence {
            event: event.id,
            user: UserId::from("u1"),
            presence: Attendance::Present,
        })
        .await;
    store
        .put_preference(Preference {
            user: UserId::from("u1"),
            event_type: EventTypeId::from("bowling"),
            rating: 5,
        })
        .await;

    let app = build_router(state);
    let uri = format!("/{}/generateEventTypeSuggestions?force=true", event.id);
    let (status, body) = send(app.clone(), Method::PATCH, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"success");

    let uri = format!("/{}/generatePrezo", event.id);
    let (status, _) = send(app.clone(), Method::PATCH, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/ops/events/{}", event.id);
    let (status, body) = send(app, Method::GET, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let stored = json(&body);
    assert_eq!(stored["prezo"], "u1");
    assert!(stored["event_type_suggestion"].is_string());
}

#[tokio::test]
async fn ops_routes_report_status() {
    let (_, state) = setup();
    let app = build_router(state.clone());

    let (status, _) = send(app.clone(), Method::GET, "/ops/health/live").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app.clone(), Method::GET, "/ops/health/ready").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app.clone(), Method::GET, "/ops/events/not-an-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["kind"], "invalid_input");

    let uri = format!("/ops/events/{}", EventId::new());
    let (status, _) = send(app.clone(), Method::GET, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app.clone(), Method::POST, "/ops/jobs/reload").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let down = AppState {
        health_service: Arc::new(DownHealth),
        ..state
    };
    let (status, _) = send(build_router(down), Method::GET, "/ops/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn audit_logs_and_metrics_follow_actions() {
    let (_, state) = setup();
    let app = build_router(state);
    send(app.clone(), Method::POST, "/generateEvent/2022-01-19").await;
    send(app.clone(), Method::POST, "/generateEvent/nope").await;

    let (status, body) = send(app.clone(), Method::GET, "/ops/audit-logs?function=generateEvent&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    let records = json(&body);
    // The rejected date never reaches the store, not even the audit log.
    assert_eq!(records.as_array().map(Vec::len), Some(1));

    let (status, body) = send(app, Method::GET, "/ops/metrics/prometheus").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).expect("utf8");
    assert!(text.contains("prezo_actions_total 2"));
    assert!(text.contains("prezo_action_errors_total 1"));
}

async fn rated_event(store: &MemoryStore) -> Event {
    let event = Event::new(
        chrono::NaiveDate::from_ymd_opt(2022, 1, 26).expect("date"),
        EventStatus::Enlist,
    );
    store.insert_event(&event).await.expect("insert");
    store
        .put_event_type(EventType {
            id: EventTypeId::from("cinema"),
            name: "Cinema".to_string(),
        })
        .await;
    store
        .put_presence(Presence {
            event: event.id,
            user: UserId::from("u1"),
            presence: Attendance::Present,
        })
        .await;
    store
        .put_preference(Preference {
            user: UserId::from("u1"),
            event_type: EventTypeId::from("cinema"),
            rating: 4,
        })
        .await;
    event
}

async fn current_batch(store: &MemoryStore, id: EventId) -> Option<SuggestionBatchId> {
    store
        .find_event(&id)
        .await
        .expect("find")
        .expect("event")
        .event_type_suggestion
}

#[tokio::test]
async fn any_force_value_but_false_replaces_the_batch() {
    let (store, state) = setup();
    let event = rated_event(&store).await;
    let app = build_router(state);

    let uri = format!("/{}/generateEventTypeSuggestions", event.id);
    let (status, _) = send(app.clone(), Method::PATCH, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let mut batch = current_batch(&store, event.id).await;
    assert!(batch.is_some());

    for (query, replaces) in [("force", true), ("force=1", true), ("force=false", false)] {
        let uri = format!("/{}/generateEventTypeSuggestions?{}", event.id, query);
        let (status, body) = send(app.clone(), Method::PATCH, &uri).await;
        assert_eq!(status, StatusCode::OK, "{query}");
        assert_eq!(body, b"success");
        let next = current_batch(&store, event.id).await;
        assert_eq!(next != batch, replaces, "{query}");
        batch = next;
    }
    assert_eq!(store.batch_count().await, 1);
}
