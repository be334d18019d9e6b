use axum::routing::{get, patch, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{event_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/generateEvent/:date", post(event_handlers::generate_event))
        .route(
            "/:id/generateEventTypeSuggestions",
            patch(event_handlers::generate_event_type_suggestions),
        )
        .route("/:id/generatePrezo", patch(event_handlers::generate_prezo))
        .route("/ops/health/live", get(ops_handlers::health_live))
        .route("/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .route("/ops/audit-logs", get(ops_handlers::list_audit_logs))
        .route("/ops/events/:id", get(ops_handlers::get_event))
        .route("/ops/jobs/:job", post(ops_handlers::run_lifecycle_job))
        .with_state(state)
}
