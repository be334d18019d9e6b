pub mod clickhouse_repo;
pub mod clickhouse_rows;
pub mod memory_store;
pub mod seed_files;

use std::sync::Arc;

use backend_application::{AppState, Metrics};
use backend_domain::{
    AuditLogRepository, EventRepository, EventTypeRepository, PreferenceRepository,
    PresenceRepository, RuntimeConfig, SuggestionRepository,
};

pub use clickhouse_repo::ClickhouseRepo;
pub use memory_store::{MemoryStore, StoreSnapshot};
pub use seed_files::load_memory_store;

use crate::services::DefaultHealthService;

/// Wires one store behind every repository port of the application state.
pub fn build_state<S>(config: RuntimeConfig, store: Arc<S>) -> AppState
where
    S: EventRepository
        + PresenceRepository
        + PreferenceRepository
        + EventTypeRepository
        + SuggestionRepository
        + AuditLogRepository
        + 'static,
{
    let event_repo: Arc<dyn EventRepository> = store.clone();
    AppState {
        config,
        health_service: Arc::new(DefaultHealthService::new(event_repo.clone())),
        event_repo,
        presence_repo: store.clone(),
        preference_repo: store.clone(),
        event_type_repo: store.clone(),
        suggestion_repo: store.clone(),
        audit_repo: store,
        metrics: Arc::new(Metrics::default()),
    }
}
