use std::sync::Arc;

use backend_domain::ports::{
    AuditLogRepository, EventRepository, EventTypeRepository, HealthCheckService,
    PreferenceRepository, PresenceRepository, SuggestionRepository,
};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_repo: Arc<dyn EventRepository>,
    pub presence_repo: Arc<dyn PresenceRepository>,
    pub preference_repo: Arc<dyn PreferenceRepository>,
    pub event_type_repo: Arc<dyn EventTypeRepository>,
    pub suggestion_repo: Arc<dyn SuggestionRepository>,
    pub audit_repo: Arc<dyn AuditLogRepository>,
    pub health_service: Arc<dyn HealthCheckService>,
    pub metrics: Arc<Metrics>,
}
