use crate::{AppError, AppState};
use backend_domain::{Event, EventId};

pub async fn get_event(state: &AppState, id: EventId) -> Result<Event, AppError> {
    state
        .event_repo
        .find_event(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {}", id)))
}
