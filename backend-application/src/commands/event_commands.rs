use chrono::NaiveDate;
use tracing::{error, info, warn};

use backend_domain::{parse_date, Event, EventStatus};

use crate::{AppError, AppState, AuditTrail};

/// Creates an event open for enlisting on the given ISO date.
///
/// A date that does not parse is rejected before anything is written,
/// audit log included.
pub async fn generate_event(state: &AppState, raw_date: &str) -> Result<Event, AppError> {
    let date = match parse_date(raw_date) {
        Ok(date) => date,
        Err(err) => {
            error!("generateEvent rejected '{}': {}", raw_date, err);
            state.metrics.record_action(false);
            return Err(AppError::InvalidInput(err.to_string()));
        }
    };

    let mut trail = AuditTrail::new("generateEvent");
    let result = create_event(state, &mut trail, date, EventStatus::Enlist).await;
    if let Err(err) = &result {
        error!("generateEvent failed for {}: {}", date, err);
    }
    trail.finish(state, &result).await;
    state.metrics.record_action(result.is_ok());
    result
}

pub(crate) async fn create_event(
    state: &AppState,
    trail: &mut AuditTrail,
    date: NaiveDate,
    status: EventStatus,
) -> Result<Event, AppError> {
    if let Some(existing) = state.event_repo.find_event_by_date(date).await? {
        warn!("event {} already scheduled on {}", existing.id, date);
        trail.push("Event already exists on this date", &existing);
        return Ok(existing);
    }

    let event = Event::new(date, status);
    state.event_repo.insert_event(&event).await?;
    trail.push("Create the event", &event);
    info!("event {} created on {} as {}", event.id, date, status.as_str());
    Ok(event)
}
