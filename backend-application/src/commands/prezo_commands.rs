use serde_json::json;
use tracing::{error, info, warn};

use backend_domain::{
    select_prezo, Attendance, EventId, RotationOutcome, UserId, PREZO_HISTORY,
};

use crate::{AppError, AppState, AuditTrail};

/// Picks the prezo of an event, avoiding the prezos of the last events.
pub async fn generate_prezo(state: &AppState, id: EventId) -> Result<UserId, AppError> {
    let mut trail = AuditTrail::new("generatePrezo");
    let result = pick_prezo(state, &mut trail, id).await;
    if let Err(err) = &result {
        error!("generatePrezo failed for {}: {}", id, err);
    }
    trail.finish(state, &result).await;
    state.metrics.record_action(result.is_ok());
    result
}

async fn pick_prezo(
    state: &AppState,
    trail: &mut AuditTrail,
    id: EventId,
) -> Result<UserId, AppError> {
    let mut event = state
        .event_repo
        .find_event(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {}", id)))?;
    trail.push("Find event", &event);

    let recent_events = state
        .event_repo
        .fetch_recent_by_date(&id, event.date, PREZO_HISTORY)
        .await?;
    let recent: Vec<UserId> = recent_events
        .iter()
        .filter_map(|item| item.prezo.clone())
        .collect();
    trail.push(
        &format!("Find {} last prezos in the database", PREZO_HISTORY),
        &recent_events
            .iter()
            .map(|item| json!({ "date": item.date, "prezo": item.prezo }))
            .collect::<Vec<_>>(),
    );

    let present: Vec<UserId> = state
        .presence_repo
        .fetch_presences(&id, &[Attendance::Present])
        .await?
        .into_iter()
        .map(|presence| presence.user)
        .collect();
    trail.push(
        "Get all potential prezos (people that will come to the event)",
        &present,
    );

    let outcome = select(&present, &recent);
    trail.push("Remove old prezos from potential list", &outcome.eligible);
    let Some(prezo) = outcome.chosen else {
        return Err(AppError::NoParticipants);
    };
    if outcome.fallback {
        warn!(
            "everybody present at {} was a recent prezo, picking among all of them",
            id
        );
        trail.push(
            "Select a random prezo in presences as there is nobody left",
            &prezo,
        );
    } else {
        trail.push("Select a random prezo in the remaining list", &prezo);
    }

    event.prezo = Some(prezo.clone());
    state.event_repo.update_event(&event).await?;
    state.metrics.record_prezo();
    info!("event {} prezo is {}", id, prezo);
    Ok(prezo)
}

fn select(present: &[UserId], recent: &[UserId]) -> RotationOutcome {
    let mut rng = rand::thread_rng();
    select_prezo(present, recent, &mut rng)
}
