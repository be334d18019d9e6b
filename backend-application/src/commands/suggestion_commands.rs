use std::collections::HashSet;

use serde_json::json;
use tracing::{error, info, warn};

use backend_domain::{
    rank_event_types, Attendance, EventId, EventType, EventTypeId, Preference, RankingOutcome,
    SuggestionBatch, UserId, EVENT_TYPE_HISTORY, SUGGESTION_COUNT,
};

use crate::{AppError, AppState, AuditTrail};

/// Runs the suggestion ranking for an event.
///
/// Returns `None` when the event already had a batch and `force` is unset.
pub async fn generate_event_type_suggestions(
    state: &AppState,
    id: EventId,
    force: bool,
) -> Result<Option<SuggestionBatch>, AppError> {
    let mut trail = AuditTrail::new("generateEventTypeSuggestions");
    let result = suggest(state, &mut trail, id, force).await;
    if let Err(err) = &result {
        error!("generateEventTypeSuggestions failed for {}: {}", id, err);
    }
    trail.finish(state, &result).await;
    state.metrics.record_action(result.is_ok());
    result
}

async fn suggest(
    state: &AppState,
    trail: &mut AuditTrail,
    id: EventId,
    force: bool,
) -> Result<Option<SuggestionBatch>, AppError> {
    let mut event = state
        .event_repo
        .find_event(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {}", id)))?;
    trail.push("Find event", &event);

    let previous_batch = event.event_type_suggestion;
    if previous_batch.is_some() && !force {
        trail.note("Event already have a suggestion", "Do nothing");
        return Ok(None);
    }

    let presences = state
        .presence_repo
        .fetch_presences(&id, &Attendance::MAYBE_PRESENT)
        .await?;
    if presences.is_empty() {
        return Err(AppError::NoParticipants);
    }
    trail.push("People that will come or maybe come to the event", &presences);

    let users: Vec<UserId> = presences.into_iter().map(|presence| presence.user).collect();
    let preferences = state.preference_repo.fetch_preferences(&users).await?;
    trail.push("Preferences of people coming", &preferences);

    let event_types = state.event_type_repo.list_event_types().await?;

    let recent_events = state
        .event_repo
        .fetch_recent_with_event_type(&id, event.date, EVENT_TYPE_HISTORY)
        .await?;
    let recent: HashSet<EventTypeId> = recent_events
        .iter()
        .filter_map(|item| item.event_type.clone())
        .collect();
    trail.push(
        &format!("Last {} event types", EVENT_TYPE_HISTORY),
        &recent_events
            .iter()
            .map(|item| json!({ "date": item.date, "event_type": item.event_type }))
            .collect::<Vec<_>>(),
    );

    let outcome = rank(&event_types, &preferences, &recent);
    trail.push(
        "Aggregated tables of people ratings of event types",
        &outcome.ratings,
    );
    if outcome.history_ignored {
        warn!(
            "every rated event type of {} was used recently, ignoring the history",
            id
        );
        trail.note(
            "Recent event types cover every rated event type",
            "History ignored",
        );
    }
    trail.push("Candidates after removing the recent event types", &outcome.candidates);
    trail.push("Each average shuffled", &outcome.groups);
    trail.push(&format!("Top {} elements", SUGGESTION_COUNT), &outcome.suggestions);

    if outcome.suggestions.is_empty() {
        return Err(AppError::NoCandidates);
    }

    let batch = SuggestionBatch::new(
        outcome
            .suggestions
            .iter()
            .map(|event_type| event_type.id.clone())
            .collect(),
    );
    state.suggestion_repo.insert_batch(&batch).await?;
    event.event_type_suggestion = Some(batch.id);
    state.event_repo.update_event(&event).await?;
    if let Some(previous) = previous_batch {
        state.suggestion_repo.delete_batch(&previous).await?;
        trail.push("Delete the previous suggestion", &previous);
    }
    trail.push("Store the suggestion", &batch);

    state.metrics.record_suggestion_batch();
    info!(
        "event {} got {} event type suggestions",
        id,
        batch.event_types.len()
    );
    Ok(Some(batch))
}

fn rank(
    event_types: &[EventType],
    preferences: &[Preference],
    recent: &HashSet<EventTypeId>,
) -> RankingOutcome {
    let mut rng = rand::thread_rng();
    rank_event_types(event_types, preferences, recent, SUGGESTION_COUNT, &mut rng)
}
