use chrono::{Duration, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use backend_domain::{Event, EventStatus, EventTypeId};

use crate::commands::event_commands::create_event;
use crate::commands::{prezo_commands, suggestion_commands};
use crate::{AppError, AppState, AuditTrail};

/// Weekly lifecycle transitions. The event takes place on Wednesday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleJob {
    CreateEvent,
    OpenEnlist,
    SuggestEventTypes,
    AssignPrezo,
    StartEvent,
    FinishEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySlot {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl LifecycleJob {
    pub const ALL: [LifecycleJob; 6] = [
        LifecycleJob::CreateEvent,
        LifecycleJob::OpenEnlist,
        LifecycleJob::SuggestEventTypes,
        LifecycleJob::AssignPrezo,
        LifecycleJob::StartEvent,
        LifecycleJob::FinishEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleJob::CreateEvent => "create_event",
            LifecycleJob::OpenEnlist => "open_enlist",
            LifecycleJob::SuggestEventTypes => "suggest_event_types",
            LifecycleJob::AssignPrezo => "assign_prezo",
            LifecycleJob::StartEvent => "start_event",
            LifecycleJob::FinishEvent => "finish_event",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|job| job.as_str() == wanted)
    }

    pub fn slot(&self) -> WeeklySlot {
        let (weekday, hour) = match self {
            LifecycleJob::CreateEvent => (Weekday::Sun, 0),
            LifecycleJob::OpenEnlist => (Weekday::Mon, 0),
            LifecycleJob::SuggestEventTypes => (Weekday::Tue, 0),
            LifecycleJob::AssignPrezo => (Weekday::Tue, 12),
            LifecycleJob::StartEvent => (Weekday::Wed, 12),
            LifecycleJob::FinishEvent => (Weekday::Wed, 14),
        };
        WeeklySlot {
            weekday,
            hour,
            minute: 0,
        }
    }

    /// Distance between the day the job runs and the day of the event.
    pub fn days_ahead(&self) -> i64 {
        match self {
            LifecycleJob::CreateEvent => 3,
            LifecycleJob::OpenEnlist => 2,
            LifecycleJob::SuggestEventTypes | LifecycleJob::AssignPrezo => 1,
            LifecycleJob::StartEvent | LifecycleJob::FinishEvent => 0,
        }
    }

    pub fn target_status(&self) -> EventStatus {
        match self {
            LifecycleJob::CreateEvent => EventStatus::Draft,
            LifecycleJob::OpenEnlist => EventStatus::Enlist,
            LifecycleJob::SuggestEventTypes => EventStatus::EventTypeTriage,
            LifecycleJob::AssignPrezo => EventStatus::PlaceTriage,
            LifecycleJob::StartEvent => EventStatus::Running,
            LifecycleJob::FinishEvent => EventStatus::Finished,
        }
    }
}

/// Runs one lifecycle job as if the current day were `today`.
pub async fn run_job(
    state: &AppState,
    job: LifecycleJob,
    today: NaiveDate,
) -> Result<Event, AppError> {
    info!("lifecycle job {} running", job.as_str());
    let mut trail = AuditTrail::new(job.as_str());
    let result = execute(state, &mut trail, job, today).await;
    match &result {
        Ok(event) => info!(
            "lifecycle job {} done, event {} is {}",
            job.as_str(),
            event.id,
            event.status.as_str()
        ),
        Err(err) => error!("lifecycle job {} failed: {}", job.as_str(), err),
    }
    trail.finish(state, &result).await;
    state.metrics.record_job(result.is_ok());
    result
}

async fn execute(
    state: &AppState,
    trail: &mut AuditTrail,
    job: LifecycleJob,
    today: NaiveDate,
) -> Result<Event, AppError> {
    let date = today + Duration::days(job.days_ahead());
    trail.push("Target date", &date);

    if job == LifecycleJob::CreateEvent {
        return create_event(state, trail, date, EventStatus::Draft).await;
    }

    let event = find_event_by_date(state, date).await?;
    trail.push("Find event", &event);
    if Some(event.status) != job.target_status().previous() {
        warn!(
            "event {} is {} before {}",
            event.id,
            event.status.as_str(),
            job.as_str()
        );
    }

    match job {
        LifecycleJob::SuggestEventTypes => {
            suggestion_commands::generate_event_type_suggestions(state, event.id, false).await?;
        }
        LifecycleJob::AssignPrezo => {
            prezo_commands::generate_prezo(state, event.id).await?;
        }
        _ => {}
    }

    // The actions above rewrite the event, so start again from the stored row.
    let mut event = state
        .event_repo
        .find_event(&event.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {}", event.id)))?;

    if job == LifecycleJob::AssignPrezo {
        let event_type = pick_event_type(state, &event).await?;
        if event_type.is_none() {
            warn!("event {} has no suggestion to pick an event type from", event.id);
        }
        trail.push("Pick a random event type in the suggestion", &event_type);
        event.event_type = event_type;
    }

    event.status = job.target_status();
    state.event_repo.update_event(&event).await?;
    trail.push("Update the event", &event);
    Ok(event)
}

async fn find_event_by_date(state: &AppState, date: NaiveDate) -> Result<Event, AppError> {
    state
        .event_repo
        .find_event_by_date(date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no event on {}", date)))
}

async fn pick_event_type(
    state: &AppState,
    event: &Event,
) -> Result<Option<EventTypeId>, AppError> {
    let Some(batch_id) = event.event_type_suggestion else {
        return Ok(None);
    };
    let batch = state.suggestion_repo.find_batch(&batch_id).await?;
    Ok(batch.and_then(|batch| choose(&batch.event_types)))
}

fn choose(event_types: &[EventTypeId]) -> Option<EventTypeId> {
    let mut rng = rand::thread_rng();
    event_types.choose(&mut rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_job_targets_the_wednesday_event() {
        for job in LifecycleJob::ALL {
            let slot = job.slot();
            let run_day = slot.weekday.num_days_from_monday() as i64;
            let event_day = (run_day + job.days_ahead()) % 7;
            assert_eq!(event_day, Weekday::Wed.num_days_from_monday() as i64, "{job:?}");
        }
    }

    #[test]
    fn jobs_follow_the_status_chain() {
        let mut previous = None;
        for job in LifecycleJob::ALL {
            assert_eq!(job.target_status().previous(), previous);
            previous = Some(job.target_status());
        }
    }

    #[test]
    fn parse_round_trips_names() {
        for job in LifecycleJob::ALL {
            assert_eq!(LifecycleJob::parse(job.as_str()), Some(job));
        }
        assert_eq!(LifecycleJob::parse(" Assign_Prezo "), Some(LifecycleJob::AssignPrezo));
        assert_eq!(LifecycleJob::parse("reload"), None);
    }
}
