use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use tracing::{error, info};

use backend_application::commands::lifecycle_commands::run_job;
use backend_application::commands::LifecycleJob;
use backend_application::AppState;

/// Drives the weekly lifecycle on the local clock until the task is dropped.
pub async fn schedule_lifecycle(state: AppState) {
    loop {
        let now = Local::now();
        let (at, job) = next_run(now.naive_local());
        info!("next lifecycle job {} at {}", job.as_str(), at);
        let wait = wait_until(&now, at);
        tokio::time::sleep(wait).await;

        // Failures are already logged and audited by the job itself.
        if let Err(err) = run_job(&state, job, at.date()).await {
            error!("scheduled job {} failed: {}", job.as_str(), err);
        }
    }
}

/// Real time left until the wall-clock `at`, so a DST change in between
/// does not shift the job. A slot inside a skipped hour runs an hour later.
pub fn wait_until<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveDateTime) -> std::time::Duration {
    let tz = now.timezone();
    let target = tz
        .from_local_datetime(&at)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(at + Duration::hours(1))).earliest());
    match target {
        Some(target) => target
            .signed_duration_since(now.clone())
            .to_std()
            .unwrap_or_default(),
        None => std::time::Duration::ZERO,
    }
}

/// The first slot strictly after `now`. Ties between slots at the same
/// instant go to the job listed first.
pub fn next_run(now: NaiveDateTime) -> (NaiveDateTime, LifecycleJob) {
    let mut best: Option<(NaiveDateTime, LifecycleJob)> = None;
    for job in LifecycleJob::ALL {
        let at = next_occurrence(now, job);
        if best.map_or(true, |(current, _)| at < current) {
            best = Some((at, job));
        }
    }
    match best {
        Some(found) => found,
        None => (now + Duration::weeks(1), LifecycleJob::CreateEvent),
    }
}

fn next_occurrence(now: NaiveDateTime, job: LifecycleJob) -> NaiveDateTime {
    let slot = job.slot();
    let time = NaiveTime::from_hms_opt(slot.hour, slot.minute, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date().weekday().num_days_from_monday() as i64;
    let target = slot.weekday.num_days_from_monday() as i64;
    let days = (target - today).rem_euclid(7);
    let candidate = (now.date() + Duration::days(days)).and_time(time);
    if candidate <= now {
        candidate + Duration::weeks(1)
    } else {
        candidate
    }
}
