use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    actions: AtomicU64,
    action_errors: AtomicU64,
    jobs: AtomicU64,
    job_errors: AtomicU64,
    suggestion_batches: AtomicU64,
    prezos_assigned: AtomicU64,
}

impl Metrics {
    pub fn record_action(&self, ok: bool) {
        self.actions.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.action_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_job(&self, ok: bool) {
        self.jobs.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.job_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_suggestion_batch(&self) {
        self.suggestion_batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prezo(&self) {
        self.prezos_assigned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let actions = self.actions.load(Ordering::Relaxed);
        let action_errors = self.action_errors.load(Ordering::Relaxed);
        let jobs = self.jobs.load(Ordering::Relaxed);
        let job_errors = self.job_errors.load(Ordering::Relaxed);
        let batches = self.suggestion_batches.load(Ordering::Relaxed);
        let prezos = self.prezos_assigned.load(Ordering::Relaxed);

        format!(
            "# TYPE prezo_actions_total counter\n\
prezo_actions_total {}\n\
# TYPE prezo_action_errors_total counter\n\
prezo_action_errors_total {}\n\
# TYPE prezo_jobs_total counter\n\
prezo_jobs_total {}\n\
# TYPE prezo_job_errors_total counter\n\
prezo_job_errors_total {}\n\
# TYPE prezo_suggestion_batches_total counter\n\
prezo_suggestion_batches_total {}\n\
# TYPE prezo_prezos_assigned_total counter\n\
prezo_prezos_assigned_total {}\n",
            actions, action_errors, jobs, job_errors, batches, prezos
        )
    }
}
