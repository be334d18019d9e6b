use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use backend_domain::{AuditRecord, AuditStep};

use crate::{AppError, AppState};

/// Ordered snapshots collected while an action or a job runs.
#[derive(Debug)]
pub struct AuditTrail {
    function: &'static str,
    steps: Vec<AuditStep>,
}

impl AuditTrail {
    pub fn new(function: &'static str) -> Self {
        Self {
            function,
            steps: Vec::new(),
        }
    }

    pub fn push<T: Serialize + ?Sized>(&mut self, step: &str, dump: &T) {
        let dump = serde_json::to_value(dump)
            .unwrap_or_else(|err| json!({ "unserializable": err.to_string() }));
        self.steps.push(AuditStep {
            step: step.to_string(),
            dump,
        });
    }

    pub fn note(&mut self, step: &str, message: &str) {
        self.steps.push(AuditStep {
            step: step.to_string(),
            dump: Value::String(message.to_string()),
        });
    }

    pub fn record_failure(&mut self, err: &AppError) {
        self.push(
            "Failure",
            &json!({ "kind": err.kind(), "error": err.to_string() }),
        );
    }

    pub fn into_record(self) -> AuditRecord {
        AuditRecord {
            id: Uuid::new_v4(),
            date_created: Utc::now(),
            function: self.function.to_string(),
            steps: self.steps,
        }
    }

    /// Stores the trail. A failed write is logged and otherwise ignored.
    pub async fn finish<T>(mut self, state: &AppState, result: &Result<T, AppError>) {
        if let Err(err) = result {
            self.record_failure(err);
        }
        let record = self.into_record();
        if let Err(err) = state.audit_repo.insert_audit(&record).await {
            warn!("failed to store audit record for {}: {}", record.function, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_keep_their_order() {
        let mut trail = AuditTrail::new("generatePrezo");
        trail.push("Find event", &json!({ "id": 1 }));
        trail.note("Select a random prezo", "c");
        trail.record_failure(&AppError::NoParticipants);
        let record = trail.into_record();

        assert_eq!(record.function, "generatePrezo");
        let names: Vec<&str> = record.steps.iter().map(|step| step.step.as_str()).collect();
        assert_eq!(names, vec!["Find event", "Select a random prezo", "Failure"]);
        assert_eq!(record.steps[1].dump, Value::String("c".to_string()));
        assert_eq!(record.steps[2].dump["kind"], "no_participants");
    }
}
