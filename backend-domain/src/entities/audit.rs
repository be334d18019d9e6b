// Audit record entity
// Step by step snapshot of one action or lifecycle job

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    pub step: String,
    pub dump: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub date_created: DateTime<Utc>,
    pub function: String,
    pub steps: Vec<AuditStep>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub function: Option<String>,
    pub limit: Option<usize>,
}
