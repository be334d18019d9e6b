use anyhow::{anyhow, Result};
use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use backend_domain::{
    Attendance, AuditRecord, Event, EventId, EventStatus, EventType, EventTypeId, Preference,
    Presence, SuggestionBatchId, UserId,
};

use crate::utils::{from_ch_date, from_ch_datetime, to_ch_date, to_ch_datetime};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct EventRow {
    pub id: String,
    #[serde(with = "clickhouse::serde::time::date")]
    pub date: Date,
    pub status: String,
    pub event_type: Option<String>,
    pub prezo: Option<String>,
    pub event_type_suggestion: Option<String>,
    pub version: u64,
}

impl EventRow {
    pub fn from_event(event: &Event, version: u64) -> Result<Self> {
        Ok(Self {
            id: event.id.to_string(),
            date: to_ch_date(event.date)?,
            status: event.status.as_str().to_string(),
            event_type: event.event_type.as_ref().map(|item| item.0.clone()),
            prezo: event.prezo.as_ref().map(|item| item.0.clone()),
            event_type_suggestion: event.event_type_suggestion.map(|item| item.to_string()),
            version,
        })
    }

    pub fn into_event(self) -> Result<Event> {
        let status = EventStatus::parse(&self.status)
            .ok_or_else(|| anyhow!("event {} has unknown status '{}'", self.id, self.status))?;
        let event_type_suggestion = match self.event_type_suggestion.as_deref() {
            Some(raw) if !raw.is_empty() => Some(SuggestionBatchId(Uuid::parse_str(raw)?)),
            _ => None,
        };
        Ok(Event {
            id: EventId(Uuid::parse_str(&self.id)?),
            date: from_ch_date(self.date)?,
            status,
            event_type: self.event_type.map(EventTypeId),
            prezo: self.prezo.map(UserId),
            event_type_suggestion,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct PresenceRow {
    pub event: String,
    pub user: String,
    pub presence: String,
}

impl PresenceRow {
    pub fn into_presence(self) -> Result<Presence> {
        Ok(Presence {
            event: EventId(Uuid::parse_str(&self.event)?),
            user: UserId(self.user),
            presence: Attendance::from(self.presence.as_str()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct PreferenceRow {
    pub user: String,
    pub event_type: String,
    pub rating: i32,
}

impl From<PreferenceRow> for Preference {
    fn from(row: PreferenceRow) -> Self {
        Self {
            user: UserId(row.user),
            event_type: EventTypeId(row.event_type),
            rating: row.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct EventTypeRow {
    pub id: String,
    pub name: String,
}

impl From<EventTypeRow> for EventType {
    fn from(row: EventTypeRow) -> Self {
        Self {
            id: EventTypeId(row.id),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct SuggestionRow {
    pub batch_id: String,
    pub position: u8,
    pub event_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct AuditRow {
    pub id: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub date_created: OffsetDateTime,
    pub function: String,
    pub dump: String,
}

impl AuditRow {
    pub fn from_record(record: &AuditRecord) -> Result<Self> {
        Ok(Self {
            id: record.id.to_string(),
            date_created: to_ch_datetime(record.date_created),
            function: record.function.clone(),
            dump: serde_json::to_string(&record.steps)?,
        })
    }

    pub fn into_record(self) -> Result<AuditRecord> {
        Ok(AuditRecord {
            id: Uuid::parse_str(&self.id)?,
            date_created: from_ch_datetime(self.date_created),
            function: self.function,
            steps: serde_json::from_str(&self.dump)?,
        })
    }
}

/// Values stored for an attendance, including the legacy spelling.
pub fn attendance_values(attendances: &[Attendance]) -> Vec<String> {
    let mut values = Vec::new();
    for attendance in attendances {
        values.push(attendance.as_str().to_string());
        if *attendance == Attendance::Unknown {
            values.push("unknow".to_string());
        }
    }
    values
}
