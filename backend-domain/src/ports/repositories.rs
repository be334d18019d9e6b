use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{AuditRecord, Event, EventType, Preference, Presence, SuggestionBatch};
use crate::value_objects::{Attendance, EventId, SuggestionBatchId, UserId};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn insert_event(&self, event: &Event) -> anyhow::Result<()>;
    async fn find_event(&self, id: &EventId) -> anyhow::Result<Option<Event>>;
    async fn find_event_by_date(&self, date: NaiveDate) -> anyhow::Result<Option<Event>>;
    async fn update_event(&self, event: &Event) -> anyhow::Result<()>;
    /// Latest events dated on or before `until`, other than `exclude`, that
    /// already have a chosen event type. Newest first.
    async fn fetch_recent_with_event_type(
        &self,
        exclude: &EventId,
        until: NaiveDate,
        limit: usize,
    ) -> anyhow::Result<Vec<Event>>;
    /// Events other than `exclude` held on the `dates` most recent distinct
    /// dates on or before `until`. Newest first.
    async fn fetch_recent_by_date(
        &self,
        exclude: &EventId,
        until: NaiveDate,
        dates: usize,
    ) -> anyhow::Result<Vec<Event>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PresenceRepository: Send + Sync {
    async fn fetch_presences(
        &self,
        event: &EventId,
        attendances: &[Attendance],
    ) -> anyhow::Result<Vec<Presence>>;
}

#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn fetch_preferences(&self, users: &[UserId]) -> anyhow::Result<Vec<Preference>>;
}

#[async_trait]
pub trait EventTypeRepository: Send + Sync {
    async fn list_event_types(&self) -> anyhow::Result<Vec<EventType>>;
}

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    async fn insert_batch(&self, batch: &SuggestionBatch) -> anyhow::Result<()>;
    async fn find_batch(&self, id: &SuggestionBatchId) -> anyhow::Result<Option<SuggestionBatch>>;
    async fn delete_batch(&self, id: &SuggestionBatchId) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn insert_audit(&self, record: &AuditRecord) -> anyhow::Result<()>;
    async fn fetch_audits(
        &self,
        function: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<Vec<AuditRecord>>;
}
