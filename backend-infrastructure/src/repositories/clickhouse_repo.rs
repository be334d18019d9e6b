use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use clickhouse::Client;

use backend_domain::{
    Attendance, AuditLogRepository, AuditRecord, DbConfig, Event, EventId, EventRepository,
    EventType, EventTypeId, EventTypeRepository, Preference, PreferenceRepository, Presence,
    PresenceRepository, SuggestionBatch, SuggestionBatchId, SuggestionRepository, UserId,
};

use super::clickhouse_rows::{
    attendance_values, AuditRow, EventRow, EventTypeRow, PreferenceRow, PresenceRow,
    SuggestionRow,
};
use crate::utils::current_millis;

const EVENT_COLUMNS: &str =
    "id, date, status, event_type, prezo, event_type_suggestion, version";

/// Events are versioned rows in a `ReplacingMergeTree`; an update is a new
/// row with a higher version and reads go through `FINAL`.
#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
    version: Arc<AtomicU64>,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self {
            client,
            database,
            version: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }

    fn next_version(&self) -> u64 {
        let now = current_millis().max(0) as u64;
        self.version.fetch_max(now, Ordering::SeqCst);
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn write_event(&self, event: &Event) -> Result<()> {
        let row = EventRow::from_event(event, self.next_version())?;
        let mut insert = self.client.insert("events")?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_events(&self, query: clickhouse::query::Query) -> Result<Vec<Event>> {
        let rows = query.fetch_all::<EventRow>().await?;
        rows.into_iter().map(EventRow::into_event).collect()
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl EventRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_events = r#"
CREATE TABLE IF NOT EXISTS events (
    id String,
    date Date,
    status LowCardinality(String),
    event_type Nullable(String),
    prezo Nullable(String),
    event_type_suggestion Nullable(String),
    version UInt64
) ENGINE = ReplacingMergeTree(version)
ORDER BY id
"#;
        self.client.query(create_events).execute().await?;

        let create_presences = r#"
CREATE TABLE IF NOT EXISTS event_presences (
    event String,
    user String,
    presence LowCardinality(String),
    version UInt64 DEFAULT toUnixTimestamp64Milli(now64(3))
) ENGINE = ReplacingMergeTree(version)
ORDER BY (event, user)
"#;
        self.client.query(create_presences).execute().await?;

        let create_preferences = r#"
CREATE TABLE IF NOT EXISTS event_type_preferences (
    user String,
    event_type String,
    rating Int32,
    version UInt64 DEFAULT toUnixTimestamp64Milli(now64(3))
) ENGINE = ReplacingMergeTree(version)
ORDER BY (user, event_type)
"#;
        self.client.query(create_preferences).execute().await?;

        let create_event_types = r#"
CREATE TABLE IF NOT EXISTS event_types (
    id String,
    name String
) ENGINE = ReplacingMergeTree
ORDER BY id
"#;
        self.client.query(create_event_types).execute().await?;

        let create_suggestions = r#"
CREATE TABLE IF NOT EXISTS event_type_suggestions (
    batch_id String,
    position UInt8,
    event_type String
) ENGINE = MergeTree
ORDER BY (batch_id, position)
"#;
        self.client.query(create_suggestions).execute().await?;

        let create_logs = r#"
CREATE TABLE IF NOT EXISTS logs (
    id String,
    date_created DateTime64(3),
    function LowCardinality(String),
    dump String
) ENGINE = MergeTree
PARTITION BY toYYYYMM(date_created)
ORDER BY (date_created, id)
"#;
        self.client.query(create_logs).execute().await?;
        Ok(())
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.write_event(event).await
    }

    async fn find_event(&self, id: &EventId) -> Result<Option<Event>> {
        let query = self
            .client
            .query(&format!(
                "SELECT {} FROM events FINAL WHERE id = ? LIMIT 1",
                EVENT_COLUMNS
            ))
            .bind(id.to_string());
        Ok(self.fetch_events(query).await?.into_iter().next())
    }

    async fn find_event_by_date(&self, date: NaiveDate) -> Result<Option<Event>> {
        let query = self
            .client
            .query(&format!(
                "SELECT {} FROM events FINAL WHERE date = toDate(?) ORDER BY id LIMIT 1",
                EVENT_COLUMNS
            ))
            .bind(format_date(date));
        Ok(self.fetch_events(query).await?.into_iter().next())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        self.write_event(event).await
    }

    async fn fetch_recent_with_event_type(
        &self,
        exclude: &EventId,
        until: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Event>> {
        let query = self
            .client
            .query(&format!(
                "SELECT {} FROM events FINAL \
                 WHERE id != ? AND date <= toDate(?) AND event_type IS NOT NULL \
                 ORDER BY date DESC LIMIT ?",
                EVENT_COLUMNS
            ))
            .bind(exclude.to_string())
            .bind(format_date(until))
            .bind(limit as u64);
        self.fetch_events(query).await
    }

    async fn fetch_recent_by_date(
        &self,
        exclude: &EventId,
        until: NaiveDate,
        dates: usize,
    ) -> Result<Vec<Event>> {
        let query = self
            .client
            .query(&format!(
                "SELECT {} FROM events FINAL \
                 WHERE id != ? AND date IN ( \
                     SELECT DISTINCT date FROM events FINAL \
                     WHERE id != ? AND date <= toDate(?) \
                     ORDER BY date DESC LIMIT ? \
                 ) \
                 ORDER BY date DESC",
                EVENT_COLUMNS
            ))
            .bind(exclude.to_string())
            .bind(exclude.to_string())
            .bind(format_date(until))
            .bind(dates as u64);
        self.fetch_events(query).await
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl PresenceRepository for ClickhouseRepo {
    async fn fetch_presences(
        &self,
        event: &EventId,
        attendances: &[Attendance],
    ) -> Result<Vec<Presence>> {
        let rows = self
            .client
            .query(
                "SELECT event, user, presence FROM event_presences FINAL \
                 WHERE event = ? AND has(?, presence) ORDER BY user",
            )
            .bind(event.to_string())
            .bind(attendance_values(attendances))
            .fetch_all::<PresenceRow>()
            .await?;
        rows.into_iter().map(PresenceRow::into_presence).collect()
    }
}

#[async_trait]
impl PreferenceRepository for ClickhouseRepo {
    async fn fetch_preferences(&self, users: &[UserId]) -> Result<Vec<Preference>> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let users: Vec<String> = users.iter().map(|user| user.0.clone()).collect();
        let rows = self
            .client
            .query(
                "SELECT user, event_type, rating FROM event_type_preferences FINAL \
                 WHERE has(?, user)",
            )
            .bind(users)
            .fetch_all::<PreferenceRow>()
            .await?;
        Ok(rows.into_iter().map(Preference::from).collect())
    }
}

#[async_trait]
impl EventTypeRepository for ClickhouseRepo {
    async fn list_event_types(&self) -> Result<Vec<EventType>> {
        let rows = self
            .client
            .query("SELECT id, name FROM event_types FINAL ORDER BY id")
            .fetch_all::<EventTypeRow>()
            .await?;
        Ok(rows.into_iter().map(EventType::from).collect())
    }
}

#[async_trait]
impl SuggestionRepository for ClickhouseRepo {
    async fn insert_batch(&self, batch: &SuggestionBatch) -> Result<()> {
        let mut insert = self.client.insert("event_type_suggestions")?;
        for (position, event_type) in batch.event_types.iter().enumerate() {
            insert
                .write(&SuggestionRow {
                    batch_id: batch.id.to_string(),
                    position: u8::try_from(position).unwrap_or(u8::MAX),
                    event_type: event_type.0.clone(),
                })
                .await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn find_batch(&self, id: &SuggestionBatchId) -> Result<Option<SuggestionBatch>> {
        let rows = self
            .client
            .query(
                "SELECT batch_id, position, event_type FROM event_type_suggestions \
                 WHERE batch_id = ? ORDER BY position",
            )
            .bind(id.to_string())
            .fetch_all::<SuggestionRow>()
            .await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(SuggestionBatch {
            id: *id,
            event_types: rows.into_iter().map(|row| EventTypeId(row.event_type)).collect(),
        }))
    }

    async fn delete_batch(&self, id: &SuggestionBatchId) -> Result<()> {
        self.client
            .query("DELETE FROM event_type_suggestions WHERE batch_id = ?")
            .bind(id.to_string())
            .execute()
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for ClickhouseRepo {
    async fn insert_audit(&self, record: &AuditRecord) -> Result<()> {
        let row = AuditRow::from_record(record)?;
        let mut insert = self.client.insert("logs")?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_audits(&self, function: Option<&str>, limit: usize) -> Result<Vec<AuditRecord>> {
        let query = match function {
            Some(function) => self
                .client
                .query(
                    "SELECT id, date_created, function, dump FROM logs \
                     WHERE function = ? ORDER BY date_created DESC LIMIT ?",
                )
                .bind(function)
                .bind(limit as u64),
            None => self
                .client
                .query(
                    "SELECT id, date_created, function, dump FROM logs \
                     ORDER BY date_created DESC LIMIT ?",
                )
                .bind(limit as u64),
        };
        let rows = query.fetch_all::<AuditRow>().await?;
        rows.into_iter().map(AuditRow::into_record).collect()
    }
}
