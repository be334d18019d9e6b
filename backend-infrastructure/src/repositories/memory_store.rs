use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use backend_domain::{
    Attendance, AuditLogRepository, AuditRecord, Event, EventId, EventRepository, EventType,
    EventTypeRepository, Preference, PreferenceRepository, Presence, PresenceRepository,
    SuggestionBatch, SuggestionBatchId, SuggestionRepository, UserId,
};

/// Serializable content of a [`MemoryStore`], used for seed files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub events: Vec<Event>,
    pub event_types: Vec<EventType>,
    pub presences: Vec<Presence>,
    pub preferences: Vec<Preference>,
    pub suggestions: Vec<SuggestionBatch>,
}

#[derive(Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    event_types: Vec<EventType>,
    presences: Vec<Presence>,
    preferences: Vec<Preference>,
    suggestions: HashMap<SuggestionBatchId, SuggestionBatch>,
    audits: Vec<AuditRecord>,
}

/// In-process store used for local runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut tables = Tables {
            events: snapshot
                .events
                .into_iter()
                .map(|event| (event.id, event))
                .collect(),
            suggestions: snapshot
                .suggestions
                .into_iter()
                .map(|batch| (batch.id, batch))
                .collect(),
            ..Tables::default()
        };
        for event_type in snapshot.event_types {
            upsert_event_type(&mut tables, event_type);
        }
        for presence in snapshot.presences {
            upsert_presence(&mut tables, presence);
        }
        for preference in snapshot.preferences {
            upsert_preference(&mut tables, preference);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub async fn put_event_type(&self, event_type: EventType) {
        upsert_event_type(&mut *self.tables.write().await, event_type);
    }

    pub async fn put_presence(&self, presence: Presence) {
        upsert_presence(&mut *self.tables.write().await, presence);
    }

    pub async fn put_preference(&self, preference: Preference) {
        upsert_preference(&mut *self.tables.write().await, preference);
    }

    pub async fn events(&self) -> Vec<Event> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables.events.values().cloned().collect();
        events.sort_by_key(|event| event.date);
        events
    }

    pub async fn batch_count(&self) -> usize {
        self.tables.read().await.suggestions.len()
    }

    pub async fn audits(&self) -> Vec<AuditRecord> {
        self.tables.read().await.audits.clone()
    }
}

fn upsert_event_type(tables: &mut Tables, event_type: EventType) {
    tables.event_types.retain(|item| item.id != event_type.id);
    tables.event_types.push(event_type);
}

fn upsert_presence(tables: &mut Tables, presence: Presence) {
    tables
        .presences
        .retain(|item| !(item.event == presence.event && item.user == presence.user));
    tables.presences.push(presence);
}

fn upsert_preference(tables: &mut Tables, preference: Preference) {
    tables.preferences.retain(|item| {
        !(item.user == preference.user && item.event_type == preference.event_type)
    });
    tables.preferences.push(preference);
}

/// Newest first, ties broken by id so results are stable.
fn newest_first(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.0.cmp(&b.id.0)));
    events
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.tables
            .write()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(())
    }

    async fn find_event(&self, id: &EventId) -> Result<Option<Event>> {
        Ok(self.tables.read().await.events.get(id).cloned())
    }

    async fn find_event_by_date(&self, date: NaiveDate) -> Result<Option<Event>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Event> = tables
            .events
            .values()
            .filter(|event| event.date == date)
            .cloned()
            .collect();
        found.sort_by_key(|event| event.id.0);
        Ok(found.into_iter().next())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        self.tables
            .write()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(())
    }

    async fn fetch_recent_with_event_type(
        &self,
        exclude: &EventId,
        until: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        let events = tables
            .events
            .values()
            .filter(|event| event.id != *exclude && event.date <= until)
            .filter(|event| event.event_type.is_some())
            .cloned()
            .collect();
        Ok(newest_first(events).into_iter().take(limit).collect())
    }

    async fn fetch_recent_by_date(
        &self,
        exclude: &EventId,
        until: NaiveDate,
        dates: usize,
    ) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        let candidates: Vec<Event> = tables
            .events
            .values()
            .filter(|event| event.id != *exclude && event.date <= until)
            .cloned()
            .collect();
        let mut days: Vec<NaiveDate> = candidates.iter().map(|event| event.date).collect();
        days.sort_unstable_by(|a, b| b.cmp(a));
        days.dedup();
        days.truncate(dates);
        let events = candidates
            .into_iter()
            .filter(|event| days.contains(&event.date))
            .collect();
        Ok(newest_first(events))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl PresenceRepository for MemoryStore {
    async fn fetch_presences(
        &self,
        event: &EventId,
        attendances: &[Attendance],
    ) -> Result<Vec<Presence>> {
        let tables = self.tables.read().await;
        let mut presences: Vec<Presence> = tables
            .presences
            .iter()
            .filter(|item| item.event == *event && attendances.contains(&item.presence))
            .cloned()
            .collect();
        presences.sort_by(|a, b| a.user.cmp(&b.user));
        Ok(presences)
    }
}

#[async_trait]
impl PreferenceRepository for MemoryStore {
    async fn fetch_preferences(&self, users: &[UserId]) -> Result<Vec<Preference>> {
        let tables = self.tables.read().await;
        Ok(tables
            .preferences
            .iter()
            .filter(|item| users.contains(&item.user))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EventTypeRepository for MemoryStore {
    async fn list_event_types(&self) -> Result<Vec<EventType>> {
        let mut event_types = self.tables.read().await.event_types.clone();
        event_types.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(event_types)
    }
}

#[async_trait]
impl SuggestionRepository for MemoryStore {
    async fn insert_batch(&self, batch: &SuggestionBatch) -> Result<()> {
        self.tables
            .write()
            .await
            .suggestions
            .insert(batch.id, batch.clone());
        Ok(())
    }

    async fn find_batch(&self, id: &SuggestionBatchId) -> Result<Option<SuggestionBatch>> {
        Ok(self.tables.read().await.suggestions.get(id).cloned())
    }

    async fn delete_batch(&self, id: &SuggestionBatchId) -> Result<()> {
        self.tables.write().await.suggestions.remove(id);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for MemoryStore {
    async fn insert_audit(&self, record: &AuditRecord) -> Result<()> {
        self.tables.write().await.audits.push(record.clone());
        Ok(())
    }

    async fn fetch_audits(&self, function: Option<&str>, limit: usize) -> Result<Vec<AuditRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<AuditRecord> = tables
            .audits
            .iter()
            .filter(|record| function.map_or(true, |name| record.function == name))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        records.truncate(limit);
        Ok(records)
    }
}
