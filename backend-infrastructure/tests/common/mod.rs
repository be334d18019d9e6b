#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use backend_application::AppState;
use backend_domain::{
    Attendance, Event, EventId, EventRepository, EventStatus, EventType, EventTypeId, Preference,
    Presence, RuntimeConfig, UserId,
};
use backend_infrastructure::{build_state, MemoryStore};

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = build_state(RuntimeConfig::default(), store.clone());
        Self { store, state }
    }

    pub async fn event_types(&self, ids: &[&str]) {
        for id in ids {
            self.store
                .put_event_type(EventType {
                    id: EventTypeId::from(*id),
                    name: id.to_uppercase(),
                })
                .await;
        }
    }

    pub async fn event(&self, date: NaiveDate, status: EventStatus) -> Event {
        let event = Event::new(date, status);
        self.store.insert_event(&event).await.expect("insert event");
        event
    }

    pub async fn past_event(
        &self,
        date: NaiveDate,
        event_type: Option<&str>,
        prezo: Option<&str>,
    ) -> Event {
        let mut event = Event::new(date, EventStatus::Finished);
        event.event_type = event_type.map(EventTypeId::from);
        event.prezo = prezo.map(UserId::from);
        self.store.insert_event(&event).await.expect("insert event");
        event
    }

    pub async fn presence(&self, event: EventId, user: &str, presence: Attendance) {
        self.store
            .put_presence(Presence {
                event,
                user: UserId::from(user),
                presence,
            })
            .await;
    }

    pub async fn rating(&self, user: &str, event_type: &str, rating: i32) {
        self.store
            .put_preference(Preference {
                user: UserId::from(user),
                event_type: EventTypeId::from(event_type),
                rating,
            })
            .await;
    }

    pub async fn reload(&self, id: EventId) -> Event {
        self.store
            .find_event(&id)
            .await
            .expect("find event")
            .expect("event exists")
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("date")
}
