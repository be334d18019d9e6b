// Event entity
// One occurrence of the weekly gathering

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, EventStatus, EventTypeId, SuggestionBatchId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub date: NaiveDate,
    pub status: EventStatus,
    #[serde(default)]
    pub event_type: Option<EventTypeId>,
    #[serde(default)]
    pub prezo: Option<UserId>,
    #[serde(default)]
    pub event_type_suggestion: Option<SuggestionBatchId>,
}

impl Event {
    pub fn new(date: NaiveDate, status: EventStatus) -> Self {
        Self {
            id: EventId::new(),
            date,
            status,
            event_type: None,
            prezo: None,
            event_type_suggestion: None,
        }
    }
}
