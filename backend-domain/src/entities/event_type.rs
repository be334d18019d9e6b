// Event type catalog and suggestion batches

use serde::{Deserialize, Serialize};

use crate::value_objects::{EventTypeId, SuggestionBatchId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub id: EventTypeId,
    pub name: String,
}

/// Event types proposed for one event, best rated last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionBatch {
    pub id: SuggestionBatchId,
    pub event_types: Vec<EventTypeId>,
}

impl SuggestionBatch {
    pub fn new(event_types: Vec<EventTypeId>) -> Self {
        Self {
            id: SuggestionBatchId::new(),
            event_types,
        }
    }
}
