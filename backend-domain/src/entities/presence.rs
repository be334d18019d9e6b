// Presence and preference entities
// Both are maintained by the users themselves and only read here

use serde::{Deserialize, Serialize};

use crate::value_objects::{Attendance, EventId, EventTypeId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    pub event: EventId,
    pub user: UserId,
    pub presence: Attendance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub user: UserId,
    pub event_type: EventTypeId,
    pub rating: i32,
}
