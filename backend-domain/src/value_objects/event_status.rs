// Event status value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Enlist,
    EventTypeTriage,
    PlaceTriage,
    Running,
    Finished,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Enlist => "enlist",
            EventStatus::EventTypeTriage => "event_type_triage",
            EventStatus::PlaceTriage => "place_triage",
            EventStatus::Running => "running",
            EventStatus::Finished => "finished",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(EventStatus::Draft),
            "enlist" => Some(EventStatus::Enlist),
            "event_type_triage" => Some(EventStatus::EventTypeTriage),
            "place_triage" => Some(EventStatus::PlaceTriage),
            "running" => Some(EventStatus::Running),
            "finished" => Some(EventStatus::Finished),
            _ => None,
        }
    }

    /// Status that normally precedes this one in the weekly lifecycle.
    pub fn previous(&self) -> Option<Self> {
        match self {
            EventStatus::Draft => None,
            EventStatus::Enlist => Some(EventStatus::Draft),
            EventStatus::EventTypeTriage => Some(EventStatus::Enlist),
            EventStatus::PlaceTriage => Some(EventStatus::EventTypeTriage),
            EventStatus::Running => Some(EventStatus::PlaceTriage),
            EventStatus::Finished => Some(EventStatus::Running),
        }
    }
}
