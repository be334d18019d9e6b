// Attendance value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Present,
    Absent,
    // Older rows were written as "unknow".
    #[serde(alias = "unknow")]
    Unknown,
}

impl Attendance {
    /// Participants whose preferences count towards event type suggestions.
    pub const MAYBE_PRESENT: [Attendance; 2] = [Attendance::Present, Attendance::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attendance::Present => "present",
            Attendance::Absent => "absent",
            Attendance::Unknown => "unknown",
        }
    }
}

impl From<&str> for Attendance {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "present" => Attendance::Present,
            "absent" => Attendance::Absent,
            _ => Attendance::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_spelling_is_read_as_unknown() {
        let parsed: Attendance = serde_json::from_str("\"unknow\"").expect("attendance");
        assert_eq!(parsed, Attendance::Unknown);
        assert_eq!(Attendance::from("unknow"), Attendance::Unknown);
        assert_eq!(Attendance::from(" Present "), Attendance::Present);
    }
}
