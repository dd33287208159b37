//! Event domain models

use serde::{Deserialize, Serialize};

/// Category of a planned event. Scoring thresholds are category-specific.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    OutdoorSports,
    Wedding,
    Hiking,
    CorporateOuting,
    Other,
}

impl EventCategory {
    /// Storage representation, also the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::OutdoorSports => "outdoor_sports",
            EventCategory::Wedding => "wedding",
            EventCategory::Hiking => "hiking",
            EventCategory::CorporateOuting => "corporate_outing",
            EventCategory::Other => "other",
        }
    }

    pub const ALL: [EventCategory; 5] = [
        EventCategory::OutdoorSports,
        EventCategory::Wedding,
        EventCategory::Hiking,
        EventCategory::CorporateOuting,
        EventCategory::Other,
    ];
}

impl std::str::FromStr for EventCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outdoor_sports" => Ok(EventCategory::OutdoorSports),
            "wedding" => Ok(EventCategory::Wedding),
            "hiking" => Ok(EventCategory::Hiking),
            "corporate_outing" => Ok(EventCategory::CorporateOuting),
            "other" => Ok(EventCategory::Other),
            _ => Err("unknown event category"),
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
