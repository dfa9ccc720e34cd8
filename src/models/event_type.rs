use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    CheckIn,
    CheckOut,
}

impl EventType {
    /// Convert enum → DB string
    pub fn as_db_str(&self) -> &'static str {
        match self {
            EventType::CheckIn => "in",
            EventType::CheckOut => "out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(EventType::CheckIn),
            "out" => Some(EventType::CheckOut),
            _ => None,
        }
    }

    /// Parse user input (CLI `--kind`), case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "in" | "checkin" | "check-in" => Some(EventType::CheckIn),
            "out" | "checkout" | "check-out" => Some(EventType::CheckOut),
            _ => None,
        }
    }

    /// The only kind accepted after an event of this kind.
    pub fn opposite(&self) -> Self {
        match self {
            EventType::CheckIn => EventType::CheckOut,
            EventType::CheckOut => EventType::CheckIn,
        }
    }

    pub fn is_check_in(&self) -> bool {
        matches!(self, EventType::CheckIn)
    }
}
