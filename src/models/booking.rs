use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::ConversationState;

/// Hour at which the afternoon starts.
pub const AFTERNOON_START_HOUR: u32 = 14;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HalfDay {
    #[serde(rename = "mañana")]
    Morning,
    #[serde(rename = "tarde")]
    Afternoon,
}

impl HalfDay {
    /// The token the user types to pick this half of the day.
    pub fn as_str(&self) -> &'static str {
        match self {
            HalfDay::Morning => "mañana",
            HalfDay::Afternoon => "tarde",
        }
    }

    /// Expects already lowercased input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mañana" => Some(HalfDay::Morning),
            "tarde" => Some(HalfDay::Afternoon),
            _ => None,
        }
    }

    pub fn contains(&self, time: &NaiveTime) -> bool {
        match self {
            HalfDay::Morning => time.hour() < AFTERNOON_START_HOUR,
            HalfDay::Afternoon => time.hour() >= AFTERNOON_START_HOUR,
        }
    }
}

/// In-progress booking collected over one chat session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    pub state: ConversationState,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub reason: Option<String>,
    pub date_text: Option<String>,
    pub date_iso: Option<NaiveDate>,
    pub half_day: Option<HalfDay>,
    pub time_text: Option<String>,
    pub time_24h: Option<NaiveTime>,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a fully collected draft, or `None` while any field is missing.
    pub fn to_confirmed(&self) -> Option<ConfirmedBooking> {
        Some(ConfirmedBooking {
            name: self.name.clone()?,
            phone: self.phone.clone()?,
            reason: self.reason.clone()?,
            date_text: self.date_text.clone()?,
            date: self.date_iso?,
            half_day: self.half_day?,
            time_text: self.time_text.clone()?,
            time: self.time_24h?,
        })
    }
}

/// A booking the user said yes to, ready to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmedBooking {
    pub name: String,
    pub phone: String,
    pub reason: String,
    pub date_text: String,
    pub date: NaiveDate,
    pub half_day: HalfDay,
    pub time_text: String,
    pub time: NaiveTime,
}
