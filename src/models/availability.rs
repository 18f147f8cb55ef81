use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A free block on a court's agenda
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// "HH:MM-HH:MM"
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Free slots of one court on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub court_id: i64,
    pub date: NaiveDate,
    /// Block length the server sliced the day into, when it says so
    pub slot_minutes: Option<i64>,
    pub slots: Vec<TimeSlot>,
}
