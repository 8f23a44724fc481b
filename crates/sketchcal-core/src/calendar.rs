//! External calendar data shown on calendar cards.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An event on an external calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub calendar_id: String,
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A calendar the user can attach to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub summary: String,
}

/// Source of calendar metadata and events.
pub trait CalendarSource {
    /// All calendars available for attaching.
    fn calendars(&self) -> Vec<CalendarInfo>;

    /// Events from any of `calendar_ids` starting on `date`, ordered by start.
    fn events_on_day(&self, date: NaiveDate, calendar_ids: &[String]) -> Vec<CalendarEvent>;
}

/// Calendar source backed by plain vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryCalendar {
    #[serde(default)]
    pub calendars: Vec<CalendarInfo>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_calendar(&mut self, id: impl Into<String>, summary: impl Into<String>) {
        self.calendars.push(CalendarInfo {
            id: id.into(),
            summary: summary.into(),
        });
    }

    pub fn add_event(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }
}

impl CalendarSource for MemoryCalendar {
    fn calendars(&self) -> Vec<CalendarInfo> {
        self.calendars.clone()
    }

    fn events_on_day(&self, date: NaiveDate, calendar_ids: &[String]) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .iter()
            .filter(|event| event.start.date() == date)
            .filter(|event| calendar_ids.iter().any(|id| id == &event.calendar_id))
            .cloned()
            .collect();
        events.sort_by_key(|event| event.start);
        events
    }
}
