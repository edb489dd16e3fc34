//! Event model shared by the layout engine, the REST client and the board.
//!
//! Two representations coexist:
//! - [`EventItem`]: the server-side view, anchored to UTC instants
//! - [`TimelineEvent`]: the layout view, in local wall-clock minutes
//!
//! Converting from the first to the second is the caller-side timezone
//! normalization the layout engine relies on.

mod change;
mod clock;

pub use change::{CreateEvent, DeleteEvent, EventDraft, UpdateEvent};
pub use clock::{local_instant, WallClock, MINUTES_PER_DAY};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Eisenhower-matrix classification.
///
/// Serialized as its number (1-4), which is what the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quadrant {
    /// Urgent and important
    UrgentImportant = 1,
    /// Important, not urgent
    ImportantNotUrgent = 2,
    /// Urgent, not important
    UrgentNotImportant = 3,
    /// Neither urgent nor important
    Neither = 4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UrgentImportant,
        Quadrant::ImportantNotUrgent,
        Quadrant::UrgentNotImportant,
        Quadrant::Neither,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::UrgentImportant => "urgent & important",
            Quadrant::ImportantNotUrgent => "important, not urgent",
            Quadrant::UrgentNotImportant => "urgent, not important",
            Quadrant::Neither => "neither urgent nor important",
        }
    }
}

impl Default for Quadrant {
    fn default() -> Self {
        Quadrant::ImportantNotUrgent
    }
}

impl TryFrom<u8> for Quadrant {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Quadrant::UrgentImportant),
            2 => Ok(Quadrant::ImportantNotUrgent),
            3 => Ok(Quadrant::UrgentNotImportant),
            4 => Ok(Quadrant::Neither),
            other => Err(ValidationError::InvalidQuadrant(other as i64)),
        }
    }
}

impl From<Quadrant> for u8 {
    fn from(q: Quadrant) -> Self {
        q.number()
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// Recurring vs one-off event.
///
/// Decides which backend resource and payload shape an event uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    #[serde(alias = "daily")]
    Habitual,
    #[serde(alias = "emergency")]
    AdHoc,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Habitual => "habitual",
            EventKind::AdHoc => "adHoc",
        }
    }

    /// Backend resource segment, e.g. `/api/<resource>/create`.
    pub fn resource(self) -> &'static str {
        match self {
            EventKind::Habitual => "habitual-event",
            EventKind::AdHoc => "ad-hoc-event",
        }
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "habitual" | "daily" => Ok(EventKind::Habitual),
            "adHoc" | "ad-hoc" | "adhoc" | "emergency" => Ok(EventKind::AdHoc),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-bounded event on a minute timeline, ready for layout.
///
/// Construction validates `end_minute > start_minute`, so the layout engine
/// never sees negative durations. Deserialization goes through the same
/// check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimelineEvent")]
pub struct TimelineEvent {
    title: String,
    start_minute: u32,
    end_minute: u32,
    quadrant: Quadrant,
    kind: EventKind,
}

#[derive(Deserialize)]
struct RawTimelineEvent {
    title: String,
    start_minute: u32,
    end_minute: u32,
    #[serde(default)]
    quadrant: Quadrant,
    #[serde(default = "default_kind")]
    kind: EventKind,
}

fn default_kind() -> EventKind {
    EventKind::AdHoc
}

impl TryFrom<RawTimelineEvent> for TimelineEvent {
    type Error = ValidationError;

    fn try_from(raw: RawTimelineEvent) -> Result<Self, Self::Error> {
        TimelineEvent::new(raw.title, raw.start_minute, raw.end_minute, raw.quadrant, raw.kind)
    }
}

impl TimelineEvent {
    pub fn new(
        title: impl Into<String>,
        start_minute: u32,
        end_minute: u32,
        quadrant: Quadrant,
        kind: EventKind,
    ) -> Result<Self, ValidationError> {
        if end_minute <= start_minute {
            return Err(ValidationError::InvalidTimeRange {
                start: start_minute as i64,
                end: end_minute as i64,
            });
        }
        Ok(Self {
            title: title.into(),
            start_minute,
            end_minute,
            quadrant,
            kind,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    pub fn end_minute(&self) -> u32 {
        self.end_minute
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minute - self.start_minute
    }

    /// `HH:MM-HH:MM`, as shown on event cards.
    pub fn time_range_label(&self) -> String {
        format!(
            "{}-{}",
            WallClock::from_minute_of_day(self.start_minute.min(MINUTES_PER_DAY - 1)),
            WallClock::from_minute_of_day(self.end_minute.min(MINUTES_PER_DAY)),
        )
    }
}

/// Unified server-side event, merged from the habitual and ad-hoc lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventItem {
    pub event_id: Option<i64>,
    pub title: String,
    pub quadrant: Quadrant,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub kind: EventKind,
}

impl EventItem {
    /// Project onto the local wall-clock timeline of `tz`.
    ///
    /// The start's local day is the reference day; an end falling on a
    /// later local day is clamped to midnight (minute 1440).
    pub fn to_timeline_event<Tz: TimeZone>(
        &self,
        tz: &Tz,
    ) -> Result<TimelineEvent, ValidationError> {
        let start = self.start_time.with_timezone(tz);
        let end = self.end_time.with_timezone(tz);

        let start_minute = clock::minute_of_day(&start);
        let end_minute = if end.date_naive() > start.date_naive() {
            MINUTES_PER_DAY
        } else {
            clock::minute_of_day(&end)
        };

        TimelineEvent::new(
            self.title.clone(),
            start_minute,
            end_minute,
            self.quadrant,
            self.kind,
        )
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn quadrant_roundtrips_as_number() {
        let json = serde_json::to_string(&Quadrant::UrgentNotImportant).unwrap();
        assert_eq!(json, "3");
        let q: Quadrant = serde_json::from_str("1").unwrap();
        assert_eq!(q, Quadrant::UrgentImportant);
        assert!(serde_json::from_str::<Quadrant>("5").is_err());
    }

    #[test]
    fn kind_accepts_legacy_aliases() {
        let k: EventKind = serde_json::from_str("\"emergency\"").unwrap();
        assert_eq!(k, EventKind::AdHoc);
        let k: EventKind = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(k, EventKind::Habitual);
        assert_eq!(serde_json::to_string(&EventKind::AdHoc).unwrap(), "\"adHoc\"");
        assert_eq!("habitual".parse::<EventKind>().unwrap(), EventKind::Habitual);
        assert!("weekly".parse::<EventKind>().is_err());
    }

    #[test]
    fn timeline_event_rejects_empty_or_inverted_range() {
        assert!(TimelineEvent::new("a", 60, 60, Quadrant::Neither, EventKind::AdHoc).is_err());
        assert!(TimelineEvent::new("a", 90, 60, Quadrant::Neither, EventKind::AdHoc).is_err());
        assert!(TimelineEvent::new("a", 0, 1, Quadrant::Neither, EventKind::AdHoc).is_ok());
    }

    #[test]
    fn timeline_event_deserialization_validates() {
        let ok: TimelineEvent = serde_json::from_str(
            r#"{"title":"Standup","start_minute":540,"end_minute":555,"quadrant":2,"kind":"habitual"}"#,
        )
        .unwrap();
        assert_eq!(ok.duration_minutes(), 15);
        assert_eq!(ok.time_range_label(), "09:00-09:15");

        let bad = serde_json::from_str::<TimelineEvent>(
            r#"{"title":"Broken","start_minute":600,"end_minute":540}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn event_item_projects_to_local_minutes() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let item = EventItem {
            event_id: Some(1),
            title: "Gym".into(),
            quadrant: Quadrant::ImportantNotUrgent,
            // 22:00Z-23:30Z is 06:00-07:30 at +08:00
            start_time: "2025-03-01T22:00:00Z".parse().unwrap(),
            end_time: "2025-03-01T23:30:00Z".parse().unwrap(),
            kind: EventKind::Habitual,
        };
        let ev = item.to_timeline_event(&tz).unwrap();
        assert_eq!(ev.start_minute(), 360);
        assert_eq!(ev.end_minute(), 450);
        assert_eq!(ev.kind(), EventKind::Habitual);
    }

    #[test]
    fn event_item_crossing_midnight_is_clamped() {
        let item = EventItem {
            event_id: None,
            title: "Deploy".into(),
            quadrant: Quadrant::UrgentImportant,
            start_time: "2025-03-01T23:00:00Z".parse().unwrap(),
            end_time: "2025-03-02T01:00:00Z".parse().unwrap(),
            kind: EventKind::AdHoc,
        };
        let ev = item.to_timeline_event(&Utc).unwrap();
        assert_eq!(ev.start_minute(), 23 * 60);
        assert_eq!(ev.end_minute(), MINUTES_PER_DAY);
    }
}
