//! Create / update / delete commands, one variant per event kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventItem, EventKind, Quadrant};
use crate::error::ValidationError;

/// Fields shared by every create and update command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub quadrant: Quadrant,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        quadrant: Quadrant,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::Blank("title".into()));
        }
        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time.timestamp(),
                end: end_time.timestamp(),
            });
        }
        Ok(Self {
            title,
            quadrant,
            start_time,
            end_time,
        })
    }

    pub(crate) fn into_item(self, event_id: Option<i64>, kind: EventKind) -> EventItem {
        EventItem {
            event_id,
            title: self.title,
            quadrant: self.quadrant,
            start_time: self.start_time,
            end_time: self.end_time,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateEvent {
    Habitual(EventDraft),
    AdHoc(EventDraft),
}

impl CreateEvent {
    pub fn new(kind: EventKind, draft: EventDraft) -> Self {
        match kind {
            EventKind::Habitual => CreateEvent::Habitual(draft),
            EventKind::AdHoc => CreateEvent::AdHoc(draft),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            CreateEvent::Habitual(_) => EventKind::Habitual,
            CreateEvent::AdHoc(_) => EventKind::AdHoc,
        }
    }

    pub fn draft(&self) -> &EventDraft {
        match self {
            CreateEvent::Habitual(draft) | CreateEvent::AdHoc(draft) => draft,
        }
    }

    /// The board-side item once the backend has assigned `event_id`.
    pub fn into_item(self, event_id: i64) -> EventItem {
        let kind = self.kind();
        match self {
            CreateEvent::Habitual(draft) | CreateEvent::AdHoc(draft) => {
                draft.into_item(Some(event_id), kind)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    Habitual {
        event_id: i64,
        draft: EventDraft,
        description: Option<String>,
    },
    AdHoc {
        event_id: i64,
        draft: EventDraft,
    },
}

impl UpdateEvent {
    /// Build the update matching `item`'s kind.
    ///
    /// Items that were never persisted (no id, e.g. unsaved smart-plan
    /// entries) cannot be updated.
    pub fn for_item(item: &EventItem, draft: EventDraft) -> Result<Self, ValidationError> {
        let event_id = persisted_id(item)?;
        Ok(match item.kind {
            EventKind::Habitual => UpdateEvent::Habitual {
                event_id,
                draft,
                description: None,
            },
            EventKind::AdHoc => UpdateEvent::AdHoc { event_id, draft },
        })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            UpdateEvent::Habitual { .. } => EventKind::Habitual,
            UpdateEvent::AdHoc { .. } => EventKind::AdHoc,
        }
    }

    pub fn event_id(&self) -> i64 {
        match self {
            UpdateEvent::Habitual { event_id, .. } | UpdateEvent::AdHoc { event_id, .. } => {
                *event_id
            }
        }
    }

    pub fn draft(&self) -> &EventDraft {
        match self {
            UpdateEvent::Habitual { draft, .. } | UpdateEvent::AdHoc { draft, .. } => draft,
        }
    }

    pub fn to_item(&self) -> EventItem {
        self.draft().clone().into_item(Some(self.event_id()), self.kind())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteEvent {
    Habitual { event_id: i64 },
    AdHoc { event_id: i64 },
}

impl DeleteEvent {
    pub fn new(kind: EventKind, event_id: i64) -> Self {
        match kind {
            EventKind::Habitual => DeleteEvent::Habitual { event_id },
            EventKind::AdHoc => DeleteEvent::AdHoc { event_id },
        }
    }

    pub fn for_item(item: &EventItem) -> Result<Self, ValidationError> {
        Ok(DeleteEvent::new(item.kind, persisted_id(item)?))
    }

    pub fn kind(&self) -> EventKind {
        match self {
            DeleteEvent::Habitual { .. } => EventKind::Habitual,
            DeleteEvent::AdHoc { .. } => EventKind::AdHoc,
        }
    }

    pub fn event_id(&self) -> i64 {
        match self {
            DeleteEvent::Habitual { event_id } | DeleteEvent::AdHoc { event_id } => *event_id,
        }
    }

    pub fn matches(&self, item: &EventItem) -> bool {
        item.kind == self.kind() && item.event_id == Some(self.event_id())
    }
}

fn persisted_id(item: &EventItem) -> Result<i64, ValidationError> {
    item.event_id.ok_or_else(|| ValidationError::InvalidValue {
        field: "event_id".into(),
        message: format!("'{}' has not been saved yet", item.title),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft() -> EventDraft {
        let start: DateTime<Utc> = "2025-05-10T09:00:00Z".parse().unwrap();
        EventDraft::new(
            "Write report",
            Quadrant::ImportantNotUrgent,
            start,
            start + Duration::hours(2),
        )
        .unwrap()
    }

    #[test]
    fn draft_rejects_blank_title_and_inverted_range() {
        let start: DateTime<Utc> = "2025-05-10T09:00:00Z".parse().unwrap();
        assert_eq!(
            EventDraft::new("  ", Quadrant::Neither, start, start + Duration::minutes(5)),
            Err(ValidationError::Blank("title".into()))
        );
        assert!(EventDraft::new("x", Quadrant::Neither, start, start).is_err());
    }

    #[test]
    fn create_keeps_kind_in_resulting_item() {
        let item = CreateEvent::new(EventKind::Habitual, draft()).into_item(42);
        assert_eq!(item.event_id, Some(42));
        assert_eq!(item.kind, EventKind::Habitual);
        assert_eq!(item.title, "Write report");
    }

    #[test]
    fn update_and_delete_follow_item_kind() {
        let item = CreateEvent::AdHoc(draft()).into_item(7);
        let update = UpdateEvent::for_item(&item, draft()).unwrap();
        assert!(matches!(update, UpdateEvent::AdHoc { event_id: 7, .. }));

        let delete = DeleteEvent::for_item(&item).unwrap();
        assert_eq!(delete, DeleteEvent::AdHoc { event_id: 7 });
        assert!(delete.matches(&item));
        assert!(!DeleteEvent::Habitual { event_id: 7 }.matches(&item));
    }

    #[test]
    fn unsaved_items_cannot_be_changed() {
        let mut item = CreateEvent::AdHoc(draft()).into_item(1);
        item.event_id = None;
        assert!(UpdateEvent::for_item(&item, draft()).is_err());
        assert!(DeleteEvent::for_item(&item).is_err());
    }
}
