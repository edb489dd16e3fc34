//! ScheduleBoard: the client-side list of events and its sync with the backend.
//!
//! Every mutation goes to the backend first; the local list changes only
//! after the backend accepts it. Failures are returned and also kept in
//! [`ScheduleBoard::last_error`] for display until cleared.

use chrono::{NaiveDate, TimeZone};

use crate::api::ApiClient;
use crate::error::{CoreError, Result};
use crate::event::{
    local_instant, CreateEvent, DeleteEvent, EventItem, TimelineEvent, UpdateEvent, WallClock,
};
use crate::layout::{layout_timeline, LayoutPolicy, TimelineLayout, Viewport};

#[derive(Debug)]
pub struct ScheduleBoard {
    client: ApiClient,
    events: Vec<EventItem>,
    last_error: Option<String>,
}

impl ScheduleBoard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            events: Vec::new(),
            last_error: None,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn events(&self) -> &[EventItem] {
        &self.events
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn record<T>(&mut self, result: std::result::Result<T, impl Into<CoreError>>) -> Result<T> {
        result.map_err(|e| {
            let err = e.into();
            tracing::warn!("schedule board operation failed: {err}");
            self.last_error = Some(err.to_string());
            err
        })
    }

    /// Fetch both event lists and replace the board, ad-hoc events first.
    ///
    /// On failure the previous list is kept.
    pub async fn load_events(&mut self) -> Result<usize> {
        let (ad_hoc, habitual) = tokio::join!(
            self.client.list_ad_hoc_events(),
            self.client.list_habitual_events()
        );
        let ad_hoc = self.record(ad_hoc)?;
        let habitual = self.record(habitual)?;

        self.events = ad_hoc
            .into_iter()
            .map(EventItem::from)
            .chain(habitual.into_iter().map(EventItem::from))
            .collect();
        tracing::info!(count = self.events.len(), "events loaded");
        Ok(self.events.len())
    }

    /// Create on the backend and append with the assigned id.
    pub async fn add_event(&mut self, cmd: CreateEvent) -> Result<i64> {
        let created = self.client.create_event(&cmd).await;
        let id = self.record(created)?;
        self.events.push(cmd.into_item(id));
        Ok(id)
    }

    /// Update on the backend and replace the local copy.
    ///
    /// Returns the backend's verdict; `false` leaves the board untouched.
    pub async fn edit_event(&mut self, cmd: UpdateEvent) -> Result<bool> {
        let updated = self.client.update_event(&cmd).await;
        let updated = self.record(updated)?;
        if updated {
            let item = cmd.to_item();
            if let Some(slot) = self
                .events
                .iter_mut()
                .find(|e| e.kind == item.kind && e.event_id == item.event_id)
            {
                *slot = item;
            }
        }
        Ok(updated)
    }

    pub async fn delete_event(&mut self, cmd: DeleteEvent) -> Result<bool> {
        let deleted = self.client.delete_event(&cmd).await;
        let deleted = self.record(deleted)?;
        if deleted {
            self.events.retain(|e| !cmd.matches(e));
        }
        Ok(deleted)
    }

    /// Replace the board with a generated plan for `date` (local midnight in `tz`).
    pub async fn apply_smart_plan<Tz: TimeZone>(
        &mut self,
        date: NaiveDate,
        tz: &Tz,
    ) -> Result<usize> {
        let start = self.record(local_instant(date, WallClock::from_minute_of_day(0), tz))?;
        let planned = self.client.generate_smart_daily_plan(start).await;
        let planned = self.record(planned)?;

        self.events = planned.into_iter().map(EventItem::from).collect();
        tracing::info!(%date, count = self.events.len(), "smart plan applied");
        Ok(self.events.len())
    }

    /// Project every event onto the local timeline of `tz`.
    ///
    /// Items whose local projection is empty (e.g. starting exactly at
    /// midnight of the next day) are skipped.
    pub fn timeline_events<Tz: TimeZone>(&self, tz: &Tz) -> Vec<TimelineEvent> {
        self.project(tz, |_| true)
    }

    /// Like [`timeline_events`](Self::timeline_events), limited to events
    /// starting on local day `day`.
    pub fn timeline_events_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Vec<TimelineEvent> {
        self.project(tz, |item| item.start_time.with_timezone(tz).date_naive() == day)
    }

    fn project<Tz: TimeZone>(
        &self,
        tz: &Tz,
        keep: impl Fn(&EventItem) -> bool,
    ) -> Vec<TimelineEvent> {
        self.events
            .iter()
            .filter(|item| keep(item))
            .filter_map(|item| match item.to_timeline_event(tz) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(title = %item.title, "skipping event on timeline: {e}");
                    None
                }
            })
            .collect()
    }

    /// Lay out the board, optionally restricted to one local day.
    ///
    /// Placement indices refer to the returned event list.
    pub fn layout<Tz: TimeZone>(
        &self,
        day: Option<NaiveDate>,
        viewport: Viewport,
        policy: &LayoutPolicy,
        tz: &Tz,
    ) -> (Vec<TimelineEvent>, TimelineLayout) {
        let events = match day {
            Some(day) => self.timeline_events_on(day, tz),
            None => self.timeline_events(tz),
        };
        let layout = layout_timeline(&events, viewport, policy);
        (events, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthTokens, MemoryStore};
    use crate::event::{EventDraft, EventKind, Quadrant};
    use chrono::{DateTime, Duration, Utc};
    use mockito::{Matcher, Mock, Server};
    use serde_json::json;
    use std::sync::Arc;

    const DEVICE: &str = "timepilot-00000000-0000-4000-8000-000000000000";

    fn board_for(server: &Server) -> ScheduleBoard {
        let store = MemoryStore::with_tokens(AuthTokens {
            access_token: "acc".into(),
            refresh_token: "ref".into(),
        });
        let client = ApiClient::new(&server.url(), DEVICE, Arc::new(store)).unwrap();
        ScheduleBoard::new(client)
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn envelope(data: serde_json::Value) -> String {
        json!({ "code": "200", "info": "ok", "data": data }).to_string()
    }

    async fn mock_lists(server: &mut Server) -> Vec<Mock> {
        let ad_hoc = server
            .mock("POST", "/api/ad-hoc-event/list")
            .match_header("x-device-id", DEVICE)
            .match_header("authorization", "Bearer acc")
            .with_header("content-type", "application/json")
            .with_body(envelope(json!([{
                "eventId": 7,
                "title": "Incident review",
                "quadrant": 1,
                "plannedStartTime": "2025-05-10T10:00:00Z",
                "plannedEndTime": "2025-05-10T11:00:00Z",
            }])))
            .create_async()
            .await;
        let habitual = server
            .mock("POST", "/api/habitual-event/list")
            .with_header("content-type", "application/json")
            .with_body(envelope(json!([{
                "eventId": 3,
                "title": "Morning run",
                "quadrant": 2,
                "startTime": "2025-05-10T06:00:00Z",
                "endTime": "2025-05-10T07:00:00Z",
            }])))
            .create_async()
            .await;
        vec![ad_hoc, habitual]
    }

    #[tokio::test]
    async fn load_events_merges_ad_hoc_before_habitual() {
        let mut server = Server::new_async().await;
        let _lists = mock_lists(&mut server).await;
        let mut board = board_for(&server);

        assert_eq!(board.load_events().await.unwrap(), 2);
        let kinds: Vec<EventKind> = board.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::AdHoc, EventKind::Habitual]);
        assert!(board.last_error().is_none());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_events_and_records_error() {
        let mut server = Server::new_async().await;
        let lists = mock_lists(&mut server).await;
        let mut board = board_for(&server);
        board.load_events().await.unwrap();

        for mock in lists {
            mock.remove_async().await;
        }
        let _failing = server
            .mock("POST", Matcher::Regex(r"^/api/.*/list$".into()))
            .with_status(500)
            .create_async()
            .await;

        assert!(board.load_events().await.is_err());
        assert_eq!(board.events().len(), 2);
        assert!(board.last_error().unwrap().contains("HTTP 500"));
        board.clear_error();
        assert!(board.last_error().is_none());
    }

    #[tokio::test]
    async fn add_edit_delete_update_local_list() {
        let mut server = Server::new_async().await;
        let _create = server
            .mock("POST", "/api/ad-hoc-event/create")
            .match_body(Matcher::PartialJson(json!({
                "type": "adHoc",
                "title": "Hotfix",
                "plannedStartTime": "2025-05-10T09:00:00Z",
            })))
            .with_header("content-type", "application/json")
            .with_body(envelope(json!(42)))
            .create_async()
            .await;
        let _update = server
            .mock("POST", "/api/ad-hoc-event/update")
            .match_body(Matcher::PartialJson(json!({ "eventId": 42, "title": "Hotfix v2" })))
            .with_header("content-type", "application/json")
            .with_body(envelope(json!(true)))
            .create_async()
            .await;
        let _delete = server
            .mock("POST", "/api/ad-hoc-event/delete")
            .match_body(Matcher::Json(json!({ "eventId": 42 })))
            .with_header("content-type", "application/json")
            .with_body(envelope(json!(true)))
            .create_async()
            .await;

        let mut board = board_for(&server);
        let start = at("2025-05-10T09:00:00Z");
        let draft = EventDraft::new(
            "Hotfix",
            Quadrant::UrgentImportant,
            start,
            start + Duration::minutes(30),
        )
        .unwrap();
        let id = board.add_event(CreateEvent::AdHoc(draft)).await.unwrap();
        assert_eq!(id, 42);
        assert_eq!(board.events()[0].event_id, Some(42));

        let draft = EventDraft::new(
            "Hotfix v2",
            Quadrant::UrgentImportant,
            start,
            start + Duration::minutes(45),
        )
        .unwrap();
        let update = UpdateEvent::for_item(&board.events()[0], draft).unwrap();
        assert!(board.edit_event(update).await.unwrap());
        assert_eq!(board.events()[0].title, "Hotfix v2");
        assert_eq!(board.events()[0].duration_minutes(), 45);

        let delete = DeleteEvent::for_item(&board.events()[0]).unwrap();
        assert!(board.delete_event(delete).await.unwrap());
        assert!(board.events().is_empty());
    }

    #[tokio::test]
    async fn rejected_create_leaves_board_unchanged() {
        let mut server = Server::new_async().await;
        let _rejected = server
            .mock("POST", "/api/habitual-event/create")
            .with_header("content-type", "application/json")
            .with_body(json!({ "code": "400", "info": "title taken", "data": null }).to_string())
            .create_async()
            .await;

        let mut board = board_for(&server);
        let start = at("2025-05-10T06:00:00Z");
        let draft = EventDraft::new(
            "Run",
            Quadrant::ImportantNotUrgent,
            start,
            start + Duration::hours(1),
        )
        .unwrap();
        let err = board.add_event(CreateEvent::Habitual(draft)).await.unwrap_err();
        assert!(err.to_string().contains("title taken"));
        assert!(board.events().is_empty());
        assert!(board.last_error().is_some());
    }

    #[tokio::test]
    async fn smart_plan_replaces_events_and_lays_out() {
        let mut server = Server::new_async().await;
        let _plan = server
            .mock("POST", "/api/time-plan/smart-daily-plan")
            .match_body(Matcher::Json(json!({ "date": "2025-05-10T00:00:00Z" })))
            .with_header("content-type", "application/json")
            .with_body(envelope(json!([
                {
                    "eventId": null,
                    "title": "Deep work",
                    "startTime": "2025-05-10T09:00:00Z",
                    "endTime": "2025-05-10T10:00:00Z",
                    "type": "habitual",
                },
                {
                    "eventId": 9,
                    "title": "Client call",
                    "startTime": "2025-05-10T09:30:00Z",
                    "endTime": "2025-05-10T10:30:00Z",
                    "type": "adHoc",
                },
            ])))
            .create_async()
            .await;

        let mut board = board_for(&server);
        let day = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        assert_eq!(board.apply_smart_plan(day, &Utc).await.unwrap(), 2);

        let (events, layout) = board.layout(
            Some(day),
            Viewport::new(120.0, 200.0),
            &LayoutPolicy::default(),
            &Utc,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(layout.cluster_count, 1);
        assert_eq!(layout.placed[0].total_columns, 2);
        assert_eq!(layout.placed[1].column, 1);

        let other_day = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap();
        assert!(board.timeline_events_on(other_day, &Utc).is_empty());
    }
}
