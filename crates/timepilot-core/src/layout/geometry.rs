//! Minute-to-pixel geometry.
//!
//! Vertical position is proportional to elapsed minutes since the earliest
//! event; horizontal position is proportional to the assigned column. Units
//! are whatever the caller measures the viewport in (dp, px, cells).

use serde::{Deserialize, Serialize};

use super::cluster::EventNode;
use super::columns::Positioned;

/// Sizing policy for event boxes.
///
/// The minimum sizes deliberately trade positional accuracy for legibility
/// and tap targets: a five-minute event is still drawn `min_event_height`
/// tall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPolicy {
    #[serde(default = "default_min_event_height")]
    pub min_event_height: f32,
    #[serde(default = "default_min_event_width")]
    pub min_event_width: f32,
    #[serde(default = "default_column_gap")]
    pub column_gap: f32,
    /// Used when the viewport has no usable height.
    #[serde(default = "default_fallback_minute_height")]
    pub fallback_minute_height: f32,
}

fn default_min_event_height() -> f32 {
    24.0
}
fn default_min_event_width() -> f32 {
    12.0
}
fn default_column_gap() -> f32 {
    6.0
}
fn default_fallback_minute_height() -> f32 {
    0.8
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            min_event_height: default_min_event_height(),
            min_event_width: default_min_event_width(),
            column_gap: default_column_gap(),
            fallback_minute_height: default_fallback_minute_height(),
        }
    }
}

/// Size of the event area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub height: f32,
    pub width: f32,
}

impl Viewport {
    pub fn new(height: f32, width: f32) -> Self {
        Self { height, width }
    }
}

/// Box of one event inside the content area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventRect {
    pub top: f32,
    pub height: f32,
    pub x_offset: f32,
    pub width: f32,
}

impl EventRect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn right(&self) -> f32 {
        self.x_offset + self.width
    }
}

/// Mapping from minutes to vertical offsets for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScale {
    pub range_start: u32,
    pub range_end: u32,
    pub minute_height: f32,
    pub content_height: f32,
}

impl TimeScale {
    /// Derive the scale from the nodes' overall range. `None` for no nodes.
    pub fn fit(nodes: &[EventNode], viewport_height: f32, policy: &LayoutPolicy) -> Option<Self> {
        let range_start = nodes.iter().map(|n| n.start).min()?;
        let range_end = nodes.iter().map(|n| n.end).max()?;
        let total_minutes = range_end.saturating_sub(range_start).max(1) as f32;

        // NaN and non-positive heights both fall back
        let (minute_height, content_height) = if viewport_height > 0.0 {
            (viewport_height / total_minutes, viewport_height)
        } else {
            let mh = policy.fallback_minute_height;
            (mh, mh * total_minutes)
        };

        Some(Self {
            range_start,
            range_end,
            minute_height,
            content_height,
        })
    }

    pub fn total_minutes(&self) -> u32 {
        self.range_end.saturating_sub(self.range_start).max(1)
    }

    /// Vertical offset of `minute`, clamped into the content area.
    pub fn offset_of(&self, minute: u32) -> f32 {
        // subtract before converting: f32 loses whole minutes above 2^24
        let raw = self.minute_height * minute.saturating_sub(self.range_start) as f32;
        raw.max(0.0).min(self.content_height)
    }

    /// Whole-hour gridlines from the hour at or before the range start
    /// through the last hour at or before its end.
    pub fn hour_marks(&self) -> Vec<HourMark> {
        let first_hour = self.range_start / 60;
        let last_hour = self.range_end / 60;
        (first_hour..=last_hour)
            .map(|hour| {
                let minute = u64::from(hour) * 60;
                let from_start = minute.saturating_sub(u64::from(self.range_start));
                HourMark {
                    hour,
                    offset: self.minute_height * from_start as f32,
                }
            })
            .collect()
    }
}

/// A labelled hour gridline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourMark {
    pub hour: u32,
    pub offset: f32,
}

impl HourMark {
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Rectangle for one positioned node.
///
/// Heights are at least `min_event_height` but never run past the bottom
/// of the content area; widths are at least `min_event_width` and the
/// offset is pulled left so the box never runs past the right edge.
pub fn map_geometry(
    node: &EventNode,
    placement: &Positioned,
    scale: &TimeScale,
    content_width: f32,
    policy: &LayoutPolicy,
) -> EventRect {
    let content_width = content_width.max(0.0);

    let top = scale.offset_of(node.start);
    let raw_height = scale.minute_height * node.end.saturating_sub(node.start) as f32;
    let available = (scale.content_height - top).max(0.0);
    let height = raw_height.max(policy.min_event_height).min(available);

    let total_columns = placement.total_columns.max(1) as f32;
    let column_width = content_width / total_columns;
    let width = (column_width - policy.column_gap)
        .max(policy.min_event_width)
        .min(content_width);
    let max_x = (content_width - width).max(0.0);
    let x_offset = (column_width * placement.column as f32).min(max_x);

    EventRect {
        top,
        height,
        x_offset,
        width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn node(start: u32, end: u32) -> EventNode {
        EventNode { index: 0, start, end }
    }

    fn placement(column: usize, total_columns: usize) -> Positioned {
        Positioned { index: 0, column, total_columns }
    }

    #[test]
    fn scale_divides_height_by_range() {
        let nodes = [node(540, 600), node(570, 660)];
        let scale = TimeScale::fit(&nodes, 240.0, &LayoutPolicy::default()).unwrap();
        assert_eq!(scale.range_start, 540);
        assert_eq!(scale.range_end, 660);
        assert!((scale.minute_height - 2.0).abs() < EPS);
        assert_eq!(scale.content_height, 240.0);
    }

    #[test]
    fn zero_height_viewport_uses_fallback() {
        let policy = LayoutPolicy::default();
        let nodes = [node(0, 100)];
        let scale = TimeScale::fit(&nodes, 0.0, &policy).unwrap();
        assert_eq!(scale.minute_height, 0.8);
        assert!((scale.content_height - 80.0).abs() < EPS);

        let negative = TimeScale::fit(&nodes, -50.0, &policy).unwrap();
        assert_eq!(negative.minute_height, 0.8);
        let nan = TimeScale::fit(&nodes, f32::NAN, &policy).unwrap();
        assert_eq!(nan.minute_height, 0.8);
    }

    #[test]
    fn empty_nodes_have_no_scale() {
        assert!(TimeScale::fit(&[], 100.0, &LayoutPolicy::default()).is_none());
    }

    #[test]
    fn short_event_is_padded_to_min_height() {
        let policy = LayoutPolicy::default();
        let nodes = [node(0, 600), node(60, 65)];
        let scale = TimeScale::fit(&nodes, 600.0, &policy).unwrap();
        let rect = map_geometry(&nodes[1], &placement(0, 1), &scale, 300.0, &policy);
        assert!((rect.top - 60.0).abs() < EPS);
        assert!((rect.height - 24.0).abs() < EPS);
    }

    #[test]
    fn padded_height_stops_at_bottom_edge() {
        let policy = LayoutPolicy::default();
        let nodes = [node(0, 600), node(595, 600)];
        let scale = TimeScale::fit(&nodes, 600.0, &policy).unwrap();
        let rect = map_geometry(&nodes[1], &placement(0, 1), &scale, 300.0, &policy);
        assert!((rect.top - 595.0).abs() < EPS);
        assert!((rect.height - 5.0).abs() < EPS);
        assert!(rect.bottom() <= scale.content_height + EPS);
    }

    #[test]
    fn columns_split_width_with_gap() {
        let policy = LayoutPolicy::default();
        let nodes = [node(0, 60)];
        let scale = TimeScale::fit(&nodes, 60.0, &policy).unwrap();
        let left = map_geometry(&nodes[0], &placement(0, 2), &scale, 300.0, &policy);
        let right = map_geometry(&nodes[0], &placement(1, 2), &scale, 300.0, &policy);
        assert!((left.width - 144.0).abs() < EPS);
        assert!((left.x_offset - 0.0).abs() < EPS);
        assert!((right.x_offset - 150.0).abs() < EPS);
    }

    #[test]
    fn narrow_columns_are_widened_and_pulled_inside() {
        let policy = LayoutPolicy::default();
        let nodes = [node(0, 60)];
        let scale = TimeScale::fit(&nodes, 60.0, &policy).unwrap();
        // 10 columns in 100 units: 10 - 6 = 4 wide, widened to 12
        let last = map_geometry(&nodes[0], &placement(9, 10), &scale, 100.0, &policy);
        assert!((last.width - 12.0).abs() < EPS);
        assert!((last.x_offset - 88.0).abs() < EPS);
        assert!(last.right() <= 100.0 + EPS);
    }

    #[test]
    fn width_never_exceeds_content() {
        let policy = LayoutPolicy::default();
        let nodes = [node(0, 60)];
        let scale = TimeScale::fit(&nodes, 60.0, &policy).unwrap();
        let rect = map_geometry(&nodes[0], &placement(0, 1), &scale, 8.0, &policy);
        assert!((rect.width - 8.0).abs() < EPS);
        assert_eq!(rect.x_offset, 0.0);

        let collapsed = map_geometry(&nodes[0], &placement(0, 1), &scale, -20.0, &policy);
        assert_eq!(collapsed.width, 0.0);
        assert_eq!(collapsed.x_offset, 0.0);
    }

    #[test]
    fn hour_marks_cover_range() {
        let nodes = [node(9 * 60 + 30, 11 * 60 + 15)];
        let scale = TimeScale::fit(&nodes, 105.0, &LayoutPolicy::default()).unwrap();
        let marks = scale.hour_marks();
        let hours: Vec<u32> = marks.iter().map(|m| m.hour).collect();
        // 09:00 sits before the range and is pinned to offset 0
        assert_eq!(hours, vec![9, 10, 11]);
        assert_eq!(marks[0].offset, 0.0);
        assert!((marks[1].offset - 30.0).abs() < EPS);
        assert_eq!(marks[2].label(), "11:00");
    }

    #[test]
    fn hour_marks_stop_at_range_end() {
        let nodes = [node(60, 150)];
        let scale = TimeScale::fit(&nodes, 90.0, &LayoutPolicy::default()).unwrap();
        let hours: Vec<u32> = scale.hour_marks().iter().map(|m| m.hour).collect();
        assert_eq!(hours, vec![1, 2]);

        let exact = TimeScale::fit(&[node(60, 180)], 120.0, &LayoutPolicy::default()).unwrap();
        let hours: Vec<u32> = exact.hour_marks().iter().map(|m| m.hour).collect();
        assert_eq!(hours, vec![1, 2, 3]);
        assert!((exact.hour_marks()[2].offset - 120.0).abs() < EPS);
    }

    #[test]
    fn hour_marks_near_u32_max_do_not_overflow() {
        let nodes = [node(u32::MAX - 10, u32::MAX)];
        let scale = TimeScale::fit(&nodes, 100.0, &LayoutPolicy::default()).unwrap();
        let marks = scale.hour_marks();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].hour, u32::MAX / 60);
        assert_eq!(marks[0].offset, 0.0);
    }

    #[test]
    fn offsets_stay_exact_for_large_minute_values() {
        let policy = LayoutPolicy::default();
        let nodes = [node(29_000_001, 29_000_061), node(29_000_002, 29_000_003)];
        let scale = TimeScale::fit(&nodes, 600.0, &policy).unwrap();
        assert!((scale.minute_height - 10.0).abs() < EPS);
        let rect = map_geometry(&nodes[1], &placement(1, 2), &scale, 300.0, &policy);
        assert!((rect.top - 10.0).abs() < EPS);
    }
}
