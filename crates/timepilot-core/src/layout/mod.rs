//! Side-by-side timeline layout for overlapping events.
//!
//! The pipeline is pure and synchronous:
//! - [`build_clusters`]: partition events into overlap clusters
//! - [`assign_columns`]: greedy column assignment per cluster
//! - [`map_geometry`]: minutes and columns to rectangles
//!
//! [`layout_timeline`] runs all three and is meant to be called again
//! whenever the event list or the viewport changes.

mod cluster;
mod columns;
mod geometry;

pub use cluster::{build_clusters, sorted_nodes, Cluster, EventNode, Interval};
pub use columns::{assign_columns, position_clusters, Positioned};
pub use geometry::{map_geometry, EventRect, HourMark, LayoutPolicy, TimeScale, Viewport};

use serde::Serialize;

/// Final placement of one input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedEvent {
    /// Index into the input slice.
    pub index: usize,
    pub column: usize,
    pub total_columns: usize,
    pub rect: EventRect,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    /// One entry per input event, in input order.
    pub placed: Vec<PlacedEvent>,
    /// `None` when there was nothing to lay out.
    pub scale: Option<TimeScale>,
    pub cluster_count: usize,
}

impl TimelineLayout {
    pub fn empty() -> Self {
        Self {
            placed: Vec::new(),
            scale: None,
            cluster_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn hour_marks(&self) -> Vec<HourMark> {
        self.scale.map(|s| s.hour_marks()).unwrap_or_default()
    }
}

/// Lay out `events` inside `viewport`.
///
/// Empty input yields an empty layout; callers render their own
/// "no events" state.
pub fn layout_timeline<T: Interval>(
    events: &[T],
    viewport: Viewport,
    policy: &LayoutPolicy,
) -> TimelineLayout {
    let clusters = build_clusters(events);
    let nodes: Vec<EventNode> = clusters.iter().flat_map(|c| c.nodes().iter().copied()).collect();
    let Some(scale) = TimeScale::fit(&nodes, viewport.height, policy) else {
        return TimelineLayout::empty();
    };

    let mut placed: Vec<PlacedEvent> = clusters
        .iter()
        .flat_map(|cluster| {
            cluster
                .nodes()
                .iter()
                .zip(assign_columns(cluster))
                .map(|(node, placement)| PlacedEvent {
                    index: node.index,
                    column: placement.column,
                    total_columns: placement.total_columns,
                    rect: map_geometry(node, &placement, &scale, viewport.width, policy),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    placed.sort_by_key(|p| p.index);

    tracing::debug!(
        events = events.len(),
        clusters = clusters.len(),
        range_start = scale.range_start,
        range_end = scale.range_end,
        "timeline layout computed"
    );

    TimelineLayout {
        placed,
        scale: Some(scale),
        cluster_count: clusters.len(),
    }
}
