//! Interval clustering.
//!
//! Partitions events into maximal groups whose `[start, end)` ranges are
//! transitively overlapping. Each group is laid out independently.

use crate::event::TimelineEvent;

/// Anything with a half-open minute range.
pub trait Interval {
    fn start_minute(&self) -> u32;
    fn end_minute(&self) -> u32;
}

impl Interval for TimelineEvent {
    fn start_minute(&self) -> u32 {
        TimelineEvent::start_minute(self)
    }

    fn end_minute(&self) -> u32 {
        TimelineEvent::end_minute(self)
    }
}

impl Interval for (u32, u32) {
    fn start_minute(&self) -> u32 {
        self.0
    }

    fn end_minute(&self) -> u32 {
        self.1
    }
}

/// An input event reduced to its range; `index` points back into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventNode {
    pub index: usize,
    pub start: u32,
    pub end: u32,
}

impl EventNode {
    pub fn overlaps(&self, other: &EventNode) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A maximal set of transitively overlapping nodes, sorted by start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    nodes: Vec<EventNode>,
    end: u32,
}

impl Cluster {
    pub fn nodes(&self) -> &[EventNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Earliest start of the cluster.
    pub fn start(&self) -> u32 {
        self.nodes.first().map(|n| n.start).unwrap_or(self.end)
    }

    /// Latest end of the cluster.
    pub fn end(&self) -> u32 {
        self.end
    }
}

/// Build nodes for every event, stable-sorted by start.
///
/// Ties keep input order, which is what makes the whole layout
/// deterministic for a given input sequence.
pub fn sorted_nodes<T: Interval>(events: &[T]) -> Vec<EventNode> {
    let mut nodes: Vec<EventNode> = events
        .iter()
        .enumerate()
        .map(|(index, e)| EventNode {
            index,
            start: e.start_minute(),
            end: e.end_minute(),
        })
        .collect();
    nodes.sort_by_key(|n| n.start);
    nodes
}

/// Partition `events` into overlap clusters, ordered by start time.
///
/// A node joins the current cluster only when it starts strictly before the
/// cluster's furthest end; touching endpoints start a new cluster.
pub fn build_clusters<T: Interval>(events: &[T]) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut current: Vec<EventNode> = Vec::new();
    let mut current_max_end = 0;

    for node in sorted_nodes(events) {
        if !current.is_empty() && node.start >= current_max_end {
            clusters.push(Cluster {
                nodes: std::mem::take(&mut current),
                end: current_max_end,
            });
        }
        current_max_end = if current.is_empty() {
            node.end
        } else {
            current_max_end.max(node.end)
        };
        current.push(node);
    }

    if !current.is_empty() {
        clusters.push(Cluster {
            nodes: current,
            end: current_max_end,
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(cluster: &Cluster) -> Vec<usize> {
        cluster.nodes().iter().map(|n| n.index).collect()
    }

    #[test]
    fn empty_input_has_no_clusters() {
        let events: Vec<(u32, u32)> = Vec::new();
        assert!(build_clusters(&events).is_empty());
    }

    #[test]
    fn overlapping_pair_and_separate_event() {
        let clusters = build_clusters(&[(0, 60), (30, 90), (100, 120)]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(indices(&clusters[0]), vec![0, 1]);
        assert_eq!(clusters[0].start(), 0);
        assert_eq!(clusters[0].end(), 90);
        assert_eq!(indices(&clusters[1]), vec![2]);
    }

    #[test]
    fn touching_events_are_separate_clusters() {
        let clusters = build_clusters(&[(0, 30), (30, 60)]);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn container_merges_everything_it_spans() {
        // 9:00-12:00 swallows two events that do not overlap each other
        let clusters = build_clusters(&[(600, 620), (540, 720), (700, 710)]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(indices(&clusters[0]), vec![1, 0, 2]);
    }

    #[test]
    fn chain_overlap_is_transitive() {
        // a overlaps b, b overlaps c, a does not overlap c
        let clusters = build_clusters(&[(0, 20), (10, 40), (30, 50)]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn input_order_is_irrelevant_but_ties_are_stable() {
        let clusters = build_clusters(&[(100, 120), (0, 60), (0, 30)]);
        assert_eq!(indices(&clusters[0]), vec![1, 2]);
        assert_eq!(indices(&clusters[1]), vec![0]);
    }

    #[test]
    fn node_overlap_is_strict() {
        let a = EventNode { index: 0, start: 0, end: 30 };
        let b = EventNode { index: 1, start: 30, end: 60 };
        let c = EventNode { index: 2, start: 29, end: 31 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
