//! Greedy column assignment within a cluster.
//!
//! Nodes are visited in start order and each takes the lowest-numbered
//! column whose previous occupant has already ended. For interval graphs
//! this uses exactly as many columns as the peak number of simultaneously
//! active events.

use serde::Serialize;

use super::cluster::Cluster;

/// Column placement of one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Positioned {
    /// Index into the input event slice.
    pub index: usize,
    pub column: usize,
    pub total_columns: usize,
}

/// Assign columns to every node of `cluster`, in cluster order.
///
/// `total_columns` is the same for all returned entries.
pub fn assign_columns(cluster: &Cluster) -> Vec<Positioned> {
    // columns_end[i] = end of the node currently occupying column i
    let mut columns_end: Vec<u32> = Vec::new();
    let mut assigned: Vec<(usize, usize)> = Vec::with_capacity(cluster.len());

    for node in cluster.nodes() {
        let column = match columns_end.iter().position(|&end| node.start >= end) {
            Some(free) => {
                columns_end[free] = node.end;
                free
            }
            None => {
                columns_end.push(node.end);
                columns_end.len() - 1
            }
        };
        assigned.push((node.index, column));
    }

    let total_columns = columns_end.len().max(1);
    assigned
        .into_iter()
        .map(|(index, column)| Positioned {
            index,
            column,
            total_columns,
        })
        .collect()
}

/// Column placements for all clusters, concatenated in cluster order.
pub fn position_clusters(clusters: &[Cluster]) -> Vec<Positioned> {
    clusters.iter().flat_map(assign_columns).collect()
}
