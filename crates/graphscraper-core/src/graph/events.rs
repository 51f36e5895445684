//! Notifications dispatched by a graph

use super::model::NodeIndex;

/// Capacity of the broadcast channel; slow receivers see `Lagged`
pub(crate) const EVENT_CAPACITY: usize = 256;

/// Something that happened to a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphEvent {
    /// `neighbor` was attached to `node` through a new edge
    NeighborAdded {
        node: NodeIndex,
        neighbor: NodeIndex,
    },
}
