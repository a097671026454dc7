//! Content graph lookup seam.

use crate::NodeId;

/// Resolution of node identifiers to node identities, used by reference
/// validation. Implemented by the in-memory content graph; callers embedding
/// the pipeline can supply their own backing store.
pub trait ContentGraphLookup {
    /// Find a node by its stable string identifier.
    fn find_by_identifier(&self, identifier: &str) -> Option<NodeId>;
}
