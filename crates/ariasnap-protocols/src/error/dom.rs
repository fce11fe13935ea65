//! Document query errors.

use thiserror::Error;

use crate::types::NodeId;

/// A query against a frame's document failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The document was torn down while it was being read.
    #[error("Document detached")]
    Detached,

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("DOM query failed: {0}")]
    Query(String),
}
