//! Error types for the widget tree.

use crate::tree::NodeId;

/// Errors that can occur during widget tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node ID is invalid or the node has been removed.
    #[error("Invalid or removed node {0:?}")]
    InvalidNode(NodeId),

    /// Attempted to move a node underneath itself or one of its descendants.
    #[error("Cannot move node {node:?} beneath itself or one of its descendants")]
    CircularParentage {
        /// The node that was being moved.
        node: NodeId,
    },

    /// The document root cannot be removed or reparented.
    #[error("The document root cannot be removed or reparented")]
    RootImmutable,
}

/// Result type for widget tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;
