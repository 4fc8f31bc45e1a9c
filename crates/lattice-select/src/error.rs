//! Error types for the select widget.

use lattice_select_core::TreeError;

/// Errors from widget lifecycle operations.
///
/// Interaction paths (toggling, dismissal, repositioning, rendering) never
/// fail; they log and degrade instead. Only mounting and unmounting report
/// errors, since those depend on the host's tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// `mount` was called on a widget that is already in a tree.
    #[error("select is already mounted")]
    AlreadyMounted,

    /// The operation needs the widget to be mounted.
    #[error("select is not mounted")]
    NotMounted,

    /// The underlying widget tree rejected an operation.
    #[error("widget tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Result type for select lifecycle operations.
pub type SelectResult<T> = std::result::Result<T, SelectError>;
