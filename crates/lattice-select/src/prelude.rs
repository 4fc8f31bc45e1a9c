//! Prelude module for Lattice Select.
//!
//! ```ignore
//! use lattice_select::prelude::*;
//! ```
//!
//! This provides access to:
//! - The widget and its configuration (`Select`, `SelectConfig`, `SelectOption`)
//! - Selection types (`SelectionValue`, `SelectionMode`)
//! - Rendering output (`TriggerContent`, `OverlayLayout`, `Placement`)
//! - The tree, bus and geometry types needed to host a select

// ============================================================================
// Widget
// ============================================================================

pub use crate::{ClickOutcome, Select, SelectConfig, SelectError, SelectOption, SelectResult};

// ============================================================================
// Selection and Search
// ============================================================================

pub use crate::{FilterMode, SelectionMode, SelectionValue};

// ============================================================================
// Rendering
// ============================================================================

pub use crate::{AnchorRect, Chip, OptionRow, OverlayLayout, Placement, RenderMode, TriggerContent};

// ============================================================================
// Hosting
// ============================================================================

pub use lattice_select_core::{
    EventBus, NodeId, Overflow, OverflowStyle, Point, Rect, SharedWidgetTree, Signal, Size,
    UiEvent,
};
