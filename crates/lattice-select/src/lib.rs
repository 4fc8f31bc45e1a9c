//! Lattice Select - a dropdown select widget for Lattice widget trees.
//!
//! The widget supports single and multiple selection, search highlighting,
//! removable chips, and overlays that escape clipping ancestors by detaching
//! to the document root and following the trigger through scroll and resize.
//!
//! # Key Types
//!
//! - [`Select`]: the widget
//! - [`SelectConfig`]: construction options
//! - [`SelectionValue`] / [`SelectionState`]: the host-facing selection and its transitions
//! - [`SearchFilter`]: literal, case-insensitive label highlighting
//! - [`ClippingDetector`], [`PositionTracker`], [`DismissalController`]: overlay coordination
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_select::prelude::*;
//!
//! let tree = SharedWidgetTree::new();
//! let bus = Arc::new(EventBus::new(tree.root()));
//! let select = Select::new(
//!     tree.clone(),
//!     bus.clone(),
//!     SelectConfig::new()
//!         .with_option("1", "A")
//!         .with_option("2", "B")
//!         .with_multiple(true),
//! );
//! select.mount(tree.root()).unwrap();
//!
//! select.open();
//! select.toggle("1");
//! assert!(select.is_open());
//!
//! bus.dispatch(&UiEvent::PointerDown { target: tree.root(), position: Point::ZERO });
//! assert!(!select.is_open());
//! assert_eq!(select.active_listener_count(), 0);
//! ```

pub mod clipping;
pub mod config;
pub mod dismissal;
mod error;
pub mod option;
pub mod overlay;
pub mod position;
pub mod prelude;
pub mod search;
mod select;
pub mod selection;
pub mod trigger;

pub use clipping::{ClipScan, ClippingDetector, RenderMode};
pub use config::SelectConfig;
pub use dismissal::DismissalController;
pub use error::{SelectError, SelectResult};
pub use option::{label_for, SelectOption};
pub use overlay::{
    render_overlay, FixedFrame, OptionRow, OverlayInput, OverlayLayout, Placement, SearchBox,
    FLOATING_Z_INDEX, INLINE_Z_INDEX,
};
pub use position::{AnchorRect, PositionTracker};
pub use search::{highlight, FilterMode, SearchFilter, Segment};
pub use select::{ClickOutcome, Select};
pub use selection::{SelectionMode, SelectionState, SelectionValue, ToggleOutcome};
pub use trigger::{render_trigger, Chip, TriggerContent};
