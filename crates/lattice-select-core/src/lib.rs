//! Core systems for Lattice Select.
//!
//! This crate provides the foundational pieces the select widget is built on:
//!
//! - **Widget Tree**: Arena-backed node hierarchy with bounds and overflow
//! - **Geometry**: Points, sizes and rectangles in viewport coordinates
//! - **Signal/Slot System**: Type-safe change notification to the host
//! - **Event Bus**: Process-wide pointer, scroll and resize listeners with
//!   explicit subscription handles
//! - **Logging**: Tracing targets and tree visualization
//!
//! # Event Bus Example
//!
//! ```
//! use lattice_select_core::{EventBus, EventKind, ListenerOptions, SharedWidgetTree, UiEvent};
//!
//! let tree = SharedWidgetTree::new();
//! let bus = EventBus::new(tree.root());
//!
//! let sub = bus.subscribe(EventKind::Scroll, ListenerOptions::CAPTURE, |event| {
//!     println!("scrolled: {:?}", event.target());
//! });
//!
//! bus.dispatch(&UiEvent::Scroll { target: tree.root() });
//! bus.unsubscribe(&sub);
//! assert_eq!(bus.total_listener_count(), 0);
//! ```

mod error;
mod event;
pub mod event_bus;
pub mod geometry;
pub mod logging;
pub mod signal;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use event::{EventKind, UiEvent};
pub use event_bus::{EventBus, ListenerId, ListenerOptions, Subscription};
pub use geometry::{Point, Rect, Size};
pub use logging::{TreeDebug, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionId, Signal};
pub use tree::{NodeId, Overflow, OverflowStyle, SharedWidgetTree, WidgetTree};
