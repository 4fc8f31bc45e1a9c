//! UI event types delivered through the [`EventBus`](crate::EventBus).

use crate::geometry::{Point, Size};
use crate::tree::NodeId;

/// The category of a [`UiEvent`], used when subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pointer button was pressed anywhere in the document.
    PointerDown,
    /// A node (or the document itself) scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
}

/// A process-wide UI event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// A pointer button was pressed over `target`.
    PointerDown {
        /// The deepest node under the pointer.
        target: NodeId,
        /// Pointer position in viewport coordinates.
        position: Point,
    },

    /// `target` scrolled its content.
    ///
    /// A scroll of the document itself uses the document root as target.
    Scroll {
        /// The node whose content scrolled.
        target: NodeId,
    },

    /// The viewport changed size.
    Resize {
        /// The new viewport size.
        viewport: Size,
    },
}

impl UiEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Resize { .. } => EventKind::Resize,
        }
    }

    /// The target node, for events that have one.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::PointerDown { target, .. } | Self::Scroll { target } => Some(*target),
            Self::Resize { .. } => None,
        }
    }
}
