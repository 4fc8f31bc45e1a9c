//! Overlay layout.
//!
//! [`render_overlay`] is a pure function from the widget's current state to
//! what the dropdown shows and where: the placement directive, the optional
//! search box and one row per listed option.

use crate::clipping::RenderMode;
use crate::option::SelectOption;
use crate::position::AnchorRect;
use crate::search::{FilterMode, SearchFilter, Segment};
use crate::selection::SelectionState;

/// Stacking order of an inline overlay.
pub const INLINE_Z_INDEX: i32 = 50;

/// Stacking order of a detached overlay, above all normal content.
pub const FLOATING_Z_INDEX: i32 = i32::MAX;

/// Where a detached overlay is drawn, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFrame {
    /// Top edge of the overlay (the trigger's bottom edge).
    pub top: f32,
    /// Left edge of the overlay.
    pub left: f32,
    /// Width of the overlay.
    pub width: f32,
}

/// Placement directive for the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Flow-positioned directly below the trigger, at the trigger's width.
    Inline {
        /// Stacking order.
        z_index: i32,
    },
    /// Fixed to the viewport at the anchor.
    Detached {
        /// The trigger's edges, or `None` if the trigger could not be measured.
        anchor: Option<AnchorRect>,
        /// Stacking order.
        z_index: i32,
    },
}

impl Placement {
    /// The stacking order.
    pub fn z_index(&self) -> i32 {
        match self {
            Self::Inline { z_index } | Self::Detached { z_index, .. } => *z_index,
        }
    }

    /// Whether the overlay escapes normal layout.
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached { .. })
    }

    /// The viewport frame of a measured detached overlay.
    pub fn fixed_frame(&self) -> Option<FixedFrame> {
        match self {
            Self::Detached {
                anchor: Some(anchor),
                ..
            } => Some(FixedFrame {
                top: anchor.bottom,
                left: anchor.left,
                width: anchor.width,
            }),
            _ => None,
        }
    }
}

/// The search input shown at the top of the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBox {
    /// The current search text.
    pub text: String,
    /// Whether the clear button is shown.
    pub show_clear: bool,
}

/// A listed option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    /// The option value.
    pub value: String,
    /// The label split into plain and highlighted runs.
    pub segments: Vec<Segment>,
    /// Whether the value is currently selected.
    pub selected: bool,
}

impl OptionRow {
    /// The full label text.
    pub fn label(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Everything the overlay draws.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    /// Placement directive.
    pub placement: Placement,
    /// The search input, when enabled.
    pub search_box: Option<SearchBox>,
    /// Listed options in display order.
    pub rows: Vec<OptionRow>,
}

/// Inputs to [`render_overlay`].
#[derive(Debug, Clone, Copy)]
pub struct OverlayInput<'a> {
    /// Render mode of the open session.
    pub mode: RenderMode,
    /// Current anchor, meaningful only when detached.
    pub anchor: Option<AnchorRect>,
    /// The option list in display order.
    pub options: &'a [SelectOption],
    /// The current selection.
    pub selection: &'a SelectionState,
    /// The host's search text.
    pub search_text: &'a str,
    /// Whether the search box is enabled.
    pub with_search: bool,
    /// How the search text affects the rows.
    pub filter_mode: FilterMode,
}

/// Lay out the overlay.
///
/// The search text only applies while the search box is enabled.
pub fn render_overlay(input: &OverlayInput<'_>) -> OverlayLayout {
    let placement = match input.mode {
        RenderMode::Inline => Placement::Inline {
            z_index: INLINE_Z_INDEX,
        },
        RenderMode::Detached => Placement::Detached {
            anchor: input.anchor,
            z_index: FLOATING_Z_INDEX,
        },
    };

    let search_box = input.with_search.then(|| SearchBox {
        text: input.search_text.to_string(),
        show_clear: !input.search_text.is_empty(),
    });

    let filter = SearchFilter::new(if input.with_search {
        input.search_text
    } else {
        ""
    });
    let hide = input.filter_mode == FilterMode::HideNonMatching;
    let rows = input
        .options
        .iter()
        .filter(|option| !hide || filter.matches(&option.label))
        .map(|option| OptionRow {
            value: option.value.clone(),
            segments: filter.highlight(&option.label),
            selected: input.selection.contains(&option.value),
        })
        .collect();

    OverlayLayout {
        placement,
        search_box,
        rows,
    }
}
