//! Detection of clipping ancestors.
//!
//! An overlay drawn in normal flow below its trigger is cut off by any
//! ancestor that clips or scrolls its content. [`ClippingDetector::scan`]
//! walks the trigger's ancestor chain once per open and decides whether the
//! overlay must be detached from the layout.

use lattice_select_core::{NodeId, TreeDebug, TreeFormatOptions, WidgetTree};

/// Where the overlay is drawn for an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// In normal layout flow beneath the trigger.
    #[default]
    Inline,
    /// Reparented under the document root and anchored to viewport coordinates.
    Detached,
}

/// Outcome of an ancestor scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipScan {
    /// The render mode for this session.
    pub mode: RenderMode,
    /// The nearest ancestor that clips, when there is one.
    pub clipping_ancestor: Option<NodeId>,
}

impl ClipScan {
    const INLINE: Self = Self {
        mode: RenderMode::Inline,
        clipping_ancestor: None,
    };
}

/// One-shot classifier for the overlay render mode.
pub struct ClippingDetector;

impl ClippingDetector {
    /// Scan the ancestors of `trigger`, nearest first.
    ///
    /// The first ancestor with non-visible overflow on the shorthand or
    /// either axis classifies the session as [`RenderMode::Detached`].
    /// Reaching the document root without one yields [`RenderMode::Inline`],
    /// as does a trigger that is no longer in the tree.
    pub fn scan(tree: &WidgetTree, trigger: NodeId) -> ClipScan {
        let ancestors = match tree.ancestors(trigger) {
            Ok(ancestors) => ancestors,
            Err(err) => {
                tracing::warn!(target: "lattice_select::clipping", ?trigger, error = %err, "trigger not in tree, rendering inline");
                return ClipScan::INLINE;
            }
        };

        if tracing::enabled!(target: "lattice_select::clipping", tracing::Level::TRACE)
            && let Ok(chain) = TreeDebug::with_options(TreeFormatOptions {
                show_bounds: false,
                ..Default::default()
            })
            .format_ancestry(tree, trigger)
        {
            tracing::trace!(target: "lattice_select::clipping", "scanning ancestry:\n{chain}");
        }

        let clipping = ancestors
            .into_iter()
            .find(|&ancestor| tree.overflow(ancestor).is_ok_and(|style| style.clips()));

        let scan = match clipping {
            Some(ancestor) => ClipScan {
                mode: RenderMode::Detached,
                clipping_ancestor: Some(ancestor),
            },
            None => ClipScan::INLINE,
        };
        tracing::debug!(target: "lattice_select::clipping", ?trigger, mode = ?scan.mode, clipping_ancestor = ?scan.clipping_ancestor, "classified render mode");
        scan
    }
}
