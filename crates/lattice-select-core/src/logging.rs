//! Logging and debugging facilities for Lattice Select.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Debug visualization for widget trees
//!
//! # Tracing Integration
//!
//! Lattice Select uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_select=debug,lattice_select_core=debug")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```ignore
//! use lattice_select_core::logging::TreeDebug;
//!
//! let output = TreeDebug::new().format_subtree(&tree, tree.root())?;
//! println!("{output}");
//! ```

use std::fmt::Write as FmtWrite;

use crate::error::TreeResult;
use crate::tree::{NodeId, Overflow, WidgetTree};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "lattice_select_core";
    /// Widget tree target.
    pub const TREE: &str = "lattice_select_core::tree";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_select_core::signal";
    /// Event bus target.
    pub const EVENT_BUS: &str = "lattice_select_core::event_bus";
    /// Select widget target.
    pub const SELECT: &str = "lattice_select::select";
    /// Clipping detection target.
    pub const CLIPPING: &str = "lattice_select::clipping";
    /// Overlay position tracking target.
    pub const POSITION: &str = "lattice_select::position";
    /// Outside-press dismissal target.
    pub const DISMISSAL: &str = "lattice_select::dismissal";
    /// Search filtering target.
    pub const SEARCH: &str = "lattice_select::search";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node IDs.
    pub show_ids: bool,
    /// Whether to show bounding rectangles.
    pub show_bounds: bool,
    /// Whether to show non-visible overflow.
    pub show_overflow: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_bounds: true,
            show_overflow: true,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output (names only).
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_bounds: false,
            show_overflow: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing widget trees.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a subtree starting from a specific node.
    pub fn format_subtree(&self, tree: &WidgetTree, root: NodeId) -> TreeResult<String> {
        let mut output = String::new();
        self.format_subtree_into(tree, root, 0, true, &mut output)?;
        Ok(output)
    }

    /// Format the chain from `node` up to the document root, one node per line.
    ///
    /// Useful when diagnosing why an overlay was detached.
    pub fn format_ancestry(&self, tree: &WidgetTree, node: NodeId) -> TreeResult<String> {
        let mut output = String::new();
        let mut chain = vec![node];
        chain.extend(tree.ancestors(node)?);
        for id in chain {
            self.format_node_line(tree, id, &mut output)?;
            output.push('\n');
        }
        Ok(output)
    }

    fn format_subtree_into(
        &self,
        tree: &WidgetTree,
        id: NodeId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> TreeResult<()> {
        if let Some(max) = self.options.max_depth
            && depth > max
        {
            return Ok(());
        }

        output.push_str(&self.build_prefix(depth, is_last));
        self.format_node_line(tree, id, output)?;
        output.push('\n');

        let children = tree.children(id)?;
        let child_count = children.len();
        for (i, &child_id) in children.iter().enumerate() {
            self.format_subtree_into(tree, child_id, depth + 1, i + 1 == child_count, output)?;
        }
        Ok(())
    }

    fn format_node_line(&self, tree: &WidgetTree, id: NodeId, output: &mut String) -> TreeResult<()> {
        let name = tree.name(id)?;
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });

        if self.options.show_ids {
            write!(output, " [{id:?}]").expect("write to String");
        }

        if self.options.show_overflow {
            let style = tree.overflow(id)?;
            if style.clips() {
                let axes = [
                    ("overflow", style.overflow),
                    ("overflow-x", style.overflow_x),
                    ("overflow-y", style.overflow_y),
                ];
                for (property, value) in axes {
                    if value != Overflow::Visible {
                        write!(output, " {property}:{}", overflow_keyword(value))
                            .expect("write to String");
                    }
                }
            }
        }

        if self.options.show_bounds {
            match tree.bounds(id) {
                Some(rect) => write!(
                    output,
                    " @({}, {} {}x{})",
                    rect.left(),
                    rect.top(),
                    rect.width(),
                    rect.height()
                )
                .expect("write to String"),
                None => output.push_str(" @(unlaid)"),
            }
        }
        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str("  ");
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

fn overflow_keyword(value: Overflow) -> &'static str {
    match value {
        Overflow::Visible => "visible",
        Overflow::Hidden => "hidden",
        Overflow::Clip => "clip",
        Overflow::Scroll => "scroll",
        Overflow::Auto => "auto",
    }
}
