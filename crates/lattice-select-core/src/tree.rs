//! Widget tree for Lattice Select.
//!
//! Provides the arena-backed node hierarchy that widgets are mounted into:
//! - Stable node identifiers via slotmap storage
//! - Parent-child relationships with cascading removal
//! - Per-node bounding rectangles in viewport coordinates
//! - Per-node computed overflow behavior
//!
//! The tree answers the two questions overlay code needs from a host layout:
//! "where is this node drawn right now" ([`WidgetTree::bounds`]) and "is node X
//! inside node Y" ([`WidgetTree::contains`]). Containment is structural, never
//! geometric, so an overlay reparented under the document root is still
//! recognised as part of its own subtree.
//!
//! # Key Types
//!
//! - [`NodeId`] - Unique stable identifier for each node
//! - [`WidgetTree`] - The arena holding all nodes
//! - [`SharedWidgetTree`] - Cloneable, lock-protected handle to a tree
//! - [`Overflow`] / [`OverflowStyle`] - Computed overflow behavior per node

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use slotmap::{new_key_type, SlotMap};

use crate::error::{TreeError, TreeResult};
use crate::geometry::Rect;

new_key_type! {
    /// A unique identifier for a node in a [`WidgetTree`].
    ///
    /// `NodeId`s remain valid while the tree structure changes around them.
    /// They become invalid once the node (or one of its ancestors) is removed.
    pub struct NodeId;
}

/// Computed overflow behavior for a single axis (or the shorthand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
    /// Content is not clipped and may render outside the box.
    #[default]
    Visible,
    /// Content is clipped with no scrolling.
    Hidden,
    /// Content is clipped and programmatic scrolling is forbidden.
    Clip,
    /// Content is clipped and scrollbars are always shown.
    Scroll,
    /// Content is clipped and scrollbars appear when needed.
    Auto,
}

impl Overflow {
    /// Returns true if this behavior would cut off content drawn outside the box.
    #[inline]
    pub fn clips(self) -> bool {
        !matches!(self, Self::Visible)
    }
}

/// The overflow properties of a node, as a computed style would report them.
///
/// The shorthand and both axes are tracked separately because hosts often set
/// only one axis (e.g. a horizontally scrolling strip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OverflowStyle {
    /// The `overflow` shorthand.
    pub overflow: Overflow,
    /// Horizontal overflow.
    pub overflow_x: Overflow,
    /// Vertical overflow.
    pub overflow_y: Overflow,
}

impl OverflowStyle {
    /// Fully visible overflow on every axis.
    pub const VISIBLE: Self = Self {
        overflow: Overflow::Visible,
        overflow_x: Overflow::Visible,
        overflow_y: Overflow::Visible,
    };

    /// The same behavior on the shorthand and both axes.
    pub const fn uniform(overflow: Overflow) -> Self {
        Self {
            overflow,
            overflow_x: overflow,
            overflow_y: overflow,
        }
    }

    /// Per-axis behavior, leaving the shorthand visible.
    pub const fn axes(overflow_x: Overflow, overflow_y: Overflow) -> Self {
        Self {
            overflow: Overflow::Visible,
            overflow_x,
            overflow_y,
        }
    }

    /// Returns true if any of the shorthand or axis values clips.
    pub fn clips(&self) -> bool {
        self.overflow.clips() || self.overflow_x.clips() || self.overflow_y.clips()
    }
}

/// Internal data stored for each node.
struct NodeData {
    /// Human-readable name for debugging.
    name: String,
    /// Parent node (`None` only for the document root).
    parent: Option<NodeId>,
    /// Child nodes in paint order.
    children: Vec<NodeId>,
    /// Bounding rectangle in viewport coordinates, if laid out.
    bounds: Option<Rect>,
    /// Computed overflow behavior.
    overflow: OverflowStyle,
}

impl NodeData {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            bounds: None,
            overflow: OverflowStyle::VISIBLE,
        }
    }
}

/// Arena-based widget hierarchy with a single document root.
///
/// Every node other than the root has exactly one parent. Removing a node
/// removes its whole subtree.
pub struct WidgetTree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
}

impl WidgetTree {
    /// Create a tree containing only the document root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new("document".to_string(), None));
        Self { nodes, root }
    }

    /// The document root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert a new node as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, name: impl Into<String>) -> TreeResult<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::InvalidNode(parent));
        }
        let name = name.into();
        let id = self.nodes.insert(NodeData::new(name, Some(parent)));
        if let Some(parent_data) = self.nodes.get_mut(parent) {
            parent_data.children.push(id);
        }
        tracing::trace!(target: "lattice_select_core::tree", ?id, ?parent, "inserted node");
        Ok(id)
    }

    /// Remove a node and all of its descendants.
    ///
    /// Returns the number of nodes removed.
    #[tracing::instrument(skip(self), target = "lattice_select_core::tree", level = "trace")]
    pub fn remove(&mut self, id: NodeId) -> TreeResult<usize> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let descendants = self.descendants(id)?;

        if let Some(parent_id) = self.nodes.get(id).and_then(|d| d.parent)
            && let Some(parent_data) = self.nodes.get_mut(parent_id)
        {
            parent_data.children.retain(|&child| child != id);
        }

        for child_id in &descendants {
            self.nodes.remove(*child_id);
        }
        self.nodes.remove(id);

        Ok(descendants.len() + 1)
    }

    /// Move a node (with its subtree) to the end of `new_parent`'s children.
    pub fn set_parent(&mut self, id: NodeId, new_parent: NodeId) -> TreeResult<()> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        if !self.nodes.contains_key(id) {
            return Err(TreeError::InvalidNode(id));
        }
        if !self.nodes.contains_key(new_parent) {
            return Err(TreeError::InvalidNode(new_parent));
        }
        if self.contains(id, new_parent) {
            return Err(TreeError::CircularParentage { node: id });
        }

        if let Some(old_parent) = self.nodes.get(id).and_then(|d| d.parent)
            && let Some(parent_data) = self.nodes.get_mut(old_parent)
        {
            parent_data.children.retain(|&child| child != id);
        }
        if let Some(data) = self.nodes.get_mut(id) {
            data.parent = Some(new_parent);
        }
        if let Some(parent_data) = self.nodes.get_mut(new_parent) {
            parent_data.children.push(id);
        }
        Ok(())
    }

    /// Check if a node exists in the tree.
    #[inline]
    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        self.nodes
            .get(id)
            .map(|d| d.parent)
            .ok_or(TreeError::InvalidNode(id))
    }

    /// Get the children of a node.
    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        self.nodes
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(TreeError::InvalidNode(id))
    }

    /// Get the name of a node.
    pub fn name(&self, id: NodeId) -> TreeResult<&str> {
        self.nodes
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(TreeError::InvalidNode(id))
    }

    /// Get all ancestors of a node from immediate parent to the document root.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::InvalidNode(id));
        }

        let mut result = Vec::new();
        let mut current = self.nodes.get(id).and_then(|d| d.parent);
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// Get every descendant of a node in depth-first pre-order, excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let data = self.nodes.get(id).ok_or(TreeError::InvalidNode(id))?;
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = data.children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(child_data) = self.nodes.get(current) {
                stack.extend(child_data.children.iter().rev().copied());
            }
        }
        Ok(result)
    }

    /// Check whether `node` is `ancestor` or lies anywhere in its subtree.
    ///
    /// Returns `false` if either node does not exist.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.nodes.contains_key(ancestor) {
            return false;
        }
        let mut current = Some(node);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// The node's bounding rectangle, or `None` if it is not laid out or does not exist.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).and_then(|d| d.bounds)
    }

    /// Set (or clear) the node's bounding rectangle.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Option<Rect>) -> TreeResult<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.bounds = bounds)
            .ok_or(TreeError::InvalidNode(id))
    }

    /// The node's computed overflow behavior.
    pub fn overflow(&self, id: NodeId) -> TreeResult<OverflowStyle> {
        self.nodes
            .get(id)
            .map(|d| d.overflow)
            .ok_or(TreeError::InvalidNode(id))
    }

    /// Set the node's computed overflow behavior.
    pub fn set_overflow(&mut self, id: NodeId, overflow: OverflowStyle) -> TreeResult<()> {
        self.nodes
            .get_mut(id)
            .map(|d| d.overflow = overflow)
            .ok_or(TreeError::InvalidNode(id))
    }

    /// Scroll a container's content by `(dx, dy)`.
    ///
    /// Every laid-out descendant moves by `(-dx, -dy)` in viewport
    /// coordinates; the container itself stays put.
    pub fn scroll_by(&mut self, container: NodeId, dx: f32, dy: f32) -> TreeResult<()> {
        for id in self.descendants(container)? {
            if let Some(data) = self.nodes.get_mut(id)
                && let Some(bounds) = data.bounds
            {
                data.bounds = Some(bounds.offset(-dx, -dy));
            }
        }
        tracing::trace!(target: "lattice_select_core::tree", ?container, dx, dy, "scrolled container");
        Ok(())
    }

    /// Total number of nodes, including the document root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe handle to a [`WidgetTree`].
///
/// Listeners registered on the event bus hold a clone of this handle so that
/// they can read live geometry when an event fires. Never hold a write guard
/// while dispatching events.
#[derive(Clone, Default)]
pub struct SharedWidgetTree {
    inner: Arc<RwLock<WidgetTree>>,
}

impl SharedWidgetTree {
    /// Create a new shared tree containing only the document root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, WidgetTree> {
        self.inner.read()
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, WidgetTree> {
        self.inner.write()
    }

    /// Run a closure with read access.
    pub fn with_read<R>(&self, f: impl FnOnce(&WidgetTree) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a closure with write access.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut WidgetTree) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// The document root node.
    pub fn root(&self) -> NodeId {
        self.inner.read().root()
    }
}

static_assertions::assert_impl_all!(SharedWidgetTree: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (WidgetTree, NodeId, NodeId, NodeId) {
        let mut tree = WidgetTree::new();
        let panel = tree.insert(tree.root(), "panel").unwrap();
        let button = tree.insert(panel, "button").unwrap();
        let icon = tree.insert(button, "icon").unwrap();
        (tree, panel, button, icon)
    }

    #[test]
    fn test_new_tree_has_root() {
        let tree = WidgetTree::new();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.name(tree.root()).unwrap(), "document");
        assert_eq!(tree.parent(tree.root()).unwrap(), None);
    }

    #[test]
    fn test_insert_and_children() {
        let (tree, panel, button, _) = sample();
        assert_eq!(tree.children(tree.root()).unwrap(), &[panel]);
        assert_eq!(tree.children(panel).unwrap(), &[button]);
        assert_eq!(tree.parent(button).unwrap(), Some(panel));
    }

    #[test]
    fn test_insert_into_missing_parent() {
        let (mut tree, panel, _, _) = sample();
        tree.remove(panel).unwrap();
        assert_eq!(
            tree.insert(panel, "orphan"),
            Err(TreeError::InvalidNode(panel))
        );
    }

    #[test]
    fn test_remove_cascades() {
        let (mut tree, panel, button, icon) = sample();
        assert_eq!(tree.remove(panel).unwrap(), 3);
        assert!(!tree.exists(button));
        assert!(!tree.exists(icon));
        assert_eq!(tree.node_count(), 1);
        assert!(tree.children(tree.root()).unwrap().is_empty());
    }

    #[test]
    fn test_root_is_immutable() {
        let (mut tree, panel, _, _) = sample();
        let root = tree.root();
        assert_eq!(tree.remove(root), Err(TreeError::RootImmutable));
        assert_eq!(tree.set_parent(root, panel), Err(TreeError::RootImmutable));
    }

    #[test]
    fn test_ancestors_order() {
        let (tree, panel, button, icon) = sample();
        assert_eq!(tree.ancestors(icon).unwrap(), vec![button, panel, tree.root()]);
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut tree, panel, button, icon) = sample();
        let label = tree.insert(panel, "label").unwrap();
        assert_eq!(tree.descendants(panel).unwrap(), vec![button, icon, label]);
    }

    #[test]
    fn test_contains_is_inclusive_and_structural() {
        let (mut tree, panel, button, icon) = sample();
        assert!(tree.contains(button, button));
        assert!(tree.contains(panel, icon));
        assert!(!tree.contains(icon, panel));

        // Reparent under the root: containment follows the structure.
        tree.set_parent(icon, tree.root()).unwrap();
        assert!(!tree.contains(panel, icon));
        assert!(tree.contains(tree.root(), icon));
    }

    #[test]
    fn test_contains_missing_nodes() {
        let (mut tree, panel, button, _) = sample();
        tree.remove(button).unwrap();
        assert!(!tree.contains(button, button));
        assert!(!tree.contains(panel, button));
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let (mut tree, panel, _, icon) = sample();
        assert_eq!(
            tree.set_parent(panel, icon),
            Err(TreeError::CircularParentage { node: panel })
        );
    }

    #[test]
    fn test_bounds_and_overflow() {
        let (mut tree, panel, button, _) = sample();
        assert_eq!(tree.bounds(button), None);
        tree.set_bounds(button, Some(Rect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
        assert_eq!(tree.bounds(button), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        assert!(!tree.overflow(panel).unwrap().clips());
        tree.set_overflow(panel, OverflowStyle::axes(Overflow::Visible, Overflow::Auto))
            .unwrap();
        assert!(tree.overflow(panel).unwrap().clips());
    }

    #[test]
    fn test_scroll_by_moves_descendants_only() {
        let (mut tree, panel, button, icon) = sample();
        tree.set_bounds(panel, Some(Rect::new(0.0, 0.0, 200.0, 100.0))).unwrap();
        tree.set_bounds(button, Some(Rect::new(10.0, 50.0, 80.0, 20.0))).unwrap();

        tree.scroll_by(panel, 0.0, 30.0).unwrap();

        assert_eq!(tree.bounds(panel), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
        assert_eq!(tree.bounds(button), Some(Rect::new(10.0, 20.0, 80.0, 20.0)));
        // Not laid out: stays without bounds.
        assert_eq!(tree.bounds(icon), None);
    }

    #[test]
    fn test_overflow_clips() {
        assert!(!Overflow::Visible.clips());
        for overflow in [Overflow::Hidden, Overflow::Clip, Overflow::Scroll, Overflow::Auto] {
            assert!(overflow.clips());
            assert!(OverflowStyle::uniform(overflow).clips());
        }
        assert!(!OverflowStyle::VISIBLE.clips());
    }

    #[test]
    fn test_shared_tree_access() {
        let shared = SharedWidgetTree::new();
        let root = shared.root();
        let node = shared.with_write(|tree| tree.insert(root, "node")).unwrap();
        assert!(shared.read().exists(node));
        assert_eq!(shared.with_read(|tree| tree.node_count()), 2);
    }
}
