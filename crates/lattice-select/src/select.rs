//! The select widget.
//!
//! [`Select`] wires the selection model, clipping detector, position tracker,
//! dismissal controller and renderers into one controlled component:
//!
//! - The host owns the selected value and the search text. User actions are
//!   reported through signals; the widget's stored value only changes when
//!   the host calls [`Select::set_value`] or [`Select::set_search_text`].
//! - Open state, render mode and the anchor are internal to the widget.
//!
//! Every transition runs the same sequence: update state, reconcile the
//! bus subscriptions against it (position tracking iff open and detached,
//! dismissal iff open), then emit notifications once the widget's lock is
//! released, so slots may call back into the widget.
//!
//! # Node Layout
//!
//! ```text
//! select                      (container, under the mount parent)
//! ├── select-label
//! └── select-trigger
//!     └── select-chip*
//!         └── select-chip-remove   (multiple mode only)
//! select-overlay              (under the container, or the document root when detached)
//! ├── select-search
//! ├── select-search-clear     (while the search text is non-empty)
//! └── select-option*
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_select::{Select, SelectConfig};
//! use lattice_select_core::{EventBus, SharedWidgetTree};
//!
//! let tree = SharedWidgetTree::new();
//! let bus = Arc::new(EventBus::new(tree.root()));
//! let select = Select::new(
//!     tree.clone(),
//!     bus.clone(),
//!     SelectConfig::new().with_option("1", "A").with_option("2", "B"),
//! );
//! select.mount(tree.root()).unwrap();
//!
//! select.on_value_changed().connect(|value| println!("picked {value:?}"));
//! select.open();
//! assert!(select.is_open());
//! select.toggle("2");
//! assert!(!select.is_open());
//! assert_eq!(bus.total_listener_count(), 0);
//! ```

use std::sync::{Arc, Weak};

use lattice_select_core::{
    EventBus, NodeId, SharedWidgetTree, Signal, TreeError, TreeResult, WidgetTree,
};
use parking_lot::Mutex;

use crate::clipping::{ClippingDetector, RenderMode};
use crate::config::SelectConfig;
use crate::dismissal::DismissalController;
use crate::error::{SelectError, SelectResult};
use crate::option::SelectOption;
use crate::overlay::{render_overlay, OverlayInput, OverlayLayout};
use crate::position::{AnchorRect, PositionTracker};
use crate::selection::{SelectionMode, SelectionState, SelectionValue};
use crate::trigger::{render_trigger, TriggerContent};

/// What a routed click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The trigger was clicked and the dropdown opened.
    Opened,
    /// The trigger was clicked and the dropdown closed.
    Closed,
    /// An option row was clicked.
    OptionToggled(String),
    /// A chip's remove button was clicked.
    ChipRemoved(String),
    /// The search clear button was clicked.
    SearchCleared,
    /// The click did not hit an interactive part of the widget.
    Ignored,
}

enum Route {
    ToggleOpen,
    Toggle(String),
    Remove(String),
    ClearSearch,
    Nothing,
}

enum Notice {
    Value(SelectionValue),
    Search(String),
    Open(bool),
    Position(AnchorRect),
}

struct ChipNodes {
    value: String,
    remove: Option<NodeId>,
}

/// Nodes that exist while the widget is mounted.
struct Mounted {
    container: NodeId,
    label: NodeId,
    trigger: NodeId,
    chips: Vec<ChipNodes>,
    chip_nodes: Vec<NodeId>,
    tracker: PositionTracker,
}

/// One open session.
struct Session {
    mode: RenderMode,
    overlay: NodeId,
    search: Option<NodeId>,
    search_clear: Option<NodeId>,
    rows: Vec<(NodeId, String)>,
}

struct State {
    config: SelectConfig,
    search_text: String,
    mounted: Option<Mounted>,
    session: Option<Session>,
    dismissal: DismissalController,
}

impl State {
    fn selection(&self) -> SelectionState {
        SelectionState::from_value(self.config.mode(), &self.config.value)
    }

    fn anchor(&self) -> Option<AnchorRect> {
        match (&self.session, &self.mounted) {
            (
                Some(Session {
                    mode: RenderMode::Detached,
                    ..
                }),
                Some(mounted),
            ) => mounted.tracker.anchor(),
            _ => None,
        }
    }

    fn overlay_layout(&self) -> Option<OverlayLayout> {
        let session = self.session.as_ref()?;
        let selection = self.selection();
        Some(render_overlay(&OverlayInput {
            mode: session.mode,
            anchor: self.anchor(),
            options: &self.config.options,
            selection: &selection,
            search_text: &self.search_text,
            with_search: self.config.with_search,
            filter_mode: self.config.filter_mode,
        }))
    }

    fn trigger_content(&self) -> TriggerContent {
        render_trigger(
            &self.config.options,
            &self.selection(),
            &self.config.placeholder,
        )
    }

    fn active_listener_count(&self) -> usize {
        let tracking = self
            .mounted
            .as_ref()
            .map_or(0, |mounted| mounted.tracker.subscription_count());
        tracking + self.dismissal.subscription_count()
    }
}

struct Inner {
    this: Weak<Inner>,
    tree: SharedWidgetTree,
    bus: Arc<EventBus>,
    state: Mutex<State>,
    value_changed: Signal<SelectionValue>,
    search_changed: Signal<String>,
    open_changed: Signal<bool>,
    position_changed: Arc<Signal<AnchorRect>>,
}

/// A dropdown select.
///
/// Dropping the widget releases its bus listeners and removes its nodes
/// from the tree.
pub struct Select {
    inner: Arc<Inner>,
}

impl Select {
    /// Create an unmounted select.
    pub fn new(tree: SharedWidgetTree, bus: Arc<EventBus>, config: SelectConfig) -> Self {
        let dismissal = DismissalController::new(bus.clone(), tree.clone());
        let inner = Arc::new_cyclic(|this| Inner {
            this: this.clone(),
            tree,
            bus,
            state: Mutex::new(State {
                config,
                search_text: String::new(),
                mounted: None,
                session: None,
                dismissal,
            }),
            value_changed: Signal::new(),
            search_changed: Signal::new(),
            open_changed: Signal::new(),
            position_changed: Arc::new(Signal::new()),
        });
        Self { inner }
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted with the new selection after a toggle, removal or mode reset.
    pub fn on_value_changed(&self) -> &Signal<SelectionValue> {
        &self.inner.value_changed
    }

    /// Emitted with the new search text when the user types or clears it.
    pub fn on_search_changed(&self) -> &Signal<String> {
        &self.inner.search_changed
    }

    /// Emitted when the dropdown opens (`true`) or closes (`false`).
    pub fn on_open_changed(&self) -> &Signal<bool> {
        &self.inner.open_changed
    }

    /// Emitted when a detached overlay's anchor moves.
    pub fn on_position_changed(&self) -> &Signal<AnchorRect> {
        &self.inner.position_changed
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Insert the widget's nodes under `parent`.
    pub fn mount(&self, parent: NodeId) -> SelectResult<()> {
        self.inner.mount(parent)
    }

    /// Close the dropdown, release every listener and remove the widget's
    /// nodes from the tree.
    pub fn unmount(&self) -> SelectResult<()> {
        self.inner.run(|inner, state, notices| -> SelectResult<()> {
            if state.mounted.is_none() {
                return Err(SelectError::NotMounted);
            }
            inner.teardown(state, notices);
            Ok(())
        })
    }

    /// Whether the widget is in a tree.
    pub fn is_mounted(&self) -> bool {
        self.inner.state.lock().mounted.is_some()
    }

    // =========================================================================
    // Open State
    // =========================================================================

    /// Open the dropdown.
    ///
    /// Classifies the render mode for this session, creates the overlay and
    /// starts listening for outside presses (and scroll/resize when detached).
    /// Does nothing when already open or not mounted.
    pub fn open(&self) {
        self.inner.run(|inner, state, notices| inner.open(state, notices));
    }

    /// Close the dropdown and release its listeners. Idempotent.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Open when closed, close when open.
    pub fn toggle_open(&self) {
        self.inner.run(|inner, state, notices| {
            if state.session.is_some() {
                inner.close_locked(state, notices);
            } else {
                inner.open(state, notices);
            }
        });
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.inner.state.lock().session.is_some()
    }

    /// The render mode of the open session, or `None` when closed.
    pub fn render_mode(&self) -> Option<RenderMode> {
        self.inner.state.lock().session.as_ref().map(|s| s.mode)
    }

    /// The trigger's edges while open and detached.
    pub fn anchor_rect(&self) -> Option<AnchorRect> {
        self.inner.state.lock().anchor()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggle `value` and report the resulting selection.
    ///
    /// In single mode this commits and closes the dropdown.
    pub fn toggle(&self, value: &str) {
        self.inner.run(|inner, state, notices| {
            let outcome = state.selection().toggle(value);
            tracing::debug!(target: "lattice_select::select", value, close = outcome.close, "option toggled");
            notices.push(Notice::Value(outcome.value()));
            if outcome.close {
                inner.close_locked(state, notices);
            }
        });
    }

    /// Remove `value` from a multiple selection and report the result.
    ///
    /// Does nothing in single mode or when `value` is not selected. Never
    /// opens or closes the dropdown.
    pub fn remove(&self, value: &str) {
        self.inner.run(|_, state, notices| {
            if let Some(next) = state.selection().remove(value) {
                tracing::debug!(target: "lattice_select::select", value, "value removed");
                notices.push(Notice::Value(next.to_value()));
            }
        });
    }

    /// Route a click on `target` to the part of the widget it hit.
    ///
    /// Chip remove buttons take precedence over the trigger they sit in, so
    /// removing a chip never toggles the dropdown.
    #[tracing::instrument(skip(self), target = "lattice_select::select", level = "debug")]
    pub fn click(&self, target: NodeId) -> ClickOutcome {
        let route = {
            let state = self.inner.state.lock();
            let tree = self.inner.tree.read();
            route(&tree, &state, target)
        };
        match route {
            Route::ToggleOpen => self.inner.run(|inner, state, notices| {
                if state.session.is_some() {
                    inner.close_locked(state, notices);
                    ClickOutcome::Closed
                } else {
                    inner.open(state, notices);
                    if state.session.is_some() {
                        ClickOutcome::Opened
                    } else {
                        ClickOutcome::Ignored
                    }
                }
            }),
            Route::Toggle(value) => {
                self.toggle(&value);
                ClickOutcome::OptionToggled(value)
            }
            Route::Remove(value) => {
                self.remove(&value);
                ClickOutcome::ChipRemoved(value)
            }
            Route::ClearSearch => {
                self.clear_search();
                ClickOutcome::SearchCleared
            }
            Route::Nothing => ClickOutcome::Ignored,
        }
    }

    /// The current selection in host shape.
    pub fn value(&self) -> SelectionValue {
        self.inner.state.lock().selection().to_value()
    }

    /// The current selection.
    pub fn selection(&self) -> SelectionState {
        self.inner.state.lock().selection()
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.inner.state.lock().config.mode()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Report text typed into the search box.
    pub fn input_search(&self, text: &str) {
        self.inner.run(|_, _, notices| notices.push(Notice::Search(text.to_string())));
    }

    /// Report the search box being cleared.
    pub fn clear_search(&self) {
        self.inner.run(|_, _, notices| notices.push(Notice::Search(String::new())));
    }

    /// The host's search text.
    pub fn search_text(&self) -> String {
        self.inner.state.lock().search_text.clone()
    }

    // =========================================================================
    // Host Updates
    // =========================================================================

    /// Replace the selection. Does not notify.
    pub fn set_value(&self, value: impl Into<SelectionValue>) {
        let value = value.into();
        self.inner.run(|inner, state, _| {
            state.config.value = value;
            inner.sync_chips(state);
            inner.sync_overlay(state);
        });
    }

    /// Replace the options.
    pub fn set_options(&self, options: Vec<SelectOption>) {
        self.inner.run(|inner, state, _| {
            state.config.options = options;
            inner.sync_chips(state);
            inner.sync_overlay(state);
        });
    }

    /// Switch between single and multiple selection.
    ///
    /// The selection is reset to the empty value of the new mode and the
    /// reset value is reported.
    pub fn set_multiple(&self, multiple: bool) {
        self.inner.run(|inner, state, notices| {
            if state.config.multiple == multiple {
                return;
            }
            state.config.multiple = multiple;
            let reset = SelectionValue::empty(state.config.mode());
            state.config.value = reset.clone();
            tracing::debug!(target: "lattice_select::select", mode = ?state.config.mode(), "selection mode changed, value reset");
            inner.sync_chips(state);
            inner.sync_overlay(state);
            notices.push(Notice::Value(reset));
        });
    }

    /// Show or hide the search box.
    pub fn set_with_search(&self, enabled: bool) {
        self.inner.run(|inner, state, _| {
            state.config.with_search = enabled;
            inner.sync_overlay(state);
        });
    }

    /// Replace the search text. Does not notify.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.run(|inner, state, _| {
            state.search_text = text;
            inner.sync_overlay(state);
        });
    }

    /// Replace the placeholder.
    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        self.inner.state.lock().config.placeholder = placeholder.into();
    }

    /// Replace the label text.
    pub fn set_label(&self, label: impl Into<String>) {
        self.inner.state.lock().config.label = label.into();
    }

    /// The label text.
    pub fn label(&self) -> String {
        self.inner.state.lock().config.label.clone()
    }

    /// The current configuration, with the host's latest updates applied.
    pub fn config(&self) -> SelectConfig {
        self.inner.state.lock().config.clone()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// What the trigger shows.
    pub fn trigger_content(&self) -> TriggerContent {
        self.inner.state.lock().trigger_content()
    }

    /// The overlay layout, or `None` when closed.
    pub fn overlay_layout(&self) -> Option<OverlayLayout> {
        self.inner.state.lock().overlay_layout()
    }

    // =========================================================================
    // Nodes and Diagnostics
    // =========================================================================

    /// The container node.
    pub fn container_node(&self) -> Option<NodeId> {
        self.inner.state.lock().mounted.as_ref().map(|m| m.container)
    }

    /// The label node.
    pub fn label_node(&self) -> Option<NodeId> {
        self.inner.state.lock().mounted.as_ref().map(|m| m.label)
    }

    /// The trigger node.
    pub fn trigger_node(&self) -> Option<NodeId> {
        self.inner.state.lock().mounted.as_ref().map(|m| m.trigger)
    }

    /// The remove button of the chip for `value`.
    pub fn chip_remove_node(&self, value: &str) -> Option<NodeId> {
        let state = self.inner.state.lock();
        state
            .mounted
            .as_ref()?
            .chips
            .iter()
            .find(|chip| chip.value == value)
            .and_then(|chip| chip.remove)
    }

    /// The overlay node while open.
    pub fn overlay_node(&self) -> Option<NodeId> {
        self.inner.state.lock().session.as_ref().map(|s| s.overlay)
    }

    /// The row for `value` while open and listed.
    pub fn option_node(&self, value: &str) -> Option<NodeId> {
        let state = self.inner.state.lock();
        state
            .session
            .as_ref()?
            .rows
            .iter()
            .find(|(_, row_value)| row_value == value)
            .map(|(node, _)| *node)
    }

    /// The search box while open and enabled.
    pub fn search_node(&self) -> Option<NodeId> {
        self.inner.state.lock().session.as_ref()?.search
    }

    /// The search clear button while shown.
    pub fn search_clear_node(&self) -> Option<NodeId> {
        self.inner.state.lock().session.as_ref()?.search_clear
    }

    /// Number of bus listeners this widget currently holds.
    pub fn active_listener_count(&self) -> usize {
        self.inner.state.lock().active_listener_count()
    }
}

impl Drop for Select {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        if state.mounted.is_some() {
            // Nobody is left to observe notifications from a dropped widget.
            let mut discarded = Vec::new();
            self.inner.teardown(&mut *state, &mut discarded);
        }
    }
}

static_assertions::assert_impl_all!(Select: Send, Sync);

impl Inner {
    /// Run `f` under the state lock, then deliver its notifications.
    fn run<R>(&self, f: impl FnOnce(&Inner, &mut State, &mut Vec<Notice>) -> R) -> R {
        let mut notices = Vec::new();
        let result = {
            let mut state = self.state.lock();
            f(self, &mut *state, &mut notices)
        };
        self.flush(notices);
        result
    }

    fn flush(&self, notices: Vec<Notice>) {
        for notice in notices {
            match notice {
                Notice::Value(value) => self.value_changed.emit(value),
                Notice::Search(text) => self.search_changed.emit(text),
                Notice::Open(open) => self.open_changed.emit(open),
                Notice::Position(anchor) => self.position_changed.emit(anchor),
            }
        }
    }

    fn mount(&self, parent: NodeId) -> SelectResult<()> {
        self.run(|inner, state, _| -> SelectResult<()> {
            if state.mounted.is_some() {
                return Err(SelectError::AlreadyMounted);
            }
            let (container, label, trigger) = inner.tree.with_write(|tree| -> TreeResult<_> {
                let container = tree.insert(parent, "select")?;
                let label = tree.insert(container, "select-label")?;
                let trigger = tree.insert(container, "select-trigger")?;
                Ok((container, label, trigger))
            })?;
            let tracker = PositionTracker::new(
                inner.bus.clone(),
                inner.tree.clone(),
                trigger,
                inner.position_changed.clone(),
            );
            state.mounted = Some(Mounted {
                container,
                label,
                trigger,
                chips: Vec::new(),
                chip_nodes: Vec::new(),
                tracker,
            });
            inner.sync_chips(state);
            tracing::debug!(target: "lattice_select::select", ?parent, ?container, "select mounted");
            Ok(())
        })
    }

    fn teardown(&self, state: &mut State, notices: &mut Vec<Notice>) {
        self.close_locked(state, notices);
        if let Some(mounted) = state.mounted.take() {
            let container = mounted.container;
            // Dropping the tracker releases anything it still holds.
            drop(mounted);
            if let Err(err) = self.tree.write().remove(container) {
                tracing::warn!(target: "lattice_select::select", ?container, error = %err, "container already removed");
            }
            tracing::debug!(target: "lattice_select::select", ?container, "select unmounted");
        }
    }

    fn open(&self, state: &mut State, notices: &mut Vec<Notice>) {
        if state.session.is_some() {
            return;
        }
        let Some(mounted) = &state.mounted else {
            tracing::warn!(target: "lattice_select::select", "open ignored, select is not mounted");
            return;
        };
        let (container, trigger) = (mounted.container, mounted.trigger);

        let created = self.tree.with_write(|tree| {
            let scan = ClippingDetector::scan(tree, trigger);
            let parent = match scan.mode {
                RenderMode::Inline => container,
                RenderMode::Detached => tree.root(),
            };
            tree.insert(parent, "select-overlay")
                .map(|overlay| (scan.mode, overlay))
        });
        let (mode, overlay) = match created {
            Ok(created) => created,
            Err(err) => {
                tracing::warn!(target: "lattice_select::select", error = %err, "could not create overlay, staying closed");
                return;
            }
        };

        state.session = Some(Session {
            mode,
            overlay,
            search: None,
            search_clear: None,
            rows: Vec::new(),
        });
        self.sync_overlay(state);
        self.reconcile(state, notices);
        tracing::debug!(target: "lattice_select::select", ?mode, ?overlay, "dropdown opened");
        notices.push(Notice::Open(true));
    }

    fn close(&self) {
        self.run(|inner, state, notices| inner.close_locked(state, notices));
    }

    fn close_locked(&self, state: &mut State, notices: &mut Vec<Notice>) {
        let Some(session) = state.session.take() else {
            return;
        };
        self.reconcile(state, notices);
        if let Err(err) = self.tree.write().remove(session.overlay) {
            tracing::warn!(target: "lattice_select::select", overlay = ?session.overlay, error = %err, "overlay already removed");
        }
        tracing::debug!(target: "lattice_select::select", mode = ?session.mode, "dropdown closed");
        notices.push(Notice::Open(false));
    }

    /// Bring the bus subscriptions in line with the current state.
    fn reconcile(&self, state: &mut State, notices: &mut Vec<Notice>) {
        let (open, detached, overlay) = match &state.session {
            Some(session) => (true, session.mode == RenderMode::Detached, Some(session.overlay)),
            None => (false, false, None),
        };

        if let Some(mounted) = state.mounted.as_mut() {
            if open && detached {
                if !mounted.tracker.is_active()
                    && let Some(anchor) = mounted.tracker.activate()
                {
                    notices.push(Notice::Position(anchor));
                }
            } else {
                mounted.tracker.deactivate();
            }
        }

        match (&state.mounted, overlay) {
            (Some(mounted), Some(overlay)) => {
                let this = self.this.clone();
                state
                    .dismissal
                    .activate(vec![mounted.container, overlay], move || {
                        if let Some(inner) = this.upgrade() {
                            inner.close();
                        }
                    });
            }
            _ => state.dismissal.deactivate(),
        }
        tracing::trace!(target: "lattice_select::select", open, detached, listeners = state.active_listener_count(), "reconciled listeners");
    }

    /// Rebuild the chip nodes from the current selection.
    fn sync_chips(&self, state: &mut State) {
        let content = state.trigger_content();
        let Some(mounted) = state.mounted.as_mut() else {
            return;
        };
        let result = self.tree.with_write(|tree| {
            for chip in mounted.chip_nodes.drain(..) {
                if tree.exists(chip) {
                    tree.remove(chip)?;
                }
            }
            mounted.chips.clear();
            if let TriggerContent::Chips(chips) = content {
                for chip in chips {
                    let node = tree.insert(mounted.trigger, "select-chip")?;
                    let remove = if chip.removable {
                        Some(tree.insert(node, "select-chip-remove")?)
                    } else {
                        None
                    };
                    mounted.chip_nodes.push(node);
                    mounted.chips.push(ChipNodes {
                        value: chip.value,
                        remove,
                    });
                }
            }
            Ok::<_, TreeError>(())
        });
        if let Err(err) = result {
            tracing::warn!(target: "lattice_select::select", error = %err, "could not rebuild chips");
        }
    }

    /// Rebuild the overlay's children from the current layout.
    fn sync_overlay(&self, state: &mut State) {
        let Some(layout) = state.overlay_layout() else {
            return;
        };
        let Some(session) = state.session.as_mut() else {
            return;
        };
        let overlay = session.overlay;
        let result = self.tree.with_write(|tree| rebuild_overlay(tree, session, &layout));
        if let Err(err) = result {
            tracing::warn!(target: "lattice_select::select", ?overlay, error = %err, "could not rebuild overlay");
        }
    }
}

fn rebuild_overlay(tree: &mut WidgetTree, session: &mut Session, layout: &OverlayLayout) -> TreeResult<()> {
    for child in tree.children(session.overlay)?.to_vec() {
        tree.remove(child)?;
    }
    session.search = None;
    session.search_clear = None;
    session.rows.clear();

    if let Some(search_box) = &layout.search_box {
        session.search = Some(tree.insert(session.overlay, "select-search")?);
        if search_box.show_clear {
            session.search_clear = Some(tree.insert(session.overlay, "select-search-clear")?);
        }
    }
    for row in &layout.rows {
        let node = tree.insert(session.overlay, "select-option")?;
        session.rows.push((node, row.value.clone()));
    }
    Ok(())
}

fn route(tree: &WidgetTree, state: &State, target: NodeId) -> Route {
    let Some(mounted) = &state.mounted else {
        return Route::Nothing;
    };
    if let Some(chip) = mounted.chips.iter().find(|chip| {
        chip.remove
            .is_some_and(|remove| tree.contains(remove, target))
    }) {
        return Route::Remove(chip.value.clone());
    }
    if let Some(session) = &state.session {
        if session.search_clear.is_some_and(|clear| tree.contains(clear, target)) {
            return Route::ClearSearch;
        }
        if session.search.is_some_and(|search| tree.contains(search, target)) {
            return Route::Nothing;
        }
        if let Some((_, value)) = session
            .rows
            .iter()
            .find(|(row, _)| tree.contains(*row, target))
        {
            return Route::Toggle(value.clone());
        }
    }
    if tree.contains(mounted.trigger, target) {
        return Route::ToggleOpen;
    }
    Route::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_select_core::{Overflow, OverflowStyle, Rect};

    struct Fixture {
        tree: SharedWidgetTree,
        bus: Arc<EventBus>,
        panel: NodeId,
    }

    fn setup() -> Fixture {
        let tree = SharedWidgetTree::new();
        let panel = tree.with_write(|t| t.insert(t.root(), "panel").unwrap());
        let bus = Arc::new(EventBus::new(tree.root()));
        Fixture { tree, bus, panel }
    }

    fn mounted(f: &Fixture, config: SelectConfig) -> Select {
        let select = Select::new(f.tree.clone(), f.bus.clone(), config);
        select.mount(f.panel).unwrap();
        let trigger = select.trigger_node().unwrap();
        f.tree
            .with_write(|t| t.set_bounds(trigger, Some(Rect::new(0.0, 20.0, 120.0, 30.0))))
            .unwrap();
        select
    }

    #[test]
    fn test_mount_twice_fails() {
        let f = setup();
        let select = mounted(&f, SelectConfig::new());
        assert_eq!(select.mount(f.panel), Err(SelectError::AlreadyMounted));
    }

    #[test]
    fn test_mount_into_missing_parent_fails() {
        let f = setup();
        let select = Select::new(f.tree.clone(), f.bus.clone(), SelectConfig::new());
        f.tree.with_write(|t| t.remove(f.panel)).unwrap();
        assert!(matches!(select.mount(f.panel), Err(SelectError::Tree(_))));
        assert!(!select.is_mounted());
    }

    #[test]
    fn test_unmount_unmounted_fails() {
        let f = setup();
        let select = Select::new(f.tree.clone(), f.bus.clone(), SelectConfig::new());
        assert_eq!(select.unmount(), Err(SelectError::NotMounted));
    }

    #[test]
    fn test_open_unmounted_is_noop() {
        let f = setup();
        let select = Select::new(f.tree.clone(), f.bus.clone(), SelectConfig::new());
        select.open();
        assert!(!select.is_open());
        assert_eq!(f.bus.total_listener_count(), 0);
    }

    #[test]
    fn test_inline_open_holds_only_dismissal() {
        let f = setup();
        let select = mounted(&f, SelectConfig::new().with_option("1", "A"));
        select.open();
        assert_eq!(select.render_mode(), Some(RenderMode::Inline));
        assert_eq!(select.active_listener_count(), 1);
        assert_eq!(select.anchor_rect(), None);

        let overlay = select.overlay_node().unwrap();
        let container = select.container_node().unwrap();
        assert_eq!(f.tree.read().parent(overlay).unwrap(), Some(container));
    }

    #[test]
    fn test_detached_overlay_under_root() {
        let f = setup();
        f.tree
            .with_write(|t| t.set_overflow(f.panel, OverflowStyle::uniform(Overflow::Auto)))
            .unwrap();
        let select = mounted(&f, SelectConfig::new().with_option("1", "A"));
        select.open();
        assert_eq!(select.render_mode(), Some(RenderMode::Detached));
        assert_eq!(select.active_listener_count(), 3);
        assert_eq!(select.anchor_rect().map(|a| a.bottom), Some(50.0));

        let overlay = select.overlay_node().unwrap();
        assert_eq!(f.tree.read().parent(overlay).unwrap(), Some(f.tree.root()));

        select.close();
        assert!(!f.tree.read().exists(overlay));
        assert_eq!(select.active_listener_count(), 0);
    }

    #[test]
    fn test_click_routing() {
        let f = setup();
        let select = mounted(
            &f,
            SelectConfig::new()
                .with_option("1", "A")
                .with_option("2", "B")
                .with_multiple(true)
                .with_value(vec!["1"]),
        );
        let trigger = select.trigger_node().unwrap();
        assert_eq!(select.click(trigger), ClickOutcome::Opened);

        let row = select.option_node("2").unwrap();
        assert_eq!(select.click(row), ClickOutcome::OptionToggled("2".into()));
        assert!(select.is_open());

        let remove = select.chip_remove_node("1").unwrap();
        assert_eq!(select.click(remove), ClickOutcome::ChipRemoved("1".into()));
        assert!(select.is_open());

        let label = select.label_node().unwrap();
        assert_eq!(select.click(label), ClickOutcome::Ignored);

        assert_eq!(select.click(trigger), ClickOutcome::Closed);
    }

    #[test]
    fn test_search_nodes_follow_text() {
        let f = setup();
        let select = mounted(&f, SelectConfig::new().with_option("1", "A").with_search(true));
        select.open();
        assert!(select.search_node().is_some());
        assert!(select.search_clear_node().is_none());

        select.set_search_text("a");
        let clear = select.search_clear_node().unwrap();
        assert_eq!(select.click(clear), ClickOutcome::SearchCleared);

        let search = select.search_node().unwrap();
        assert_eq!(select.click(search), ClickOutcome::Ignored);
        assert!(select.is_open());
    }

    #[test]
    fn test_drop_removes_nodes_and_listeners() {
        let f = setup();
        let before = f.tree.read().node_count();
        {
            let select = mounted(&f, SelectConfig::new().with_option("1", "A"));
            select.open();
            assert!(f.tree.read().node_count() > before);
        }
        assert_eq!(f.tree.read().node_count(), before);
        assert_eq!(f.bus.total_listener_count(), 0);
    }
}
