//! Viewport anchoring for detached overlays.
//!
//! While an overlay is detached it is drawn at fixed viewport coordinates
//! below its trigger. Scrolling any ancestor or resizing the viewport moves
//! the trigger, so the [`PositionTracker`] listens for both and recomputes
//! the anchor from the trigger's live bounds on every event.
//!
//! # Key Types
//!
//! - [`AnchorRect`]: the trigger's edges in viewport coordinates
//! - [`PositionTracker`]: owns the scroll/resize subscriptions for one session

use std::sync::{Arc, Weak};

use lattice_select_core::{
    EventBus, EventKind, ListenerOptions, NodeId, Rect, SharedWidgetTree, Signal, Subscription,
    UiEvent,
};
use parking_lot::Mutex;

/// The trigger's edges in viewport coordinates.
///
/// A detached overlay is drawn with its top edge at `bottom`, its left edge
/// at `left` and the same `width` as the trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRect {
    /// Top edge of the trigger.
    pub top: f32,
    /// Left edge of the trigger.
    pub left: f32,
    /// Width of the trigger.
    pub width: f32,
    /// Bottom edge of the trigger.
    pub bottom: f32,
}

impl From<Rect> for AnchorRect {
    fn from(rect: Rect) -> Self {
        Self {
            top: rect.top(),
            left: rect.left(),
            width: rect.width(),
            bottom: rect.bottom(),
        }
    }
}

/// Keeps an [`AnchorRect`] in sync with a trigger while active.
///
/// Activation subscribes one capture-phase scroll listener (so scrolls of
/// any container are seen, not only the document) and one resize listener.
/// Deactivation releases both. Dropping the tracker deactivates it.
pub struct PositionTracker {
    bus: Arc<EventBus>,
    tree: SharedWidgetTree,
    trigger: NodeId,
    anchor: Arc<Mutex<Option<AnchorRect>>>,
    position_changed: Arc<Signal<AnchorRect>>,
    subscriptions: Vec<Subscription>,
}

impl PositionTracker {
    /// Create an inactive tracker for `trigger`.
    ///
    /// `position_changed` is emitted whenever a recomputation moves the anchor.
    pub fn new(
        bus: Arc<EventBus>,
        tree: SharedWidgetTree,
        trigger: NodeId,
        position_changed: Arc<Signal<AnchorRect>>,
    ) -> Self {
        Self {
            bus,
            tree,
            trigger,
            anchor: Arc::new(Mutex::new(None)),
            position_changed,
            subscriptions: Vec::new(),
        }
    }

    /// Whether the tracker currently holds subscriptions.
    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// The current anchor, if the trigger has been measured.
    pub fn anchor(&self) -> Option<AnchorRect> {
        *self.anchor.lock()
    }

    /// Number of bus listeners held.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Measure the trigger and start following scroll and resize.
    ///
    /// The initial measurement is returned rather than emitted, so callers
    /// holding their own locks can report it once they release them.
    /// Activating an active tracker does nothing and returns the current
    /// anchor, so at most one listener of each kind is ever registered.
    pub fn activate(&mut self) -> Option<AnchorRect> {
        if self.is_active() {
            return self.anchor();
        }
        let anchor = recompute(&self.tree, self.trigger, &self.anchor, None);

        let scroll = self.bus.subscribe(
            EventKind::Scroll,
            ListenerOptions::CAPTURE,
            self.listener(),
        );
        let resize = self.bus.subscribe(
            EventKind::Resize,
            ListenerOptions::BUBBLE,
            self.listener(),
        );
        self.subscriptions = vec![scroll, resize];
        tracing::debug!(target: "lattice_select::position", trigger = ?self.trigger, ?anchor, "position tracking started");
        anchor
    }

    /// Release both listeners and forget the anchor.
    pub fn deactivate(&mut self) {
        if self.subscriptions.is_empty() && self.anchor.lock().is_none() {
            return;
        }
        for subscription in self.subscriptions.drain(..) {
            self.bus.unsubscribe(&subscription);
        }
        *self.anchor.lock() = None;
        tracing::debug!(target: "lattice_select::position", trigger = ?self.trigger, "position tracking stopped");
    }

    fn listener(&self) -> impl Fn(&UiEvent) + Send + Sync + 'static {
        let tree = self.tree.clone();
        let trigger = self.trigger;
        let anchor: Weak<Mutex<Option<AnchorRect>>> = Arc::downgrade(&self.anchor);
        let signal: Weak<Signal<AnchorRect>> = Arc::downgrade(&self.position_changed);
        move |event| {
            let Some(anchor) = anchor.upgrade() else {
                return;
            };
            tracing::trace!(target: "lattice_select::position", kind = ?event.kind(), "recomputing anchor");
            let signal = signal.upgrade();
            recompute(&tree, trigger, &anchor, signal.as_deref());
        }
    }
}

impl Drop for PositionTracker {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Read the trigger's live bounds into `anchor`, emitting on change.
///
/// A trigger without bounds leaves the anchor untouched.
fn recompute(
    tree: &SharedWidgetTree,
    trigger: NodeId,
    anchor: &Mutex<Option<AnchorRect>>,
    position_changed: Option<&Signal<AnchorRect>>,
) -> Option<AnchorRect> {
    let Some(bounds) = tree.read().bounds(trigger) else {
        tracing::warn!(target: "lattice_select::position", ?trigger, "trigger has no bounds, skipping reposition");
        return *anchor.lock();
    };

    let next = AnchorRect::from(bounds);
    let changed = {
        let mut current = anchor.lock();
        let changed = *current != Some(next);
        *current = Some(next);
        changed
    };

    if changed {
        tracing::trace!(target: "lattice_select::position", ?trigger, anchor = ?next, "anchor moved");
        if let Some(signal) = position_changed {
            signal.emit(next);
        }
    }
    Some(next)
}

static_assertions::assert_impl_all!(PositionTracker: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_select_core::Size;

    struct Fixture {
        tree: SharedWidgetTree,
        bus: Arc<EventBus>,
        scroller: NodeId,
        trigger: NodeId,
        signal: Arc<Signal<AnchorRect>>,
    }

    fn setup() -> Fixture {
        let tree = SharedWidgetTree::new();
        let (scroller, trigger) = tree.with_write(|t| {
            let scroller = t.insert(t.root(), "scroller").unwrap();
            let trigger = t.insert(scroller, "trigger").unwrap();
            t.set_bounds(trigger, Some(Rect::new(10.0, 100.0, 200.0, 30.0)))
                .unwrap();
            (scroller, trigger)
        });
        let bus = Arc::new(EventBus::new(tree.root()));
        Fixture {
            tree,
            bus,
            scroller,
            trigger,
            signal: Arc::new(Signal::new()),
        }
    }

    fn tracker(f: &Fixture) -> PositionTracker {
        PositionTracker::new(f.bus.clone(), f.tree.clone(), f.trigger, f.signal.clone())
    }

    #[test]
    fn test_anchor_from_rect() {
        let anchor = AnchorRect::from(Rect::new(10.0, 100.0, 200.0, 30.0));
        assert_eq!(
            anchor,
            AnchorRect {
                top: 100.0,
                left: 10.0,
                width: 200.0,
                bottom: 130.0,
            }
        );
    }

    #[test]
    fn test_activate_measures_and_subscribes() {
        let f = setup();
        let mut tracker = tracker(&f);
        assert!(tracker.anchor().is_none());

        tracker.activate();
        assert!(tracker.is_active());
        assert_eq!(tracker.anchor().map(|a| a.bottom), Some(130.0));
        assert_eq!(f.bus.listener_count(EventKind::Scroll), 1);
        assert_eq!(f.bus.listener_count(EventKind::Resize), 1);
        assert_eq!(tracker.subscription_count(), 2);

        // Idempotent.
        tracker.activate();
        assert_eq!(f.bus.total_listener_count(), 2);
    }

    #[test]
    fn test_container_scroll_recomputes() {
        let f = setup();
        let mut tracker = tracker(&f);
        tracker.activate();

        f.tree.with_write(|t| t.scroll_by(f.scroller, 0.0, 40.0)).unwrap();
        f.bus.dispatch(&UiEvent::Scroll { target: f.scroller });

        let anchor = tracker.anchor().unwrap();
        assert_eq!(anchor.top, 60.0);
        assert_eq!(anchor.bottom, 90.0);
    }

    #[test]
    fn test_resize_recomputes_and_emits() {
        let f = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        f.signal.connect(move |anchor: &AnchorRect| seen_clone.lock().push(*anchor));

        let mut tracker = tracker(&f);
        assert!(tracker.activate().is_some());
        assert!(seen.lock().is_empty());

        f.tree
            .with_write(|t| t.set_bounds(f.trigger, Some(Rect::new(0.0, 0.0, 50.0, 20.0))))
            .unwrap();
        f.bus.dispatch(&UiEvent::Resize {
            viewport: Size::new(400.0, 300.0),
        });
        assert_eq!(tracker.anchor().map(|a| a.width), Some(50.0));
        assert_eq!(seen.lock().len(), 1);

        // Unchanged geometry: recomputed, not re-emitted.
        f.bus.dispatch(&UiEvent::Resize {
            viewport: Size::new(400.0, 300.0),
        });
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_missing_bounds_skips() {
        let f = setup();
        f.tree.with_write(|t| t.set_bounds(f.trigger, None)).unwrap();
        let mut tracker = tracker(&f);
        tracker.activate();
        assert!(tracker.is_active());
        assert!(tracker.anchor().is_none());

        f.bus.dispatch(&UiEvent::Scroll {
            target: f.tree.root(),
        });
        assert!(tracker.anchor().is_none());
    }

    #[test]
    fn test_deactivate_releases_listeners() {
        let f = setup();
        let mut tracker = tracker(&f);
        for _ in 0..3 {
            tracker.activate();
            tracker.deactivate();
        }
        assert!(!tracker.is_active());
        assert!(tracker.anchor().is_none());
        assert_eq!(f.bus.total_listener_count(), 0);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let f = setup();
        {
            let mut tracker = tracker(&f);
            tracker.activate();
            assert_eq!(f.bus.total_listener_count(), 2);
        }
        assert_eq!(f.bus.total_listener_count(), 0);
    }
}
