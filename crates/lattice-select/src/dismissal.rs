//! Outside-press dismissal.
//!
//! While a dropdown is open, a pointer press anywhere outside the widget
//! closes it. "Outside" is decided by tree containment rather than geometry,
//! because a detached overlay lives under the document root, far from its
//! trigger in the tree.

use std::sync::Arc;

use lattice_select_core::{
    EventBus, EventKind, ListenerOptions, NodeId, SharedWidgetTree, Subscription, UiEvent,
    WidgetTree,
};

/// Returns true if `target` lies in none of the `scopes` subtrees.
///
/// A target that is no longer in the tree is outside every scope.
pub fn is_outside(tree: &WidgetTree, scopes: &[NodeId], target: NodeId) -> bool {
    !scopes.iter().any(|&scope| tree.contains(scope, target))
}

/// Owns the document-level pointer listener for one open session.
pub struct DismissalController {
    bus: Arc<EventBus>,
    tree: SharedWidgetTree,
    subscription: Option<Subscription>,
}

impl DismissalController {
    /// Create an inactive controller.
    pub fn new(bus: Arc<EventBus>, tree: SharedWidgetTree) -> Self {
        Self {
            bus,
            tree,
            subscription: None,
        }
    }

    /// Whether the pointer listener is registered.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Number of bus listeners held.
    pub fn subscription_count(&self) -> usize {
        usize::from(self.subscription.is_some())
    }

    /// Start watching for presses outside `scopes`.
    ///
    /// The listener observes in the capture phase, ahead of bubble-phase
    /// handlers. `on_dismiss` runs for every outside press until deactivated.
    /// Activating an active controller does nothing.
    pub fn activate<F>(&mut self, scopes: Vec<NodeId>, on_dismiss: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_active() {
            return;
        }
        let tree = self.tree.clone();
        let subscription = self.bus.subscribe(
            EventKind::PointerDown,
            ListenerOptions::CAPTURE,
            move |event| {
                let UiEvent::PointerDown { target, .. } = *event else {
                    return;
                };
                if tree.with_read(|tree| is_outside(tree, &scopes, target)) {
                    tracing::debug!(target: "lattice_select::dismissal", ?target, "pointer pressed outside, dismissing");
                    on_dismiss();
                }
            },
        );
        self.subscription = Some(subscription);
        tracing::debug!(target: "lattice_select::dismissal", "outside-press listener registered");
    }

    /// Release the pointer listener.
    pub fn deactivate(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.bus.unsubscribe(&subscription);
            tracing::debug!(target: "lattice_select::dismissal", "outside-press listener released");
        }
    }
}

impl Drop for DismissalController {
    fn drop(&mut self) {
        self.deactivate();
    }
}

static_assertions::assert_impl_all!(DismissalController: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_select_core::Point;
    use parking_lot::Mutex;

    struct Fixture {
        tree: SharedWidgetTree,
        bus: Arc<EventBus>,
        trigger: NodeId,
        option: NodeId,
        overlay: NodeId,
        elsewhere: NodeId,
    }

    fn setup() -> Fixture {
        let tree = SharedWidgetTree::new();
        let (trigger, overlay, option, elsewhere) = tree.with_write(|t| {
            let trigger = t.insert(t.root(), "trigger").unwrap();
            // Detached overlays sit directly under the document root.
            let overlay = t.insert(t.root(), "overlay").unwrap();
            let option = t.insert(overlay, "option").unwrap();
            let elsewhere = t.insert(t.root(), "elsewhere").unwrap();
            (trigger, overlay, option, elsewhere)
        });
        let bus = Arc::new(EventBus::new(tree.root()));
        Fixture {
            tree,
            bus,
            trigger,
            option,
            overlay,
            elsewhere,
        }
    }

    fn press(target: NodeId) -> UiEvent {
        UiEvent::PointerDown {
            target,
            position: Point::ZERO,
        }
    }

    #[test]
    fn test_is_outside() {
        let f = setup();
        let scopes = [f.trigger, f.overlay];
        f.tree.with_read(|t| {
            assert!(!is_outside(t, &scopes, f.trigger));
            assert!(!is_outside(t, &scopes, f.option));
            assert!(is_outside(t, &scopes, f.elsewhere));
            assert!(is_outside(t, &scopes, t.root()));
        });
    }

    #[test]
    fn test_outside_press_dismisses() {
        let f = setup();
        let dismissed = Arc::new(Mutex::new(0));
        let dismissed_clone = dismissed.clone();
        let mut controller = DismissalController::new(f.bus.clone(), f.tree.clone());
        controller.activate(vec![f.trigger, f.overlay], move || {
            *dismissed_clone.lock() += 1;
        });

        f.bus.dispatch(&press(f.option));
        f.bus.dispatch(&press(f.trigger));
        assert_eq!(*dismissed.lock(), 0);

        f.bus.dispatch(&press(f.elsewhere));
        assert_eq!(*dismissed.lock(), 1);
    }

    #[test]
    fn test_containment_is_live() {
        let f = setup();
        let dismissed = Arc::new(Mutex::new(false));
        let dismissed_clone = dismissed.clone();
        let mut controller = DismissalController::new(f.bus.clone(), f.tree.clone());
        controller.activate(vec![f.overlay], move || *dismissed_clone.lock() = true);

        // A row added after activation still counts as inside.
        let late_row = f.tree.with_write(|t| t.insert(f.overlay, "late").unwrap());
        f.bus.dispatch(&press(late_row));
        assert!(!*dismissed.lock());
    }

    #[test]
    fn test_single_listener_and_release() {
        let f = setup();
        let mut controller = DismissalController::new(f.bus.clone(), f.tree.clone());
        controller.activate(vec![f.trigger], || {});
        controller.activate(vec![f.trigger], || {});
        assert_eq!(f.bus.listener_count(EventKind::PointerDown), 1);

        controller.deactivate();
        assert!(!controller.is_active());
        assert_eq!(f.bus.total_listener_count(), 0);

        controller.activate(vec![f.trigger], || {});
        drop(controller);
        assert_eq!(f.bus.total_listener_count(), 0);
    }
}
