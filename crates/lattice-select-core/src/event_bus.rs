//! Process-wide UI event bus.
//!
//! The bus stands in for the document- and window-level listener tables of a
//! host UI. Widgets subscribe while they need global input (an open dropdown
//! watching for outside presses, a floating overlay following scroll) and
//! must unsubscribe when they no longer do. Every subscription is an explicit
//! [`Subscription`] handle; nothing is released implicitly.
//!
//! # Delivery Rules
//!
//! - [`UiEvent::PointerDown`] reaches every pointer listener.
//! - [`UiEvent::Scroll`] targeting the document root reaches every scroll
//!   listener. A scroll of any other container only reaches listeners
//!   subscribed with [`ListenerOptions::CAPTURE`], since scroll events do not
//!   bubble.
//! - [`UiEvent::Resize`] reaches every resize listener.
//!
//! Listeners are snapshotted at dispatch time, so a listener may unsubscribe
//! itself or others while an event is being delivered. A listener removed
//! during delivery is not invoked afterwards.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::event::{EventKind, UiEvent};
use crate::tree::NodeId;

new_key_type! {
    /// A unique identifier for a registered listener.
    pub struct ListenerId;
}

/// Options controlling how a listener observes events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Observe events during the capture phase, before they reach their target.
    pub capture: bool,
}

impl ListenerOptions {
    /// Bubble-phase listener.
    pub const BUBBLE: Self = Self { capture: false };
    /// Capture-phase listener.
    pub const CAPTURE: Self = Self { capture: true };
}

/// Handle for a registered listener.
///
/// Pass it back to [`EventBus::unsubscribe`] to release the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: ListenerId,
    kind: EventKind,
}

impl Subscription {
    /// The listener identifier.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The event kind this subscription listens for.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

type Callback = Arc<dyn Fn(&UiEvent) + Send + Sync>;

struct Listener {
    kind: EventKind,
    options: ListenerOptions,
    callback: Callback,
}

/// Registry of process-wide UI event listeners.
pub struct EventBus {
    listeners: Mutex<SlotMap<ListenerId, Listener>>,
    document: NodeId,
}

impl EventBus {
    /// Create a bus for a document whose root node is `document`.
    pub fn new(document: NodeId) -> Self {
        Self {
            listeners: Mutex::new(SlotMap::with_key()),
            document,
        }
    }

    /// The document root this bus delivers for.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Register a listener for `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, options: ListenerOptions, callback: F) -> Subscription
    where
        F: Fn(&UiEvent) + Send + Sync + 'static,
    {
        let id = self.listeners.lock().insert(Listener {
            kind,
            options,
            callback: Arc::new(callback),
        });
        tracing::debug!(target: "lattice_select_core::event_bus", ?id, ?kind, capture = options.capture, "listener subscribed");
        Subscription { id, kind }
    }

    /// Release a listener.
    ///
    /// Returns `true` if the listener was registered, `false` if it had already
    /// been released.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let removed = self.listeners.lock().remove(subscription.id).is_some();
        if removed {
            tracing::debug!(target: "lattice_select_core::event_bus", id = ?subscription.id, kind = ?subscription.kind, "listener unsubscribed");
        }
        removed
    }

    /// Check whether a subscription is still registered.
    pub fn is_subscribed(&self, subscription: &Subscription) -> bool {
        self.listeners.lock().contains_key(subscription.id)
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .values()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    /// Number of listeners registered across all kinds.
    pub fn total_listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver an event to every listener it reaches.
    ///
    /// Returns the number of listeners invoked.
    #[tracing::instrument(skip(self), target = "lattice_select_core::event_bus", level = "trace")]
    pub fn dispatch(&self, event: &UiEvent) -> usize {
        let kind = event.kind();
        let recipients: Vec<(ListenerId, Callback)> = self
            .listeners
            .lock()
            .iter()
            .filter(|(_, listener)| listener.kind == kind && self.reaches(listener, event))
            .map(|(id, listener)| (id, listener.callback.clone()))
            .collect();

        let mut invoked = 0;
        for (id, callback) in recipients {
            // Skip listeners released by an earlier listener in this dispatch.
            if !self.listeners.lock().contains_key(id) {
                continue;
            }
            callback(event);
            invoked += 1;
        }
        invoked
    }

    fn reaches(&self, listener: &Listener, event: &UiEvent) -> bool {
        match event {
            UiEvent::Scroll { target } => listener.options.capture || *target == self.document,
            UiEvent::PointerDown { .. } | UiEvent::Resize { .. } => true,
        }
    }
}

static_assertions::assert_impl_all!(EventBus: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Size};
    use crate::tree::WidgetTree;

    fn setup() -> (WidgetTree, EventBus) {
        let tree = WidgetTree::new();
        let bus = EventBus::new(tree.root());
        (tree, bus)
    }

    fn counter() -> (Arc<Mutex<usize>>, impl Fn(&UiEvent) + Send + Sync + 'static) {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        (count, move |_: &UiEvent| *count_clone.lock() += 1)
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let (_tree, bus) = setup();
        let sub = bus.subscribe(EventKind::Resize, ListenerOptions::BUBBLE, |_| {});
        assert_eq!(bus.listener_count(EventKind::Resize), 1);
        assert!(bus.is_subscribed(&sub));

        assert!(bus.unsubscribe(&sub));
        assert!(!bus.unsubscribe(&sub));
        assert_eq!(bus.total_listener_count(), 0);
    }

    #[test]
    fn test_dispatch_by_kind() {
        let (tree, bus) = setup();
        let (resizes, on_resize) = counter();
        let (presses, on_press) = counter();
        bus.subscribe(EventKind::Resize, ListenerOptions::BUBBLE, on_resize);
        bus.subscribe(EventKind::PointerDown, ListenerOptions::CAPTURE, on_press);

        bus.dispatch(&UiEvent::Resize {
            viewport: Size::new(800.0, 600.0),
        });
        bus.dispatch(&UiEvent::PointerDown {
            target: tree.root(),
            position: Point::ZERO,
        });
        bus.dispatch(&UiEvent::PointerDown {
            target: tree.root(),
            position: Point::ZERO,
        });

        assert_eq!(*resizes.lock(), 1);
        assert_eq!(*presses.lock(), 2);
    }

    #[test]
    fn test_container_scroll_reaches_only_capture_listeners() {
        let (mut tree, bus) = setup();
        let container = tree.insert(tree.root(), "scroller").unwrap();
        let (captured, on_capture) = counter();
        let (bubbled, on_bubble) = counter();
        bus.subscribe(EventKind::Scroll, ListenerOptions::CAPTURE, on_capture);
        bus.subscribe(EventKind::Scroll, ListenerOptions::BUBBLE, on_bubble);

        assert_eq!(bus.dispatch(&UiEvent::Scroll { target: container }), 1);
        assert_eq!(bus.dispatch(&UiEvent::Scroll { target: tree.root() }), 2);

        assert_eq!(*captured.lock(), 2);
        assert_eq!(*bubbled.lock(), 1);
    }

    #[test]
    fn test_listener_can_unsubscribe_during_dispatch() {
        let (tree, bus) = setup();
        let bus = Arc::new(bus);
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let (calls, on_call) = counter();

        let weak_bus = Arc::downgrade(&bus);
        let slot_clone = slot.clone();
        let sub = bus.subscribe(EventKind::PointerDown, ListenerOptions::CAPTURE, move |event| {
            on_call(event);
            if let (Some(bus), Some(sub)) = (weak_bus.upgrade(), *slot_clone.lock()) {
                bus.unsubscribe(&sub);
            }
        });
        *slot.lock() = Some(sub);

        let press = UiEvent::PointerDown {
            target: tree.root(),
            position: Point::ZERO,
        };
        assert_eq!(bus.dispatch(&press), 1);
        assert_eq!(bus.dispatch(&press), 0);
        assert_eq!(*calls.lock(), 1);
        assert_eq!(bus.total_listener_count(), 0);
    }

    #[test]
    fn test_listener_released_mid_dispatch_is_skipped() {
        let (_tree, bus) = setup();
        let bus = Arc::new(bus);
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let (victim_calls, on_victim) = counter();

        let weak_bus = Arc::downgrade(&bus);
        let victim_clone = victim.clone();
        bus.subscribe(EventKind::Resize, ListenerOptions::BUBBLE, move |_| {
            if let (Some(bus), Some(sub)) = (weak_bus.upgrade(), *victim_clone.lock()) {
                bus.unsubscribe(&sub);
            }
        });
        let sub = bus.subscribe(EventKind::Resize, ListenerOptions::BUBBLE, on_victim);
        *victim.lock() = Some(sub);

        let invoked = bus.dispatch(&UiEvent::Resize {
            viewport: Size::new(1.0, 1.0),
        });
        assert_eq!(invoked, 1);
        assert_eq!(*victim_calls.lock(), 0);
    }
}
