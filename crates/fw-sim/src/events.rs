use std::collections::HashMap;
use std::fmt;

/// Unkeyed lifecycle notification kinds, broadcast to every subscriber.
///
/// `Create` and `Spawn` are distinct so listeners can tell identity
/// assignment apart from world entry: both fire during admission, in that
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// A slot was assigned to a new entity.
    Create,
    /// The entity entered the world.
    Spawn,
    /// The entity was retired. Terminal.
    Delete,
    /// The entity left visual/interaction exposure but kept its slot.
    Hide,
    /// A hidden entity was restored to full exposure.
    Reveal,
}

/// Keyed notification families, routed to subscribers of a matching 64-bit
/// key instead of broadcast.
///
/// The key space is family-scoped, so a timer subscriber for key 3 never
/// hears queue events for key 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyedFamily {
    /// Per-NPC-type behavior hooks, keyed by type id.
    AiType,
    /// Content-group behavior hooks, keyed by content group.
    AiContent,
    /// Timer expiries, keyed by timer type or a composed type+timer key.
    Timer,
    /// Queue pops, keyed by queue type or a composed type+queue key.
    Queue,
}

/// Compose a 64-bit routing key from two 32-bit halves.
///
/// Used for the scoped variants of keyed families, e.g. a timer subscription
/// for one NPC type composes `(type_id, timer_type)`.
pub const fn compose_key(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

type Handler<T> = Box<dyn FnMut(&T)>;

/// Synchronous publish/subscribe channel for one entity collection.
///
/// Publication runs every matching subscriber to completion before returning,
/// which is what makes the registry's publish-before/after-structural-change
/// ordering observable by listeners. Subscribers run in subscription order.
pub struct EventBus<T> {
    lifecycle: HashMap<Lifecycle, Vec<Handler<T>>>,
    keyed: HashMap<(KeyedFamily, u64), Vec<Handler<T>>>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            lifecycle: HashMap::new(),
            keyed: HashMap::new(),
        }
    }

    /// Subscribe to an unkeyed lifecycle notification kind.
    pub fn subscribe(&mut self, kind: Lifecycle, handler: impl FnMut(&T) + 'static) {
        self.lifecycle
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    /// Subscribe to a keyed family under one routing key.
    pub fn subscribe_keyed(
        &mut self,
        family: KeyedFamily,
        key: u64,
        handler: impl FnMut(&T) + 'static,
    ) {
        self.keyed
            .entry((family, key))
            .or_default()
            .push(Box::new(handler));
    }

    /// Deliver an unkeyed notification to every subscriber of `kind`.
    pub fn publish(&mut self, kind: Lifecycle, entity: &T) {
        if let Some(handlers) = self.lifecycle.get_mut(&kind) {
            for handler in handlers {
                handler(entity);
            }
        }
    }

    /// Deliver a keyed notification to the subscribers of `(family, key)`.
    ///
    /// No fan-out scan happens: unmatched keys cost one map lookup.
    pub fn publish_keyed(&mut self, family: KeyedFamily, key: u64, entity: &T) {
        if let Some(handlers) = self.keyed.get_mut(&(family, key)) {
            for handler in handlers {
                handler(entity);
            }
        }
    }

    /// Number of subscribers for an unkeyed kind.
    pub fn subscriber_count(&self, kind: Lifecycle) -> usize {
        self.lifecycle.get(&kind).map_or(0, Vec::len)
    }

    /// Number of subscribers for a keyed `(family, key)` pair.
    pub fn keyed_subscriber_count(&self, family: KeyedFamily, key: u64) -> usize {
        self.keyed.get(&(family, key)).map_or(0, Vec::len)
    }
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("lifecycle_kinds", &self.lifecycle.len())
            .field("keyed_routes", &self.keyed.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn publish_is_synchronous_and_ordered() {
        let mut bus: EventBus<&str> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        bus.subscribe(Lifecycle::Spawn, move |e| first.borrow_mut().push(format!("first:{e}")));
        let second = Rc::clone(&seen);
        bus.subscribe(Lifecycle::Spawn, move |e| second.borrow_mut().push(format!("second:{e}")));

        bus.publish(Lifecycle::Spawn, &"imp");
        // Both subscribers ran before publish returned, in subscription order.
        assert_eq!(*seen.borrow(), vec!["first:imp", "second:imp"]);
    }

    #[test]
    fn unkeyed_kinds_are_independent() {
        let mut bus: EventBus<u32> = EventBus::new();
        let hides = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&hides);
        bus.subscribe(Lifecycle::Hide, move |_| *counter.borrow_mut() += 1);

        bus.publish(Lifecycle::Spawn, &1);
        bus.publish(Lifecycle::Delete, &1);
        assert_eq!(*hides.borrow(), 0);

        bus.publish(Lifecycle::Hide, &1);
        assert_eq!(*hides.borrow(), 1);
    }

    #[test]
    fn keyed_routing_matches_exact_key_only() {
        let mut bus: EventBus<u32> = EventBus::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&hits);
        bus.subscribe_keyed(KeyedFamily::Timer, 3, move |e| sink.borrow_mut().push(*e));

        bus.publish_keyed(KeyedFamily::Timer, 4, &10);
        bus.publish_keyed(KeyedFamily::Queue, 3, &20);
        bus.publish_keyed(KeyedFamily::Timer, 3, &30);

        assert_eq!(*hits.borrow(), vec![30]);
    }

    #[test]
    fn composed_keys_scope_by_both_halves() {
        let key = compose_key(50, 3);
        assert_eq!(key >> 32, 50);
        assert_eq!(key & 0xffff_ffff, 3);
        assert_ne!(compose_key(50, 3), compose_key(3, 50));
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.publish(Lifecycle::Create, &1);
        bus.publish_keyed(KeyedFamily::AiType, 9, &1);
        assert_eq!(bus.subscriber_count(Lifecycle::Create), 0);
        assert_eq!(bus.keyed_subscriber_count(KeyedFamily::AiType, 9), 0);
    }

    #[test]
    fn subscriber_state_mutates_across_publishes() {
        let mut bus: EventBus<u32> = EventBus::new();
        let total = Rc::new(RefCell::new(0u32));

        let sink = Rc::clone(&total);
        bus.subscribe(Lifecycle::Spawn, move |e| *sink.borrow_mut() += *e);

        bus.publish(Lifecycle::Spawn, &2);
        bus.publish(Lifecycle::Spawn, &5);
        assert_eq!(*total.borrow(), 7);
    }
}
