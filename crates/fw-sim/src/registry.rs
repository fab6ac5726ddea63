use fw_core::collision::CollisionOverlay;
use fw_core::coord::Coord;
use fw_core::entity::WorldEntity;
use fw_core::slots::{EntitySlot, SlotTable};
use fw_core::zone::{ZoneIndex, ZoneKey};

use crate::events::{EventBus, Lifecycle};

/// Orchestrates the slot table, zone index, collision overlay, and event bus
/// into atomic-looking lifecycle operations for one entity collection.
///
/// The registry owns the slot table and zone index outright; no other
/// component can mutate them. The collision overlay is owned by the caller
/// (both the NPC and player registries write into the same surface) and is
/// passed into each operation that moves occupancy.
///
/// Event ordering is part of each operation's contract and is intentionally
/// asymmetric: `hide` publishes before structural removal so listeners still
/// see an indexed entity, while `reveal` publishes after re-insertion for the
/// same reason. Publication is synchronous, so listeners observe exactly the
/// state documented on each operation.
#[derive(Debug)]
pub struct EntityRegistry<T: WorldEntity> {
    slots: SlotTable<T>,
    zones: ZoneIndex,
    events: EventBus<T>,
}

impl<T: WorldEntity> EntityRegistry<T> {
    /// Create a registry admitting up to `capacity` concurrent entities.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: SlotTable::new(capacity),
            zones: ZoneIndex::new(),
            events: EventBus::new(),
        }
    }

    /// Admit an entity into the world and return its assigned slot.
    ///
    /// Assigns the lowest free slot, raises the collision overlay at the
    /// entity's tile, publishes `Create` then `Spawn`, then indexes the
    /// entity under the zone derived from its coordinates.
    ///
    /// # Panics
    ///
    /// Panics when no slot is free. Slot exhaustion signals capacity
    /// misconfiguration, not a recoverable runtime condition.
    pub fn add(&mut self, mut entity: T, collision: &mut CollisionOverlay) -> EntitySlot {
        let slot = match self.slots.next_free_slot() {
            Some(slot) => slot,
            None => panic!("no free slot for {}", entity.label()),
        };
        entity.presence_mut().slot = slot;
        let coords = entity.presence().coords;
        self.slots.insert(slot, entity);

        collision.add_occupant(coords);
        let stored = self.slots.get(slot).expect("slot was just filled");
        self.events.publish(Lifecycle::Create, stored);
        self.events.publish(Lifecycle::Spawn, stored);

        let key = ZoneKey::from_coord(coords);
        self.expect_mut(slot).presence_mut().last_zone = key;
        self.zones.insert(key, slot);
        tracing::debug!(slot = slot.index(), zone = %key, "entity admitted");
        slot
    }

    /// Retire the entity at `slot` and return it. Retirement is terminal.
    ///
    /// Releases the slot, publishes `Delete` (listeners still see the slot
    /// assignment on the entity), lowers the collision overlay, removes the
    /// zone membership, resets the presence to unregistered, and disables the
    /// avatar channel, which closes the session for players.
    ///
    /// # Panics
    ///
    /// Panics when the slot is invalid or vacant: retiring an entity twice or
    /// through a stale slot is a caller bug and must fail loudly.
    pub fn del(&mut self, slot: EntitySlot, collision: &mut CollisionOverlay) -> T {
        assert!(!slot.is_invalid(), "cannot retire an unregistered entity");
        let mut entity = self.slots.remove(slot);
        self.events.publish(Lifecycle::Delete, &entity);

        // Hidden entities hold no occupancy and no zone membership.
        if !entity.presence().hidden {
            collision.remove_occupant(entity.presence().coords);
        }
        self.zones.remove(entity.presence().last_zone, slot);

        let presence = entity.presence_mut();
        presence.slot = EntitySlot::INVALID;
        presence.last_zone = ZoneKey::NULL;
        entity.disable_avatar();
        tracing::debug!(slot = slot.index(), "entity retired");
        entity
    }

    /// Remove the entity at `slot` from visual/interaction exposure while it
    /// keeps its slot.
    ///
    /// Publishes `Hide` before any structural change, so listeners that need
    /// pre-removal spatial context still find the entity indexed; then lowers
    /// the collision overlay, drops the zone membership, flips the hidden
    /// flag, and hides the avatar. The cached zone key is retained as the
    /// restore target for [`EntityRegistry::reveal`].
    ///
    /// # Panics
    ///
    /// Panics when the slot is vacant or the entity is already hidden.
    pub fn hide(&mut self, slot: EntitySlot, collision: &mut CollisionOverlay) {
        let entity = match self.slots.get(slot) {
            Some(entity) => entity,
            None => panic!("{slot} holds no registered entity"),
        };
        assert!(!entity.presence().hidden, "{slot} is already hidden");
        let coords = entity.presence().coords;
        let key = entity.presence().last_zone;
        self.events.publish(Lifecycle::Hide, entity);

        collision.remove_occupant(coords);
        self.zones.remove(key, slot);

        let entity = self.expect_mut(slot);
        entity.presence_mut().hidden = true;
        entity.hide_avatar();
    }

    /// Restore a hidden entity to full exposure.
    ///
    /// Inverse ordering to `hide`: re-raises the collision overlay and
    /// re-inserts the zone membership first, then publishes `Reveal` so
    /// listeners observe a fully-indexed entity, then clears the hidden flag
    /// and reveals the avatar.
    ///
    /// # Panics
    ///
    /// Panics when the slot is vacant or the entity is not hidden.
    pub fn reveal(&mut self, slot: EntitySlot, collision: &mut CollisionOverlay) {
        let (coords, key) = {
            let entity = self.expect(slot);
            assert!(entity.presence().hidden, "{slot} is not hidden");
            (entity.presence().coords, entity.presence().last_zone)
        };
        collision.add_occupant(coords);
        self.zones.insert(key, slot);

        let stored = self.slots.get(slot).expect("slot occupancy checked above");
        self.events.publish(Lifecycle::Reveal, stored);

        let entity = self.expect_mut(slot);
        entity.presence_mut().hidden = false;
        entity.reveal_avatar();
    }

    /// Move a zone membership from the `from` bucket to the `to` bucket.
    ///
    /// Either side is a no-op when its key is NULL, which covers entities not
    /// yet indexed. The entity's cached zone key is left untouched; callers
    /// own keeping it consistent with the bucket that holds the entity.
    ///
    /// # Panics
    ///
    /// Panics when the entity is already present in the `to` bucket.
    pub fn change(&mut self, slot: EntitySlot, from: ZoneKey, to: ZoneKey) {
        self.zones.remove(from, slot);
        self.zones.insert(to, slot);
    }

    /// Relocate the entity at `slot` to `dest`, keeping coordinates,
    /// occupancy, zone membership, and the cached zone key consistent.
    ///
    /// While hidden, an entity holds no occupancy and no membership, so only
    /// its coordinates and restore-target zone are updated; indexing resumes
    /// on reveal from the new position.
    ///
    /// # Panics
    ///
    /// Panics when the slot is vacant.
    pub fn move_to(&mut self, slot: EntitySlot, dest: Coord, collision: &mut CollisionOverlay) {
        let (coords, from, hidden) = {
            let presence = self.expect(slot).presence();
            (presence.coords, presence.last_zone, presence.hidden)
        };
        let to = ZoneKey::from_coord(dest);

        if !hidden {
            collision.remove_occupant(coords);
            collision.add_occupant(dest);
            if from != to {
                self.change(slot, from, to);
            }
        }
        let presence = self.expect_mut(slot).presence_mut();
        presence.coords = dest;
        presence.last_zone = to;
    }

    /// All indexed entities standing exactly on `coords`.
    pub fn find_all(&self, coords: Coord) -> impl Iterator<Item = &T> + '_ {
        self.find_all_in_zone(ZoneKey::from_coord(coords))
            .filter(move |entity| entity.presence().coords == coords)
    }

    /// All indexed entities resident in the zone under `key`.
    ///
    /// A key without a bucket yields an empty iterator. The `&self` borrow
    /// keeps the bucket immutable for the traversal's lifetime.
    pub fn find_all_in_zone(&self, key: ZoneKey) -> impl Iterator<Item = &T> + '_ {
        self.zones
            .bucket(key)
            .into_iter()
            .flat_map(|bucket| bucket.iter())
            .filter_map(move |slot| self.slots.get(slot))
    }

    /// Total zone-index membership, i.e. the number of visible entities.
    pub fn count(&self) -> usize {
        self.zones.population()
    }

    /// Number of registered entities, hidden ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no entity is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The entity at `slot`, if registered.
    pub fn get(&self, slot: EntitySlot) -> Option<&T> {
        self.slots.get(slot)
    }

    /// Mutable access to the entity at `slot`, if registered.
    pub fn get_mut(&mut self, slot: EntitySlot) -> Option<&mut T> {
        self.slots.get_mut(slot)
    }

    /// Whether `slot` holds a registered entity.
    pub fn contains(&self, slot: EntitySlot) -> bool {
        self.slots.contains(slot)
    }

    /// Occupied slots in ascending order, the stable tick traversal order.
    pub fn occupied_slots(&self) -> Vec<EntitySlot> {
        self.slots.occupied_slots()
    }

    /// Read access to the zone index, for diagnostics and reporting.
    pub fn zones(&self) -> &ZoneIndex {
        &self.zones
    }

    /// Read access to this collection's event bus.
    pub fn events(&self) -> &EventBus<T> {
        &self.events
    }

    /// Subscribe access to this collection's event bus.
    pub fn events_mut(&mut self) -> &mut EventBus<T> {
        &mut self.events
    }

    fn expect(&self, slot: EntitySlot) -> &T {
        match self.slots.get(slot) {
            Some(entity) => entity,
            None => panic!("{slot} holds no registered entity"),
        }
    }

    fn expect_mut(&mut self, slot: EntitySlot) -> &mut T {
        match self.slots.get_mut(slot) {
            Some(entity) => entity,
            None => panic!("{slot} holds no registered entity"),
        }
    }
}
