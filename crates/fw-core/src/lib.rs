//! Core types for Fenwold: coordinates, zones, entities, slots, and collision.
//!
//! This crate defines the data model the simulation layer orchestrates. It is
//! independent of the tick loop: slot tables, zone buckets, and the collision
//! overlay are plain data structures here; all lifecycle invariants between
//! them are enforced by the registry in `fw-sim`.

/// Walkability overlay derived from entity occupancy.
pub mod collision;
/// Absolute tile coordinates.
pub mod coord;
/// Entity types and the shared world-presence state.
pub mod entity;
/// Fixed-capacity slot pool and slot handles.
pub mod slots;
/// Zone keys, buckets, and the zone-keyed spatial index.
pub mod zone;

/// Re-export of [`collision::CollisionOverlay`].
pub use collision::CollisionOverlay;
/// Re-export of [`coord::Coord`].
pub use coord::Coord;
/// Re-exports of the entity types and trait.
pub use entity::{AvatarState, Npc, Player, Presence, WorldEntity};
/// Re-exports of [`slots::EntitySlot`] and [`slots::SlotTable`].
pub use slots::{EntitySlot, SlotTable};
/// Re-exports of the zone index types and cell size.
pub use zone::{ZONE_LENGTH, ZoneBucket, ZoneIndex, ZoneKey};
