use std::collections::HashMap;
use std::fmt;

use crate::coord::Coord;
use crate::slots::EntitySlot;

/// Edge length of a zone in tiles. Zones are square cells on a single level.
pub const ZONE_LENGTH: i32 = 8;

/// The key of one spatial-index cell: a zone-granular position plus level.
///
/// Keys are derived from absolute coordinates by truncating `x`/`z` to the
/// zone grid. Equality and hashing are structural, so two entities standing
/// anywhere inside the same 8x8 tile cell share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneKey {
    /// Zone-granular x position (tile x divided by [`ZONE_LENGTH`]).
    pub x: i32,
    /// Zone-granular z position (tile z divided by [`ZONE_LENGTH`]).
    pub z: i32,
    /// Height plane shared with the coordinates that map into this zone.
    pub level: u8,
}

impl ZoneKey {
    /// Sentinel meaning "not currently indexed in any zone".
    pub const NULL: ZoneKey = ZoneKey {
        x: i32::MIN,
        z: i32::MIN,
        level: u8::MAX,
    };

    /// Derive the zone key holding the given coordinate.
    ///
    /// Truncation uses euclidean division so that negative tile positions
    /// still map to the zone cell geometrically containing them.
    pub fn from_coord(coords: Coord) -> Self {
        Self {
            x: coords.x.div_euclid(ZONE_LENGTH),
            z: coords.z.div_euclid(ZONE_LENGTH),
            level: coords.level,
        }
    }

    /// Whether this key is the [`ZoneKey::NULL`] sentinel.
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// The south-west corner tile of this zone.
    pub fn base_coord(self) -> Coord {
        Coord::new(self.x * ZONE_LENGTH, self.z * ZONE_LENGTH, self.level)
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "zone(null)")
        } else {
            write!(f, "zone({}, {}, {})", self.x, self.z, self.level)
        }
    }
}

/// The set of entity slots currently resident in one zone.
///
/// Membership is unique: inserting a slot that is already present indicates
/// a registry bookkeeping bug and panics rather than silently duplicating.
#[derive(Debug, Default, Clone)]
pub struct ZoneBucket {
    members: Vec<EntitySlot>,
}

impl ZoneBucket {
    /// Insert a slot into this bucket.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already a member.
    pub fn insert(&mut self, slot: EntitySlot) {
        assert!(
            !self.members.contains(&slot),
            "entity {slot} already registered to zone bucket"
        );
        self.members.push(slot);
    }

    /// Remove a slot from this bucket. Absent slots are ignored.
    pub fn remove(&mut self, slot: EntitySlot) -> bool {
        match self.members.iter().position(|m| *m == slot) {
            Some(index) => {
                self.members.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the given slot is a member.
    pub fn contains(&self, slot: EntitySlot) -> bool {
        self.members.contains(&slot)
    }

    /// Iterate over the member slots.
    pub fn iter(&self) -> impl Iterator<Item = EntitySlot> + '_ {
        self.members.iter().copied()
    }

    /// Number of member slots.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the bucket has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Mapping from zone key to the bucket of entities resident in that zone.
///
/// Buckets are created lazily on first insertion and never pruned; an empty
/// bucket left behind by a departed entity stays allocated. Lookup misses
/// return empty results, never errors.
#[derive(Debug, Default)]
pub struct ZoneIndex {
    buckets: HashMap<ZoneKey, ZoneBucket>,
}

impl ZoneIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bucket for `key`, if one has ever been created.
    pub fn bucket(&self, key: ZoneKey) -> Option<&ZoneBucket> {
        self.buckets.get(&key)
    }

    /// The bucket for `key`, created on first use.
    pub fn bucket_mut(&mut self, key: ZoneKey) -> &mut ZoneBucket {
        self.buckets.entry(key).or_default()
    }

    /// Insert `slot` into the bucket for `key`. No-op when `key` is NULL.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already present in that bucket.
    pub fn insert(&mut self, key: ZoneKey, slot: EntitySlot) {
        if key.is_null() {
            return;
        }
        self.bucket_mut(key).insert(slot);
    }

    /// Remove `slot` from the bucket for `key`. No-op when `key` is NULL or
    /// the bucket was never created.
    pub fn remove(&mut self, key: ZoneKey, slot: EntitySlot) {
        if key.is_null() {
            return;
        }
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.remove(slot);
        }
    }

    /// Total membership across all buckets, for diagnostics.
    pub fn population(&self) -> usize {
        self.buckets.values().map(ZoneBucket::len).sum()
    }

    /// Iterate over every `(key, bucket)` pair that has ever been created.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneKey, &ZoneBucket)> + '_ {
        self.buckets.iter().map(|(k, b)| (*k, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_truncates_to_zone_grid() {
        let key = ZoneKey::from_coord(Coord::new(100, 100, 0));
        assert_eq!(key, ZoneKey { x: 12, z: 12, level: 0 });

        // Every tile of the same 8x8 cell maps to the same key.
        let same = ZoneKey::from_coord(Coord::new(96, 103, 0));
        assert_eq!(same, key);

        // One zone length east lands in the neighboring cell.
        let east = ZoneKey::from_coord(Coord::new(100 + ZONE_LENGTH, 100, 0));
        assert_eq!(east, ZoneKey { x: 13, z: 12, level: 0 });
    }

    #[test]
    fn key_respects_level() {
        let ground = ZoneKey::from_coord(Coord::new(8, 8, 0));
        let upstairs = ZoneKey::from_coord(Coord::new(8, 8, 1));
        assert_ne!(ground, upstairs);
    }

    #[test]
    fn key_truncates_negative_coords_geometrically() {
        let key = ZoneKey::from_coord(Coord::new(-1, -8, 0));
        assert_eq!(key, ZoneKey { x: -1, z: -1, level: 0 });
    }

    #[test]
    fn null_key_is_distinct_and_displays() {
        assert!(ZoneKey::NULL.is_null());
        assert!(!ZoneKey::from_coord(Coord::new(0, 0, 0)).is_null());
        assert_eq!(ZoneKey::NULL.to_string(), "zone(null)");
    }

    #[test]
    fn bucket_insert_and_remove() {
        let mut bucket = ZoneBucket::default();
        let a = EntitySlot::new(1);
        let b = EntitySlot::new(2);
        bucket.insert(a);
        bucket.insert(b);
        assert_eq!(bucket.len(), 2);
        assert!(bucket.contains(a));

        assert!(bucket.remove(a));
        assert!(!bucket.contains(a));
        assert!(!bucket.remove(a));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn bucket_duplicate_insert_panics() {
        let mut bucket = ZoneBucket::default();
        let slot = EntitySlot::new(3);
        bucket.insert(slot);
        bucket.insert(slot);
    }

    #[test]
    fn index_insert_ignores_null_key() {
        let mut index = ZoneIndex::new();
        index.insert(ZoneKey::NULL, EntitySlot::new(1));
        index.remove(ZoneKey::NULL, EntitySlot::new(1));
        assert_eq!(index.population(), 0);
    }

    #[test]
    fn index_miss_is_empty_not_error() {
        let index = ZoneIndex::new();
        assert!(index.bucket(ZoneKey { x: 5, z: 5, level: 0 }).is_none());
        assert_eq!(index.population(), 0);
    }

    #[test]
    fn index_population_spans_buckets() {
        let mut index = ZoneIndex::new();
        let z1 = ZoneKey { x: 0, z: 0, level: 0 };
        let z2 = ZoneKey { x: 1, z: 0, level: 0 };
        index.insert(z1, EntitySlot::new(1));
        index.insert(z1, EntitySlot::new(2));
        index.insert(z2, EntitySlot::new(3));
        assert_eq!(index.population(), 3);
    }

    #[test]
    fn empty_buckets_stay_allocated() {
        let mut index = ZoneIndex::new();
        let key = ZoneKey { x: 2, z: 2, level: 0 };
        index.insert(key, EntitySlot::new(1));
        index.remove(key, EntitySlot::new(1));
        let bucket = index.bucket(key).expect("bucket persists after emptying");
        assert!(bucket.is_empty());
    }
}
