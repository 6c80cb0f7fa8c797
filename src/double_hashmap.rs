use std::mem;

use crate::prime;

/// Floor for the base capacity; the table never shrinks below
/// `next_prime(MIN_BASE_CAPACITY)` slots.
const MIN_BASE_CAPACITY: usize = 53;

/// Base of the first polynomial hash, which picks the home slot
const HASH_FACTOR_ONE: u128 = 151;

/// Base of the second polynomial hash, which drives the probe step
const HASH_FACTOR_TWO: u128 = 163;

/// Load percentage above which an insert grows the table
const GROW_LOAD_PERCENT: usize = 70;

/// Load percentage below which a removal shrinks the table
const SHRINK_LOAD_PERCENT: usize = 10;

/// An owned key-value pair held by an occupied slot
#[derive(Debug, Clone)]
struct Entry {
    /// The key under which the value was inserted
    key: String,
    /// The value associated with the key
    value: String,
}

/// One position of the slot array.
///
/// `Tombstone` is a distinct variant rather than a sentinel value: an empty
/// slot ends a probe walk, a tombstone keeps it going.
#[derive(Debug, Clone)]
enum Slot {
    /// Never held an entry
    Empty,
    /// Held an entry that has since been removed
    Tombstone,
    /// Holds a live entry
    Occupied(Entry),
}

/// Where a probe walk for a key ended
#[derive(Debug)]
enum Probe {
    /// Index of the live entry whose key matched
    Match(usize),
    /// Index a new entry for the key should claim: the first tombstone seen
    /// on the chain, or the empty slot that ended the walk
    Vacant(usize),
}

/// An open-addressed hash table mapping owned `String` keys to `String`
/// values.
///
/// Collisions are resolved with double hashing: two independent polynomial
/// hashes of the key give a home slot and a step, and the resulting probe
/// chain visits every slot of the prime-sized array once before wrapping.
/// Removed entries leave tombstones so later entries on the same chain stay
/// reachable; every resize rebuilds the array and compacts tombstones away.
///
/// The table grows (base capacity doubled) when an insert would push the
/// load factor above 70% and shrinks (base capacity halved, never below the
/// floor of 53) when a removal drops it below 10%. The slot array's length
/// is always the next prime at or above the base capacity.
///
/// Keys and values are owned by the table and released on overwrite,
/// removal, or drop. `get` hands out a borrow that stays valid until the
/// next mutating call.
///
/// Note: this implementation is not thread-safe; wrap it in a lock for
/// shared use.
#[derive(Debug, Clone)]
pub struct DoubleHashMap {
    /// The slot array; its length is the capacity and is always prime
    slots: Vec<Slot>,
    /// Pre-prime-rounding target size; resize steps double or halve this
    base_capacity: usize,
    /// Number of live entries, tombstones excluded
    count: usize,
}

impl Default for DoubleHashMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<(String, String)> for DoubleHashMap {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl DoubleHashMap {
    /// Creates an empty table at the initial base capacity (53 slots)
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(MIN_BASE_CAPACITY)
    }

    /// Creates an empty table sized for `base_capacity`, clamped to the
    /// floor and rounded up to the next prime
    #[must_use]
    pub fn with_base_capacity(base_capacity: usize) -> Self {
        Self::with_parts(base_capacity.max(MIN_BASE_CAPACITY))
    }

    /// Builds an empty table whose capacity is the next prime at or above
    /// `base_capacity`
    fn with_parts(base_capacity: usize) -> Self {
        let capacity = prime::next_prime(base_capacity);
        Self { slots: vec![Slot::Empty; capacity], base_capacity, count: 0 }
    }

    /// Inserts a key-value pair, growing the table first when placing the
    /// entry would push the load factor above the threshold.
    ///
    /// Returns the previous value when `key` was already present; the entry
    /// count is unchanged in that case. A new entry reuses the first
    /// tombstone on its probe chain before claiming a fresh empty slot.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        if self.over_grow_threshold() {
            self.resize(self.base_capacity.saturating_mul(2));
        }

        match self.locate(&key) {
            Probe::Match(index) => {
                if let Some(Slot::Occupied(entry)) = self.slots.get_mut(index) {
                    return Some(mem::replace(&mut entry.value, value));
                }
                None
            }
            Probe::Vacant(index) => {
                // A vacant slot always exists while count < capacity
                if let Some(slot @ (Slot::Empty | Slot::Tombstone)) = self.slots.get_mut(index) {
                    *slot = Slot::Occupied(Entry { key, value });
                    self.count = self.count.saturating_add(1);
                }
                None
            }
        }
    }

    /// Returns the value stored under `key`.
    ///
    /// The borrow is tied to the table and stays valid until the next
    /// mutating call. An empty slot ends the walk unsuccessfully; tombstones
    /// are walked over so entries further down the chain are still found.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.locate(key) {
            Probe::Match(index) => match self.slots.get(index) {
                Some(Slot::Occupied(entry)) => Some(entry.value.as_str()),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    /// Returns a mutable borrow of the value stored under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        match self.locate(key) {
            Probe::Match(index) => match self.slots.get_mut(index) {
                Some(Slot::Occupied(entry)) => Some(&mut entry.value),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    /// Removes `key`'s entry, leaving a tombstone so later entries on the
    /// same probe chain stay reachable.
    ///
    /// Returns the removed value, or `None` when the key was absent (the
    /// table is unchanged in that case). Shrinks the table when the removal
    /// drops the load factor below the threshold.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        match self.locate(key) {
            Probe::Match(index) => {
                let removed = self
                    .slots
                    .get_mut(index)
                    .map(|slot| mem::replace(slot, Slot::Tombstone));
                self.count = self.count.saturating_sub(1);
                if self.under_shrink_threshold() {
                    self.resize(self.base_capacity / 2);
                }
                match removed {
                    Some(Slot::Occupied(entry)) => Some(entry.value),
                    _ => None,
                }
            }
            Probe::Vacant(_) => None,
        }
    }

    /// Returns the number of live entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the table holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the length of the slot array, always a prime number
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the pre-prime-rounding size the current capacity was derived
    /// from
    #[must_use]
    pub fn base_capacity(&self) -> usize {
        self.base_capacity
    }

    /// Returns the current load factor of the table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.slots.len() as f64
    }

    /// Removes every entry, keeping the current capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.count = 0;
    }

    /// Returns an iterator over the key-value pairs, in unspecified bucket
    /// order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: self.slots.iter() }
    }

    /// Walks `key`'s probe chain and reports where it ended: the slot
    /// holding the key, or the slot a new entry for the key should claim.
    ///
    /// The walk is bounded by `capacity` attempts; with `count < capacity`
    /// it always reaches an empty or tombstone slot before wrapping.
    #[allow(clippy::arithmetic_side_effects)]
    fn locate(&self, key: &str) -> Probe {
        let capacity = self.slots.len();
        let (mut index, step) = self.probe_start(key);
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match self.slots.get(index) {
                None | Some(Slot::Empty) => break,
                Some(Slot::Tombstone) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Slot::Occupied(entry)) => {
                    if entry.key == key {
                        return Probe::Match(index);
                    }
                }
            }
            index = (index + step) % capacity;
        }

        Probe::Vacant(first_tombstone.unwrap_or(index))
    }

    /// Computes the probe chain parameters for `key`: the home index and the
    /// per-attempt step.
    ///
    /// The step is reduced into `1..capacity`, so it is never zero and,
    /// with a prime capacity, never a multiple of it: the chain visits every
    /// slot once before repeating.
    #[allow(clippy::arithmetic_side_effects)]
    fn probe_start(&self, key: &str) -> (usize, usize) {
        let capacity = self.slots.len();
        let home = string_hash(key, HASH_FACTOR_ONE, capacity);
        let step = string_hash(key, HASH_FACTOR_TWO, capacity) % (capacity - 1) + 1;
        (home, step)
    }

    /// True when placing one more entry would push the load percentage above
    /// the growth threshold; the capacity is never zero
    #[allow(clippy::arithmetic_side_effects)]
    fn over_grow_threshold(&self) -> bool {
        self.count.saturating_add(1).saturating_mul(100) / self.slots.len() > GROW_LOAD_PERCENT
    }

    /// True when the live-entry load percentage has fallen below the shrink
    /// threshold; the capacity is never zero
    #[allow(clippy::arithmetic_side_effects)]
    fn under_shrink_threshold(&self) -> bool {
        self.count.saturating_mul(100) / self.slots.len() < SHRINK_LOAD_PERCENT
    }

    /// Rebuilds the table at `next_prime(new_base_capacity)` slots, moving
    /// every live entry across and dropping tombstones, then swaps the new
    /// storage in.
    ///
    /// A no-op when `new_base_capacity` is below the floor. Only insert and
    /// remove trigger a resize.
    fn resize(&mut self, new_base_capacity: usize) {
        if new_base_capacity < MIN_BASE_CAPACITY {
            return;
        }

        let mut next = Self::with_parts(new_base_capacity);
        for slot in mem::take(&mut self.slots) {
            if let Slot::Occupied(entry) = slot {
                next.insert(entry.key, entry.value);
            }
        }
        *self = next;
    }
}

/// Horner-style polynomial string hash: the bytes of `s` are digits of a
/// base-`factor` number, reduced modulo `buckets` at every step so the
/// accumulator stays bounded.
///
/// `buckets` is the table capacity and is never zero; the accumulator stays
/// below `buckets`, so the widened multiply cannot overflow.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn string_hash(s: &str, factor: u128, buckets: usize) -> usize {
    let modulus = buckets as u128;
    let mut acc: u128 = 0;
    for byte in s.bytes() {
        acc = (acc * factor + u128::from(byte)) % modulus;
    }
    acc as usize
}

/// Iterator over the key-value pairs of the table
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Remaining slots to scan
    slots: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied(entry) => Some((entry.key.as_str(), entry.value.as_str())),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts the tombstone slots left behind by removals
    fn tombstones(map: &DoubleHashMap) -> usize {
        map.slots.iter().filter(|slot| matches!(slot, Slot::Tombstone)).count()
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = DoubleHashMap::new();
        assert_eq!(map.insert("key1".to_string(), "one".to_string()), None);
        assert_eq!(map.insert("key2".to_string(), "two".to_string()), None);
        assert_eq!(map.insert("key3".to_string(), "three".to_string()), None);

        assert_eq!(map.get("key1"), Some("one"));
        assert_eq!(map.get("key2"), Some("two"));
        assert_eq!(map.get("key3"), Some("three"));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_update_keeps_count() {
        let mut map = DoubleHashMap::new();
        assert_eq!(map.insert("key1".to_string(), "old".to_string()), None);
        assert_eq!(map.insert("key1".to_string(), "new".to_string()), Some("old".to_string()));
        assert_eq!(map.get("key1"), Some("new"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = DoubleHashMap::new();
        map.insert("key1".to_string(), "one".to_string());
        map.insert("key2".to_string(), "two".to_string());

        assert_eq!(map.remove("key1"), Some("one".to_string()));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.get("key2"), Some("two"));
        assert_eq!(map.remove("key1"), None);
    }

    #[test]
    fn test_remove_absent_key_changes_nothing() {
        let mut map = DoubleHashMap::new();
        map.insert("key1".to_string(), "one".to_string());

        assert_eq!(map.remove("missing"), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key1"), Some("one"));
        assert_eq!(tombstones(&map), 0);
    }

    #[test]
    fn test_empty_string_key() {
        let mut map = DoubleHashMap::new();
        map.insert(String::new(), "blank".to_string());
        assert_eq!(map.get(""), Some("blank"));
        assert_eq!(map.remove(""), Some("blank".to_string()));
        assert_eq!(map.get(""), None);
    }

    #[test]
    fn test_get_mut() {
        let mut map = DoubleHashMap::new();
        map.insert("key1".to_string(), "one".to_string());

        if let Some(value) = map.get_mut("key1") {
            value.push_str("-edited");
        }

        assert_eq!(map.get("key1"), Some("one-edited"));
    }

    // "a" (0x61) and "," (0x2C) hash to the same home slot and step in a
    // 53-slot table: 97 and 44 are congruent mod 53, so both keys share one
    // probe chain under both hash factors.
    #[test]
    fn test_tombstone_keeps_chain_reachable() {
        let mut map = DoubleHashMap::new();
        map.insert("a".to_string(), "first".to_string());
        map.insert(",".to_string(), "second".to_string());

        assert_eq!(map.remove("a"), Some("first".to_string()));
        assert_eq!(tombstones(&map), 1);
        assert_eq!(map.get(","), Some("second"));
    }

    #[test]
    fn test_insert_reuses_first_tombstone() {
        let mut map = DoubleHashMap::new();
        map.insert("a".to_string(), "first".to_string());
        map.insert(",".to_string(), "second".to_string());
        map.remove("a");
        assert_eq!(tombstones(&map), 1);

        map.insert("a".to_string(), "again".to_string());
        assert_eq!(tombstones(&map), 0);
        assert_eq!(map.get("a"), Some("again"));
        assert_eq!(map.get(","), Some("second"));
    }

    #[test]
    fn test_growth_at_load_threshold() {
        let mut map = DoubleHashMap::new();
        for i in 0..37 {
            map.insert(format!("key-{i}"), format!("value-{i}"));
        }
        // 37 entries in 53 slots is just under 70% load
        assert_eq!(map.capacity(), 53);

        // The 38th insert crosses 70% and must grow before placing: base
        // capacity 53 doubles to 106, rounded up to the prime 107
        map.insert("key-37".to_string(), "value-37".to_string());
        assert_eq!(map.base_capacity(), 106);
        assert_eq!(map.capacity(), 107);
        assert_eq!(map.len(), 38);

        for i in 0..38 {
            assert_eq!(map.get(&format!("key-{i}")), Some(format!("value-{i}").as_str()));
        }
    }

    #[test]
    fn test_shrink_after_growth() {
        let mut map = DoubleHashMap::new();
        for i in 0..38 {
            map.insert(format!("key-{i}"), format!("value-{i}"));
        }
        assert_eq!(map.capacity(), 107);

        // Removing down to 10 entries drops the load below 10% of 107 and
        // halves the base capacity back to 53
        for i in 0..28 {
            map.remove(&format!("key-{i}"));
        }
        assert_eq!(map.len(), 10);
        assert_eq!(map.capacity(), 53);

        for i in 28..38 {
            assert_eq!(map.get(&format!("key-{i}")), Some(format!("value-{i}").as_str()));
        }
    }

    #[test]
    fn test_shrink_never_goes_below_floor() {
        let mut map = DoubleHashMap::new();
        for i in 0..6 {
            map.insert(format!("key-{i}"), format!("value-{i}"));
        }
        for i in 0..6 {
            map.remove(&format!("key-{i}"));
        }

        // Every removal below 10% load attempts a shrink, but half of the
        // floor base capacity is refused
        assert_eq!(map.capacity(), 53);
        assert!(map.is_empty());
    }

    #[test]
    fn test_capacity_stays_prime() {
        let mut map = DoubleHashMap::new();
        for i in 0..200 {
            map.insert(format!("key-{i}"), format!("value-{i}"));
            assert!(prime::is_prime(map.capacity()));
        }
        for i in 0..200 {
            map.remove(&format!("key-{i}"));
            assert!(prime::is_prime(map.capacity()));
        }
    }

    #[test]
    fn test_count_tracks_unique_keys() {
        let mut map = DoubleHashMap::new();
        for i in 0..100 {
            map.insert(format!("key-{i}"), "value".to_string());
        }
        for i in 0..100 {
            map.insert(format!("key-{i}"), "revalue".to_string());
        }
        assert_eq!(map.len(), 100);
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut map = DoubleHashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);

        map.insert("key1".to_string(), "one".to_string());
        assert!(!map.is_empty());
        assert_eq!(map.len(), 1);

        map.remove("key1");
        assert!(map.is_empty());
    }

    #[test]
    fn test_iter() {
        let mut map = DoubleHashMap::new();
        map.insert("a".to_string(), "1".to_string());
        map.insert("b".to_string(), "2".to_string());
        map.insert("c".to_string(), "3".to_string());
        map.remove("b");

        let mut pairs: Vec<(&str, &str)> = map.iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![("a", "1"), ("c", "3")]);
    }

    #[test]
    fn test_clear() {
        let mut map = DoubleHashMap::new();
        map.insert("key1".to_string(), "one".to_string());
        map.insert("key2".to_string(), "two".to_string());

        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.get("key2"), None);
        assert_eq!(tombstones(&map), 0);
    }

    #[test]
    fn test_load_factor() {
        let mut map = DoubleHashMap::new();
        for i in 0..20 {
            map.insert(format!("key-{i}"), "value".to_string());
        }
        assert!((map.load_factor() - 20.0 / 53.0).abs() < 0.01);
    }

    #[test]
    fn test_extend() {
        let mut map = DoubleHashMap::new();
        map.extend(vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        assert_eq!(map.get("a"), Some("1"));
        assert_eq!(map.get("b"), Some("2"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        proptest! {
            // A short key alphabet forces collisions, overwrites, and
            // removals of absent keys
            #[test]
            fn test_matches_std_hashmap(
                ops in proptest::collection::vec(
                    (any::<bool>(), "[a-c]{0,3}", "[a-z]{0,4}"),
                    0..300,
                ),
            ) {
                let mut map = DoubleHashMap::new();
                let mut model: HashMap<String, String> = HashMap::new();

                for (is_insert, key, value) in ops {
                    if is_insert {
                        prop_assert_eq!(
                            map.insert(key.clone(), value.clone()),
                            model.insert(key, value)
                        );
                    } else {
                        prop_assert_eq!(map.remove(&key), model.remove(&key));
                    }
                    prop_assert!(prime::is_prime(map.capacity()));
                }

                prop_assert_eq!(map.len(), model.len());
                for (key, value) in &model {
                    prop_assert_eq!(map.get(key), Some(value.as_str()));
                }
            }
        }
    }
}
