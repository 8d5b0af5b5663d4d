//! Open-addressing hash map keyed by `u32`.
//!
//! The table has a power-of-two number of slots and resolves collisions by
//! linear probing. Deletion uses backward shifting, so the table never holds
//! tombstones and lookups stay short after heavy churn. At least one slot is
//! always empty, which terminates every probe sequence.

use std::fmt;

use crate::{ArrayError, Result};

const MIN_CAPACITY: usize = 8;

/// Sizing parameters of an [`IntMap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Entries the map can hold before its first rehash.
    pub initial_capacity: usize,
    /// Maximum ratio of entries to slots, in `(0, 1)`.
    pub load_factor: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: MIN_CAPACITY,
            load_factor: 2.0 / 3.0,
        }
    }
}

impl MapConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.load_factor > 0.0 && self.load_factor < 1.0) {
            return Err(ArrayError::InvalidArgument(format!(
                "load factor must lie in (0, 1), got {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}

/// 32-bit finalizer of MurmurHash3.
#[inline]
fn mix(key: u32) -> u32 {
    let mut h = key;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

type Slot<V> = Option<(u32, V)>;

/// Hash map from `u32` keys to values.
#[derive(Clone)]
pub struct IntMap<V> {
    slots: Vec<Slot<V>>,
    len: usize,
    load_factor: f64,
}

/// The map backing sparse `f64` arrays.
pub type IntDoubleMap = IntMap<f64>;

impl<V> IntMap<V> {
    pub fn new() -> Self {
        Self::with_capacity(MapConfig::default().initial_capacity)
    }

    /// A map holding `capacity` entries without rehashing.
    pub fn with_capacity(capacity: usize) -> Self {
        let load_factor = MapConfig::default().load_factor;
        let slots = alloc_slots(capacity_for(capacity, load_factor));
        Self {
            slots,
            len: 0,
            load_factor,
        }
    }

    /// # Errors
    /// Returns [`ArrayError::InvalidArgument`] for a load factor outside
    /// `(0, 1)` and [`ArrayError::ResourceExhausted`] if the table cannot be
    /// allocated.
    pub fn with_config(config: MapConfig) -> Result<Self> {
        config.validate()?;
        let slots = try_alloc_slots(capacity_for(config.initial_capacity, config.load_factor))?;
        Ok(Self {
            slots,
            len: 0,
            load_factor: config.load_factor,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, key: u32) -> Option<&V> {
        match self.probe(key) {
            Ok(i) => self.slots[i].as_ref().map(|(_, v)| v),
            Err(_) => None,
        }
    }

    pub fn get_mut(&mut self, key: u32) -> Option<&mut V> {
        match self.probe(key) {
            Ok(i) => self.slots[i].as_mut().map(|(_, v)| v),
            Err(_) => None,
        }
    }

    pub fn get_or(&self, key: u32, default: V) -> V
    where
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(default)
    }

    #[inline]
    pub fn contains_key(&self, key: u32) -> bool {
        self.probe(key).is_ok()
    }

    /// Insert `value`, returning the value previously stored under `key`.
    ///
    /// # Panics
    /// Aborts like `Vec` does if a larger table cannot be allocated. Use
    /// [`try_insert`](Self::try_insert) to handle that case.
    pub fn insert(&mut self, key: u32, value: V) -> Option<V> {
        if let Ok(i) = self.probe(key) {
            return self.replace_at(i, key, value);
        }
        if self.len + 1 > threshold(self.capacity(), self.load_factor) {
            let slots = alloc_slots(capacity_for(self.len + 1, self.load_factor));
            self.rehash_into(slots);
        }
        self.insert_new(key, value);
        None
    }

    /// Like [`insert`](Self::insert), but reports a failed table growth.
    ///
    /// # Errors
    /// Returns [`ArrayError::ResourceExhausted`] if the table must grow and
    /// the allocation fails. The map is left unchanged.
    pub fn try_insert(&mut self, key: u32, value: V) -> Result<Option<V>> {
        if let Ok(i) = self.probe(key) {
            return Ok(self.replace_at(i, key, value));
        }
        if self.len + 1 > threshold(self.capacity(), self.load_factor) {
            let slots = try_alloc_slots(capacity_for(self.len + 1, self.load_factor))?;
            self.rehash_into(slots);
        }
        self.insert_new(key, value);
        Ok(None)
    }

    pub fn remove(&mut self, key: u32) -> Option<V> {
        let mut hole = self.probe(key).ok()?;
        let (_, value) = self.slots[hole].take()?;
        self.len -= 1;

        let mask = self.mask();
        let mut i = (hole + 1) & mask;
        while let Some(k) = self.slots[i].as_ref().map(|(k, _)| *k) {
            let home = mix(k) as usize & mask;
            // Move the entry back if the hole lies on its probe path.
            if (hole.wrapping_sub(home) & mask) < (i.wrapping_sub(home) & mask) {
                self.slots[hole] = self.slots[i].take();
                hole = i;
            }
            i = (i + 1) & mask;
        }
        Some(value)
    }

    /// Remove every entry, keeping the table size.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.len = 0;
    }

    /// Shrink the table to the smallest size holding the current entries.
    /// Returns whether the table was rehashed.
    pub fn shrink_to_fit(&mut self) -> bool {
        let capacity = capacity_for(self.len, self.load_factor);
        if capacity < self.capacity() {
            self.rehash_into(alloc_slots(capacity));
            true
        } else {
            false
        }
    }

    /// Keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Values in table order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &V)> + '_ {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref().map(|(k, v)| (*k, v)))
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(u32, &V),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    /// Apply `f` to every value in place.
    pub fn update_values<F>(&mut self, mut f: F)
    where
        F: FnMut(u32, &mut V),
    {
        for (k, v) in self.slots.iter_mut().flatten() {
            f(*k, v);
        }
    }

    /// Keep only the entries for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(u32, &mut V) -> bool,
    {
        let mut dropped = Vec::new();
        for (k, v) in self.slots.iter_mut().flatten() {
            if !f(*k, v) {
                dropped.push(*k);
            }
        }
        for k in dropped {
            self.remove(k);
        }
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// `Ok(slot)` holding `key`, or `Err(slot)` where it would be inserted.
    fn probe(&self, key: u32) -> std::result::Result<usize, usize> {
        let mask = self.mask();
        let mut i = mix(key) as usize & mask;
        loop {
            match &self.slots[i] {
                Some((k, _)) if *k == key => return Ok(i),
                Some(_) => i = (i + 1) & mask,
                None => return Err(i),
            }
        }
    }

    fn replace_at(&mut self, i: usize, key: u32, value: V) -> Option<V> {
        self.slots[i].replace((key, value)).map(|(_, v)| v)
    }

    fn insert_new(&mut self, key: u32, value: V) {
        if let Err(i) = self.probe(key) {
            self.slots[i] = Some((key, value));
            self.len += 1;
        }
    }

    fn rehash_into(&mut self, slots: Vec<Slot<V>>) {
        tracing::debug!(
            from = self.slots.len(),
            to = slots.len(),
            len = self.len,
            "int_map_rehash"
        );
        let old = std::mem::replace(&mut self.slots, slots);
        for (k, v) in old.into_iter().flatten() {
            match self.probe(k) {
                Ok(i) | Err(i) => self.slots[i] = Some((k, v)),
            }
        }
    }
}

/// Entries a table of `capacity` slots may hold. Always leaves one slot free.
#[inline]
fn threshold(capacity: usize, load_factor: f64) -> usize {
    ((capacity as f64 * load_factor) as usize).min(capacity - 1)
}

/// Smallest power-of-two table size holding `entries` entries.
fn capacity_for(entries: usize, load_factor: f64) -> usize {
    let mut capacity = MIN_CAPACITY;
    while threshold(capacity, load_factor) < entries {
        match capacity.checked_mul(2) {
            Some(c) => capacity = c,
            None => break,
        }
    }
    capacity
}

fn alloc_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

fn try_alloc_slots<V>(capacity: usize) -> Result<Vec<Slot<V>>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

impl<V> Default for IntMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for IntMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<V: fmt::Debug> fmt::Debug for IntMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> FromIterator<(u32, V)> for IntMap<V> {
    fn from_iter<I: IntoIterator<Item = (u32, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    #[test]
    fn test_insert_get_remove() {
        let mut map = IntDoubleMap::new();
        assert!(map.is_empty());
        assert_eq!(map.insert(3, 1.5), None);
        assert_eq!(map.insert(3, 2.5), Some(1.5));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(3), Some(&2.5));
        assert_eq!(map.get_or(4, -1.0), -1.0);
        assert!(map.contains_key(3));
        assert_eq!(map.remove(3), Some(2.5));
        assert_eq!(map.remove(3), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_zero_and_max_keys() {
        let mut map = IntMap::new();
        map.insert(0, "zero");
        map.insert(1, "one");
        map.insert(u32::MAX, "max");
        assert_eq!(map.get(0), Some(&"zero"));
        assert_eq!(map.get(1), Some(&"one"));
        assert_eq!(map.get(u32::MAX), Some(&"max"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_growth_keeps_entries() {
        let mut map = IntMap::new();
        let initial = map.capacity();
        for k in 0..1000u32 {
            map.insert(k * 7, k);
        }
        assert!(map.capacity() > initial);
        assert!(map.capacity().is_power_of_two());
        assert!(map.len() as f64 <= map.capacity() as f64 * 2.0 / 3.0);
        for k in 0..1000u32 {
            assert_eq!(map.get(k * 7), Some(&k));
        }
    }

    #[test]
    fn test_with_capacity_avoids_rehash() {
        let mut map = IntMap::with_capacity(100);
        let capacity = map.capacity();
        for k in 0..100u32 {
            map.insert(k, ());
        }
        assert_eq!(map.capacity(), capacity);
    }

    #[test]
    fn test_with_config() {
        let config = MapConfig::default()
            .with_initial_capacity(50)
            .with_load_factor(0.5);
        let map = IntMap::<f64>::with_config(config).unwrap();
        assert_eq!(map.capacity(), 128);

        let bad = MapConfig::default().with_load_factor(1.0);
        assert!(matches!(
            IntMap::<f64>::with_config(bad),
            Err(ArrayError::InvalidArgument(_))
        ));
        assert!(IntMap::<f64>::with_config(MapConfig::default().with_load_factor(f64::NAN)).is_err());
    }

    #[test]
    fn test_high_load_factor_keeps_free_slot() {
        let config = MapConfig::default().with_load_factor(0.999);
        let mut map = IntMap::with_config(config).unwrap();
        for k in 0..100u32 {
            map.try_insert(k, k).unwrap();
            assert!(map.len() < map.capacity());
        }
        assert!(!map.contains_key(1000));
    }

    #[test]
    fn test_remove_backward_shift() {
        // Keys that collide in a small table.
        let mut map = IntMap::new();
        let mask = map.capacity() - 1;
        let home = mix(1) as usize & mask;
        let colliding: Vec<u32> = (1..10_000u32)
            .filter(|&k| mix(k) as usize & mask == home)
            .take(3)
            .collect();
        for &k in &colliding {
            map.insert(k, k);
        }
        map.remove(colliding[0]);
        assert_eq!(map.get(colliding[1]), Some(&colliding[1]));
        assert_eq!(map.get(colliding[2]), Some(&colliding[2]));
        assert!(map.slots.iter().filter(|s| s.is_some()).count() == 2);
    }

    #[test]
    fn test_clear_and_shrink() {
        let mut map: IntMap<u32> = (0..500).map(|k| (k, k)).collect();
        let big = map.capacity();
        map.retain(|k, _| k < 5);
        assert_eq!(map.len(), 5);
        assert!(map.shrink_to_fit());
        assert!(map.capacity() < big);
        assert!(!map.shrink_to_fit());
        for k in 0..5 {
            assert_eq!(map.get(k), Some(&k));
        }
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(1), None);
    }

    #[test]
    fn test_update_values_and_iteration() {
        let mut map: IntMap<f64> = [(1, 1.0), (2, 2.0), (3, 3.0)].into_iter().collect();
        map.update_values(|_, v| *v *= 10.0);
        let mut keys: Vec<_> = map.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(map.values().sum::<f64>(), 60.0);

        let mut total = 0.0;
        map.for_each(|k, v| total += k as f64 * v);
        assert_eq!(total, 140.0);
    }

    #[test]
    fn test_equality_ignores_layout() {
        let a: IntMap<i32> = (0..20).map(|k| (k, k as i32)).collect();
        let mut b = IntMap::with_capacity(1000);
        for k in (0..20).rev() {
            b.insert(k, k as i32);
        }
        assert_ne!(a.capacity(), b.capacity());
        assert_eq!(a, b);
        b.insert(99, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_churn_matches_hashmap() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut map = IntMap::new();
        let mut reference = HashMap::new();
        for _ in 0..20_000 {
            let key = rng.gen_range(0..512u32);
            if rng.gen_bool(0.6) {
                let value: i64 = rng.gen();
                assert_eq!(map.insert(key, value), reference.insert(key, value));
            } else {
                assert_eq!(map.remove(key), reference.remove(&key));
            }
            assert_eq!(map.len(), reference.len());
        }
        for (k, v) in &reference {
            assert_eq!(map.get(*k), Some(v));
        }
        for k in 0..512u32 {
            assert_eq!(map.contains_key(k), reference.contains_key(&k));
        }
    }
}
