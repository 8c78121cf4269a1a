use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter;
use core::mem;

use crate::BASELINE_CAPACITY;
use crate::DEFAULT_LOAD_FACTOR;
use crate::DefaultHashBuilder;
use crate::GROWTH_FACTOR;
use crate::set::Set;

/// A hash set resolving collisions with one unordered bucket per hash value.
///
/// Each key hashes to a bucket; operations scan that bucket linearly for an
/// equal key. Removal erases the entry physically. The cost of a collision is
/// proportional to the length of the bucket the key lands in; no per-bucket
/// bound is enforced beyond the global load-factor trigger.
///
/// The bucket array starts at 16 and doubles whenever the load factor reaches
/// the threshold (default 0.75), checked before an insert proceeds; every key
/// is then redistributed against the new bucket count. Capacity never
/// shrinks.
///
/// # Examples
///
/// ```rust
/// use collide_hash::ChainingSet;
///
/// let mut set: ChainingSet<&str> = ChainingSet::new();
/// assert!(set.insert("a"));
/// assert!(!set.insert("a"));
/// assert!(set.find(&"a"));
/// assert!(set.remove(&"a"));
/// assert!(!set.find(&"a"));
/// ```
#[derive(Clone)]
pub struct ChainingSet<T, S = DefaultHashBuilder> {
    buckets: Vec<Vec<T>>,
    populated: usize,
    load_factor: f64,
    hash_builder: S,
}

impl<T, S> ChainingSet<T, S> {
    /// Creates an empty set with the given hash builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_hasher_and_load_factor(hash_builder, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty set with the given hash builder and load-factor
    /// threshold.
    ///
    /// The threshold must lie strictly between 0 and 1.
    pub fn with_hasher_and_load_factor(hash_builder: S, load_factor: f64) -> Self {
        assert!(
            load_factor > 0.0 && load_factor < 1.0,
            "load factor must lie in (0, 1)"
        );
        Self {
            buckets: empty_buckets(BASELINE_CAPACITY),
            populated: 0,
            load_factor,
            hash_builder,
        }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Removes all elements, keeping the bucket array.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Returns an iterator over the elements, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buckets.iter().flatten()
    }
}

impl<T, S: Default> ChainingSet<T, S> {
    /// Creates an empty set with the default hash builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty set with the given load-factor threshold.
    pub fn with_load_factor(load_factor: f64) -> Self {
        Self::with_hasher_and_load_factor(S::default(), load_factor)
    }
}

impl<T, S> ChainingSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was absent and is now present, `false` if
    /// it was already present. Growth, when triggered, happens before the
    /// bucket is scanned.
    pub fn insert(&mut self, value: T) -> bool {
        if self.populated as f64 >= self.buckets.len() as f64 * self.load_factor {
            self.grow();
        }

        let index = self.bucket_index(&value);
        let bucket = &mut self.buckets[index];
        if bucket.contains(&value) {
            return false;
        }

        bucket.push(value);
        self.populated += 1;
        true
    }

    /// Returns `true` iff the value is currently present.
    pub fn find(&self, value: &T) -> bool {
        self.buckets[self.bucket_index(value)].contains(value)
    }

    /// Removes a value from the set, erasing its bucket entry.
    ///
    /// Returns `true` if the value was present and is now absent.
    pub fn remove(&mut self, value: &T) -> bool {
        let index = self.bucket_index(value);
        let bucket = &mut self.buckets[index];

        match bucket.iter().position(|occupant| occupant == value) {
            Some(position) => {
                bucket.swap_remove(position);
                self.populated -= 1;
                true
            }
            None => false,
        }
    }

    fn bucket_index(&self, value: &T) -> usize {
        (self.hash_builder.hash_one(value) % self.buckets.len() as u64) as usize
    }

    /// Doubles the bucket array and redistributes every key against the new
    /// bucket count.
    fn grow(&mut self) {
        let new_capacity = self.buckets.len() * GROWTH_FACTOR;
        let old = mem::replace(&mut self.buckets, empty_buckets(new_capacity));

        for value in old.into_iter().flatten() {
            let index = self.bucket_index(&value);
            self.buckets[index].push(value);
        }
    }
}

fn empty_buckets<T>(capacity: usize) -> Vec<Vec<T>> {
    iter::repeat_with(Vec::new).take(capacity).collect()
}

impl<T, S> Set<T> for ChainingSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, value: T) -> bool {
        ChainingSet::insert(self, value)
    }

    fn find(&self, value: &T) -> bool {
        ChainingSet::find(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        ChainingSet::remove(self, value)
    }
}

impl<T, S: Default> Default for ChainingSet<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug, S> Debug for ChainingSet<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> Extend<T> for ChainingSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S> FromIterator<T> for ChainingSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;
    use core::hash::Hasher;

    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone, Default)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    /// Hashes everything to the same bucket.
    #[derive(Clone, Default)]
    struct CollidingBuilder;

    struct CollidingHasher;

    impl Hasher for CollidingHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    impl BuildHasher for CollidingBuilder {
        type Hasher = CollidingHasher;

        fn build_hasher(&self) -> Self::Hasher {
            CollidingHasher
        }
    }

    fn sip_set() -> ChainingSet<u64, SipHashBuilder> {
        ChainingSet::with_hasher(SipHashBuilder { k1: 1, k2: 2 })
    }

    #[test]
    fn contract_basics() {
        let mut set = sip_set();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), BASELINE_CAPACITY);

        assert!(set.insert(1));
        assert_eq!(set.len(), 1);
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);

        assert!(set.find(&1));
        assert!(!set.find(&2));

        assert!(!set.remove(&2));
        assert_eq!(set.len(), 1);
        assert!(set.remove(&1));
        assert!(set.is_empty());
        assert!(!set.remove(&1));
    }

    #[test]
    fn growth_triggers_at_the_threshold() {
        let mut set = sip_set();
        for key in 0..12 {
            assert!(set.insert(key));
        }
        assert_eq!(set.capacity(), 16);

        assert!(set.insert(12));
        assert_eq!(set.capacity(), 32);

        for key in 0..13 {
            assert!(set.find(&key));
        }
    }

    #[test]
    fn redistribution_preserves_membership() {
        let mut set = sip_set();
        for key in 0..1_000u64 {
            assert!(set.insert(key));
        }
        assert_eq!(set.len(), 1_000);
        assert!(set.capacity() >= 1_000);

        for key in 0..1_000 {
            assert!(set.find(&key));
        }
        for key in 1_000..1_100 {
            assert!(!set.find(&key));
        }
    }

    #[test]
    fn round_trip_halves() {
        let mut set = sip_set();
        for key in 0..200 {
            assert!(set.insert(key));
        }
        for key in 0..100 {
            assert!(set.remove(&key));
        }
        for key in 0..100 {
            assert!(!set.find(&key));
        }
        for key in 100..200 {
            assert!(set.find(&key));
        }
        assert_eq!(set.len(), 100);
    }

    #[test]
    fn single_bucket_degenerates_but_stays_correct() {
        let mut set: ChainingSet<u64, CollidingBuilder> = ChainingSet::new();
        for key in 0..50 {
            assert!(set.insert(key));
        }
        for key in 0..50 {
            assert!(set.find(&key));
        }
        for key in (0..50).step_by(2) {
            assert!(set.remove(&key));
        }
        for key in 0..50 {
            assert_eq!(set.find(&key), key % 2 == 1);
        }
        assert_eq!(set.len(), 25);
    }

    #[test]
    fn string_keys() {
        let mut set: ChainingSet<String, SipHashBuilder> = ChainingSet::new();
        for i in 0..100 {
            assert!(set.insert(alloc::format!("key_{i:04}")));
        }
        assert!(set.find(&String::from("key_0042")));
        assert!(!set.find(&String::from("key_9999")));
    }

    #[test]
    fn iter_yields_every_element() {
        let set: ChainingSet<u64, SipHashBuilder> = (0..32).collect();
        let mut values: Vec<u64> = set.iter().copied().collect();
        values.sort_unstable();
        assert_eq!(values, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut set = sip_set();
        for key in 0..100 {
            set.insert(key);
        }
        let capacity = set.capacity();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);
        assert!(!set.find(&1));
    }
}
