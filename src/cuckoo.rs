//! A two-table cuckoo hash set.
//!
//! Every key has exactly two candidate cells, one per table, addressed by two
//! independent hash functions. Lookups and removals therefore touch at most
//! two cells. Inserts that find both cells occupied evict an occupant and
//! walk it through a bounded displacement chain, regrowing both tables in
//! lock-step when the chain is judged cyclic.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter;
use core::mem;

use crate::BASELINE_CAPACITY;
use crate::DefaultHashBuilder;
use crate::GROWTH_FACTOR;
use crate::set::Set;

/// A hash set storing each key in one of two candidate cells.
///
/// `CuckooSet<T, S1, S2>` keeps two tables of equal capacity, each addressed
/// by its own hash builder. A present key always occupies exactly one of
/// `table0[hash0(key) % capacity]` and `table1[hash1(key) % capacity]`, so
/// `find` and `remove` inspect at most two cells. Keys may silently migrate
/// between their two cells as other inserts displace them; callers observe
/// only present/absent.
///
/// When an insert exhausts its displacement budget (one move per currently
/// present key, past which the chain has almost certainly entered a cycle),
/// both tables double in lock-step and every key is reinserted; the insert
/// then retries. This is expected behavior handled internally, never an
/// error. Tables never shrink.
///
/// # Examples
///
/// ```rust
/// use collide_hash::CuckooSet;
///
/// let mut set: CuckooSet<&str> = CuckooSet::new();
/// assert!(set.insert("a"));
/// assert!(!set.insert("a"));
/// assert!(set.find(&"a"));
/// assert!(set.remove(&"a"));
/// assert!(!set.find(&"a"));
/// ```
#[derive(Clone)]
pub struct CuckooSet<T, S1 = DefaultHashBuilder, S2 = DefaultHashBuilder> {
    table0: Vec<Option<T>>,
    table1: Vec<Option<T>>,
    populated: usize,
    hash0: S1,
    hash1: S2,
}

impl<T, S1, S2> CuckooSet<T, S1, S2> {
    /// Creates an empty set with the given pair of hash builders.
    pub fn with_hashers(hash0: S1, hash1: S2) -> Self {
        Self::with_capacity_and_hashers(BASELINE_CAPACITY, hash0, hash1)
    }

    /// Creates an empty set with the given per-table capacity and hash
    /// builders.
    ///
    /// A zero capacity is coerced to the baseline of 16; the tables are
    /// never empty.
    pub fn with_capacity_and_hashers(capacity: usize, hash0: S1, hash1: S2) -> Self {
        let capacity = if capacity == 0 {
            BASELINE_CAPACITY
        } else {
            capacity
        };
        Self {
            table0: empty_cells(capacity),
            table1: empty_cells(capacity),
            populated: 0,
            hash0,
            hash1,
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

    /// Returns the capacity of each table. Both tables always share it.
    pub fn table_capacity(&self) -> usize {
        self.table0.len()
    }

    /// Removes all elements, keeping the allocated tables.
    pub fn clear(&mut self) {
        for cell in self.table0.iter_mut().chain(self.table1.iter_mut()) {
            *cell = None;
        }
        self.populated = 0;
    }

    /// Returns an iterator over the elements, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.table0.iter().chain(self.table1.iter()).flatten()
    }
}

impl<T, S1: Default, S2: Default> CuckooSet<T, S1, S2> {
    /// Creates an empty set with default hash builders.
    pub fn new() -> Self {
        Self::with_hashers(S1::default(), S2::default())
    }

    /// Creates an empty set with the given per-table capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hashers(capacity, S1::default(), S2::default())
    }
}

impl<T, S1, S2> CuckooSet<T, S1, S2>
where
    T: Hash + Eq,
    S1: BuildHasher,
    S2: BuildHasher,
{
    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was absent and is now present, `false` if
    /// it was already present. If both candidate cells are occupied, the
    /// occupant of the first table is evicted and displaced through the
    /// tables; chains that exceed the budget trigger a lock-step regrowth
    /// and a retry, so placement always succeeds eventually.
    pub fn insert(&mut self, value: T) -> bool {
        let index0 = self.index0(&value);
        let index1 = self.index1(&value);

        if self.table0[index0].as_ref() == Some(&value)
            || self.table1[index1].as_ref() == Some(&value)
        {
            return false;
        }

        if self.table0[index0].is_none() {
            self.table0[index0] = Some(value);
            self.populated += 1;
            return true;
        }

        if self.table1[index1].is_none() {
            self.table1[index1] = Some(value);
            self.populated += 1;
            return true;
        }

        // Both cells taken: evict the first table's occupant in favor of the
        // new value and walk the evictee to a new home.
        let Some(evicted) = self.table0[index0].replace(value) else {
            unreachable!()
        };
        self.displace(evicted, 1)
    }

    /// Returns `true` iff the value occupies either of its two candidate
    /// cells.
    pub fn find(&self, value: &T) -> bool {
        self.table0[self.index0(value)].as_ref() == Some(value)
            || self.table1[self.index1(value)].as_ref() == Some(value)
    }

    /// Removes a value from whichever candidate cell holds it.
    ///
    /// Returns `true` if the value was present and is now absent.
    pub fn remove(&mut self, value: &T) -> bool {
        let index0 = self.index0(value);
        if self.table0[index0].as_ref() == Some(value) {
            self.table0[index0] = None;
            self.populated -= 1;
            return true;
        }

        let index1 = self.index1(value);
        if self.table1[index1].as_ref() == Some(value) {
            self.table1[index1] = None;
            self.populated -= 1;
            return true;
        }

        false
    }

    fn index0(&self, value: &T) -> usize {
        (self.hash0.hash_one(value) % self.table0.len() as u64) as usize
    }

    fn index1(&self, value: &T) -> usize {
        (self.hash1.hash_one(value) % self.table1.len() as u64) as usize
    }

    /// Walks a displaced value through the tables, alternating between them,
    /// swapping it into each candidate cell and carrying the prior occupant
    /// onward.
    ///
    /// The budget is one move per currently present key: a chain longer than
    /// the population has revisited a cell and will loop forever, so the
    /// tables regrow and the carried value is reinserted into the larger
    /// structure. Always returns `true`; the displaced value is never a
    /// duplicate.
    fn displace(&mut self, mut carried: T, mut half: usize) -> bool {
        let budget = self.populated;

        for _ in 0..budget {
            let cell = if half & 1 == 0 {
                let index = self.index0(&carried);
                &mut self.table0[index]
            } else {
                let index = self.index1(&carried);
                &mut self.table1[index]
            };

            match cell.replace(carried) {
                None => {
                    self.populated += 1;
                    return true;
                }
                Some(next) => carried = next,
            }
            half += 1;
        }

        self.grow();
        self.insert(carried)
    }

    /// Doubles both tables in lock-step and reinserts every key through the
    /// regular insert path.
    ///
    /// Growth strictly reduces the load factor, so repeated regrowth
    /// terminates in practice even though cuckoo hashing proves no hard
    /// bound on displacement attempts in general.
    fn grow(&mut self) {
        let capacity = self.table0.len() * GROWTH_FACTOR;
        let old0 = mem::replace(&mut self.table0, empty_cells(capacity));
        let old1 = mem::replace(&mut self.table1, empty_cells(capacity));
        self.populated = 0;

        for value in old0.into_iter().chain(old1).flatten() {
            self.insert(value);
        }
    }
}

fn empty_cells<T>(capacity: usize) -> Vec<Option<T>> {
    iter::repeat_with(|| None).take(capacity).collect()
}

impl<T, S1, S2> Set<T> for CuckooSet<T, S1, S2>
where
    T: Hash + Eq,
    S1: BuildHasher,
    S2: BuildHasher,
{
    fn insert(&mut self, value: T) -> bool {
        CuckooSet::insert(self, value)
    }

    fn find(&self, value: &T) -> bool {
        CuckooSet::find(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        CuckooSet::remove(self, value)
    }
}

impl<T, S1: Default, S2: Default> Default for CuckooSet<T, S1, S2> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug, S1, S2> Debug for CuckooSet<T, S1, S2> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S1, S2> Extend<T> for CuckooSet<T, S1, S2>
where
    T: Hash + Eq,
    S1: BuildHasher,
    S2: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S1, S2> FromIterator<T> for CuckooSet<T, S1, S2>
where
    T: Hash + Eq,
    S1: BuildHasher + Default,
    S2: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use siphasher::sip::SipHasher;
    use siphasher::sip::SipHasher13;

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

    #[derive(Clone, Default)]
    struct Sip13Builder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for Sip13Builder {
        type Hasher = SipHasher13;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher13::new_with_keys(self.k1, self.k2)
        }
    }

    fn sip_set() -> CuckooSet<u64, SipHashBuilder, Sip13Builder> {
        CuckooSet::with_hashers(
            SipHashBuilder { k1: 1, k2: 2 },
            Sip13Builder { k1: 3, k2: 4 },
        )
    }

    /// Checks that every element occupies exactly one of its two candidate
    /// cells and that the tables share their capacity.
    fn check_invariant(set: &CuckooSet<u64, SipHashBuilder, Sip13Builder>) {
        assert_eq!(set.table0.len(), set.table1.len());

        let mut live = 0;
        for value in set.table0.iter().chain(set.table1.iter()).flatten() {
            let in0 = set.table0[set.index0(value)].as_ref() == Some(value);
            let in1 = set.table1[set.index1(value)].as_ref() == Some(value);
            assert!(in0 ^ in1, "key {value} must reside in exactly one cell");
            live += 1;
        }
        assert_eq!(live, set.len());
    }

    #[test]
    fn contract_basics() {
        let mut set = sip_set();
        assert!(set.is_empty());
        assert_eq!(set.table_capacity(), BASELINE_CAPACITY);

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
    fn zero_capacity_is_coerced_to_baseline() {
        let set: CuckooSet<u64, SipHashBuilder, Sip13Builder> = CuckooSet::with_capacity(0);
        assert_eq!(set.table_capacity(), BASELINE_CAPACITY);
    }

    #[test]
    fn thirty_three_inserts_force_regrowth() {
        // 33 keys cannot fit two 16-cell tables' candidate structure without
        // at least one lock-step doubling.
        let mut set = sip_set();
        for key in 0..33 {
            assert!(set.insert(key));
        }

        assert!(set.table_capacity() >= 32);
        assert_eq!(set.len(), 33);
        for key in 0..33 {
            assert!(set.find(&key));
        }
        check_invariant(&set);
    }

    #[test]
    fn displacement_preserves_membership() {
        let mut set = sip_set();
        for key in 0..2_000u64 {
            assert!(set.insert(key));
            assert!(!set.insert(key));
        }
        assert_eq!(set.len(), 2_000);

        for key in 0..2_000 {
            assert!(set.find(&key));
        }
        for key in 2_000..2_100 {
            assert!(!set.find(&key));
        }
        check_invariant(&set);
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
        check_invariant(&set);
    }

    #[test]
    fn tables_only_grow() {
        let mut set = sip_set();
        let mut last = set.table_capacity();

        for key in 0..5_000u64 {
            set.insert(key);
            let capacity = set.table_capacity();
            // One insert may chain several lock-step doublings, but capacity
            // only ever multiplies.
            assert!(capacity >= last);
            assert_eq!(capacity % last, 0);
            last = capacity;
        }

        for key in 0..5_000 {
            set.remove(&key);
        }
        assert_eq!(set.table_capacity(), last);
        assert!(set.is_empty());
    }

    #[test]
    fn reinsert_after_remove() {
        let mut set = sip_set();
        for key in 0..100 {
            set.insert(key);
        }
        for key in 0..100 {
            assert!(set.remove(&key));
            assert!(set.insert(key));
        }
        assert_eq!(set.len(), 100);
        check_invariant(&set);
    }

    #[test]
    fn identical_hashers_still_terminate() {
        // With both tables addressed by the same function, each key's two
        // candidate cells coincide; displacement chains cycle quickly and
        // regrowth has to bail them out.
        let mut set: CuckooSet<u64, SipHashBuilder, SipHashBuilder> = CuckooSet::with_hashers(
            SipHashBuilder { k1: 9, k2: 9 },
            SipHashBuilder { k1: 9, k2: 9 },
        );

        for key in 0..100 {
            assert!(set.insert(key));
        }
        for key in 0..100 {
            assert!(set.find(&key));
        }
        assert_eq!(set.len(), 100);
    }
}
