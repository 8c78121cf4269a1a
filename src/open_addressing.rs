//! An open-addressing hash set generic over its probe sequence strategy.
//!
//! All keys live in a single slot array. Collisions are resolved by walking
//! the probe sequence supplied by the strategy parameter; deletion leaves a
//! tombstone so later probes keep walking past removed entries. The same
//! engine backs [`LinearSet`], [`QuadraticSet`], and [`DoubleHashingSet`].

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter;
use core::mem;

use crate::BASELINE_CAPACITY;
use crate::DEFAULT_LOAD_FACTOR;
use crate::DefaultHashBuilder;
use crate::GROWTH_FACTOR;
use crate::probe::DoubleHashing;
use crate::probe::Linear;
use crate::probe::ProbeSequence;
use crate::probe::ProbeStrategy;
use crate::probe::Quadratic;
use crate::set::Set;

/// An open-addressing set probed linearly. See [`OpenAddressingSet`].
pub type LinearSet<T, S = DefaultHashBuilder> = OpenAddressingSet<T, Linear<S>>;

/// An open-addressing set probed with triangular-number offsets. See
/// [`OpenAddressingSet`].
pub type QuadraticSet<T, S = DefaultHashBuilder> = OpenAddressingSet<T, Quadratic<S>>;

/// An open-addressing set probed with a second-hash step. See
/// [`OpenAddressingSet`].
pub type DoubleHashingSet<T, S1 = DefaultHashBuilder, S2 = DefaultHashBuilder> =
    OpenAddressingSet<T, DoubleHashing<S1, S2>>;

/// One cell of the backing array.
///
/// `Tombstone` marks a slot whose occupant was removed: probes walk past it,
/// while inserts may reclaim it.
#[derive(Clone)]
enum Slot<T> {
    Empty,
    Tombstone,
    Occupied(T),
}

/// A hash set storing all keys in one slot array, resolving collisions by
/// probing.
///
/// `OpenAddressingSet<T, P>` is generic over a [`ProbeStrategy`] chosen at
/// compile time; use the [`LinearSet`], [`QuadraticSet`], and
/// [`DoubleHashingSet`] aliases rather than naming the engine directly.
///
/// Capacity starts at 16 slots and doubles whenever the load factor reaches
/// the threshold (default 0.75), checked before each insert proceeds. A
/// rehash rebuilds the array and reinserts every live entry, discarding
/// tombstones; growth is therefore amortized O(1) per insert. Capacity never
/// shrinks.
///
/// # Examples
///
/// ```rust
/// use collide_hash::LinearSet;
///
/// let mut set: LinearSet<&str> = LinearSet::new();
/// assert!(set.insert("a"));
/// assert!(!set.insert("a"));
/// assert!(set.find(&"a"));
/// assert!(set.remove(&"a"));
/// assert!(!set.find(&"a"));
/// ```
#[derive(Clone)]
pub struct OpenAddressingSet<T, P> {
    slots: Vec<Slot<T>>,
    populated: usize,
    load_factor: f64,
    probe: P,
}

impl<T, P> OpenAddressingSet<T, P> {
    /// Creates an empty set using the given probe strategy.
    pub fn with_strategy(probe: P) -> Self {
        Self::with_strategy_and_load_factor(probe, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty set using the given probe strategy and load-factor
    /// threshold.
    ///
    /// The threshold must lie strictly between 0 and 1.
    pub fn with_strategy_and_load_factor(probe: P, load_factor: f64) -> Self {
        assert!(
            load_factor > 0.0 && load_factor < 1.0,
            "load factor must lie in (0, 1)"
        );
        Self {
            slots: empty_slots(BASELINE_CAPACITY),
            populated: 0,
            load_factor,
            probe,
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

    /// Returns the current number of slots in the backing array.
    ///
    /// Capacities form a non-decreasing doubling sequence starting at 16.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Removes all elements, keeping the allocated capacity.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
    }

    /// Returns an iterator over the elements, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(value) => Some(value),
            _ => None,
        })
    }
}

impl<T, P: Default> OpenAddressingSet<T, P> {
    /// Creates an empty set with the default probe strategy configuration.
    pub fn new() -> Self {
        Self::with_strategy(P::default())
    }

    /// Creates an empty set with the given load-factor threshold.
    pub fn with_load_factor(load_factor: f64) -> Self {
        Self::with_strategy_and_load_factor(P::default(), load_factor)
    }
}

impl<T, P> OpenAddressingSet<T, P>
where
    T: Eq,
    P: ProbeStrategy<T>,
{
    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was absent and is now present, `false` if
    /// it was already present. Growth, when triggered, happens before the
    /// value is placed.
    ///
    /// # Panics
    ///
    /// Panics if the probe sequence exhausts all `capacity` attempts without
    /// reaching a free or tombstoned slot. This is a configuration fault:
    /// the chosen strategy does not cover the whole array at the current
    /// capacity. It cannot occur with [`Linear`] or [`DoubleHashing`]
    /// probing, whose sequences visit every slot of a power-of-two array.
    pub fn insert(&mut self, value: T) -> bool {
        if self.populated as f64 >= self.slots.len() as f64 * self.load_factor {
            self.grow();
        }

        if self.find(&value) {
            return false;
        }

        self.place(value);
        true
    }

    /// Returns `true` iff the value is currently present.
    ///
    /// Tombstones are walked past; the first truly empty slot proves the
    /// value absent, since no insert could have probed beyond it.
    pub fn find(&self, value: &T) -> bool {
        let capacity = self.slots.len();
        let seq = self.probe.sequence(value);

        for attempt in 0..capacity {
            match &self.slots[seq.index(attempt, capacity)] {
                Slot::Tombstone => continue,
                Slot::Empty => return false,
                Slot::Occupied(occupant) => {
                    if occupant == value {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Removes a value from the set, leaving a tombstone in its slot.
    ///
    /// Returns `true` if the value was present and is now absent.
    pub fn remove(&mut self, value: &T) -> bool {
        let capacity = self.slots.len();
        let seq = self.probe.sequence(value);

        for attempt in 0..capacity {
            let index = seq.index(attempt, capacity);
            match &self.slots[index] {
                Slot::Tombstone => continue,
                Slot::Empty => return false,
                Slot::Occupied(occupant) => {
                    if occupant == value {
                        self.slots[index] = Slot::Tombstone;
                        self.populated -= 1;
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Writes a value known to be absent into the first free or tombstoned
    /// slot on its probe sequence.
    fn place(&mut self, value: T) {
        let capacity = self.slots.len();
        let seq = self.probe.sequence(&value);

        for attempt in 0..capacity {
            let index = seq.index(attempt, capacity);
            if matches!(self.slots[index], Slot::Empty | Slot::Tombstone) {
                self.slots[index] = Slot::Occupied(value);
                self.populated += 1;
                return;
            }
        }

        panic!(
            "probe sequence exhausted all {capacity} slots without finding a free one; \
             the probe strategy does not cover this capacity"
        );
    }

    /// Rebuilds the array at double the capacity, reinserting every live
    /// entry and discarding tombstones.
    fn grow(&mut self) {
        let new_capacity = self.slots.len() * GROWTH_FACTOR;
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.populated = 0;

        for slot in old {
            if let Slot::Occupied(value) = slot {
                self.place(value);
            }
        }
    }
}

fn empty_slots<T>(capacity: usize) -> Vec<Slot<T>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

impl<T, P> Set<T> for OpenAddressingSet<T, P>
where
    T: Eq,
    P: ProbeStrategy<T>,
{
    fn insert(&mut self, value: T) -> bool {
        OpenAddressingSet::insert(self, value)
    }

    fn find(&self, value: &T) -> bool {
        OpenAddressingSet::find(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        OpenAddressingSet::remove(self, value)
    }
}

impl<T, P: Default> Default for OpenAddressingSet<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> Debug for OpenAddressingSet<T, P>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, P> Extend<T> for OpenAddressingSet<T, P>
where
    T: Eq,
    P: ProbeStrategy<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, P> FromIterator<T> for OpenAddressingSet<T, P>
where
    T: Eq,
    P: Default + ProbeStrategy<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
