use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;

/// Maps a successive attempt number to a candidate slot index.
///
/// A sequence is built once per operation by a [`ProbeStrategy`] and holds
/// the precomputed hash value(s) for one key; it carries no other state.
/// Attempt `0` is the home slot. The open-addressing engine queries at most
/// `capacity` attempts before declaring a configuration fault, so a strategy
/// that guarantees full coverage must visit every slot within that window.
///
/// All capacities in this crate are powers of two (the baseline doubled some
/// number of times), so wrapping u64 arithmetic is exact modulo the capacity.
pub trait ProbeSequence {
    /// Returns the candidate slot index for the given attempt.
    fn index(&self, attempt: usize, capacity: usize) -> usize;
}

/// Builds the probe sequence for a key.
///
/// The strategy owns the hash builder(s) and hashes the key exactly once per
/// operation; the resulting [`ProbeSequence`] is then stepped through attempt
/// indices `0, 1, 2, …`.
pub trait ProbeStrategy<T: ?Sized> {
    /// The sequence type produced for a single key.
    type Sequence: ProbeSequence;

    /// Hashes `value` and returns its probe sequence.
    fn sequence(&self, value: &T) -> Self::Sequence;
}

/// Linear probing: `index(i) = (hash + i) mod capacity`.
///
/// The simplest strategy. Covers every slot, but clusters of occupied slots
/// grow at their ends, so runs lengthen under load (primary clustering).
#[derive(Clone, Default)]
pub struct Linear<S = DefaultHashBuilder> {
    hash_builder: S,
}

impl<S> Linear<S> {
    /// Creates a linear probing strategy with the given hash builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }
}

impl<S: Default> Linear<S> {
    /// Creates a linear probing strategy with the default hash builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: Hash, S: BuildHasher> ProbeStrategy<T> for Linear<S> {
    type Sequence = LinearSequence;

    fn sequence(&self, value: &T) -> LinearSequence {
        LinearSequence {
            hash: self.hash_builder.hash_one(value),
        }
    }
}

/// The probe sequence produced by [`Linear`].
pub struct LinearSequence {
    hash: u64,
}

impl ProbeSequence for LinearSequence {
    fn index(&self, attempt: usize, capacity: usize) -> usize {
        (self.hash.wrapping_add(attempt as u64) % capacity as u64) as usize
    }
}

/// Quadratic probing: `index(i) = (hash + (i + i²) / 2) mod capacity`.
///
/// Triangular-number increments spread colliding keys apart faster than
/// linear probing, reducing primary clustering. Full coverage is not
/// guaranteed for arbitrary capacities; this is a known limitation of the
/// strategy, and the engine reports a fault if the sequence fails to find a
/// slot.
#[derive(Clone, Default)]
pub struct Quadratic<S = DefaultHashBuilder> {
    hash_builder: S,
}

impl<S> Quadratic<S> {
    /// Creates a quadratic probing strategy with the given hash builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }
}

impl<S: Default> Quadratic<S> {
    /// Creates a quadratic probing strategy with the default hash builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: Hash, S: BuildHasher> ProbeStrategy<T> for Quadratic<S> {
    type Sequence = QuadraticSequence;

    fn sequence(&self, value: &T) -> QuadraticSequence {
        QuadraticSequence {
            hash: self.hash_builder.hash_one(value),
        }
    }
}

/// The probe sequence produced by [`Quadratic`].
pub struct QuadraticSequence {
    hash: u64,
}

impl ProbeSequence for QuadraticSequence {
    fn index(&self, attempt: usize, capacity: usize) -> usize {
        let i = attempt as u128;
        let triangular = ((i + i * i) / 2) as u64;
        (self.hash.wrapping_add(triangular) % capacity as u64) as usize
    }
}

/// Double hashing: `index(i) = (hash1 + (hash2 | 1) * i) mod capacity`.
///
/// The step `hash2 | 1` is forced odd, so it is coprime with every
/// power-of-two capacity and the sequence visits all `capacity` slots before
/// repeating. The two builders should hash independently; poor independence
/// degrades collision behavior but not correctness.
#[derive(Clone, Default)]
pub struct DoubleHashing<S1 = DefaultHashBuilder, S2 = DefaultHashBuilder> {
    first: S1,
    second: S2,
}

impl<S1, S2> DoubleHashing<S1, S2> {
    /// Creates a double-hashing strategy with the given pair of hash
    /// builders.
    pub fn with_hashers(first: S1, second: S2) -> Self {
        Self { first, second }
    }
}

impl<S1: Default, S2: Default> DoubleHashing<S1, S2> {
    /// Creates a double-hashing strategy with default hash builders.
    pub fn new() -> Self {
        Self::with_hashers(S1::default(), S2::default())
    }
}

impl<T: Hash, S1: BuildHasher, S2: BuildHasher> ProbeStrategy<T> for DoubleHashing<S1, S2> {
    type Sequence = DoubleHashingSequence;

    fn sequence(&self, value: &T) -> DoubleHashingSequence {
        DoubleHashingSequence {
            hash1: self.first.hash_one(value),
            hash2: self.second.hash_one(value),
        }
    }
}

/// The probe sequence produced by [`DoubleHashing`].
pub struct DoubleHashingSequence {
    hash1: u64,
    hash2: u64,
}

impl ProbeSequence for DoubleHashingSequence {
    fn index(&self, attempt: usize, capacity: usize) -> usize {
        let step = self.hash2 | 1;
        let offset = step.wrapping_mul(attempt as u64);
        (self.hash1.wrapping_add(offset) % capacity as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
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

    fn collect_indices<Q: ProbeSequence>(seq: &Q, capacity: usize) -> Vec<usize> {
        (0..capacity).map(|i| seq.index(i, capacity)).collect()
    }

    #[test]
    fn linear_steps_by_one() {
        let strategy = Linear::with_hasher(SipHashBuilder { k1: 1, k2: 2 });
        let seq = strategy.sequence(&42u64);

        let indices = collect_indices(&seq, 16);
        for pair in indices.windows(2) {
            assert_eq!(pair[1], (pair[0] + 1) % 16);
        }
    }

    #[test]
    fn linear_covers_every_slot() {
        let strategy = Linear::with_hasher(SipHashBuilder { k1: 3, k2: 4 });
        let seq = strategy.sequence(&"covered");

        let mut indices = collect_indices(&seq, 16);
        indices.sort_unstable();
        assert_eq!(indices, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn quadratic_uses_triangular_offsets() {
        let strategy = Quadratic::with_hasher(SipHashBuilder { k1: 5, k2: 6 });
        let seq = strategy.sequence(&7u32);

        let capacity = 1usize << 20;
        let home = seq.index(0, capacity);
        // Offsets from the home slot follow 0, 1, 3, 6, 10, ...
        let offsets: [usize; 6] = [0, 1, 3, 6, 10, 15];
        for (i, expected) in offsets.into_iter().enumerate() {
            assert_eq!(seq.index(i, capacity), (home + expected) % capacity);
        }
    }

    #[test]
    fn double_hashing_visits_all_slots_exactly_once() {
        // The forced-odd step is coprime with a power-of-two capacity, so the
        // first `capacity` probes must enumerate every slot with no repeats.
        let strategy = DoubleHashing::with_hashers(
            SipHashBuilder { k1: 7, k2: 8 },
            SipHashBuilder { k1: 9, k2: 10 },
        );

        for key in 0u64..64 {
            let seq = strategy.sequence(&key);
            let mut indices = collect_indices(&seq, 16);
            indices.sort_unstable();
            assert_eq!(indices, (0..16).collect::<Vec<_>>());
        }
    }

    #[test]
    fn sequences_are_deterministic() {
        let strategy = Quadratic::with_hasher(SipHashBuilder { k1: 11, k2: 12 });
        let a = strategy.sequence(&"same key");
        let b = strategy.sequence(&"same key");

        assert_eq!(collect_indices(&a, 32), collect_indices(&b, 32));
    }
}
