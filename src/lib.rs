#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A hash set using separate chaining.
///
/// This module provides a `ChainingSet` that resolves collisions by keeping a
/// short unordered list of keys per bucket.
pub mod chaining;

pub mod cuckoo;

pub mod open_addressing;

/// Probe sequence strategies for the open-addressing engine.
///
/// This module provides the `ProbeStrategy`/`ProbeSequence` traits and the
/// `Linear`, `Quadratic`, and `DoubleHashing` implementations.
pub mod probe;

pub mod set;

pub use chaining::ChainingSet;
pub use cuckoo::CuckooSet;
pub use open_addressing::DoubleHashingSet;
pub use open_addressing::LinearSet;
pub use open_addressing::OpenAddressingSet;
pub use open_addressing::QuadraticSet;
pub use probe::DoubleHashing;
pub use probe::Linear;
pub use probe::Quadratic;
pub use set::Set;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hash builder used when no explicit hasher is supplied.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hash builder used when no explicit hasher is supplied.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        compile_error!(
            "collide-hash requires either the `std` or the `foldhash` feature for a default hasher"
        );
    }
}

/// Initial number of slots (or buckets, or per-table cells) for every engine.
pub const BASELINE_CAPACITY: usize = 16;

/// Factor by which backing storage grows on rehash. Capacities never shrink.
pub const GROWTH_FACTOR: usize = 2;

/// Load-factor threshold at which an insert triggers a rehash.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
