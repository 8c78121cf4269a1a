//! The set contract shared by every engine in this crate.

/// The common insert/find/remove contract implemented by every engine.
///
/// All operations signal expected conditions (duplicate insert, absent-key
/// remove, find miss) through their boolean return value and leave the
/// structure untouched in those cases. Every engine also exposes the same
/// operations as inherent methods; the trait exists for callers that want to
/// pick an engine at runtime.
///
/// # Examples
///
/// ```rust
/// use collide_hash::ChainingSet;
/// use collide_hash::LinearSet;
/// use collide_hash::Set;
///
/// fn exercise(set: &mut dyn Set<u32>) {
///     assert!(set.insert(7));
///     assert!(!set.insert(7));
///     assert!(set.find(&7));
///     assert!(set.remove(&7));
///     assert!(!set.find(&7));
/// }
///
/// let mut chaining: ChainingSet<u32> = ChainingSet::new();
/// exercise(&mut chaining);
///
/// let mut linear: LinearSet<u32> = LinearSet::new();
/// exercise(&mut linear);
/// ```
pub trait Set<T> {
    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was absent and is now present, `false` if
    /// it was already present (in which case nothing is mutated). May grow
    /// and rehash the backing storage before placing the value.
    fn insert(&mut self, value: T) -> bool;

    /// Returns `true` iff the value is currently present. Never mutates.
    fn find(&self, value: &T) -> bool;

    /// Removes a value from the set.
    ///
    /// Returns `true` if the value was present and is now absent, `false` if
    /// it was absent (in which case nothing is mutated).
    fn remove(&mut self, value: &T) -> bool;
}
