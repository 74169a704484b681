use core::fmt::Debug;

use crate::error::Error;
use crate::hash_table::Cursor;
use crate::hash_table::DEFAULT_INITIAL_CAPACITY;
use crate::hash_table::Drain;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::hash_table::IntoIter;
use crate::hash_table::Iter;
use crate::strategy::HashingStrategy;

/// A hash set whose equality and hashing come from a [`HashingStrategy`].
///
/// `StrategySet<T, S>` stores values of type `T` in a chained
/// [`HashTable`]. Every hash code and equality test goes through the strategy
/// `S` supplied at construction, never through `T`'s own `Hash` or `Eq`. This
/// makes the set usable as an interning pool: [`put`](Self::put) and
/// [`get`](Self::get) hand back the canonical stored instance rather than the
/// argument.
///
/// Iteration order is the table's slot then chain order. It is not stable
/// across growth.
///
/// # Performance Characteristics
///
/// - **Memory**: one slot per power-of-two capacity, plus one boxed node per
///   three colliding elements beyond the first.
/// - **Lookups**: one strategy hash and a scan of one chain, expected length
///   well under eight at the default load factor.
#[derive(Clone)]
pub struct StrategySet<T, S> {
    table: HashTable<T>,
    strategy: S,
}

impl<T, S> PartialEq for StrategySet<T, S>
where
    S: HashingStrategy<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        other.iter().all(|v| self.contains(v))
    }
}

impl<T, S> Eq for StrategySet<T, S> where S: HashingStrategy<T> {}

impl<T, S> Debug for StrategySet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> StrategySet<T, S> {
    /// Creates an empty set using `strategy`, sized for
    /// [`DEFAULT_INITIAL_CAPACITY`] elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let set: StrategySet<i32, _> = StrategySet::new(NaturalStrategy);
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 16);
    /// # }
    /// ```
    pub fn new(strategy: S) -> Self {
        Self {
            table: HashTable::new(),
            strategy,
        }
    }

    /// Creates an empty set with `capacity` rounded up to a power of two
    /// slots.
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let set: StrategySet<i32, _> = StrategySet::with_capacity(NaturalStrategy, 100);
    /// assert_eq!(set.capacity(), 128);
    /// # }
    /// ```
    pub fn with_capacity(strategy: S, capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            strategy,
        }
    }

    /// Creates an empty set with `capacity` rounded up to a power of two
    /// slots that doubles once more than `load_factor` of them are occupied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLoadFactor`] unless `0 < load_factor <= 1`, and
    /// [`Error::CapacityOverflow`] if the rounded capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::Error;
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let set = StrategySet::<i32, _>::with_capacity_and_load_factor(NaturalStrategy, 8, 0.75)?;
    /// assert_eq!(set.max_occupied(), 6);
    ///
    /// assert!(matches!(
    ///     StrategySet::<i32, _>::with_capacity_and_load_factor(NaturalStrategy, 8, 1.5),
    ///     Err(Error::InvalidLoadFactor(_))
    /// ));
    /// # }
    /// # Ok::<(), strategy_set::Error>(())
    /// ```
    pub fn with_capacity_and_load_factor(
        strategy: S,
        capacity: usize,
        load_factor: f32,
    ) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity_and_load_factor(capacity, load_factor)?,
            strategy,
        })
    }

    /// Returns the strategy this set hashes and compares with.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    ///
    /// This is always a power of two. The set holds up to
    /// [`max_occupied`](Self::max_occupied) elements before it doubles.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of elements the set holds before it doubles.
    pub fn max_occupied(&self) -> usize {
        self.table.max_occupied()
    }

    /// Returns the load factor the set was created with.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Removes all elements from the set.
    ///
    /// This operation preserves the set's slot count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let mut set = StrategySet::new(NaturalStrategy);
    /// set.add(1);
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 16);
    /// # }
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// An iterator visiting all elements in table order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.table.iter()
    }

    /// Clears the set, returning all elements as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        self.table.drain()
    }

    /// Returns a cursor that walks the set and can remove the element it
    /// yielded last.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let mut set: StrategySet<i32, NaturalStrategy> = (0..10).collect();
    /// let mut cursor = set.cursor();
    /// while cursor.has_next() {
    ///     if cursor.next()? % 2 == 1 {
    ///         cursor.remove()?;
    ///     }
    /// }
    /// assert_eq!(set.len(), 5);
    /// # }
    /// # Ok::<(), strategy_set::Error>(())
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        self.table.cursor()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let mut set: StrategySet<i32, NaturalStrategy> = (1..=4).collect();
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains(&2));
    /// assert!(set.contains(&4));
    /// # }
    /// ```
    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.table.retain(f);
    }

    /// Returns the first element in table order.
    pub fn first(&self) -> Option<&T> {
        self.table.first()
    }

    /// Returns the last element in table order.
    pub fn last(&self) -> Option<&T> {
        self.table.last()
    }

    /// Returns the first element, in table order, satisfying `predicate`.
    pub fn detect(&self, predicate: impl FnMut(&&T) -> bool) -> Option<&T> {
        self.iter().find(predicate)
    }

    /// Returns `true` if any element satisfies `predicate`.
    pub fn any_satisfy(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.iter().any(predicate)
    }

    /// Returns `true` if every element satisfies `predicate`. Vacuously true
    /// for an empty set.
    pub fn all_satisfy(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.iter().all(predicate)
    }

    /// Returns `true` if no element satisfies `predicate`.
    pub fn none_satisfy(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        !self.any_satisfy(predicate)
    }

    /// Calls `f` on every element in table order.
    pub fn for_each(&self, f: impl FnMut(&T)) {
        self.iter().for_each(f);
    }

    pub(crate) fn table(&self) -> &HashTable<T> {
        &self.table
    }

    /// Returns chain statistics for the underlying table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Counts slots by the number of elements they hold.
    #[cfg(feature = "stats")]
    pub fn chain_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.chain_histogram()
    }

    /// Pretty-prints the chain-length histogram of the underlying table.
    #[cfg(all(feature = "stats", feature = "std"))]
    pub fn print_chain_histogram(&self) {
        self.table.print_chain_histogram();
    }
}

impl<T, S> StrategySet<T, S>
where
    S: HashingStrategy<T>,
{
    /// Creates a set using `strategy` holding a copy of every element of
    /// `other`.
    ///
    /// Elements are re-added under the new strategy, so elements distinct in
    /// `other` may collapse into one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::FnStrategy;
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let exact: StrategySet<i32, NaturalStrategy> = (0..10).collect();
    /// let parity = FnStrategy::new(|v: &i32| (v % 2) as u32, |a: &i32, b: &i32| a % 2 == b % 2);
    ///
    /// let by_parity = StrategySet::from_set(parity, &exact);
    /// assert_eq!(by_parity.len(), 2);
    /// # }
    /// ```
    pub fn from_set<S2>(strategy: S, other: &StrategySet<T, S2>) -> Self
    where
        T: Clone,
    {
        let mut set = Self {
            table: HashTable::allocated(DEFAULT_INITIAL_CAPACITY, other.load_factor()),
            strategy,
        };
        set.copy_from(other);
        set
    }

    /// Adds a value to the set. Returns `false` if an element equal to it
    /// under the strategy is already present, in which case `value` is
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let mut set = StrategySet::new(NaturalStrategy);
    /// assert_eq!(set.add(37), true);
    /// assert_eq!(set.add(37), false);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn add(&mut self, value: T) -> bool {
        let Self { table, strategy } = self;
        let hash = strategy.hash_code(&value);
        match table.entry(
            hash,
            |stored| strategy.equals(stored, &value),
            |stored| strategy.hash_code(stored),
        ) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    fn add_cloned(&mut self, value: &T) -> bool
    where
        T: Clone,
    {
        let Self { table, strategy } = self;
        match table.entry(
            strategy.hash_code(value),
            |stored| strategy.equals(stored, value),
            |stored| strategy.hash_code(stored),
        ) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
                true
            }
        }
    }

    /// Returns the stored element equal to `value`, storing `value` first if
    /// there is none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strategy_set::FnStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// // Compare by the first field only.
    /// let by_id = FnStrategy::new(|v: &(u32, &str)| v.0, |a: &(u32, &str), b: &(u32, &str)| a.0 == b.0);
    /// let mut pool = StrategySet::new(by_id);
    ///
    /// assert_eq!(pool.put((1, "first")), &(1, "first"));
    /// assert_eq!(pool.put((1, "second")), &(1, "first"));
    /// assert_eq!(pool.len(), 1);
    /// ```
    pub fn put(&mut self, value: T) -> &T {
        let Self { table, strategy } = self;
        let hash = strategy.hash_code(&value);
        let entry = table.entry(
            hash,
            |stored| strategy.equals(stored, &value),
            |stored| strategy.hash_code(stored),
        );
        entry.or_insert(value)
    }

    /// Returns the stored element equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let mut set = StrategySet::new(NaturalStrategy);
    /// set.add(42);
    /// assert_eq!(set.get(&42), Some(&42));
    /// assert_eq!(set.get(&1), None);
    /// # }
    /// ```
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.strategy.hash_code(value);
        self.table
            .find(hash, |stored| self.strategy.equals(stored, value))
    }

    /// Returns `true` if the set holds an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Removes the element equal to `value`. Returns whether one was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let mut set = StrategySet::new(NaturalStrategy);
    /// set.add(1);
    /// assert_eq!(set.remove(&1), true);
    /// assert_eq!(set.remove(&1), false);
    /// # }
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.remove_from_pool(value).is_some()
    }

    /// Removes and returns the stored element equal to `value`.
    pub fn remove_from_pool(&mut self, value: &T) -> Option<T> {
        let hash = self.strategy.hash_code(value);
        self.table
            .remove(hash, |stored| self.strategy.equals(stored, value))
    }

    /// Reserves room for at least `additional` more elements, rehashing at
    /// most once.
    ///
    /// # Panics
    ///
    /// Panics if the new slot count overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        let Self { table, strategy } = self;
        table.reserve(additional, |stored| strategy.hash_code(stored));
    }

    /// Adds every value. Returns `true` if the set changed.
    ///
    /// Room for the iterator's lower size bound is reserved up front.
    pub fn add_all(&mut self, values: impl IntoIterator<Item = T>) -> bool {
        let values = values.into_iter();
        self.reserve(values.size_hint().0);
        values.fold(false, |changed, value| self.add(value) | changed)
    }

    /// Adds a copy of every element of `other` not already present, walking
    /// `other`'s slots directly. Returns `true` if the set changed.
    pub fn copy_from<S2>(&mut self, other: &StrategySet<T, S2>) -> bool
    where
        T: Clone,
    {
        self.reserve(other.len());
        other
            .table
            .iter()
            .fold(false, |changed, value| self.add_cloned(value) | changed)
    }

    /// Removes every element equal to one of `values`. Returns `true` if the
    /// set changed.
    pub fn remove_all<'a>(&mut self, values: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        values
            .into_iter()
            .fold(false, |changed, value| self.remove(value) | changed)
    }

    /// Keeps only the elements equal to one of `values`. Returns `true` if
    /// the set changed.
    ///
    /// Matching stored elements move into a fresh table of the same slot
    /// count, which then replaces the current one. Stored instances are kept,
    /// so pooled references stay canonical.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let mut set: StrategySet<i32, NaturalStrategy> = (0..10).collect();
    /// assert!(set.retain_all(&[1, 3, 5, 42]));
    /// assert_eq!(set.len(), 3);
    /// assert!(!set.retain_all(&[1, 3, 5]));
    /// # }
    /// ```
    pub fn retain_all<'a>(&mut self, values: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        let Self { table, strategy } = self;
        let before = table.len();
        let mut retained = table.empty_like();

        for value in values {
            let hash = strategy.hash_code(value);
            if let Some(stored) = table.remove(hash, |stored| strategy.equals(stored, value)) {
                retained.insert_unique(hash, stored, |stored| strategy.hash_code(stored));
            }
        }

        let after = retained.len();
        *table = retained;
        if after < before {
            tracing::trace!(before, after, "swapped in retained copy");
        }
        after < before
    }

    /// Keeps only the elements `other` contains under its own strategy.
    /// Returns `true` if the set changed.
    pub fn retain_all_from_set<S2>(&mut self, other: &StrategySet<T, S2>) -> bool
    where
        S2: HashingStrategy<T>,
    {
        let before = self.len();
        self.table.retain(|value| other.contains(value));
        self.len() < before
    }

    /// Returns the wrapping sum of the strategy hash codes of all elements.
    ///
    /// Equal sets under the same strategy have equal hash codes.
    pub fn hash_code(&self) -> u32 {
        self.iter()
            .fold(0u32, |sum, value| sum.wrapping_add(self.strategy.hash_code(value)))
    }
}

impl<T, S> Default for StrategySet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<T, S> IntoIterator for StrategySet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<'a, T, S> IntoIterator for &'a StrategySet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for StrategySet<T, S>
where
    S: HashingStrategy<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new(S::default());
        set.add_all(iter);
        set
    }
}

impl<T, S> Extend<T> for StrategySet<T, S>
where
    S: HashingStrategy<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, T, S> Extend<&'a T> for StrategySet<T, S>
where
    T: Clone + 'a,
    S: HashingStrategy<T>,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.add_cloned(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::Hash;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::strategy::FnStrategy;
    use crate::strategy::NullSafe;

    #[derive(Clone)]
    struct SipStrategy {
        k1: u64,
        k2: u64,
    }

    impl<T: Hash + Eq + ?Sized> HashingStrategy<T> for SipStrategy {
        fn hash_code(&self, value: &T) -> u32 {
            let mut hasher = SipHasher::new_with_keys(self.k1, self.k2);
            value.hash(&mut hasher);
            hasher.finish() as u32
        }

        fn equals(&self, a: &T, b: &T) -> bool {
            a == b
        }
    }

    impl Default for SipStrategy {
        fn default() -> Self {
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Sends every element to the same slot.
    #[derive(Clone, Default)]
    struct Colliding;

    impl HashingStrategy<i32> for Colliding {
        fn hash_code(&self, _: &i32) -> u32 {
            0
        }

        fn equals(&self, a: &i32, b: &i32) -> bool {
            a == b
        }
    }

    /// Case-insensitive ASCII comparison.
    #[derive(Clone, Default)]
    struct IgnoreCase;

    impl HashingStrategy<String> for IgnoreCase {
        fn hash_code(&self, value: &String) -> u32 {
            value.bytes().fold(0u32, |h, b| {
                h.wrapping_mul(31)
                    .wrapping_add(b.to_ascii_lowercase() as u32)
            })
        }

        fn equals(&self, a: &String, b: &String) -> bool {
            a.eq_ignore_ascii_case(b)
        }
    }

    #[test]
    fn test_new_and_with_capacity() {
        let set: StrategySet<i32, SipStrategy> = StrategySet::new(SipStrategy::default());
        assert!(set.is_empty());
        assert_eq!(set.capacity(), DEFAULT_INITIAL_CAPACITY * 2);

        let set: StrategySet<i32, _> = StrategySet::with_capacity(SipStrategy::default(), 200);
        assert_eq!(set.capacity(), 256);
        assert_eq!(set.max_occupied(), 192);
        assert!(set.is_empty());
    }

    #[test]
    fn test_invalid_load_factor() {
        let result =
            StrategySet::<i32, _>::with_capacity_and_load_factor(SipStrategy::default(), 8, 0.0);
        assert_eq!(result.err(), Some(Error::InvalidLoadFactor(0.0)));
    }

    #[test]
    fn test_add_and_contains() {
        let mut set = StrategySet::new(SipStrategy::default());

        assert!(set.add(1));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert!(set.contains(&1));

        assert!(!set.add(1));
        assert_eq!(set.len(), 1);

        assert!(set.add(2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_put_returns_canonical_instance() {
        let mut set = StrategySet::new(IgnoreCase);

        assert_eq!(set.put("Hello".to_string()), "Hello");
        assert_eq!(set.put("HELLO".to_string()), "Hello");
        assert_eq!(set.len(), 1);

        assert_eq!(
            set.get(&"hello".to_string()).map(String::as_str),
            Some("Hello")
        );
        assert_eq!(
            set.remove_from_pool(&"hELLO".to_string()).as_deref(),
            Some("Hello")
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut set = StrategySet::new(SipStrategy::default());
        set.add(1);
        set.add(2);
        set.add(3);

        assert!(set.remove(&2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
        assert!(set.contains(&3));

        assert!(!set.remove(&2));
        assert!(!set.remove(&4));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_from_pool() {
        let mut set = StrategySet::new(SipStrategy::default());
        set.add(1);
        set.add(2);

        assert_eq!(set.remove_from_pool(&1), Some(1));
        assert_eq!(set.len(), 1);
        assert_eq!(set.remove_from_pool(&1), None);
        assert_eq!(set.remove_from_pool(&3), None);
    }

    #[test]
    fn test_clear() {
        let mut set = StrategySet::new(SipStrategy::default());
        for i in 0..100 {
            set.add(i);
        }
        let capacity = set.capacity();

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_reserve() {
        let mut set = StrategySet::<i32, _>::new(SipStrategy::default());
        set.reserve(1000);
        assert!(set.max_occupied() >= 1000);

        let capacity = set.capacity();
        for i in 0..1000 {
            set.add(i);
        }
        assert_eq!(set.capacity(), capacity);
    }

    #[test]
    fn test_grows_before_seventh_insert() {
        let identity = FnStrategy::new(|v: &u32| *v, |a: &u32, b: &u32| a == b);
        let mut set = StrategySet::with_capacity_and_load_factor(identity, 8, 0.75).unwrap();
        assert_eq!(set.max_occupied(), 6);

        for i in 0..6 {
            set.add(i);
        }
        assert_eq!(set.capacity(), 8);

        set.add(6);
        assert_eq!(set.capacity(), 16);
        assert_eq!(set.len(), 7);
        assert!((0..7).all(|i| set.contains(&i)));
    }

    #[test]
    fn test_tiny_load_factor_keeps_room() {
        let identity = FnStrategy::new(|v: &u32| *v, |a: &u32, b: &u32| a == b);
        let mut set = StrategySet::with_capacity_and_load_factor(identity, 1, 0.25).unwrap();
        assert_eq!(set.max_occupied(), 0);

        for i in 0..10 {
            set.add(i);
            assert!(set.len() <= set.max_occupied());
        }
        assert!((0..10).all(|i| set.contains(&i)));
    }

    #[test]
    fn test_iter() {
        let mut set = StrategySet::new(SipStrategy::default());
        set.add(1);
        set.add(2);
        set.add(3);

        let mut values: Vec<i32> = set.iter().copied().collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(set.iter().len(), 3);

        let mut values: Vec<i32> = (&set).into_iter().copied().collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);

        let mut values: Vec<i32> = set.into_iter().collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_drain() {
        let mut set = StrategySet::new(SipStrategy::default());
        set.add(1);
        set.add(2);
        set.add(3);

        let mut drained: Vec<i32> = set.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(set.is_empty());
        assert!(set.add(1));
    }

    #[test]
    fn test_many_insertions() {
        let mut set = StrategySet::new(SipStrategy::default());

        for i in 0..10_000 {
            assert!(set.add(i));
        }
        assert_eq!(set.len(), 10_000);
        assert!(set.len() <= set.max_occupied());

        for i in 0..10_000 {
            assert!(set.contains(&i));
            assert!(!set.add(i));
        }
        assert_eq!(set.len(), 10_000);
    }

    #[test]
    fn test_collision_handling() {
        let mut set = StrategySet::new(Colliding);

        for i in 0..200 {
            assert!(set.add(i));
        }
        assert_eq!(set.len(), 200);

        for i in (0..200).step_by(2) {
            assert!(set.remove(&i));
        }
        assert_eq!(set.len(), 100);

        for i in 0..200 {
            assert_eq!(set.contains(&i), i % 2 == 1);
        }
    }

    #[test]
    fn test_null_element() {
        let mut set = StrategySet::new(NullSafe::new(SipStrategy::default()));

        assert!(set.add(None));
        assert!(!set.add(None));
        assert!(set.add(Some(0)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&None));
        assert_eq!(set.get(&None), Some(&None));

        assert!(set.remove(&None));
        assert!(!set.contains(&None));
        assert!(set.contains(&Some(0)));
    }

    #[test]
    fn test_add_all_and_remove_all() {
        let mut set = StrategySet::new(SipStrategy::default());

        assert!(set.add_all(0..50));
        assert!(!set.add_all(0..50));
        assert_eq!(set.len(), 50);

        let evens: Vec<i32> = (0..50).step_by(2).collect();
        assert!(set.remove_all(&evens));
        assert!(!set.remove_all(&evens));
        assert_eq!(set.len(), 25);
        assert!(set.all_satisfy(|v| v % 2 == 1));
    }

    #[test]
    fn test_retain_all() {
        let mut set = StrategySet::new(IgnoreCase);
        let pooled = ["Apple", "Banana", "Cherry", "Date"].map(String::from);
        set.add_all(pooled.iter().cloned());

        let keep = ["APPLE", "cherry", "fig"].map(String::from);
        assert!(set.retain_all(&keep));
        assert_eq!(set.len(), 2);
        // Stored instances survive, not the probes.
        assert_eq!(
            set.get(&"apple".to_string()).map(String::as_str),
            Some("Apple")
        );
        assert_eq!(
            set.get(&"CHERRY".to_string()).map(String::as_str),
            Some("Cherry")
        );

        assert!(!set.retain_all(&keep));
        assert_eq!(set.len(), 2);

        assert!(set.retain_all(&[]));
        assert!(set.is_empty());
    }

    #[test]
    fn test_retain_all_from_set() {
        let mut set = StrategySet::new(SipStrategy::default());
        set.add_all(0..100);

        let mut other = StrategySet::new(Colliding);
        other.add_all((0..100).filter(|v| v % 10 == 0));

        assert!(set.retain_all_from_set(&other));
        assert_eq!(set.len(), 10);
        assert!(!set.retain_all_from_set(&other));
        assert!(set.all_satisfy(|v| v % 10 == 0));
    }

    #[test]
    fn test_copy_from_and_from_set() {
        let mut source = StrategySet::new(SipStrategy::default());
        for word in ["a", "A", "b", "B", "c"] {
            source.add(word.to_string());
        }

        let folded = StrategySet::from_set(IgnoreCase, &source);
        assert_eq!(folded.len(), 3);
        assert_eq!(folded.load_factor(), source.load_factor());

        let mut target = StrategySet::new(SipStrategy::default());
        target.add("z".to_string());
        assert!(target.copy_from(&source));
        assert_eq!(target.len(), 6);
        assert!(!target.copy_from(&source));
    }

    #[test]
    fn test_retain() {
        let mut set = StrategySet::new(Colliding);
        set.add_all(0..100);
        set.retain(|v| v % 3 == 0);
        assert_eq!(set.len(), 34);
        assert!(set.all_satisfy(|v| v % 3 == 0));
    }

    #[test]
    fn test_cursor_removal() {
        let mut set = StrategySet::new(Colliding);
        set.add_all(0..40);

        let mut cursor = set.cursor();
        let mut visited = 0;
        while cursor.has_next() {
            let value = *cursor.next().unwrap();
            visited += 1;
            if value < 20 {
                assert_eq!(cursor.remove(), Ok(value));
            }
        }
        assert_eq!(visited, 40);
        assert_eq!(set.len(), 20);
        assert!((20..40).all(|v| set.contains(&v)));
    }

    #[test]
    fn test_queries() {
        let set: StrategySet<i32, Colliding> = (1..=10).collect();

        assert_eq!(set.detect(|&&v| v > 8).map(|v| *v > 8), Some(true));
        assert_eq!(set.detect(|&&v| v > 10), None);
        assert!(set.any_satisfy(|&v| v == 5));
        assert!(set.all_satisfy(|&v| v > 0));
        assert!(set.none_satisfy(|&v| v > 10));

        let mut sum = 0i32;
        set.for_each(|v| sum += v);
        assert_eq!(sum, 55);

        let order: Vec<i32> = set.iter().copied().collect();
        assert_eq!(set.first(), order.first());
        assert_eq!(set.last(), order.last());
    }

    #[test]
    fn test_equality_and_hash_code() {
        let strategy = SipStrategy::default();
        let mut a = StrategySet::new(strategy.clone());
        let mut b = StrategySet::with_capacity(strategy, 1024);
        a.add_all(0..100);
        b.add_all((0..100).rev());

        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());

        b.remove(&50);
        assert_ne!(a, b);
        b.add(500);
        assert_ne!(a, b);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut set = StrategySet::new(Colliding);
        set.add_all(0..30);

        let mut copy = set.clone();
        assert_eq!(copy, set);
        copy.remove(&0);
        assert!(set.contains(&0));
        assert_eq!(set.len(), 30);
    }

    #[test]
    fn test_extend() {
        let mut set: StrategySet<String, IgnoreCase> = StrategySet::default();
        set.extend(["x".to_string(), "X".to_string()]);
        let more = vec!["y".to_string(), "x".to_string()];
        set.extend(&more);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_debug() {
        let mut set = StrategySet::new(Colliding);
        set.add(7);
        assert_eq!(alloc::format!("{:?}", set), "{7}");
    }
}
