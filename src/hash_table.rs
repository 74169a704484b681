//! The slot table underneath [`StrategySet`](crate::StrategySet).
//!
//! [`HashTable`] knows nothing about hashing strategies. Every operation takes
//! the 32-bit hash code of the element it is looking for and an equality
//! predicate, and operations that may grow the table also take a `hasher`
//! closure so stored elements can be re-addressed.

use alloc::boxed::Box;
#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::chain;
use crate::chain::Bucket;
use crate::error::Error;

/// Number of elements a table created without an explicit capacity is sized
/// for. Such tables start with twice this many slots.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Fraction of the slots that may be occupied before the table doubles.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Spreads the hash code so that codes differing only in their high bits, or
/// sharing low-bit patterns such as sequential integers, still land in
/// different slots. Bounds the expected chain length to about eight at the
/// default load factor.
#[inline(always)]
fn spread(hash: u32) -> u32 {
    let mut h = hash;
    h ^= (h >> 20) ^ (h >> 12);
    h ^= (h >> 7) ^ (h >> 4);
    h
}

#[inline(always)]
fn max_occupied(slots: usize, load_factor: f32) -> usize {
    (slots - 1).min((slots as f64 * load_factor as f64) as usize)
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

fn validate_load_factor(load_factor: f32) -> Result<(), Error> {
    if load_factor > 0.0 && load_factor <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidLoadFactor(load_factor))
    }
}

fn empty_slots<T>(len: usize) -> Box<[Slot<T>]> {
    (0..len).map(|_| Slot::Empty).collect()
}

/// One table position.
#[derive(Clone)]
pub(crate) enum Slot<T> {
    Empty,
    Single(T),
    Chain(Box<Bucket<T>>),
}

impl<T: Debug> Debug for Slot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Slot::Empty => f.write_str(".."),
            Slot::Single(value) => value.fmt(f),
            Slot::Chain(bucket) => f.debug_list().entries(bucket.iter()).finish(),
        }
    }
}

/// Where an element lives: its slot, and its chain position when the slot
/// roots a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Location {
    slot: usize,
    chain: Option<usize>,
}

/// Chain-length statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub occupied: usize,
    /// Maximum number of elements before the table doubles
    pub max_occupied: usize,
    /// Total number of slots allocated
    pub slots: usize,
    /// Number of slots holding at least one element
    pub used_slots: usize,
    /// Number of slots rooting a chain
    pub chained_slots: usize,
    /// Number of elements stored in chains
    pub chained_elements: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (occupied / slots)
    pub load: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% of {} slots)",
            self.occupied,
            self.max_occupied,
            self.load * 100.0,
            self.slots
        );
        println!(
            "Slot Usage: {}/{} ({:.2}% utilization)",
            self.used_slots,
            self.slots,
            if self.slots == 0 {
                0.0
            } else {
                self.used_slots as f64 / self.slots as f64 * 100.0
            }
        );
        println!(
            "Chains: {} slots holding {} elements, longest {}",
            self.chained_slots, self.chained_elements, self.longest_chain
        );
    }
}

/// A hash table of single elements and inline-chained buckets.
///
/// `HashTable<T>` stores values of type `T` in a power-of-two array of slots.
/// A slot is empty, holds one element, or roots a chain of fixed-width
/// buckets holding every element whose hash code maps to that slot. The table
/// doubles when an insertion would take the number of elements above
/// `max_occupied`, and it never shrinks.
///
/// ## Example
///
/// ```rust
/// use strategy_set::hash_table::Entry;
/// use strategy_set::hash_table::HashTable;
///
/// let mut table: HashTable<(u32, &str)> = HashTable::with_capacity(8);
/// let hash_of = |item: &(u32, &str)| item.0;
///
/// match table.entry(7, |item| item.0 == 7, hash_of) {
///     Entry::Vacant(entry) => {
///         entry.insert((7, "seven"));
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(7, |item| item.0 == 7), Some(&(7, "seven")));
/// ```
#[derive(Clone)]
pub struct HashTable<T> {
    slots: Box<[Slot<T>]>,
    occupied: usize,
    load_factor: f32,
    max_occupied: usize,
}

impl<T: Debug> Debug for HashTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("occupied", &self.occupied)
            .field("max_occupied", &self.max_occupied)
            .field("load_factor", &self.load_factor)
            .field("slots", &self.slots)
            .finish()
    }
}

impl<T> Default for HashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HashTable<T> {
    /// Creates a table with `DEFAULT_INITIAL_CAPACITY * 2` slots and the
    /// default load factor.
    pub fn new() -> Self {
        Self::allocated(DEFAULT_INITIAL_CAPACITY << 1, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a table with `capacity` rounded up to a power of two slots and
    /// the default load factor.
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strategy_set::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::with_capacity(8);
    /// assert_eq!(table.capacity(), 8);
    /// assert_eq!(table.max_occupied(), 6);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR) {
            Ok(table) => table,
            Err(_) => capacity_overflow(),
        }
    }

    /// Creates a table with `capacity` rounded up to a power of two slots,
    /// growing once more than `load_factor` of them are occupied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLoadFactor`] unless `0 < load_factor <= 1`, and
    /// [`Error::CapacityOverflow`] if the rounded capacity overflows `usize`.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Result<Self, Error> {
        validate_load_factor(load_factor)?;
        let slots = capacity
            .max(1)
            .checked_next_power_of_two()
            .ok_or(Error::CapacityOverflow)?;
        Ok(Self::allocated(slots, load_factor))
    }

    pub(crate) fn allocated(slots: usize, load_factor: f32) -> Self {
        debug_assert!(slots.is_power_of_two());
        HashTable {
            slots: empty_slots(slots),
            occupied: 0,
            load_factor,
            max_occupied: max_occupied(slots, load_factor),
        }
    }

    /// An empty table with the same slot count and load factor.
    pub(crate) fn empty_like(&self) -> Self {
        Self::allocated(self.slots.len(), self.load_factor)
    }

    /// Returns the number of elements in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if the table contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns the number of slots. Always a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of elements the table holds before it doubles.
    #[inline]
    pub fn max_occupied(&self) -> usize {
        self.max_occupied
    }

    /// Returns the load factor the table was created with.
    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    #[inline(always)]
    fn index_of(&self, hash: u32) -> usize {
        spread(hash) as usize & (self.slots.len() - 1)
    }

    /// Removes all elements, keeping the current number of slots.
    pub fn clear(&mut self) {
        if self.occupied == 0 {
            return;
        }
        self.occupied = 0;
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
    }

    /// Makes room for at least `additional` more elements without further
    /// growth, rehashing at most once.
    ///
    /// The new slot count is the smallest power of two that keeps
    /// `len() + additional` elements within the load factor. Does nothing if
    /// the table already has room.
    ///
    /// # Panics
    ///
    /// Panics if the new slot count overflows `usize`.
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&T) -> u32) {
        let required = self
            .occupied
            .checked_add(additional)
            .unwrap_or_else(|| capacity_overflow());
        if required <= self.max_occupied {
            return;
        }

        let slots = ((required as f64 / self.load_factor as f64) as usize)
            .checked_add(1)
            .and_then(usize::checked_next_power_of_two)
            .unwrap_or_else(|| capacity_overflow());
        if slots > self.slots.len() {
            tracing::trace!(
                additional,
                from = self.slots.len(),
                to = slots,
                "reserving slot table capacity"
            );
            self.rehash(slots, hasher);
        }
    }

    fn grow(&mut self, hasher: impl Fn(&T) -> u32) {
        let slots = self
            .slots
            .len()
            .checked_mul(2)
            .unwrap_or_else(|| capacity_overflow());
        self.rehash(slots, hasher);
    }

    /// Moves every element into a fresh table of `slots` slots, in slot then
    /// chain order.
    fn rehash(&mut self, slots: usize, hasher: impl Fn(&T) -> u32) {
        tracing::debug!(
            occupied = self.occupied,
            from = self.slots.len(),
            to = slots,
            "rehashing slot table"
        );

        let old = core::mem::replace(&mut self.slots, empty_slots(slots));
        self.max_occupied = max_occupied(slots, self.load_factor);
        self.occupied = 0;

        for slot in old.into_vec() {
            match slot {
                Slot::Empty => {}
                Slot::Single(value) => {
                    self.place(hasher(&value), value);
                }
                Slot::Chain(bucket) => {
                    for value in chain::IntoIter::new(bucket) {
                        self.place(hasher(&value), value);
                    }
                }
            }
        }
    }

    /// Stores `value` without checking for an equal element or for growth.
    fn place(&mut self, hash: u32, value: T) -> Location {
        let slot = self.index_of(hash);
        self.occupied += 1;

        let cell = &mut self.slots[slot];
        match cell {
            Slot::Empty => {
                *cell = Slot::Single(value);
                Location { slot, chain: None }
            }
            Slot::Chain(bucket) => Location {
                slot,
                chain: Some(bucket.push(value)),
            },
            Slot::Single(_) => {
                let Slot::Single(first) = core::mem::replace(cell, Slot::Empty) else {
                    unreachable!();
                };
                *cell = Slot::Chain(Box::new(Bucket::pair(first, value)));
                Location {
                    slot,
                    chain: Some(1),
                }
            }
        }
    }

    pub(crate) fn locate(&self, hash: u32, eq: impl Fn(&T) -> bool) -> Option<Location> {
        let slot = self.index_of(hash);
        match &self.slots[slot] {
            Slot::Empty => None,
            Slot::Single(value) => eq(value).then_some(Location { slot, chain: None }),
            Slot::Chain(bucket) => bucket
                .position(eq)
                .map(|position| Location {
                    slot,
                    chain: Some(position),
                }),
        }
    }

    pub(crate) fn get_at(&self, location: Location) -> Option<&T> {
        match (&self.slots[location.slot], location.chain) {
            (Slot::Single(value), None) => Some(value),
            (Slot::Chain(bucket), Some(position)) => bucket.get(position),
            _ => None,
        }
    }

    /// Removes the element at `location`.
    ///
    /// A chain position is filled with the chain's last element. A chain
    /// whose head empties is replaced by an empty slot; a chain left with a
    /// single element stays a chain.
    pub(crate) fn remove_at(&mut self, location: Location) -> Option<T> {
        let cell = &mut self.slots[location.slot];
        let removed = match location.chain {
            None => match core::mem::replace(cell, Slot::Empty) {
                Slot::Single(value) => value,
                other => {
                    *cell = other;
                    return None;
                }
            },
            Some(position) => {
                let Slot::Chain(bucket) = cell else {
                    return None;
                };
                let removed = bucket.remove_at(position)?;
                let emptied = bucket.is_empty();
                if emptied {
                    *cell = Slot::Empty;
                }
                removed
            }
        };
        self.occupied -= 1;
        Some(removed)
    }

    /// Finds the element with the given hash that satisfies `eq`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use strategy_set::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u32> = HashTable::with_capacity(4);
    /// table.entry(42, |&v| v == 42, |&v| v).or_insert(42);
    ///
    /// assert_eq!(table.find(42, |&v| v == 42), Some(&42));
    /// assert_eq!(table.find(43, |&v| v == 43), None);
    /// ```
    pub fn find(&self, hash: u32, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let location = self.locate(hash, eq)?;
        self.get_at(location)
    }

    /// Removes and returns the element with the given hash that satisfies
    /// `eq`. The table never shrinks.
    pub fn remove(&mut self, hash: u32, eq: impl Fn(&T) -> bool) -> Option<T> {
        let location = self.locate(hash, eq)?;
        self.remove_at(location)
    }

    /// Gets the entry for the element with the given hash that satisfies `eq`.
    ///
    /// When no such element exists and inserting one would take the table
    /// above [`max_occupied`](Self::max_occupied), the table doubles first,
    /// re-addressing stored elements with `hasher`.
    pub fn entry(
        &mut self,
        hash: u32,
        eq: impl Fn(&T) -> bool,
        hasher: impl Fn(&T) -> u32,
    ) -> Entry<'_, T> {
        if let Some(location) = self.locate(hash, eq) {
            return Entry::Occupied(OccupiedEntry {
                table: self,
                location,
            });
        }

        while self.occupied >= self.max_occupied {
            self.grow(&hasher);
        }
        Entry::Vacant(VacantEntry { table: self, hash })
    }

    /// Stores `value`, known to be absent, growing first if needed.
    pub(crate) fn insert_unique(&mut self, hash: u32, value: T, hasher: impl Fn(&T) -> u32) {
        while self.occupied >= self.max_occupied {
            self.grow(&hasher);
        }
        self.place(hash, value);
    }

    /// Keeps only the elements for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        let mut cursor = self.cursor();
        while let Ok(value) = cursor.next() {
            if !f(value) {
                // Cannot fail right after a successful `next`.
                cursor.remove().ok();
            }
        }
    }

    /// Returns the first element in table order.
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Returns the last element in table order.
    pub fn last(&self) -> Option<&T> {
        self.slots.iter().rev().find_map(|slot| match slot {
            Slot::Empty => None,
            Slot::Single(value) => Some(value),
            Slot::Chain(bucket) => bucket.get(bucket.len() - 1),
        })
    }

    /// Returns an iterator over all elements in slot then chain order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.elements(0..self.slots.len()),
            remaining: self.occupied,
        }
    }

    /// Returns the elements whose slot index falls in `range`.
    pub(crate) fn elements(&self, range: Range<usize>) -> Elements<'_, T> {
        Elements {
            slots: self.slots[range].iter(),
            chain: None,
        }
    }

    /// Returns a cursor that walks the table and can remove the element it
    /// last yielded.
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor {
            table: self,
            count: 0,
            position: 0,
            chain_position: 0,
            last_yielded: false,
        }
    }

    /// Removes every element, yielding them in table order.
    ///
    /// The slot count is kept. Elements not consumed when the iterator is
    /// dropped are dropped with it.
    pub fn drain(&mut self) -> Drain<'_, T> {
        let len = self.slots.len();
        let slots = core::mem::replace(&mut self.slots, empty_slots(len));
        let remaining = core::mem::replace(&mut self.occupied, 0);
        Drain {
            inner: IntoIter::new(slots, remaining),
            _table: core::marker::PhantomData,
        }
    }

    /// Counts chains by length: index `n` holds the number of slots holding
    /// exactly `n` elements, with index 0 counting empty slots.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; 2];
        for slot in self.slots.iter() {
            let len = match slot {
                Slot::Empty => 0,
                Slot::Single(_) => 1,
                Slot::Chain(bucket) => bucket.len(),
            };
            if hist.len() <= len {
                hist.resize(len + 1, 0);
            }
            hist[len] += 1;
        }
        hist
    }

    /// Returns chain statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let mut stats = DebugStats {
            occupied: self.occupied,
            max_occupied: self.max_occupied,
            slots: self.slots.len(),
            used_slots: 0,
            chained_slots: 0,
            chained_elements: 0,
            longest_chain: 0,
            load: self.occupied as f64 / self.slots.len() as f64,
        };
        for slot in self.slots.iter() {
            match slot {
                Slot::Empty => {}
                Slot::Single(_) => {
                    stats.used_slots += 1;
                    stats.longest_chain = stats.longest_chain.max(1);
                }
                Slot::Chain(bucket) => {
                    let len = bucket.len();
                    stats.used_slots += 1;
                    stats.chained_slots += 1;
                    stats.chained_elements += len;
                    stats.longest_chain = stats.longest_chain.max(len);
                }
            }
        }
        stats
    }

    /// Pretty-prints the chain-length histogram horizontally using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = hist.iter().skip(1).copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("chain histogram ({} elements):", self.occupied);
        for (len, &count) in hist.iter().enumerate().skip(1) {
            let bar = "█".repeat((count * max_bar).div_ceil(max));
            println!("{:>3} | {} ({})", len, bar, count);
        }
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// Constructed by [`HashTable::entry`].
pub enum Entry<'a, T> {
    /// No equal element is stored.
    Vacant(VacantEntry<'a, T>),
    /// An equal element is stored.
    Occupied(OccupiedEntry<'a, T>),
}

impl<'a, T> Entry<'a, T> {
    /// Inserts `default` if the entry is vacant, and returns the stored
    /// element either way.
    pub fn or_insert(self, default: T) -> &'a T {
        match self {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Like [`or_insert`](Self::or_insert), building the element lazily.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a T {
        match self {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A vacant entry. Room for one more element has already been made.
pub struct VacantEntry<'a, T> {
    table: &'a mut HashTable<T>,
    hash: u32,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Stores `value` and returns a reference to it.
    pub fn insert(self, value: T) -> &'a T {
        let location = self.table.place(self.hash, value);
        match self.table.get_at(location) {
            Some(value) => value,
            None => unreachable!("element was just placed at {:?}", location),
        }
    }
}

/// An occupied entry.
pub struct OccupiedEntry<'a, T> {
    table: &'a mut HashTable<T>,
    location: Location,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Returns the stored element.
    pub fn get(&self) -> &T {
        match self.table.get_at(self.location) {
            Some(value) => value,
            None => unreachable!("occupied entry at {:?} is empty", self.location),
        }
    }

    /// Converts the entry into a reference to the stored element.
    pub fn into_ref(self) -> &'a T {
        match self.table.get_at(self.location) {
            Some(value) => value,
            None => unreachable!("occupied entry at {:?} is empty", self.location),
        }
    }

    /// Removes and returns the stored element.
    pub fn remove(self) -> T {
        match self.table.remove_at(self.location) {
            Some(value) => value,
            None => unreachable!("occupied entry at {:?} is empty", self.location),
        }
    }
}

/// Elements of a contiguous run of slots.
pub(crate) struct Elements<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    chain: Option<chain::Iter<'a, T>>,
}

impl<'a, T> Iterator for Elements<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chain) = &mut self.chain {
                if let Some(value) = chain.next() {
                    return Some(value);
                }
                self.chain = None;
            }
            match self.slots.next()? {
                Slot::Empty => {}
                Slot::Single(value) => return Some(value),
                Slot::Chain(bucket) => self.chain = Some(bucket.iter()),
            }
        }
    }
}

/// An iterator over the elements of a [`HashTable`].
///
/// Created by [`HashTable::iter`]. Yields elements in slot then chain order,
/// which is an artifact of the table layout and changes on rehash.
pub struct Iter<'a, T> {
    inner: Elements<'a, T>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// An owning iterator over the elements of a [`HashTable`].
pub struct IntoIter<T> {
    slots: alloc::vec::IntoIter<Slot<T>>,
    chain: Option<chain::IntoIter<T>>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    fn new(slots: Box<[Slot<T>]>, remaining: usize) -> Self {
        IntoIter {
            slots: slots.into_vec().into_iter(),
            chain: None,
            remaining,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chain) = &mut self.chain {
                if let Some(value) = chain.next() {
                    self.remaining -= 1;
                    return Some(value);
                }
                self.chain = None;
            }
            match self.slots.next()? {
                Slot::Empty => {}
                Slot::Single(value) => {
                    self.remaining -= 1;
                    return Some(value);
                }
                Slot::Chain(bucket) => self.chain = Some(chain::IntoIter::new(bucket)),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for HashTable<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots, self.occupied)
    }
}

impl<'a, T> IntoIterator for &'a HashTable<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A draining iterator over the elements of a [`HashTable`].
///
/// Created by [`HashTable::drain`]. The table is already empty when this
/// iterator is handed out.
pub struct Drain<'a, T> {
    inner: IntoIter<T>,
    _table: core::marker::PhantomData<&'a mut HashTable<T>>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A positional cursor over a [`HashTable`] that can remove the element it
/// yielded last.
///
/// The cursor tracks the slot it is in and, inside a chain, the chain
/// position of the next element. Removing a chained element moves the chain's
/// last element into the hole, so the cursor stays on the same position and
/// yields the moved element next. Every element present when the cursor was
/// created is yielded exactly once.
///
/// # Examples
///
/// ```rust
/// # use strategy_set::hash_table::HashTable;
/// #
/// let mut table: HashTable<u32> = HashTable::with_capacity(2);
/// for i in 0..10 {
///     table.entry(i % 3, |&v| v == i, |&v| v % 3).or_insert(i);
/// }
///
/// let mut cursor = table.cursor();
/// while cursor.has_next() {
///     if cursor.next().unwrap() % 2 == 0 {
///         cursor.remove().unwrap();
///     }
/// }
/// assert_eq!(table.len(), 5);
/// ```
pub struct Cursor<'a, T> {
    table: &'a mut HashTable<T>,
    count: usize,
    position: usize,
    chain_position: usize,
    last_yielded: bool,
}

impl<T> Cursor<'_, T> {
    /// Returns `true` if [`next`](Self::next) has another element to yield.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.count < self.table.occupied
    }

    /// Advances the cursor and returns the next element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IteratorExhausted`] once every element has been
    /// yielded.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<&T, Error> {
        if !self.has_next() {
            return Err(Error::IteratorExhausted);
        }
        self.count += 1;
        self.last_yielded = true;

        if self.chain_position == 0 {
            while let Slot::Empty = self.table.slots[self.position] {
                self.position += 1;
            }
        }

        match &self.table.slots[self.position] {
            Slot::Single(value) => {
                self.position += 1;
                Ok(value)
            }
            Slot::Chain(bucket) => {
                let current = self.chain_position;
                self.chain_position += 1;
                if bucket.get(self.chain_position).is_none() {
                    self.chain_position = 0;
                    self.position += 1;
                }
                match bucket.get(current) {
                    Some(value) => Ok(value),
                    None => unreachable!("cursor stopped past the end of a chain"),
                }
            }
            Slot::Empty => unreachable!("cursor stopped on an empty slot"),
        }
    }

    /// Removes the element returned by the last call to [`next`](Self::next).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalIteratorState`] if `next` has not been called,
    /// or if the element it returned was already removed.
    pub fn remove(&mut self) -> Result<T, Error> {
        if !self.last_yielded {
            return Err(Error::IllegalIteratorState);
        }
        self.last_yielded = false;
        self.count -= 1;

        let location = if self.chain_position != 0 {
            self.chain_position -= 1;
            Location {
                slot: self.position,
                chain: Some(self.chain_position),
            }
        } else {
            let slot = self.position - 1;
            match &self.table.slots[slot] {
                // The yielded element was the chain's last one.
                Slot::Chain(bucket) => Location {
                    slot,
                    chain: Some(bucket.len() - 1),
                },
                _ => {
                    self.position = slot;
                    Location { slot, chain: None }
                }
            }
        };

        self.table
            .remove_at(location)
            .ok_or(Error::IllegalIteratorState)
    }
}
