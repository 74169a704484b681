//! Read-only partitioning of a set's slot range.
//!
//! The slot array is cut into contiguous sections. Every element lives in
//! exactly one slot and a chain never spans slots, so the sections together
//! visit every element exactly once and can be traversed independently.

use core::fmt::Debug;
use core::ops::Range;

use crate::hash_set::StrategySet;
use crate::hash_table::HashTable;

/// Slot range of section `index` out of `count` over `slots` slots. The last
/// section absorbs the remainder.
fn section_range(slots: usize, index: usize, count: usize) -> Range<usize> {
    assert!(
        index < count,
        "section index {index} out of range for {count} sections"
    );
    let size = slots / count;
    let start = index * size;
    let end = if index == count - 1 { slots } else { start + size };
    start..end
}

/// A read-only view of the elements in one contiguous run of slots.
///
/// Created by [`StrategySet::section`] and yielded by
/// [`StrategySet::batches`].
pub struct Batch<'a, T> {
    table: &'a HashTable<T>,
    slots: Range<usize>,
}

impl<T> Clone for Batch<'_, T> {
    fn clone(&self) -> Self {
        Batch {
            table: self.table,
            slots: self.slots.clone(),
        }
    }
}

impl<T> Debug for Batch<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Batch").field("slots", &self.slots).finish()
    }
}

impl<'a, T> Batch<'a, T> {
    fn section(table: &'a HashTable<T>, index: usize, count: usize) -> Self {
        Batch {
            table,
            slots: section_range(table.capacity(), index, count),
        }
    }

    /// The slot indices this batch covers.
    pub fn slots(&self) -> Range<usize> {
        self.slots.clone()
    }

    /// An iterator over the elements of this batch, in slot then chain order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + use<'a, T> {
        self.table.elements(self.slots.clone())
    }

    /// Calls `f` on every element of this batch.
    pub fn for_each(&self, f: impl FnMut(&T)) {
        self.iter().for_each(f);
    }

    /// Returns `true` if any element of this batch satisfies `predicate`.
    pub fn any_satisfy(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.iter().any(|value| predicate(value))
    }

    /// Returns `true` if every element of this batch satisfies `predicate`.
    pub fn all_satisfy(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.iter().all(|value| predicate(value))
    }

    /// Returns the first element of this batch satisfying `predicate`.
    pub fn detect(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&'a T> {
        self.iter().find(|value| predicate(value))
    }
}

/// An iterator over consecutive [`Batch`]es of a set.
///
/// Created by [`StrategySet::batches`].
pub struct Batches<'a, T> {
    table: &'a HashTable<T>,
    count: usize,
    sections: Range<usize>,
}

impl<'a, T> Batches<'a, T> {
    /// Splits into the first `index` remaining batches and the rest.
    #[cfg(feature = "rayon")]
    pub(crate) fn split_at(self, index: usize) -> (Self, Self) {
        let mid = self.sections.start + index;
        (
            Batches {
                table: self.table,
                count: self.count,
                sections: self.sections.start..mid,
            },
            Batches {
                table: self.table,
                count: self.count,
                sections: mid..self.sections.end,
            },
        )
    }
}

impl<'a, T> Iterator for Batches<'a, T> {
    type Item = Batch<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.sections.next()?;
        Some(Batch::section(self.table, index, self.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sections.size_hint()
    }
}

impl<T> DoubleEndedIterator for Batches<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.sections.next_back()?;
        Some(Batch::section(self.table, index, self.count))
    }
}

impl<T> ExactSizeIterator for Batches<'_, T> {}

impl<T, S> StrategySet<T, S> {
    /// Returns how many sections of roughly `batch_size` slots the set splits
    /// into. Always at least one.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let set: StrategySet<u32, _> = StrategySet::with_capacity(NaturalStrategy, 64);
    /// assert_eq!(set.batch_count(10), 6);
    /// assert_eq!(set.batch_count(1000), 1);
    /// # }
    /// ```
    pub fn batch_count(&self, batch_size: usize) -> usize {
        assert!(batch_size > 0, "batch size must be at least 1");
        (self.capacity() / batch_size).max(1)
    }

    /// Returns section `index` of `count` contiguous, disjoint sections of
    /// the slot range.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn section(&self, index: usize, count: usize) -> Batch<'_, T> {
        Batch::section(self.table(), index, count)
    }

    /// Calls `f` on every element of section `index` of `count`.
    ///
    /// Running this for every index in `0..count` visits each element
    /// exactly once.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let set: StrategySet<u32, NaturalStrategy> = (0..100).collect();
    /// let count = set.batch_count(4);
    ///
    /// let mut sum = 0u32;
    /// for index in 0..count {
    ///     set.for_each_in_section(|v| sum += v, index, count);
    /// }
    /// assert_eq!(sum, 4950);
    /// # }
    /// ```
    pub fn for_each_in_section(&self, f: impl FnMut(&T), index: usize, count: usize) {
        self.section(index, count).for_each(f);
    }

    /// Splits the set into [`batch_count(batch_size)`](Self::batch_count)
    /// batches.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn batches(&self, batch_size: usize) -> Batches<'_, T> {
        let count = self.batch_count(batch_size);
        Batches {
            table: self.table(),
            count,
            sections: 0..count,
        }
    }
}
