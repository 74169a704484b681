//! Parallel iterators.
//!
//! These are only available when using the `rayon` feature flag. Work is
//! split along the same slot sections [`StrategySet::batches`] produces, one
//! rayon task per batch.

use ::rayon::iter::plumbing::Consumer;
use ::rayon::iter::plumbing::Producer;
use ::rayon::iter::plumbing::ProducerCallback;
use ::rayon::iter::plumbing::UnindexedConsumer;
use ::rayon::iter::plumbing::bridge;
use ::rayon::iter::IndexedParallelIterator;
use ::rayon::iter::ParallelIterator;

use crate::batch::Batch;
use crate::batch::Batches;
use crate::error::Error;
use crate::hash_set::StrategySet;

/// A parallel iterator over the [`Batch`]es of a set.
///
/// Created by [`StrategySet::par_batches`].
pub struct ParBatches<'a, T> {
    batches: Batches<'a, T>,
}

impl<'a, T> ParallelIterator for ParBatches<'a, T>
where
    T: Sync + 'a,
{
    type Item = Batch<'a, T>;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.batches.len())
    }
}

impl<'a, T> IndexedParallelIterator for ParBatches<'a, T>
where
    T: Sync + 'a,
{
    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: Consumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn len(&self) -> usize {
        self.batches.len()
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: ProducerCallback<Self::Item>,
    {
        callback.callback(BatchProducer {
            batches: self.batches,
        })
    }
}

struct BatchProducer<'a, T> {
    batches: Batches<'a, T>,
}

impl<'a, T> Producer for BatchProducer<'a, T>
where
    T: Sync + 'a,
{
    type Item = Batch<'a, T>;
    type IntoIter = Batches<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.batches
    }

    fn split_at(self, index: usize) -> (Self, Self) {
        let (left, right) = self.batches.split_at(index);
        (
            BatchProducer { batches: left },
            BatchProducer { batches: right },
        )
    }
}

impl<T, S> StrategySet<T, S>
where
    T: Sync,
{
    /// Returns a parallel iterator over
    /// [`batch_count(batch_size)`](Self::batch_count) batches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatchSize`] if `batch_size` is zero.
    pub fn par_batches(&self, batch_size: usize) -> Result<ParBatches<'_, T>, Error> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        Ok(ParBatches {
            batches: self.batches(batch_size),
        })
    }

    /// Calls `f` on every element, one rayon task per batch of about
    /// `batch_size` slots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatchSize`] if `batch_size` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::atomic::AtomicU64;
    /// use std::sync::atomic::Ordering;
    ///
    /// use strategy_set::NaturalStrategy;
    /// use strategy_set::StrategySet;
    ///
    /// let set: StrategySet<u64, NaturalStrategy> = (1..=1000).collect();
    /// let sum = AtomicU64::new(0);
    /// set.par_for_each(64, |v| {
    ///     sum.fetch_add(*v, Ordering::Relaxed);
    /// })?;
    /// assert_eq!(sum.into_inner(), 500_500);
    /// # Ok::<(), strategy_set::Error>(())
    /// ```
    pub fn par_for_each(
        &self,
        batch_size: usize,
        f: impl Fn(&T) + Sync + Send,
    ) -> Result<(), Error> {
        self.par_batches(batch_size)?
            .for_each(|batch| batch.for_each(&f));
        Ok(())
    }

    /// Returns `true` if any element satisfies `predicate`, checking batches
    /// in parallel and stopping early once one does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatchSize`] if `batch_size` is zero.
    pub fn par_any_satisfy(
        &self,
        batch_size: usize,
        predicate: impl Fn(&T) -> bool + Sync + Send,
    ) -> Result<bool, Error> {
        Ok(self
            .par_batches(batch_size)?
            .any(|batch| batch.any_satisfy(&predicate)))
    }

    /// Returns `true` if every element satisfies `predicate`, checking
    /// batches in parallel and stopping early once one does not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatchSize`] if `batch_size` is zero.
    pub fn par_all_satisfy(
        &self,
        batch_size: usize,
        predicate: impl Fn(&T) -> bool + Sync + Send,
    ) -> Result<bool, Error> {
        Ok(self
            .par_batches(batch_size)?
            .all(|batch| batch.all_satisfy(&predicate)))
    }

    /// Returns some element satisfying `predicate`, if there is one.
    ///
    /// Which element is returned when several match depends on scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatchSize`] if `batch_size` is zero.
    pub fn par_detect(
        &self,
        batch_size: usize,
        predicate: impl Fn(&T) -> bool + Sync + Send,
    ) -> Result<Option<&T>, Error> {
        Ok(self
            .par_batches(batch_size)?
            .find_map_any(|batch| batch.detect(&predicate)))
    }
}
