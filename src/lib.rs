#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Read-only partitioning of a set into slot sections.
///
/// This module provides the [`Batch`] view and the [`Batches`] iterator used
/// for serial and parallel bulk reads.
pub mod batch;

mod chain;

/// Errors reported by this crate.
pub mod error;

pub mod hash_table;

/// A hash set whose equality and hashing come from a strategy.
///
/// This module provides [`StrategySet`], which wraps the chained
/// [`HashTable`] and adds strategy-driven lookup, pool semantics, and bulk
/// operations.
pub mod hash_set;

#[cfg(feature = "rayon")]
pub mod parallel;

#[cfg(feature = "serde")]
mod ser;

pub mod strategy;

pub use batch::Batch;
pub use batch::Batches;
pub use error::Error;
pub use hash_set::StrategySet;
pub use hash_table::Cursor;
pub use hash_table::DEFAULT_INITIAL_CAPACITY;
pub use hash_table::DEFAULT_LOAD_FACTOR;
pub use hash_table::HashTable;
#[cfg(feature = "stats")]
pub use hash_table::DebugStats;
#[cfg(feature = "rayon")]
pub use parallel::ParBatches;
pub use strategy::FnStrategy;
pub use strategy::HashingStrategy;
#[cfg(any(feature = "foldhash", feature = "std"))]
pub use strategy::KeyStrategy;
#[cfg(any(feature = "foldhash", feature = "std"))]
pub use strategy::NaturalStrategy;
pub use strategy::NullSafe;
