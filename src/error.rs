//! Error types for the `strategy-set` crate

/// Errors reported by set construction, cursors, and batch dispatch.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The load factor is not within `(0, 1]`.
    ///
    /// The load factor decides how many slots may be occupied before the
    /// table doubles. Zero, negative, NaN, and values above one would leave
    /// the table without a free slot or without any usable capacity.
    #[error("load factor {0} is outside of (0, 1]")]
    InvalidLoadFactor(f32),

    /// The requested capacity cannot be represented as a power of two.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// `next()` was called on a cursor that has already yielded every element.
    #[error("next() called, but the cursor is exhausted")]
    IteratorExhausted,

    /// `remove()` was called without a preceding `next()`, or twice for the
    /// same `next()`.
    #[error("next() must be called as many times as remove()")]
    IllegalIteratorState,

    /// A batch size of zero was requested.
    #[error("batch size must be at least 1")]
    InvalidBatchSize,
}
