//! Hashing strategies.
//!
//! A [`HashingStrategy`] supplies the hash code and the equality test that a
//! [`StrategySet`](crate::StrategySet) uses for every comparison. The set
//! never calls an element's own `Hash` or `Eq`; the strategy decides what
//! "equal" means, which lets the same element type be pooled by identity in
//! one set and by a projected key in another.
//!
//! Implementations must be consistent: whenever `equals(a, b)` returns `true`,
//! `hash_code(a)` and `hash_code(b)` must be the same. The set does not check
//! this. A strategy that violates it makes lookups miss silently.

#[cfg(any(feature = "foldhash", feature = "std"))]
use core::hash::BuildHasher;
#[cfg(any(feature = "foldhash", feature = "std"))]
use core::hash::Hash;
#[cfg(any(feature = "foldhash", feature = "std"))]
use core::marker::PhantomData;

/// An externally supplied hash and equality pair.
pub trait HashingStrategy<T: ?Sized> {
    /// Computes the hash code of `value`.
    fn hash_code(&self, value: &T) -> u32;

    /// Returns `true` if `a` and `b` are equal under this strategy.
    fn equals(&self, a: &T, b: &T) -> bool;
}

impl<T, S> HashingStrategy<T> for &S
where
    T: ?Sized,
    S: HashingStrategy<T> + ?Sized,
{
    #[inline]
    fn hash_code(&self, value: &T) -> u32 {
        (**self).hash_code(value)
    }

    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        type DefaultState = foldhash::fast::FixedState;
    } else if #[cfg(feature = "std")] {
        type DefaultState =
            core::hash::BuildHasherDefault<std::collections::hash_map::DefaultHasher>;
    }
}

/// Folds a 64-bit hash into the 32-bit hash code the table mixes.
#[cfg(any(feature = "foldhash", feature = "std"))]
#[inline(always)]
fn fold(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}

/// The strategy that defers to the element's own `Hash` and `Eq`.
///
/// Hashing uses a fixed-seed hasher, so hash codes are stable across runs and
/// a set encoded by one process decodes with the same layout in another.
///
/// # Examples
///
/// ```rust
/// use strategy_set::HashingStrategy;
/// use strategy_set::NaturalStrategy;
///
/// let strategy = NaturalStrategy;
/// assert!(strategy.equals(&"a", &"a"));
/// assert_eq!(strategy.hash_code(&"a"), strategy.hash_code(&"a"));
/// ```
#[cfg(any(feature = "foldhash", feature = "std"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaturalStrategy;

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> HashingStrategy<T> for NaturalStrategy
where
    T: Hash + Eq + ?Sized,
{
    #[inline]
    fn hash_code(&self, value: &T) -> u32 {
        fold(DefaultState::default().hash_one(value))
    }

    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// A strategy built from a hash closure and an equality closure.
///
/// # Examples
///
/// ```rust
/// use strategy_set::FnStrategy;
/// use strategy_set::StrategySet;
///
/// // Case-insensitive ASCII strings.
/// let strategy = FnStrategy::new(
///     |s: &String| {
///         s.bytes()
///             .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b.to_ascii_lowercase() as u32))
///     },
///     |a: &String, b: &String| a.eq_ignore_ascii_case(b),
/// );
///
/// let mut set = StrategySet::new(strategy);
/// assert!(set.add("Hello".to_string()));
/// assert!(!set.add("HELLO".to_string()));
/// assert_eq!(set.get(&"hello".to_string()).map(String::as_str), Some("Hello"));
/// ```
#[derive(Clone, Copy)]
pub struct FnStrategy<H, E> {
    hash: H,
    eq: E,
}

impl<H, E> FnStrategy<H, E> {
    /// Creates a strategy from `hash` and `eq`.
    pub fn new(hash: H, eq: E) -> Self {
        Self { hash, eq }
    }
}

impl<T, H, E> HashingStrategy<T> for FnStrategy<H, E>
where
    T: ?Sized,
    H: Fn(&T) -> u32,
    E: Fn(&T, &T) -> bool,
{
    #[inline]
    fn hash_code(&self, value: &T) -> u32 {
        (self.hash)(value)
    }

    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }
}

impl<H, E> core::fmt::Debug for FnStrategy<H, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnStrategy").finish_non_exhaustive()
    }
}

/// A strategy that hashes and compares a key projected out of each element.
///
/// Two elements are equal when their keys are equal by `Eq`.
#[cfg(any(feature = "foldhash", feature = "std"))]
pub struct KeyStrategy<F, K> {
    key: F,
    _key: PhantomData<fn() -> K>,
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<F, K> KeyStrategy<F, K> {
    /// Creates a strategy that compares elements by `key(element)`.
    pub fn new(key: F) -> Self {
        Self {
            key,
            _key: PhantomData,
        }
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<F: Clone, K> Clone for KeyStrategy<F, K> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T, F, K> HashingStrategy<T> for KeyStrategy<F, K>
where
    T: ?Sized,
    F: Fn(&T) -> K,
    K: Hash + Eq,
{
    #[inline]
    fn hash_code(&self, value: &T) -> u32 {
        fold(DefaultState::default().hash_one((self.key)(value)))
    }

    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.key)(a) == (self.key)(b)
    }
}

/// Lifts a strategy over `T` to `Option<T>`, with `None` as the null element.
///
/// The null element hashes to zero and is equal only to itself. The wrapped
/// strategy is never called with it, so strategies written for `T` need no
/// null handling of their own.
///
/// # Examples
///
/// ```rust
/// use strategy_set::NaturalStrategy;
/// use strategy_set::NullSafe;
/// use strategy_set::StrategySet;
///
/// let mut set = StrategySet::new(NullSafe::new(NaturalStrategy));
/// assert!(set.add(None));
/// assert!(set.add(Some(1)));
/// assert!(!set.add(None));
/// assert!(set.contains(&None));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NullSafe<S> {
    inner: S,
}

impl<S> NullSafe<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped strategy.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<T, S> HashingStrategy<Option<T>> for NullSafe<S>
where
    S: HashingStrategy<T>,
{
    #[inline]
    fn hash_code(&self, value: &Option<T>) -> u32 {
        match value {
            Some(value) => self.inner.hash_code(value),
            None => 0,
        }
    }

    #[inline]
    fn equals(&self, a: &Option<T>, b: &Option<T>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.inner.equals(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use core::cell::Cell;

    use super::*;

    struct CountingStrategy<'a> {
        calls: &'a Cell<usize>,
    }

    impl HashingStrategy<i32> for CountingStrategy<'_> {
        fn hash_code(&self, value: &i32) -> u32 {
            self.calls.set(self.calls.get() + 1);
            *value as u32
        }

        fn equals(&self, a: &i32, b: &i32) -> bool {
            self.calls.set(self.calls.get() + 1);
            a == b
        }
    }

    #[test]
    fn natural_strategy_is_consistent() {
        let strategy = NaturalStrategy;
        for i in 0..100u64 {
            assert_eq!(strategy.hash_code(&i), strategy.hash_code(&i));
            assert!(strategy.equals(&i, &i));
            assert!(!strategy.equals(&i, &(i + 1)));
        }
    }

    #[test]
    fn key_strategy_compares_projection() {
        let strategy = KeyStrategy::new(|s: &String| s.len());
        let a = "abc".to_string();
        let b = "xyz".to_string();
        let c = "abcd".to_string();

        assert!(strategy.equals(&a, &b));
        assert_eq!(strategy.hash_code(&a), strategy.hash_code(&b));
        assert!(!strategy.equals(&a, &c));
    }

    #[test]
    fn null_safe_never_calls_inner_with_null() {
        let calls = Cell::new(0);
        let strategy = NullSafe::new(CountingStrategy { calls: &calls });

        assert_eq!(strategy.hash_code(&None), 0);
        assert!(strategy.equals(&None, &None));
        assert!(!strategy.equals(&None, &Some(0)));
        assert!(!strategy.equals(&Some(0), &None));
        assert_eq!(calls.get(), 0);

        assert!(strategy.equals(&Some(3), &Some(3)));
        assert_eq!(strategy.hash_code(&Some(3)), 3);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn reference_forwards() {
        let strategy = FnStrategy::new(|v: &i32| *v as u32 % 4, |a: &i32, b: &i32| a % 4 == b % 4);
        let by_ref = &strategy;
        assert!(by_ref.equals(&1, &5));
        assert_eq!(by_ref.hash_code(&7), 3);
    }
}
