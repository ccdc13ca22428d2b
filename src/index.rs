//! Index-addressed adapter
//!
//! Every primitive in this crate is written once, against a task that only
//! receives a position (`Fn(usize) -> R`). The element-based variants are
//! derived here by closing over the slice and looking the element up by
//! index, so sequential and parallel code share the same iteration, allocation
//! and ordering logic.
//!
//! ```rust
//! use fanout::index::by_value;
//!
//! let words = ["a", "bb", "ccc"];
//! let len_at = by_value(&words, |w| w.len());
//! assert_eq!(len_at(2), 3);
//! ```

/// Turn an element transform into an index transform over `items`.
///
/// The returned closure panics if called with `i >= items.len()`; every
/// primitive only calls it with indices in `0..items.len()`.
pub fn by_value<'a, T, R, F>(items: &'a [T], f: F) -> impl Fn(usize) -> R + 'a
where
    F: Fn(&T) -> R + 'a,
{
    move |i| f(&items[i])
}

/// [`by_value`] for sequential callers holding an `FnMut`.
pub fn by_value_mut<'a, T, R, F>(items: &'a [T], mut f: F) -> impl FnMut(usize) -> R + 'a
where
    F: FnMut(&T) -> R + 'a,
{
    move |i| f(&items[i])
}
