//! Sequential transform core
//!
//! Single-threaded reference semantics. The parallel engine must produce the
//! same output as these functions for the same input; tests compare the two
//! directly.
//!
//! Each operation exists in an index form (`*_index`, taking a count `n`) and
//! an element form. The element form is always the index form composed with
//! [`crate::index::by_value_mut`].

use crate::index::by_value_mut;

/// `out[i] = f(i)` for `i` in `0..n`.
pub fn map_index<R, F>(n: usize, f: F) -> Vec<R>
where
    F: FnMut(usize) -> R,
{
    let mut out = Vec::with_capacity(n);
    out.extend((0..n).map(f));
    out
}

/// `out[i] = f(&items[i])`.
pub fn map<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    F: FnMut(&T) -> R,
{
    map_index(items.len(), by_value_mut(items, f))
}

/// Indices in `0..n` for which `pred` holds, ascending.
pub fn filter_index<F>(n: usize, mut pred: F) -> Vec<usize>
where
    F: FnMut(usize) -> bool,
{
    (0..n).filter(|&i| pred(i)).collect()
}

/// Elements of `items` for which `pred` holds, in their original relative order.
pub fn filter<T, F>(items: &[T], pred: F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    filter_index(items.len(), by_value_mut(items, pred))
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// Left fold over indices: `acc = combine(acc, i)` for `i` in `0..n`.
pub fn reduce_index<A, F>(n: usize, initial: A, combine: F) -> A
where
    F: FnMut(A, usize) -> A,
{
    (0..n).fold(initial, combine)
}

/// Left fold over elements. Empty input returns `initial` untouched.
pub fn reduce<T, A, F>(items: &[T], initial: A, mut combine: F) -> A
where
    F: FnMut(A, &T) -> A,
{
    reduce_index(items.len(), initial, |acc, i| combine(acc, &items[i]))
}

/// Concatenate sub-sequences in order, keeping each one's internal order.
pub fn flatten<T, S, I>(seqs: I) -> Vec<T>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = T>,
{
    seqs.into_iter().flatten().collect()
}

/// Call `f(i)` for `i` in `0..n`, in order.
pub fn each_index<F>(n: usize, f: F)
where
    F: FnMut(usize),
{
    (0..n).for_each(f);
}

pub fn each<T, F>(items: &[T], f: F)
where
    F: FnMut(&T),
{
    each_index(items.len(), by_value_mut(items, f));
}

/// Map every index to a sub-sequence and concatenate them in index order.
pub fn map_index_flat<R, F>(n: usize, f: F) -> Vec<R>
where
    F: FnMut(usize) -> Vec<R>,
{
    flatten(map_index(n, f))
}

pub fn map_flat<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    F: FnMut(&T) -> Vec<R>,
{
    map_index_flat(items.len(), by_value_mut(items, f))
}

/// Fail-fast fallible map over indices.
///
/// Stops at the first `Err`: later indices are never visited and the values
/// produced so far are dropped.
pub fn map_error_index<R, E, F>(n: usize, f: F) -> Result<Vec<R>, E>
where
    F: FnMut(usize) -> Result<R, E>,
{
    let mut out = Vec::with_capacity(n);
    for result in (0..n).map(f) {
        out.push(result?);
    }
    Ok(out)
}

/// Fail-fast fallible map over elements. See [`map_error_index`].
pub fn map_error<T, R, E, F>(items: &[T], f: F) -> Result<Vec<R>, E>
where
    F: FnMut(&T) -> Result<R, E>,
{
    map_error_index(items.len(), by_value_mut(items, f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_length_and_position() {
        let items = vec![3, 1, 4, 1, 5];
        let out = map(&items, |x| x * 10);
        assert_eq!(out, vec![30, 10, 40, 10, 50]);
        assert_eq!(out.len(), items.len());
    }

    #[test]
    fn test_map_index() {
        assert_eq!(map_index(4, |i| i * i), vec![0, 1, 4, 9]);
        assert!(map_index(0, |i| i).is_empty());
    }

    #[test]
    fn test_filter_keeps_relative_order() {
        let items = vec![5, 2, 8, 1, 6, 3];
        let evens = filter(&items, |x| x % 2 == 0);
        assert_eq!(evens, vec![2, 8, 6]);

        let none: Vec<i32> = filter(&[], |_: &i32| true);
        assert!(none.is_empty());
    }

    #[test]
    fn test_filter_partitions_by_predicate() {
        let items: Vec<i32> = (0..20).collect();
        let pred = |x: &i32| x % 3 == 1;
        let kept = filter(&items, pred);
        let dropped = filter(&items, |x| !pred(x));
        assert!(kept.iter().all(pred));
        assert!(dropped.iter().all(|x| !pred(x)));
        assert_eq!(kept.len() + dropped.len(), items.len());
    }

    #[test]
    fn test_filter_index() {
        assert_eq!(filter_index(6, |i| i > 3), vec![4, 5]);
    }

    #[test]
    fn test_reduce() {
        let got = reduce(&[1, 2, 3], 0, |acc, n| acc + n);
        assert_eq!(got, 6);
    }

    #[test]
    fn test_reduce_empty_returns_initial() {
        let got = reduce(&[] as &[i32], 42, |acc, n| acc + n);
        assert_eq!(got, 42);
    }

    #[test]
    fn test_reduce_is_left_fold() {
        let items = vec!["a", "b", "c", "d"];
        let concat = |acc: String, s: &&str| acc + *s;
        let whole = reduce(&items, String::new(), concat);
        let prefix = reduce(&items[..3], String::new(), concat);
        assert_eq!(whole, concat(prefix, &items[3]));
        assert_eq!(whole, "abcd");
    }

    #[test]
    fn test_reduce_index() {
        let chars = ["a", "b", "c"];
        let got = reduce_index(chars.len(), String::new(), |acc, i| acc + chars[i]);
        assert_eq!(got, "abc");
    }

    #[test]
    fn test_flatten_keeps_sub_sequence_order() {
        let out = flatten(vec![vec![1, 2], vec![], vec![3], vec![4, 5]]);
        assert_eq!(out, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_each_visits_in_order() {
        let mut seen = Vec::new();
        each(&["x", "y", "z"], |s| seen.push(*s));
        assert_eq!(seen, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_map_flat() {
        assert_eq!(map_index_flat(3, |i| vec![i, i]), vec![0, 0, 1, 1, 2, 2]);
        assert_eq!(map_flat(&[1, 2], |x| vec![*x; *x]), vec![1, 2, 2]);
    }

    #[test]
    fn test_map_error_all_ok() {
        let out: Result<Vec<i32>, String> = map_error(&[1, 2, 3], |x| Ok(x + 1));
        assert_eq!(out, Ok(vec![2, 3, 4]));
    }

    #[test]
    fn test_map_error_stops_at_first_failure() {
        let mut calls = Vec::new();
        let out = map_error(&[1, 2, 3, 4], |x| {
            calls.push(*x);
            if *x >= 2 { Err(format!("bad {x}")) } else { Ok(*x) }
        });
        assert_eq!(out, Err("bad 2".to_string()));
        assert_eq!(calls, vec![1, 2]);
    }
}
