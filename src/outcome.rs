//! Per-element success/failure records
//!
//! The isolate-and-report primitives return one `Result<V, E>` per input
//! element. These helpers inspect or collapse such a batch after the fact,
//! always reporting the index each record came from.

/// Read-only inspection of a batch of per-element results.
pub trait Outcomes<V, E> {
    /// `(index, value)` for every success, in index order.
    fn successes(&self) -> Vec<(usize, &V)>;

    /// `(index, error)` for every failure, in index order.
    fn failures(&self) -> Vec<(usize, &E)>;

    /// Failure with the lowest index, if any.
    fn first_failure(&self) -> Option<(usize, &E)>;

    fn all_succeeded(&self) -> bool {
        self.first_failure().is_none()
    }
}

impl<V, E> Outcomes<V, E> for [Result<V, E>] {
    fn successes(&self) -> Vec<(usize, &V)> {
        self.iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().ok().map(|v| (i, v)))
            .collect()
    }

    fn failures(&self) -> Vec<(usize, &E)> {
        self.iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
            .collect()
    }

    fn first_failure(&self) -> Option<(usize, &E)> {
        self.iter()
            .enumerate()
            .find_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }
}

/// Split a batch into indexed successes and indexed failures.
pub fn partition<V, E>(outcomes: Vec<Result<V, E>>) -> (Vec<(usize, V)>, Vec<(usize, E)>) {
    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => successes.push((i, value)),
            Err(error) => failures.push((i, error)),
        }
    }
    (successes, failures)
}

/// All values if every element succeeded, otherwise the lowest-index failure.
///
/// This is applied after the batch has fully run; it does not make the
/// parallel call fail-fast.
pub fn into_all<V, E>(outcomes: Vec<Result<V, E>>) -> Result<Vec<V>, (usize, E)> {
    outcomes
        .into_iter()
        .enumerate()
        .map(|(i, outcome)| outcome.map_err(|e| (i, e)))
        .collect()
}

/// One value per element, with `V::default()` standing in for failures.
pub fn values_or_default<V: Default, E>(outcomes: Vec<Result<V, E>>) -> Vec<V> {
    outcomes.into_iter().map(Result::unwrap_or_default).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Result<i32, String>> {
        vec![Ok(10), Err("two".into()), Ok(30), Err("four".into())]
    }

    #[test]
    fn test_inspection_keeps_indices() {
        let batch = sample();
        assert_eq!(batch.successes(), vec![(0, &10), (2, &30)]);
        assert_eq!(
            batch.failures(),
            vec![(1, &"two".to_string()), (3, &"four".to_string())]
        );
        assert_eq!(batch.first_failure(), Some((1, &"two".to_string())));
        assert!(!batch.all_succeeded());

        let clean: Vec<Result<i32, String>> = vec![Ok(1)];
        assert!(clean.all_succeeded());
    }

    #[test]
    fn test_partition() {
        let (ok, err) = partition(sample());
        assert_eq!(ok, vec![(0, 10), (2, 30)]);
        assert_eq!(err, vec![(1, "two".to_string()), (3, "four".to_string())]);
    }

    #[test]
    fn test_into_all() {
        assert_eq!(into_all(sample()), Err((1, "two".to_string())));
        let clean: Vec<Result<i32, String>> = vec![Ok(1), Ok(2)];
        assert_eq!(into_all(clean), Ok(vec![1, 2]));
        let empty: Vec<Result<i32, String>> = Vec::new();
        assert_eq!(into_all(empty), Ok(vec![]));
    }

    #[test]
    fn test_values_or_default() {
        assert_eq!(values_or_default(sample()), vec![10, 0, 30, 0]);
    }
}
