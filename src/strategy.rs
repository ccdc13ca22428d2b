use anyhow::Result;

use crate::config::FanOutConfig;
use crate::index::by_value;
use crate::parallel::FanOut;
use crate::seq;

/// Execution strategy enum for choosing between parallel and sequential
///
/// Both arms run the same index-based operation and return identical output
/// for the same input; only how iteration happens differs. `Sequential` runs
/// on the calling thread, so a panic in the task unwinds straight through the
/// caller instead of being reported as an error.
#[derive(Debug, Clone)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel(FanOut),
}

impl ExecutionStrategy {
    /// Threshold-based strategy selection
    ///
    /// ```text
    /// if work_items_count >= config.min_items_for_parallel {
    ///     Parallel(FanOut::new(config))
    /// } else {
    ///     Sequential
    /// }
    /// ```
    ///
    /// # Example
    /// ```rust
    /// use fanout::{ExecutionStrategy, FanOutConfig};
    ///
    /// let config = FanOutConfig { min_items_for_parallel: 50, ..Default::default() };
    ///
    /// let strategy = ExecutionStrategy::auto(36, &config);
    /// assert!(matches!(strategy, ExecutionStrategy::Sequential));
    ///
    /// let strategy = ExecutionStrategy::auto(100, &config);
    /// assert!(matches!(strategy, ExecutionStrategy::Parallel(_)));
    /// ```
    pub fn auto(work_items_count: usize, config: &FanOutConfig) -> Self {
        if work_items_count >= config.min_items_for_parallel {
            ExecutionStrategy::Parallel(FanOut::new(config.clone()))
        } else {
            ExecutionStrategy::Sequential
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionStrategy::Parallel(_))
    }

    pub fn each_index<F>(&self, n: usize, task: F) -> Result<()>
    where
        F: Fn(usize) + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => {
                seq::each_index(n, task);
                Ok(())
            }
            ExecutionStrategy::Parallel(fan_out) => fan_out.each_index(n, task),
        }
    }

    pub fn each<T, F>(&self, items: &[T], task: F) -> Result<()>
    where
        T: Sync,
        F: Fn(&T) + Sync,
    {
        self.each_index(items.len(), by_value(items, task))
    }

    pub fn map_index<R, F>(&self, n: usize, task: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> R + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => Ok(seq::map_index(n, task)),
            ExecutionStrategy::Parallel(fan_out) => fan_out.map_index(n, task),
        }
    }

    pub fn map<T, R, F>(&self, items: &[T], task: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        self.map_index(items.len(), by_value(items, task))
    }

    pub fn map_index_flat<R, F>(&self, n: usize, task: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> Vec<R> + Sync,
    {
        Ok(seq::flatten(self.map_index(n, task)?))
    }

    pub fn map_flat<T, R, F>(&self, items: &[T], task: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Vec<R> + Sync,
    {
        self.map_index_flat(items.len(), by_value(items, task))
    }

    /// Per-element results; never stops early, in either arm.
    pub fn map_result_index<V, E, F>(&self, n: usize, task: F) -> Result<Vec<std::result::Result<V, E>>>
    where
        V: Send,
        E: Send,
        F: Fn(usize) -> std::result::Result<V, E> + Sync,
    {
        self.map_index(n, task)
    }

    pub fn map_result<T, V, E, F>(&self, items: &[T], task: F) -> Result<Vec<std::result::Result<V, E>>>
    where
        T: Sync,
        V: Send,
        E: Send,
        F: Fn(&T) -> std::result::Result<V, E> + Sync,
    {
        self.map_result_index(items.len(), by_value(items, task))
    }
}
