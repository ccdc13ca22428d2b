use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::config::{FanOutConfig, Spawner};
use crate::error::{FanOutError, panic_message};
use crate::index::by_value;
use crate::seq;

/// Output slot for one index. Exactly one task holds the `&mut` to it.
enum Slot<R> {
    /// Not yet written. No slot is read in this state once the join succeeded.
    Pending,
    Done(R),
    Panicked(String),
}

/// One-task-per-element fan-out/fan-in engine
///
/// Every call pre-allocates `n` output slots, spawns `n` tasks with task `i`
/// owning slot `i`, joins all of them, and only then reads the slots back in
/// index order. The join is the synchronization point: no lock or atomic
/// guards the slots.
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    config: FanOutConfig,
}

impl FanOut {
    pub fn new(config: FanOutConfig) -> Self {
        Self { config }
    }

    /// Default configuration with a specific spawn backend
    pub fn with_spawner(spawner: Spawner) -> Self {
        Self::new(FanOutConfig {
            spawner,
            ..Default::default()
        })
    }

    /// Build from [`FanOutConfig::load`] (defaults, config file, `FANOUT_*` env)
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(FanOutConfig::load()?))
    }

    pub fn config(&self) -> &FanOutConfig {
        &self.config
    }

    /// Run `task(i)` for every `i` in `0..n` concurrently and wait for all of them.
    pub fn each_index<F>(&self, n: usize, task: F) -> Result<()>
    where
        F: Fn(usize) + Sync,
    {
        self.map_index(n, task).map(|_| ())
    }

    pub fn each<T, F>(&self, items: &[T], task: F) -> Result<()>
    where
        T: Sync,
        F: Fn(&T) + Sync,
    {
        self.each_index(items.len(), by_value(items, task))
    }

    /// Concurrent `out[i] = task(i)`.
    ///
    /// Output order follows the index, never completion order. If any task
    /// panics, the remaining tasks still run to completion and the call then
    /// fails with [`FanOutError::TaskPanicked`] for the lowest panicking index.
    pub fn map_index<R, F>(&self, n: usize, task: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> R + Sync,
    {
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut slots: Vec<Slot<R>> = Vec::with_capacity(n);
        slots.resize_with(n, || Slot::Pending);

        let started = Instant::now();
        tracing::debug!("Spawning {} tasks ({:?})", n, self.config.spawner);

        let spawned = match self.config.spawner {
            Spawner::Threads => self.spawn_threads(&mut slots, &task),
            Spawner::Pool => {
                spawn_pool(&mut slots, &task);
                Ok(())
            }
        };

        tracing::debug!("Joined {} tasks in {:?}", n, started.elapsed());
        spawned?;

        Ok(collect_slots(slots)?)
    }

    /// Concurrent `out[i] = task(&items[i])`. See [`FanOut::map_index`].
    pub fn map<T, R, F>(&self, items: &[T], task: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        self.map_index(items.len(), by_value(items, task))
    }

    /// Each task yields a sub-sequence; they are concatenated in index order.
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

    /// Isolate-and-report fallible map.
    ///
    /// Every task runs regardless of how its siblings fare; the caller gets
    /// one `Result` per index and decides what a failure means. There is no
    /// early exit.
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

    /// One named scoped thread per slot. Returns once every spawned thread is joined.
    fn spawn_threads<R, F>(&self, slots: &mut [Slot<R>], task: &F) -> Result<()>
    where
        R: Send,
        F: Fn(usize) -> R + Sync,
    {
        crossbeam::thread::scope(|s| -> std::result::Result<(), FanOutError> {
            for (index, slot) in slots.iter_mut().enumerate() {
                let mut builder = s
                    .builder()
                    .name(format!("{}-{}", self.config.thread_name, index));
                if let Some(stack_size) = self.config.stack_size {
                    builder = builder.stack_size(stack_size);
                }

                // On failure the scope still joins the threads spawned so far
                builder
                    .spawn(move |_| *slot = run_task(index, task))
                    .map_err(|source| FanOutError::Spawn { index, source })?;
            }
            Ok(())
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel execution"))??;

        Ok(())
    }
}

/// One rayon task per slot inside a rayon scope.
fn spawn_pool<R, F>(slots: &mut [Slot<R>], task: &F)
where
    R: Send,
    F: Fn(usize) -> R + Sync,
{
    rayon::scope(|s| {
        for (index, slot) in slots.iter_mut().enumerate() {
            s.spawn(move |_| *slot = run_task(index, task));
        }
    });
}

/// Task body: run the user function, turning a panic into a slot marker so
/// sibling tasks and the join are unaffected.
fn run_task<R, F>(index: usize, task: &F) -> Slot<R>
where
    F: Fn(usize) -> R,
{
    tracing::trace!("Task {} started", index);
    match panic::catch_unwind(AssertUnwindSafe(|| task(index))) {
        Ok(value) => Slot::Done(value),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!("Task {} panicked: {}", index, message);
            Slot::Panicked(message)
        }
    }
}

fn collect_slots<R>(slots: Vec<Slot<R>>) -> std::result::Result<Vec<R>, FanOutError> {
    let mut results = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Slot::Done(value) => results.push(value),
            Slot::Panicked(message) => return Err(FanOutError::TaskPanicked { index, message }),
            Slot::Pending => return Err(FanOutError::MissingResult { index }),
        }
    }
    Ok(results)
}

/// Fan out `task` over `items` with the default configuration.
pub fn par_each<T, F>(items: &[T], task: F) -> Result<()>
where
    T: Sync,
    F: Fn(&T) + Sync,
{
    FanOut::default().each(items, task)
}

pub fn par_each_index<F>(n: usize, task: F) -> Result<()>
where
    F: Fn(usize) + Sync,
{
    FanOut::default().each_index(n, task)
}

/// Order-preserving parallel map with the default configuration.
pub fn par_map<T, R, F>(items: &[T], task: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    FanOut::default().map(items, task)
}

pub fn par_map_index<R, F>(n: usize, task: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize) -> R + Sync,
{
    FanOut::default().map_index(n, task)
}

pub fn par_map_flat<T, R, F>(items: &[T], task: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Vec<R> + Sync,
{
    FanOut::default().map_flat(items, task)
}

pub fn par_map_index_flat<R, F>(n: usize, task: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize) -> Vec<R> + Sync,
{
    FanOut::default().map_index_flat(n, task)
}

/// Isolate-and-report parallel map with the default configuration.
pub fn par_map_result<T, V, E, F>(items: &[T], task: F) -> Result<Vec<std::result::Result<V, E>>>
where
    T: Sync,
    V: Send,
    E: Send,
    F: Fn(&T) -> std::result::Result<V, E> + Sync,
{
    FanOut::default().map_result(items, task)
}

pub fn par_map_result_index<V, E, F>(n: usize, task: F) -> Result<Vec<std::result::Result<V, E>>>
where
    V: Send,
    E: Send,
    F: Fn(usize) -> std::result::Result<V, E> + Sync,
{
    FanOut::default().map_result_index(n, task)
}
