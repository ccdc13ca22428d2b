//! Parallel fan-out/fan-in engine
//!
//! Every primitive here launches exactly one concurrent task per input index,
//! waits for all of them, and returns results in input order.
//!
//! # Contract
//!
//! For an input of length `n`:
//!
//! 1. Output storage of length `n` is allocated before any task is spawned.
//! 2. Exactly `n` tasks are spawned, task `i` bound to index `i`.
//! 3. Task `i` writes only `output[i]`, through an exclusive `&mut` borrow.
//! 4. The call returns only after all `n` tasks have finished. `n == 0`
//!    returns immediately and spawns nothing.
//! 5. `output[i]` corresponds to `input[i]`, whatever order tasks finished in.
//!
//! ```text
//! Idle ──▶ Spawning ──▶ Running(n) ──▶ Joined ──▶ Returned
//! ```
//!
//! There is no cancellation edge: once running, every task completes.
//!
//! # Error policies
//!
//! - [`par_map_result`] / [`FanOut::map_result`] **isolate and report**: one
//!   `Result` per element, no early exit. Compare with the fail-fast
//!   [`crate::seq::map_error`], which stops at the first failure.
//! - A panicking task does not become a per-element failure. Its siblings
//!   still finish, then the whole call fails with
//!   [`crate::FanOutError::TaskPanicked`].
//!
//! # Backends
//!
//! ```rust
//! use fanout::parallel::FanOut;
//! use fanout::Spawner;
//!
//! // One scoped OS thread per element (default; fine for blocking I/O)
//! let threads = FanOut::with_spawner(Spawner::Threads);
//!
//! // One rayon task per element, scheduled on the rayon pool
//! let pool = FanOut::with_spawner(Spawner::Pool);
//!
//! let squares = threads.map(&[1, 2, 3], |x| x * x)?;
//! assert_eq!(squares, pool.map(&[1, 2, 3], |x| x * x)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod core;

// Re-export main types for easier access
pub use self::core::{
    FanOut, par_each, par_each_index, par_map, par_map_flat, par_map_index, par_map_index_flat,
    par_map_result, par_map_result_index,
};
