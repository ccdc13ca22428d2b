//! # fanout - order-preserving sequence primitives with parallel fan-out
//!
//! A small library of generic map/filter/reduce primitives plus a parallel
//! family that launches one concurrent task per element, joins all of them,
//! and hands back results in input order.
//!
//! ## Features
//!
//! - **Sequential core**: [`seq::map`], [`seq::filter`], [`seq::reduce`],
//!   [`seq::flatten`] and the fail-fast [`seq::map_error`]
//! - **Index-addressed**: every operation has a `*_index` form taking only
//!   a position; element forms are derived through [`index::by_value`]
//! - **Parallel fan-out/fan-in**: [`par_map`], [`par_each`],
//!   [`par_map_index_flat`], and the isolate-and-report [`par_map_result`]
//! - **Two spawn backends**: scoped OS threads or rayon tasks ([`Spawner`])
//! - **Async fan-out** on tokio in [`tasks`]
//! - **Layered configuration** via figment (defaults, file, `FANOUT_*` env)
//!
//! ## Quick Start
//!
//! ```rust
//! use fanout::{par_map, par_map_result, seq};
//!
//! let inputs = vec![1, 2, 3];
//!
//! // Same answer as the sequential map, whatever order tasks finish in
//! let squares = par_map(&inputs, |x| x * x)?;
//! assert_eq!(squares, seq::map(&inputs, |x| x * x));
//!
//! // Failures are recorded per element; siblings keep running
//! let outcomes = par_map_result(&inputs, |&x| if x == 2 { Err("two") } else { Ok(x * 10) })?;
//! assert_eq!(outcomes, vec![Ok(10), Err("two"), Ok(30)]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Limitations
//!
//! A panic inside a task is not turned into a per-element failure. Sibling
//! tasks still finish, then the whole call fails with
//! [`FanOutError::TaskPanicked`]. Built with `panic = "abort"`, the process
//! aborts instead.

pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod outcome;
pub mod parallel;
pub mod seq;
pub mod strategy;
pub mod tasks;

pub use config::{FanOutConfig, Spawner};
pub use error::FanOutError;
pub use outcome::Outcomes;
pub use parallel::{
    FanOut, par_each, par_each_index, par_map, par_map_flat, par_map_index, par_map_index_flat,
    par_map_result, par_map_result_index,
};
pub use strategy::ExecutionStrategy;

/// Result type alias for fan-out operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
