//! Generic parallel execution framework
//!
//! Provides system resource management and execution strategy only; it knows
//! nothing about documents. Callers decide how many items justify going
//! parallel and hand over a processor closure.
//!
//! ```rust
//! use evalview::parallel::ExecutionStrategy;
//!
//! let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
//! let strategy = ExecutionStrategy::auto(100, 32, workers);
//! let doubled = strategy.execute(vec![1, 2, 3], |x, _worker_id| x * 2).unwrap();
//! assert_eq!(doubled, vec![2, 4, 6]);
//! ```

pub mod core;

// Re-export main types for easier access
pub use core::{ExecutionStrategy, ParallelExecutor, SequentialExecutor};
