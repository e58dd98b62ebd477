//! 0/1 knapsack optimizer and solution verifier.
//!
//! The optimizer computes the best value reachable within a capacity using
//! capacity-indexed dynamic programming. The verifier independently checks a
//! claimed value and item selection against the same instance. The two only
//! share the data model in [`instance`].

pub mod benchmark;
pub mod error;
pub mod instance;
pub mod optimizer;
pub mod verifier;

// Re-export main types
pub use benchmark::{run_benchmark, BenchmarkConfig, BenchmarkResult, TimingSummary};
pub use error::{KnapsackError, MalformedInstance, RejectReason};
pub use instance::{Candidate, Item, ProblemInstance};
pub use optimizer::{optimize, optimize_with_config, OptimizeResult, OptimizerConfig};
pub use verifier::{verify, verify_with_config, Accept, VerifierConfig};
