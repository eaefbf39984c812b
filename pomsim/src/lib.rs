//! Simulation of POMDPs and MDPs in Rust.
//!
//! Pomsim consists of the following crates:
//!
//! * [pomsim-core](https://crates.io/crates/pomsim-core) provides the traits of
//!   decision processes, policies and belief updaters, together with the
//!   simulators driving them:
//!   * `StepThroughSimulator` iterates over the steps of a run lazily,
//!   * `RolloutSimulator` returns the discounted reward of a run,
//!   * `HistoryRecorder` keeps every step of a run,
//!   * `BatchRunner` executes many simulation descriptors on worker threads
//!     and collects the results in a `ResultTable`.
//! * [pomsim-models](https://crates.io/crates/pomsim-models) includes standard
//!   models (the tiger problem, the crying baby problem and a grid world),
//!   simple policies, and belief updaters including an exact Bayesian filter.
//!
//! This crate re-exports both and hosts the examples and cross-crate tests.
pub use pomsim_core as core;
pub use pomsim_models as models;
