#![warn(missing_docs)]
//! Core traits and simulators for partially observable and fully observable
//! Markov decision processes (POMDPs and MDPs).
//!
//! A simulation involves three collaborators:
//!
//! * a [`Process`], defining transitions, observations and rewards,
//! * a [`Policy`], mapping beliefs to actions,
//! * an [`Updater`], maintaining the belief from actions and observations.
//!
//! They are driven by one of the simulators:
//!
//! * [`StepThroughSimulator`] - lazily iterates over steps,
//! * [`RolloutSimulator`] - returns the discounted reward only,
//! * [`HistoryRecorder`] - returns the complete [`History`] of a run,
//! * [`BatchRunner`] - runs many [`Sim`] descriptors in parallel and
//!   collects a [`ResultTable`](record::ResultTable).
pub mod batch;
pub mod dummy;
pub mod error;
pub mod progress;
pub mod record;
pub mod simulator;
pub mod util;

mod base;
pub use base::{
    discrete_initial_state, discrete_step, Belief, Deterministic, DiscreteBelief,
    DiscreteProcess, Outcome, Policy, Process, Step, StepField, StepFields, StepOf, Updater,
};
pub use batch::{BatchConfig, BatchRunner, Sim, SimBuilder};
pub use simulator::{
    History, HistoryOf, HistoryRecorder, RolloutSimulator, SimulatorConfig, StepThrough,
    StepThroughSimulator,
};
