//! Core abstractions.
mod belief;
mod policy;
mod process;
mod step;
mod updater;
pub use belief::{Belief, Deterministic, DiscreteBelief};
pub use policy::Policy;
pub use process::{discrete_initial_state, discrete_step, DiscreteProcess, Outcome, Process};
pub use step::{Step, StepField, StepFields, StepOf};
pub use updater::Updater;
