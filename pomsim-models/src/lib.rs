#![warn(missing_docs)]
//! Standard models, policies and belief updaters for `pomsim-core`.
//!
//! Models:
//!
//! * [`TigerPomdp`] - the tiger problem,
//! * [`BabyPomdp`] - the crying baby problem,
//! * [`GridWorld`] - a fully observable grid world.
//!
//! All models implement [`DiscreteProcess`](pomsim_core::DiscreteProcess), so
//! they can be filtered exactly by [`DiscreteUpdater`].
//!
//! ```
//! use pomsim_core::{DiscreteBelief, HistoryRecorder, SimulatorConfig};
//! use pomsim_models::{DiscreteUpdater, FunctionPolicy, TigerAction, TigerPomdp, TigerState};
//!
//! # fn main() -> anyhow::Result<()> {
//! let pomdp = TigerPomdp::default();
//! let mut policy = FunctionPolicy::new(|_: &DiscreteBelief<TigerState>| TigerAction::Listen);
//! let config = SimulatorConfig::default().max_steps(10).seed(1);
//! let history = HistoryRecorder::new(config).simulate(&pomdp, &mut policy, &DiscreteUpdater)?;
//! assert_eq!(history.n_steps(), 10);
//! assert_eq!(history.undiscounted_reward(), -10.0);
//! # Ok(())
//! # }
//! ```
mod crying_baby;
mod grid_world;
mod policies;
mod tiger;
mod updaters;
pub use crying_baby::{BabyAction, BabyObs, BabyPomdp, BabyState};
pub use grid_world::{GridAction, GridPos, GridState, GridWorld};
pub use policies::{FeedWhenCrying, FunctionPolicy, RandomPolicy};
pub use tiger::{TigerAction, TigerObs, TigerPomdp, TigerState};
pub use updaters::{DiscreteUpdater, FullyObservableUpdater, PreviousObservationUpdater};
