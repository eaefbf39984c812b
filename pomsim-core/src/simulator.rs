//! Simulators driving a [`Policy`] and an [`Updater`] on a [`Process`].
//!
//! All simulators share the same inner loop, so they produce identical
//! trajectories for the same process, policy, updater, seed and step ceiling:
//!
//! 1. Sample `s_0` and build the initial belief `b_0`.
//! 2. While `s_t` is not terminal and fewer than `max_steps` actions were taken:
//!     1. `a_t` from the policy given `b_t`,
//!     2. `(s_t+1, o_t+1, r_t)` from the process given `(s_t, a_t)`,
//!     3. `b_t+1` from the updater given `(b_t, a_t, o_t+1)`.
//!
//! No action is taken from a terminal state, so a run of `n` steps visits
//! `n + 1` states.
mod config;
mod history;
mod rollout;
mod stepthrough;
pub use config::SimulatorConfig;
pub use history::{History, HistoryOf, HistoryRecorder};
pub use rollout::RolloutSimulator;
pub use stepthrough::{StepThrough, StepThroughSimulator};

use crate::{error::SimError, Outcome, Policy, Process, Updater};
use anyhow::Result;
use rand::Rng;

/// Samples `s_0` and the belief held before the first action.
///
/// A discount outside `(0, 1]` is a [`SimError::Config`].
pub(crate) fn init<P, U, R>(process: &P, updater: &U, rng: &mut R) -> Result<(P::State, U::Belief)>
where
    P: Process,
    U: Updater<P>,
    R: Rng + ?Sized,
{
    let discount = process.discount();
    if !(discount > 0.0 && discount <= 1.0) {
        return Err(SimError::Config(format!("discount {} is not in (0, 1]", discount)).into());
    }

    let s = process.initial_state(rng)?;
    let b = updater.initialize(process, &s)?;
    Ok((s, b))
}

/// Takes one action: policy, then process, then updater.
pub(crate) fn tick<P, Pol, U, R>(
    process: &P,
    policy: &mut Pol,
    updater: &U,
    s: &P::State,
    b: &U::Belief,
    rng: &mut R,
) -> Result<(P::Action, Outcome<P::State, P::Obs>, U::Belief)>
where
    P: Process,
    Pol: Policy<P, U::Belief> + ?Sized,
    U: Updater<P>,
    R: Rng + ?Sized,
{
    let a = policy.action(b)?;
    let outcome = process.step(s, &a, rng)?;
    let bp = updater.update(process, b, &a, &outcome.obs)?;
    Ok((a, outcome, bp))
}
