//! Rollout simulation.
use super::{init, tick, SimulatorConfig};
use crate::{error::SimError, progress::Progress, util::rng_from_seed, Policy, Process, Updater};
use anyhow::Result;
use log::debug;

/// Runs a simulation to completion and returns only its discounted reward.
///
/// The run ends at a terminal state, after `max_steps` actions, or, if `eps`
/// is configured, once the discount `γ^t` falls below `eps`. None of these is
/// an error. Intermediate steps are not retained.
///
/// A run must be bounded: either `max_steps` is set, or `eps` is positive and
/// the discount of the process is below one. Otherwise [`simulate`] returns a
/// [`SimError::Config`].
///
/// [`simulate`]: RolloutSimulator::simulate
#[derive(Debug, Clone, Default)]
pub struct RolloutSimulator {
    config: SimulatorConfig,
}

impl RolloutSimulator {
    /// Constructs the simulator.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Configuration of the simulator.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Returns `Σ r_t γ^t` of a run.
    pub fn simulate<P, Pol, U>(&self, process: &P, policy: &mut Pol, updater: &U) -> Result<f64>
    where
        P: Process,
        Pol: Policy<P, U::Belief> + ?Sized,
        U: Updater<P>,
    {
        let mut rng = rng_from_seed(self.config.seed);
        let (mut s, mut b) = init(process, updater, &mut rng)?;
        let discount = process.discount();
        let eps = self.config.eps.unwrap_or(0.0);
        let max_steps = match self.config.max_steps {
            Some(n) => n,
            None if eps > 0.0 && discount < 1.0 => usize::MAX,
            None => {
                return Err(SimError::Config(
                    "rollout needs max_steps, or eps with a discount below 1".to_string(),
                )
                .into())
            }
        };
        let progress = match self.config.show_progress {
            true => Progress::begin("Rollout", self.config.max_steps),
            false => Progress::disabled(),
        };

        let mut disc = 1.0;
        let mut r_total = 0.0;
        let mut steps = 0;

        while steps < max_steps && !process.is_terminal(&s) && disc >= eps {
            let (_, outcome, bp) = tick(process, &mut *policy, updater, &s, &b, &mut rng)?;
            r_total += disc * outcome.reward;
            disc *= discount;
            s = outcome.next_state;
            b = bp;
            steps += 1;
            progress.advance(1);
        }
        debug!("Rollout finished after {} steps, reward = {}", steps, r_total);

        Ok(r_total)
    }
}
