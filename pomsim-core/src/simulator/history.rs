//! Recording full histories of simulations.
use super::{SimulatorConfig, StepThroughSimulator};
use crate::{
    progress::Progress, record::Record, util::discounted_sum, Policy, Process, Step, StepFields,
    Updater,
};
use anyhow::Result;
use log::{info, warn};
use std::ops::Index;

/// The complete record of one simulation.
///
/// For a run of `n` steps, [`History::state_hist`] has `n + 1` entries
/// `s_0, ..., s_n`, while the action, observation, reward and belief histories
/// have `n` entries each. [`History::final_belief`] is the belief after the
/// last update.
#[derive(Clone, Debug)]
pub struct History<S, A, O, B> {
    steps: Vec<Step<S, A, O, B>>,
    initial_state: S,
    initial_belief: B,
    final_state: S,
    final_belief: B,
    discount: f64,
    error: Option<String>,
}

/// [`History`] of a simulation of process `P` with updater `U`.
pub type HistoryOf<P, U> = History<
    <P as Process>::State,
    <P as Process>::Action,
    <P as Process>::Obs,
    <U as Updater<P>>::Belief,
>;

impl<S, A, O, B> History<S, A, O, B> {
    /// Number of steps `n`.
    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }

    /// Number of steps `n`.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no action was taken.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Discount factor of the process.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// `Σ_{t<n} r_t γ^t`.
    pub fn discounted_reward(&self) -> f64 {
        discounted_sum(self.steps.iter().map(|step| &step.reward), self.discount)
    }

    /// `Σ_{t<n} r_t`.
    pub fn undiscounted_reward(&self) -> f64 {
        self.steps.iter().map(|step| step.reward).sum()
    }

    /// The step at `t`.
    pub fn get(&self, t: usize) -> Option<&Step<S, A, O, B>> {
        self.steps.get(t)
    }

    /// Iterates over the steps.
    pub fn steps(&self) -> std::slice::Iter<'_, Step<S, A, O, B>> {
        self.steps.iter()
    }

    /// `s_0, ..., s_n`.
    pub fn state_hist(&self) -> Vec<&S> {
        std::iter::once(&self.initial_state)
            .chain(self.steps.iter().map(|step| &step.next_state))
            .collect()
    }

    /// `a_0, ..., a_n-1`.
    pub fn action_hist(&self) -> Vec<&A> {
        self.steps.iter().map(|step| &step.act).collect()
    }

    /// `o_1, ..., o_n`.
    pub fn observation_hist(&self) -> Vec<&O> {
        self.steps.iter().map(|step| &step.obs).collect()
    }

    /// `r_0, ..., r_n-1`.
    pub fn reward_hist(&self) -> Vec<f64> {
        self.steps.iter().map(|step| step.reward).collect()
    }

    /// `b_0, ..., b_n-1`, the beliefs on which the actions were taken.
    pub fn belief_hist(&self) -> Vec<&B> {
        self.steps.iter().map(|step| &step.belief).collect()
    }

    /// `s_0`.
    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }

    /// `b_0`.
    pub fn initial_belief(&self) -> &B {
        &self.initial_belief
    }

    /// `s_n`.
    pub fn final_state(&self) -> &S {
        &self.final_state
    }

    /// `b_n`.
    pub fn final_belief(&self) -> &B {
        &self.final_belief
    }

    /// Message of the error that ended the run, if it was captured.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl<S, A, O, B> History<S, A, O, B>
where
    S: std::fmt::Debug,
    A: std::fmt::Debug,
    O: std::fmt::Debug,
    B: std::fmt::Debug,
{
    /// Iterates over the steps, each restricted to the selected fields.
    pub fn each_step<'a>(&'a self, fields: &'a StepFields) -> impl Iterator<Item = Record> + 'a {
        self.steps.iter().map(move |step| step.to_record(fields))
    }
}

impl<S, A, O, B> Index<usize> for History<S, A, O, B> {
    type Output = Step<S, A, O, B>;

    fn index(&self, t: usize) -> &Self::Output {
        &self.steps[t]
    }
}

impl<'a, S, A, O, B> IntoIterator for &'a History<S, A, O, B> {
    type Item = &'a Step<S, A, O, B>;
    type IntoIter = std::slice::Iter<'a, Step<S, A, O, B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Runs a simulation to completion, retaining every step.
///
/// The recorder drives the same iterator as [`StepThroughSimulator`], so both
/// produce identical steps for the same inputs and configuration.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    config: SimulatorConfig,
}

impl HistoryRecorder {
    /// Constructs the recorder.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Configuration of the recorder.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs a simulation and returns its [`History`].
    ///
    /// An error of the process, policy or updater is returned, unless
    /// `capture_errors` is set; then the history up to the failing step is
    /// returned with [`History::error`] holding the message. A configuration
    /// without `max_steps` is a [`SimError::Config`](crate::error::SimError).
    pub fn simulate<P, Pol, U>(
        &self,
        process: &P,
        policy: &mut Pol,
        updater: &U,
    ) -> Result<HistoryOf<P, U>>
    where
        P: Process,
        Pol: Policy<P, U::Belief> + ?Sized,
        U: Updater<P>,
    {
        let config = self.config.clone().show_progress(false);
        let mut iter = StepThroughSimulator::new(config).run(process, policy, updater)?;
        let progress = match self.config.show_progress {
            true => Progress::begin("Recording history", self.config.max_steps),
            false => Progress::disabled(),
        };
        let initial_state = iter.state().clone();
        let initial_belief = iter.belief().clone();
        let mut steps = vec![];
        let mut error = None;

        for step in &mut iter {
            match step {
                Ok(step) => {
                    steps.push(step);
                    progress.advance(1);
                }
                Err(e) if self.config.capture_errors => {
                    warn!("Simulation stopped at step {}: {:#}", steps.len(), e);
                    error = Some(format!("{:#}", e));
                }
                Err(e) => return Err(e),
            }
        }
        let (final_state, final_belief) = iter.into_state_belief();

        let history = History {
            steps,
            initial_state,
            initial_belief,
            final_state,
            final_belief,
            discount: process.discount(),
            error,
        };
        if self.config.show_progress {
            info!(
                "Recorded {} steps, discounted reward = {}",
                history.len(),
                history.discounted_reward()
            );
        }

        Ok(history)
    }
}
