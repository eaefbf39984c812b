//! Step-through simulation.
use super::{init, tick, SimulatorConfig};
use crate::{
    progress::Progress, record::Record, util::rng_from_seed, Policy, Process, Step, StepFields,
    StepOf, Updater,
};
use anyhow::Result;
use rand::rngs::StdRng;

/// Creates lazy iterators over the steps of a simulation.
///
/// Each call of [`StepThroughSimulator::run`] starts a new run from the
/// configured seed; an iterator cannot be resumed once dropped. Stopping the
/// iteration early is the way to cancel a run.
///
/// ```ignore
/// let sim = StepThroughSimulator::new(SimulatorConfig::default().max_steps(5).seed(1));
/// for step in sim.run(&pomdp, &mut policy, &updater)?.fields("s,a,o,r".parse()?) {
///     println!("{:?}", step?);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StepThroughSimulator {
    config: SimulatorConfig,
}

impl StepThroughSimulator {
    /// Constructs the simulator.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Configuration of the simulator.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Samples the initial state and belief, returning an iterator over steps.
    ///
    /// `max_steps` must be configured. With `show_progress`, the iterator
    /// reports the steps it yields until it is dropped.
    pub fn run<'a, P, Pol, U>(
        &self,
        process: &'a P,
        policy: &'a mut Pol,
        updater: &'a U,
    ) -> Result<StepThrough<'a, P, Pol, U>>
    where
        P: Process,
        Pol: Policy<P, U::Belief> + ?Sized,
        U: Updater<P>,
    {
        let max_steps = self.config.step_ceiling()?;
        let mut rng = rng_from_seed(self.config.seed);
        let (state, belief) = init(process, updater, &mut rng)?;
        let progress = match self.config.show_progress {
            true => Progress::begin("Step-through", Some(max_steps)),
            false => Progress::disabled(),
        };

        Ok(StepThrough {
            process,
            policy,
            updater,
            rng,
            state,
            belief,
            t: 0,
            max_steps,
            failed: false,
            progress,
        })
    }
}

/// Iterator over the steps of a simulation.
///
/// Yields `Err` at most once, after which the iteration ends.
pub struct StepThrough<'a, P, Pol, U>
where
    P: Process,
    Pol: Policy<P, U::Belief> + ?Sized,
    U: Updater<P>,
{
    process: &'a P,
    policy: &'a mut Pol,
    updater: &'a U,
    rng: StdRng,
    state: P::State,
    belief: U::Belief,
    t: usize,
    max_steps: usize,
    failed: bool,
    progress: Progress,
}

impl<'a, P, Pol, U> StepThrough<'a, P, Pol, U>
where
    P: Process,
    Pol: Policy<P, U::Belief> + ?Sized,
    U: Updater<P>,
{
    /// Current state; the final state once the iteration has ended.
    pub fn state(&self) -> &P::State {
        &self.state
    }

    /// Current belief; the final belief once the iteration has ended.
    pub fn belief(&self) -> &U::Belief {
        &self.belief
    }

    /// Number of steps taken so far.
    pub fn n_steps(&self) -> usize {
        self.t
    }

    /// Returns `true` if no more steps will be taken.
    pub fn is_done(&self) -> bool {
        self.failed || self.t >= self.max_steps || self.process.is_terminal(&self.state)
    }

    /// Consumes the iterator, returning the current state and belief.
    pub fn into_state_belief(self) -> (P::State, U::Belief) {
        (self.state, self.belief)
    }

    /// Yields only the selected fields of each step as [`Record`]s.
    pub fn fields(self, fields: StepFields) -> impl Iterator<Item = Result<Record>> + 'a
    where
        Pol: 'a,
    {
        self.map(move |step| step.map(|step| step.to_record(&fields)))
    }
}

impl<'a, P, Pol, U> Iterator for StepThrough<'a, P, Pol, U>
where
    P: Process,
    Pol: Policy<P, U::Belief> + ?Sized,
    U: Updater<P>,
{
    type Item = Result<StepOf<P, U>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done() {
            return None;
        }

        let (act, outcome, next_belief) = match tick(
            self.process,
            &mut *self.policy,
            self.updater,
            &self.state,
            &self.belief,
            &mut self.rng,
        ) {
            Ok(v) => v,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        let state = std::mem::replace(&mut self.state, outcome.next_state.clone());
        let belief = std::mem::replace(&mut self.belief, next_belief.clone());
        let step = Step {
            t: self.t,
            state,
            belief,
            act,
            obs: outcome.obs,
            reward: outcome.reward,
            next_state: outcome.next_state,
            next_belief,
        };
        self.t += 1;
        self.progress.advance(1);

        Some(Ok(step))
    }
}
