//! Decision process.
use anyhow::Result;
use rand::Rng;
use std::fmt::Debug;

/// What the process emits when an action is applied to a state.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome<S, O> {
    /// State after the transition, `s_t+1`.
    pub next_state: S,

    /// Observation emitted on arrival in `s_t+1`.
    pub obs: O,

    /// Reward `r_t`.
    pub reward: f64,
}

/// Represents a sequential decision process, either a POMDP or an MDP.
///
/// A process is immutable once constructed: simulators only query it.
/// All randomness comes from the `rng` argument, so the same
/// `(state, action, seed)` always produces the same [`Outcome`].
///
/// Fully observable processes (MDPs) use the next state as the observation,
/// i.e., `Obs = State`.
pub trait Process {
    /// State of the process.
    type State: Clone + Debug;

    /// Action applied to the process.
    type Action: Clone + Debug;

    /// Observation emitted by the process.
    type Obs: Clone + Debug;

    /// Discount factor in `(0, 1]`.
    fn discount(&self) -> f64;

    /// Samples the initial state `s_0`.
    fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self::State>;

    /// Samples `(s_t+1, o_t+1, r_t)` given `(s_t, a_t)`.
    ///
    /// A state or action outside of the domain of the process is an error
    /// of the caller and must be reported as [`SimError::Domain`].
    ///
    /// [`SimError::Domain`]: crate::error::SimError::Domain
    fn step<R: Rng + ?Sized>(
        &self,
        s: &Self::State,
        a: &Self::Action,
        rng: &mut R,
    ) -> Result<Outcome<Self::State, Self::Obs>>;

    /// Returns `true` if no action is taken from `s`.
    fn is_terminal(&self, _s: &Self::State) -> bool {
        false
    }
}

/// A [`Process`] with finite spaces and explicit distributions.
///
/// Exact belief updaters and policies enumerating actions rely on this trait.
/// [`discrete_initial_state`] and [`discrete_step`] implement the sampling
/// methods of [`Process`] on top of it.
pub trait DiscreteProcess: Process {
    /// All states, in a fixed order.
    fn states(&self) -> Vec<Self::State>;

    /// All actions, in a fixed order.
    fn actions(&self) -> Vec<Self::Action>;

    /// All observations, in a fixed order.
    fn observations(&self) -> Vec<Self::Obs>;

    /// Position of `s` in [`DiscreteProcess::states`].
    fn state_index(&self, s: &Self::State) -> Result<usize>;

    /// Distribution of `s_0`.
    fn initial_distribution(&self) -> Vec<(Self::State, f64)>;

    /// Distribution of `s_t+1` given `(s_t, a_t)`.
    fn transition(&self, s: &Self::State, a: &Self::Action) -> Result<Vec<(Self::State, f64)>>;

    /// Distribution of `o_t+1` given `(a_t, s_t+1)`.
    fn observation(&self, a: &Self::Action, sp: &Self::State) -> Result<Vec<(Self::Obs, f64)>>;

    /// Probability of `o` given `(a_t, s_t+1)`.
    fn observation_probability(
        &self,
        a: &Self::Action,
        sp: &Self::State,
        o: &Self::Obs,
    ) -> Result<f64>;

    /// Reward `r_t` of the transition `(s_t, a_t, s_t+1)`.
    fn reward(&self, s: &Self::State, a: &Self::Action, sp: &Self::State) -> Result<f64>;
}

/// Samples `s_0` from [`DiscreteProcess::initial_distribution`].
pub fn discrete_initial_state<P, R>(process: &P, rng: &mut R) -> Result<P::State>
where
    P: DiscreteProcess,
    R: Rng + ?Sized,
{
    crate::util::sample_categorical(&process.initial_distribution(), rng)
}

/// Samples an [`Outcome`] from the explicit distributions of a [`DiscreteProcess`].
///
/// The next state is drawn before the observation, so the order in which
/// `rng` is consumed only depends on the process.
pub fn discrete_step<P, R>(
    process: &P,
    s: &P::State,
    a: &P::Action,
    rng: &mut R,
) -> Result<Outcome<P::State, P::Obs>>
where
    P: DiscreteProcess,
    R: Rng + ?Sized,
{
    let next_state = crate::util::sample_categorical(&process.transition(s, a)?, rng)?;
    let obs = crate::util::sample_categorical(&process.observation(a, &next_state)?, rng)?;
    let reward = process.reward(s, a, &next_state)?;

    Ok(Outcome {
        next_state,
        obs,
        reward,
    })
}
