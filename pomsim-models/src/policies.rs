//! Policies.
use crate::crying_baby::{BabyAction, BabyObs, BabyPomdp};
use anyhow::Result;
use pomsim_core::{error::SimError, util::rng_from_seed, DiscreteProcess, Policy, Process};
use rand::{rngs::StdRng, seq::SliceRandom};

/// A policy defined by a function of the belief.
///
/// A function ignoring its argument gives a fixed-action policy:
///
/// ```
/// # use pomsim_core::Policy;
/// # use pomsim_models::{FunctionPolicy, TigerAction, TigerPomdp};
/// let mut policy = FunctionPolicy::new(|_: &()| TigerAction::Listen);
/// let a = Policy::<TigerPomdp, ()>::action(&mut policy, &()).unwrap();
/// assert_eq!(a, TigerAction::Listen);
/// ```
#[derive(Clone)]
pub struct FunctionPolicy<F> {
    f: F,
}

impl<F> FunctionPolicy<F> {
    /// Constructs the policy.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> std::fmt::Debug for FunctionPolicy<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FunctionPolicy")
    }
}

impl<P, B, F> Policy<P, B> for FunctionPolicy<F>
where
    P: Process,
    F: FnMut(&B) -> P::Action,
{
    fn action(&mut self, b: &B) -> Result<P::Action> {
        Ok((self.f)(b))
    }
}

/// Takes actions uniformly at random, ignoring the belief.
///
/// The policy owns its random number generator, seeded at construction.
#[derive(Clone, Debug)]
pub struct RandomPolicy<A> {
    actions: Vec<A>,
    rng: StdRng,
}

impl<A> RandomPolicy<A> {
    /// Constructs the policy choosing from `actions`.
    pub fn new(actions: Vec<A>, seed: u64) -> Result<Self> {
        if actions.is_empty() {
            return Err(SimError::Config("random policy without actions".to_string()).into());
        }
        Ok(Self {
            actions,
            rng: rng_from_seed(seed),
        })
    }

    /// Constructs the policy choosing from all actions of `process`.
    pub fn from_process<P>(process: &P, seed: u64) -> Result<Self>
    where
        P: DiscreteProcess<Action = A>,
    {
        Self::new(process.actions(), seed)
    }
}

impl<P, A, B> Policy<P, B> for RandomPolicy<A>
where
    P: Process<Action = A>,
    A: Clone,
{
    fn action(&mut self, _b: &B) -> Result<A> {
        self.actions
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| SimError::Config("random policy without actions".to_string()).into())
    }
}

/// Feeds the baby if it was crying at the last step.
///
/// The belief is the previous observation, as maintained by
/// [`PreviousObservationUpdater`](crate::PreviousObservationUpdater).
#[derive(Clone, Debug, Default)]
pub struct FeedWhenCrying;

impl Policy<BabyPomdp, Option<BabyObs>> for FeedWhenCrying {
    fn action(&mut self, b: &Option<BabyObs>) -> Result<BabyAction> {
        Ok(match b {
            Some(BabyObs::Crying) => BabyAction::Feed,
            _ => BabyAction::Ignore,
        })
    }
}
