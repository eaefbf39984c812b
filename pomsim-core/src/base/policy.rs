//! Policy.
use super::Process;
use anyhow::Result;

/// A policy on a process.
///
/// Policy is a mapping from a belief to an action. For fully observable
/// processes, the belief is the observed state. The mapping can be either of
/// deterministic or stochastic; a stochastic policy owns its random number
/// generator, which is never shared between simulations.
pub trait Policy<P: Process, B> {
    /// Selects an action given a belief.
    fn action(&mut self, b: &B) -> Result<P::Action>;
}

impl<P, B, T> Policy<P, B> for Box<T>
where
    P: Process,
    T: Policy<P, B> + ?Sized,
{
    fn action(&mut self, b: &B) -> Result<P::Action> {
        (**self).action(b)
    }
}
