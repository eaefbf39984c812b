//! Belief updater.
use super::Process;
use anyhow::Result;
use std::fmt::Debug;

/// Produces the next belief from the previous belief, action and observation.
///
/// An updater is a pure function of its inputs and the observation model of
/// the process; it keeps no state between calls.
pub trait Updater<P: Process> {
    /// Belief maintained by the updater.
    type Belief: Clone + Debug;

    /// The belief before any observation, built from the initial state
    /// distribution of the process.
    fn initial_belief(&self, process: &P) -> Result<Self::Belief>;

    /// The belief held before the first action of a simulation starting in `s0`.
    ///
    /// By default the sampled state is ignored. Updaters of fully observable
    /// processes override this, as they observe `s0` directly.
    fn initialize(&self, process: &P, _s0: &P::State) -> Result<Self::Belief> {
        self.initial_belief(process)
    }

    /// Returns `b_t+1` given `(b_t, a_t, o_t+1)`.
    fn update(
        &self,
        process: &P,
        b: &Self::Belief,
        a: &P::Action,
        o: &P::Obs,
    ) -> Result<Self::Belief>;
}
