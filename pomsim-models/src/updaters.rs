//! Belief updaters.
use anyhow::Result;
use log::trace;
use pomsim_core::{
    error::SimError, Deterministic, DiscreteBelief, DiscreteProcess, Process, Updater,
};
use std::fmt::Debug;

/// Exact Bayesian filter for [`DiscreteProcess`]es.
///
/// The next belief is `b'(s') ∝ O(o | a, s') Σ_s T(s' | s, a) b(s)`, over the
/// states of the process in their fixed order. An observation that has zero
/// probability under the predicted belief is reported as
/// [`SimError::Domain`].
#[derive(Clone, Debug, Default)]
pub struct DiscreteUpdater;

impl<P: DiscreteProcess> Updater<P> for DiscreteUpdater {
    type Belief = DiscreteBelief<P::State>;

    fn initial_belief(&self, process: &P) -> Result<Self::Belief> {
        let states = process.states();
        let mut probs = vec![0.0; states.len()];
        for (s, p) in process.initial_distribution() {
            probs[process.state_index(&s)?] += p;
        }
        DiscreteBelief::new(states, probs)
    }

    fn update(
        &self,
        process: &P,
        b: &Self::Belief,
        a: &P::Action,
        o: &P::Obs,
    ) -> Result<Self::Belief> {
        let states = process.states();
        let mut probs = vec![0.0; states.len()];

        // Prediction
        for (s, p) in b.iter().filter(|(_, p)| *p > 0.0) {
            for (sp, tp) in process.transition(s, a)? {
                probs[process.state_index(&sp)?] += p * tp;
            }
        }

        // Correction
        for (sp, p) in states.iter().zip(probs.iter_mut()) {
            if *p > 0.0 {
                *p *= process.observation_probability(a, sp, o)?;
            }
        }

        let norm: f64 = probs.iter().sum();
        if norm <= 0.0 {
            return Err(SimError::Domain(format!(
                "observation {:?} is impossible after action {:?}",
                o, a
            ))
            .into());
        }
        probs.iter_mut().for_each(|p| *p /= norm);
        trace!("Belief updated to {:?}", probs);

        DiscreteBelief::new(states, probs)
    }
}

/// Keeps the most recent observation as the belief.
///
/// The belief is `None` before the first observation.
#[derive(Clone, Debug, Default)]
pub struct PreviousObservationUpdater;

impl<P: Process> Updater<P> for PreviousObservationUpdater {
    type Belief = Option<P::Obs>;

    fn initial_belief(&self, _process: &P) -> Result<Self::Belief> {
        Ok(None)
    }

    fn update(
        &self,
        _process: &P,
        _b: &Self::Belief,
        _a: &P::Action,
        o: &P::Obs,
    ) -> Result<Self::Belief> {
        Ok(Some(o.clone()))
    }
}

/// Updater of fully observable processes, whose observation is the state.
///
/// The belief is a point mass on the observed state. As the state is
/// observed from the start, a simulation begins with a point mass on `s_0`.
#[derive(Clone, Debug, Default)]
pub struct FullyObservableUpdater;

impl<P, S> Updater<P> for FullyObservableUpdater
where
    P: Process<State = S, Obs = S>,
    S: Clone + Debug,
{
    type Belief = Deterministic<S>;

    fn initial_belief(&self, _process: &P) -> Result<Self::Belief> {
        Err(SimError::Config(
            "the belief of a fully observable process needs the initial state".to_string(),
        )
        .into())
    }

    fn initialize(&self, _process: &P, s0: &P::State) -> Result<Self::Belief> {
        Ok(Deterministic(s0.clone()))
    }

    fn update(
        &self,
        _process: &P,
        _b: &Self::Belief,
        _a: &P::Action,
        o: &P::Obs,
    ) -> Result<Self::Belief> {
        Ok(Deterministic(o.clone()))
    }
}
