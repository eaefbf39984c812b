//! Beliefs over states.
use crate::error::SimError;
use anyhow::Result;

/// A distribution over states, representing what is known about the hidden state.
///
/// The only contract is that the belief can be queried for the probability
/// (or density) of a state.
pub trait Belief<S> {
    /// Probability of `s` under the belief.
    fn pdf(&self, s: &S) -> f64;
}

/// Tolerance on the total mass of a [`DiscreteBelief`].
const MASS_TOLERANCE: f64 = 1e-8;

/// A belief over a finite, ordered set of states.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteBelief<S> {
    states: Vec<S>,
    probs: Vec<f64>,
}

impl<S> DiscreteBelief<S> {
    /// Constructs a belief from states and their probabilities.
    ///
    /// Probabilities must be non-negative and sum to one.
    pub fn new(states: Vec<S>, probs: Vec<f64>) -> Result<Self> {
        if states.len() != probs.len() {
            return Err(SimError::Domain(format!(
                "{} states but {} probabilities",
                states.len(),
                probs.len()
            ))
            .into());
        }
        if probs.iter().any(|p| *p < 0.0 || !p.is_finite()) {
            return Err(SimError::Domain(format!("invalid probabilities {:?}", probs)).into());
        }
        let mass: f64 = probs.iter().sum();
        if (mass - 1.0).abs() > MASS_TOLERANCE {
            return Err(SimError::Domain(format!("probabilities sum to {}", mass)).into());
        }
        Ok(Self { states, probs })
    }

    /// The uniform belief over `states`.
    pub fn uniform(states: Vec<S>) -> Result<Self> {
        if states.is_empty() {
            return Err(SimError::Domain("uniform belief over no states".to_string()).into());
        }
        let p = 1.0 / states.len() as f64;
        let probs = vec![p; states.len()];
        Ok(Self { states, probs })
    }

    /// States of the support, in order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Probabilities, aligned with [`DiscreteBelief::states`].
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Iterates over `(state, probability)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> {
        self.states.iter().zip(self.probs.iter().copied())
    }

    /// Probability of the state at position `ix`.
    pub fn prob_at(&self, ix: usize) -> f64 {
        self.probs.get(ix).copied().unwrap_or(0.0)
    }
}

impl<S: PartialEq> Belief<S> for DiscreteBelief<S> {
    fn pdf(&self, s: &S) -> f64 {
        self.iter()
            .filter(|(s_, _)| *s_ == s)
            .map(|(_, p)| p)
            .sum()
    }
}

/// A point mass on a single state.
///
/// This is the belief of a fully observable process.
#[derive(Clone, Debug, PartialEq)]
pub struct Deterministic<S>(pub S);

impl<S> Deterministic<S> {
    /// The state carrying all mass.
    pub fn state(&self) -> &S {
        &self.0
    }
}

impl<S: PartialEq> Belief<S> for Deterministic<S> {
    fn pdf(&self, s: &S) -> f64 {
        if self.0 == *s {
            1.0
        } else {
            0.0
        }
    }
}
