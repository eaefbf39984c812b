//! The tiger problem.
//!
//! A tiger is behind one of two doors. The agent can listen, which is cheap
//! but noisy, or open a door. Opening the door of the tiger is heavily
//! penalized, opening the other door is rewarded; either way the problem
//! restarts with the tiger placed uniformly at random.
use anyhow::Result;
use pomsim_core::{
    discrete_initial_state, discrete_step, error::SimError, DiscreteProcess, Outcome, Process,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Position of the tiger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TigerState {
    /// Behind the left door.
    TigerLeft,

    /// Behind the right door.
    TigerRight,
}

/// Actions of the tiger problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TigerAction {
    /// Opens the left door.
    OpenLeft,

    /// Opens the right door.
    OpenRight,

    /// Listens for the tiger.
    Listen,
}

/// Observations of the tiger problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TigerObs {
    /// The tiger was heard behind the left door.
    HearLeft,

    /// The tiger was heard behind the right door.
    HearRight,
}

const STATES: [TigerState; 2] = [TigerState::TigerLeft, TigerState::TigerRight];

/// Parameters of the tiger problem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TigerPomdp {
    /// Reward of listening.
    pub r_listen: f64,

    /// Reward of opening the door of the tiger.
    pub r_findtiger: f64,

    /// Reward of opening the other door.
    pub r_escapetiger: f64,

    /// Probability of hearing the tiger on the correct side.
    pub p_listen_correctly: f64,

    /// Discount factor.
    pub discount: f64,
}

impl Default for TigerPomdp {
    fn default() -> Self {
        Self {
            r_listen: -1.0,
            r_findtiger: -100.0,
            r_escapetiger: 10.0,
            p_listen_correctly: 0.85,
            discount: 0.95,
        }
    }
}

impl TigerPomdp {
    /// Sets the reward of listening.
    pub fn r_listen(mut self, v: f64) -> Self {
        self.r_listen = v;
        self
    }

    /// Sets the probability of hearing the tiger on the correct side.
    pub fn p_listen_correctly(mut self, v: f64) -> Self {
        self.p_listen_correctly = v;
        self
    }
}

impl Process for TigerPomdp {
    type State = TigerState;
    type Action = TigerAction;
    type Obs = TigerObs;

    fn discount(&self) -> f64 {
        self.discount
    }

    fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TigerState> {
        discrete_initial_state(self, rng)
    }

    fn step<R: Rng + ?Sized>(
        &self,
        s: &TigerState,
        a: &TigerAction,
        rng: &mut R,
    ) -> Result<Outcome<TigerState, TigerObs>> {
        discrete_step(self, s, a, rng)
    }
}

impl DiscreteProcess for TigerPomdp {
    fn states(&self) -> Vec<TigerState> {
        STATES.to_vec()
    }

    fn actions(&self) -> Vec<TigerAction> {
        vec![TigerAction::OpenLeft, TigerAction::OpenRight, TigerAction::Listen]
    }

    fn observations(&self) -> Vec<TigerObs> {
        vec![TigerObs::HearLeft, TigerObs::HearRight]
    }

    fn state_index(&self, s: &TigerState) -> Result<usize> {
        Ok(match s {
            TigerState::TigerLeft => 0,
            TigerState::TigerRight => 1,
        })
    }

    fn initial_distribution(&self) -> Vec<(TigerState, f64)> {
        STATES.iter().map(|s| (*s, 0.5)).collect()
    }

    fn transition(&self, s: &TigerState, a: &TigerAction) -> Result<Vec<(TigerState, f64)>> {
        Ok(match a {
            TigerAction::Listen => vec![(*s, 1.0)],
            _ => self.initial_distribution(),
        })
    }

    fn observation(&self, a: &TigerAction, sp: &TigerState) -> Result<Vec<(TigerObs, f64)>> {
        self.observations()
            .into_iter()
            .map(|o| Ok((o, self.observation_probability(a, sp, &o)?)))
            .collect()
    }

    fn observation_probability(
        &self,
        a: &TigerAction,
        sp: &TigerState,
        o: &TigerObs,
    ) -> Result<f64> {
        if !(0.0..=1.0).contains(&self.p_listen_correctly) {
            return Err(SimError::Domain(format!(
                "p_listen_correctly = {}",
                self.p_listen_correctly
            ))
            .into());
        }
        let correct = matches!(
            (sp, o),
            (TigerState::TigerLeft, TigerObs::HearLeft) | (TigerState::TigerRight, TigerObs::HearRight)
        );

        Ok(match (a, correct) {
            (TigerAction::Listen, true) => self.p_listen_correctly,
            (TigerAction::Listen, false) => 1.0 - self.p_listen_correctly,
            _ => 0.5,
        })
    }

    fn reward(&self, s: &TigerState, a: &TigerAction, _sp: &TigerState) -> Result<f64> {
        Ok(match (a, s) {
            (TigerAction::Listen, _) => self.r_listen,
            (TigerAction::OpenLeft, TigerState::TigerLeft)
            | (TigerAction::OpenRight, TigerState::TigerRight) => self.r_findtiger,
            _ => self.r_escapetiger,
        })
    }
}
