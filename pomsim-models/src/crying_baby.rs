//! The crying baby problem.
//!
//! A baby is either hungry or sated, which is observed only through its
//! crying. Feeding costs effort; a hungry baby costs more.
use anyhow::Result;
use pomsim_core::{discrete_initial_state, discrete_step, DiscreteProcess, Outcome, Process};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hunger of the baby.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BabyState {
    #[allow(missing_docs)]
    Hungry,
    #[allow(missing_docs)]
    Sated,
}

/// Actions of the crying baby problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BabyAction {
    #[allow(missing_docs)]
    Feed,
    #[allow(missing_docs)]
    Ignore,
}

/// Observations of the crying baby problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BabyObs {
    #[allow(missing_docs)]
    Crying,
    #[allow(missing_docs)]
    Quiet,
}

/// Parameters of the crying baby problem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BabyPomdp {
    /// Reward in every step the baby is hungry.
    pub r_hungry: f64,

    /// Reward of feeding.
    pub r_feed: f64,

    /// Probability that a sated baby becomes hungry.
    pub p_become_hungry: f64,

    /// Probability of crying when hungry.
    pub p_cry_when_hungry: f64,

    /// Probability of crying when sated.
    pub p_cry_when_not_hungry: f64,

    /// Discount factor.
    pub discount: f64,
}

impl Default for BabyPomdp {
    fn default() -> Self {
        Self {
            r_hungry: -10.0,
            r_feed: -5.0,
            p_become_hungry: 0.1,
            p_cry_when_hungry: 0.8,
            p_cry_when_not_hungry: 0.1,
            discount: 0.9,
        }
    }
}

impl Process for BabyPomdp {
    type State = BabyState;
    type Action = BabyAction;
    type Obs = BabyObs;

    fn discount(&self) -> f64 {
        self.discount
    }

    fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<BabyState> {
        discrete_initial_state(self, rng)
    }

    fn step<R: Rng + ?Sized>(
        &self,
        s: &BabyState,
        a: &BabyAction,
        rng: &mut R,
    ) -> Result<Outcome<BabyState, BabyObs>> {
        discrete_step(self, s, a, rng)
    }
}

impl DiscreteProcess for BabyPomdp {
    fn states(&self) -> Vec<BabyState> {
        vec![BabyState::Hungry, BabyState::Sated]
    }

    fn actions(&self) -> Vec<BabyAction> {
        vec![BabyAction::Feed, BabyAction::Ignore]
    }

    fn observations(&self) -> Vec<BabyObs> {
        vec![BabyObs::Crying, BabyObs::Quiet]
    }

    fn state_index(&self, s: &BabyState) -> Result<usize> {
        Ok(match s {
            BabyState::Hungry => 0,
            BabyState::Sated => 1,
        })
    }

    fn initial_distribution(&self) -> Vec<(BabyState, f64)> {
        vec![(BabyState::Hungry, 0.0), (BabyState::Sated, 1.0)]
    }

    fn transition(&self, s: &BabyState, a: &BabyAction) -> Result<Vec<(BabyState, f64)>> {
        let p_hungry = match (a, s) {
            (BabyAction::Feed, _) => 0.0,
            (BabyAction::Ignore, BabyState::Hungry) => 1.0,
            (BabyAction::Ignore, BabyState::Sated) => self.p_become_hungry,
        };
        Ok(vec![
            (BabyState::Hungry, p_hungry),
            (BabyState::Sated, 1.0 - p_hungry),
        ])
    }

    fn observation(&self, a: &BabyAction, sp: &BabyState) -> Result<Vec<(BabyObs, f64)>> {
        let p_cry = self.observation_probability(a, sp, &BabyObs::Crying)?;
        Ok(vec![(BabyObs::Crying, p_cry), (BabyObs::Quiet, 1.0 - p_cry)])
    }

    fn observation_probability(&self, _a: &BabyAction, sp: &BabyState, o: &BabyObs) -> Result<f64> {
        let p_cry = match sp {
            BabyState::Hungry => self.p_cry_when_hungry,
            BabyState::Sated => self.p_cry_when_not_hungry,
        };
        Ok(match o {
            BabyObs::Crying => p_cry,
            BabyObs::Quiet => 1.0 - p_cry,
        })
    }

    fn reward(&self, s: &BabyState, a: &BabyAction, _sp: &BabyState) -> Result<f64> {
        let mut r = 0.0;
        if *s == BabyState::Hungry {
            r += self.r_hungry;
        }
        if *a == BabyAction::Feed {
            r += self.r_feed;
        }
        Ok(r)
    }
}
