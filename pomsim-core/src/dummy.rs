//! Dummy process, policy and updater, used in tests.
use crate::{error::SimError, Outcome, Policy, Process, Updater};
use anyhow::Result;
use rand::Rng;
use std::time::Duration;

/// A random walk on the integers, starting at zero.
///
/// Actions are `1` and `-1`; other actions are out of domain. The reward is
/// uniform in `[0, 1)` and the observation is the next state plus noise in
/// `{-1, 0, 1}`.
#[derive(Clone, Debug)]
pub struct DummyProcess {
    /// Discount factor.
    pub discount: f64,

    /// State in which the walk terminates.
    pub terminal_at: Option<i64>,

    /// State from which stepping fails with a domain error.
    pub fail_at: Option<i64>,

    /// State from which stepping panics.
    pub panic_at: Option<i64>,

    /// Sleep in every step.
    pub delay: Duration,
}

impl Default for DummyProcess {
    fn default() -> Self {
        Self {
            discount: 0.9,
            terminal_at: None,
            fail_at: None,
            panic_at: None,
            delay: Duration::ZERO,
        }
    }
}

impl Process for DummyProcess {
    type State = i64;
    type Action = i64;
    type Obs = i64;

    fn discount(&self) -> f64 {
        self.discount
    }

    fn initial_state<R: Rng + ?Sized>(&self, _rng: &mut R) -> Result<i64> {
        Ok(0)
    }

    fn step<R: Rng + ?Sized>(&self, s: &i64, a: &i64, rng: &mut R) -> Result<Outcome<i64, i64>> {
        if *a != 1 && *a != -1 {
            return Err(SimError::Domain(format!("action {}", a)).into());
        }
        if self.fail_at == Some(*s) {
            return Err(SimError::Domain(format!("state {}", s)).into());
        }
        if self.panic_at == Some(*s) {
            panic!("dummy process panicked in state {}", s);
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let next_state = s + a;
        let reward = rng.gen_range(0.0..1.0);
        let obs = next_state + rng.gen_range(-1..=1);

        Ok(Outcome {
            next_state,
            obs,
            reward,
        })
    }

    fn is_terminal(&self, s: &i64) -> bool {
        self.terminal_at == Some(*s)
    }
}

/// Always takes the same action.
#[derive(Clone, Debug)]
pub struct DummyPolicy(pub i64);

impl<B> Policy<DummyProcess, B> for DummyPolicy {
    fn action(&mut self, _b: &B) -> Result<i64> {
        Ok(self.0)
    }
}

/// Keeps all observations as the belief.
#[derive(Clone, Debug)]
pub struct DummyUpdater;

impl Updater<DummyProcess> for DummyUpdater {
    type Belief = Vec<i64>;

    fn initial_belief(&self, _process: &DummyProcess) -> Result<Vec<i64>> {
        Ok(vec![])
    }

    fn update(&self, _process: &DummyProcess, b: &Vec<i64>, _a: &i64, o: &i64) -> Result<Vec<i64>> {
        let mut bp = b.clone();
        bp.push(*o);
        Ok(bp)
    }
}
