//! A fully observable grid world.
//!
//! The agent moves on a rectangular grid with 1-indexed cells. Moves succeed
//! with probability `tprob` and slip into one of the other directions
//! otherwise; a move off the grid leaves the agent in place. Acting in a
//! reward cell collects its reward and ends the episode.
use anyhow::Result;
use pomsim_core::{
    discrete_initial_state, discrete_step, error::SimError, DiscreteProcess, Outcome, Process,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Column, from 1.
    pub x: usize,

    /// Row, from 1.
    pub y: usize,
}

impl GridPos {
    /// Constructs a cell.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// State of the grid world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridState {
    /// The agent is in a cell.
    At(GridPos),

    /// Absorbing state entered after collecting a reward.
    Terminal,
}

/// Moves of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAction {
    /// `y + 1`.
    Up,

    /// `y - 1`.
    Down,

    /// `x - 1`.
    Left,

    /// `x + 1`.
    Right,
}

const ACTIONS: [GridAction; 4] = [
    GridAction::Up,
    GridAction::Down,
    GridAction::Left,
    GridAction::Right,
];

/// Parameters of the grid world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridWorld {
    /// Number of columns.
    pub size_x: usize,

    /// Number of rows.
    pub size_y: usize,

    /// Cells with rewards.
    pub reward_cells: Vec<(GridPos, f64)>,

    /// Probability of moving in the intended direction.
    pub tprob: f64,

    /// Discount factor.
    pub discount: f64,
}

impl Default for GridWorld {
    fn default() -> Self {
        Self {
            size_x: 10,
            size_y: 10,
            reward_cells: vec![
                (GridPos::new(4, 3), -10.0),
                (GridPos::new(4, 6), -5.0),
                (GridPos::new(9, 3), 10.0),
                (GridPos::new(8, 8), 3.0),
            ],
            tprob: 0.7,
            discount: 0.95,
        }
    }
}

impl GridWorld {
    /// Reward collected by acting in `pos`, if it is a reward cell.
    pub fn cell_reward(&self, pos: &GridPos) -> Option<f64> {
        self.reward_cells
            .iter()
            .find(|(p, _)| p == pos)
            .map(|(_, r)| *r)
    }

    fn check(&self, pos: &GridPos) -> Result<()> {
        if pos.x == 0 || pos.y == 0 || pos.x > self.size_x || pos.y > self.size_y {
            return Err(SimError::Domain(format!(
                "cell ({}, {}) outside of a {}x{} grid",
                pos.x, pos.y, self.size_x, self.size_y
            ))
            .into());
        }
        Ok(())
    }

    /// The cell reached by moving from `pos` in direction `a`, staying in place at borders.
    fn neighbor(&self, pos: &GridPos, a: &GridAction) -> GridPos {
        let GridPos { x, y } = *pos;
        match a {
            GridAction::Up if y < self.size_y => GridPos::new(x, y + 1),
            GridAction::Down if y > 1 => GridPos::new(x, y - 1),
            GridAction::Left if x > 1 => GridPos::new(x - 1, y),
            GridAction::Right if x < self.size_x => GridPos::new(x + 1, y),
            _ => *pos,
        }
    }

    fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (1..=self.size_y).flat_map(move |y| (1..=self.size_x).map(move |x| GridPos::new(x, y)))
    }
}

impl Process for GridWorld {
    type State = GridState;
    type Action = GridAction;
    type Obs = GridState;

    fn discount(&self) -> f64 {
        self.discount
    }

    fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GridState> {
        discrete_initial_state(self, rng)
    }

    fn step<R: Rng + ?Sized>(
        &self,
        s: &GridState,
        a: &GridAction,
        rng: &mut R,
    ) -> Result<Outcome<GridState, GridState>> {
        discrete_step(self, s, a, rng)
    }

    fn is_terminal(&self, s: &GridState) -> bool {
        *s == GridState::Terminal
    }
}

impl DiscreteProcess for GridWorld {
    /// Cells row by row, followed by [`GridState::Terminal`].
    fn states(&self) -> Vec<GridState> {
        self.cells()
            .map(GridState::At)
            .chain(std::iter::once(GridState::Terminal))
            .collect()
    }

    fn actions(&self) -> Vec<GridAction> {
        ACTIONS.to_vec()
    }

    fn observations(&self) -> Vec<GridState> {
        self.states()
    }

    fn state_index(&self, s: &GridState) -> Result<usize> {
        match s {
            GridState::At(pos) => {
                self.check(pos)?;
                Ok((pos.y - 1) * self.size_x + (pos.x - 1))
            }
            GridState::Terminal => Ok(self.size_x * self.size_y),
        }
    }

    fn initial_distribution(&self) -> Vec<(GridState, f64)> {
        let p = 1.0 / (self.size_x * self.size_y) as f64;
        self.cells().map(|pos| (GridState::At(pos), p)).collect()
    }

    fn transition(&self, s: &GridState, a: &GridAction) -> Result<Vec<(GridState, f64)>> {
        let pos = match s {
            GridState::Terminal => return Ok(vec![(GridState::Terminal, 1.0)]),
            GridState::At(pos) => pos,
        };
        self.check(pos)?;
        if self.cell_reward(pos).is_some() {
            return Ok(vec![(GridState::Terminal, 1.0)]);
        }

        let p_slip = (1.0 - self.tprob) / (ACTIONS.len() - 1) as f64;
        let mut dist: Vec<(GridState, f64)> = vec![];
        for d in ACTIONS.iter() {
            let p = if d == a { self.tprob } else { p_slip };
            let sp = GridState::At(self.neighbor(pos, d));
            match dist.iter_mut().find(|(s_, _)| *s_ == sp) {
                Some((_, p_)) => *p_ += p,
                None => dist.push((sp, p)),
            }
        }
        Ok(dist)
    }

    fn observation(&self, _a: &GridAction, sp: &GridState) -> Result<Vec<(GridState, f64)>> {
        Ok(vec![(*sp, 1.0)])
    }

    fn observation_probability(&self, _a: &GridAction, sp: &GridState, o: &GridState) -> Result<f64> {
        Ok(if sp == o { 1.0 } else { 0.0 })
    }

    fn reward(&self, s: &GridState, _a: &GridAction, _sp: &GridState) -> Result<f64> {
        Ok(match s {
            GridState::At(pos) => self.cell_reward(pos).unwrap_or(0.0),
            GridState::Terminal => 0.0,
        })
    }
}
