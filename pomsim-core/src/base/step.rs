//! Simulation step.
use super::{Process, Updater};
use crate::{
    error::SimError,
    record::{Record, RecordValue},
};
use std::{fmt::Debug, str::FromStr};

/// One interaction tick `(s_t, b_t, a_t, o_t+1, r_t, s_t+1, b_t+1)`.
///
/// Simulators emit a [`Step`] for every action taken. Steps are never
/// modified after they have been produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<S, A, O, B> {
    /// Time step `t`, starting at zero.
    pub t: usize,

    /// State before the action.
    pub state: S,

    /// Belief before the action.
    pub belief: B,

    /// Action.
    pub act: A,

    /// Observation after the action.
    pub obs: O,

    /// Reward.
    pub reward: f64,

    /// State after the action.
    pub next_state: S,

    /// Belief after the update with `obs`.
    pub next_belief: B,
}

/// [`Step`] of a simulation of process `P` with updater `U`.
pub type StepOf<P, U> = Step<
    <P as Process>::State,
    <P as Process>::Action,
    <P as Process>::Obs,
    <U as Updater<P>>::Belief,
>;

/// Names of the fields of a [`Step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepField {
    /// `t`
    T,
    /// `s`
    State,
    /// `b`
    Belief,
    /// `a`
    Act,
    /// `o`
    Obs,
    /// `r`
    Reward,
    /// `sp`
    NextState,
    /// `bp`
    NextBelief,
}

impl StepField {
    /// Short name, used as the key in records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::T => "t",
            Self::State => "s",
            Self::Belief => "b",
            Self::Act => "a",
            Self::Obs => "o",
            Self::Reward => "r",
            Self::NextState => "sp",
            Self::NextBelief => "bp",
        }
    }
}

impl FromStr for StepField {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" => Ok(Self::T),
            "s" => Ok(Self::State),
            "b" => Ok(Self::Belief),
            "a" => Ok(Self::Act),
            "o" => Ok(Self::Obs),
            "r" => Ok(Self::Reward),
            "sp" => Ok(Self::NextState),
            "bp" => Ok(Self::NextBelief),
            _ => Err(SimError::UnknownStepField(s.to_string())),
        }
    }
}

/// A caller-selected subset of step fields, such as `"s,a,r"`.
///
/// Names are separated by commas; whitespace around names is ignored.
///
/// ```rust
/// use pomsim_core::{StepField, StepFields};
///
/// let fields: StepFields = "s, a,r".parse().unwrap();
/// assert_eq!(fields.as_slice(), &[StepField::State, StepField::Act, StepField::Reward]);
/// assert!("s,x".parse::<StepFields>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepFields(Vec<StepField>);

impl StepFields {
    /// All fields.
    pub fn all() -> Self {
        Self(vec![
            StepField::T,
            StepField::State,
            StepField::Belief,
            StepField::Act,
            StepField::Obs,
            StepField::Reward,
            StepField::NextState,
            StepField::NextBelief,
        ])
    }

    /// The selected fields, in the given order.
    pub fn as_slice(&self) -> &[StepField] {
        &self.0
    }
}

impl FromStr for StepFields {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .split(',')
            .map(|name| name.trim().parse())
            .collect::<Result<Vec<StepField>, _>>()?;
        Ok(Self(fields))
    }
}

impl<S, A, O, B> Step<S, A, O, B>
where
    S: Debug,
    A: Debug,
    O: Debug,
    B: Debug,
{
    /// Returns the selected fields as a [`Record`] keyed by their short names.
    ///
    /// `t` is stored as an integer, `r` as a scalar and the other fields as
    /// their debug representation.
    pub fn to_record(&self, fields: &StepFields) -> Record {
        let mut record = Record::empty();
        for field in fields.as_slice() {
            let value = match field {
                StepField::T => RecordValue::Integer(self.t as i64),
                StepField::State => RecordValue::String(format!("{:?}", self.state)),
                StepField::Belief => RecordValue::String(format!("{:?}", self.belief)),
                StepField::Act => RecordValue::String(format!("{:?}", self.act)),
                StepField::Obs => RecordValue::String(format!("{:?}", self.obs)),
                StepField::Reward => RecordValue::Scalar(self.reward),
                StepField::NextState => RecordValue::String(format!("{:?}", self.next_state)),
                StepField::NextBelief => {
                    RecordValue::String(format!("{:?}", self.next_belief))
                }
            };
            record.insert(field.name(), value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_record() -> anyhow::Result<()> {
        let step = Step {
            t: 2,
            state: 'l',
            belief: (),
            act: "listen",
            obs: 'r',
            reward: -1.0,
            next_state: 'l',
            next_belief: (),
        };
        let fields: StepFields = "t,a,r,sp".parse()?;
        let record = step.to_record(&fields);
        assert_eq!(record.len(), 4);
        assert_eq!(record.get_integer("t")?, 2);
        assert_eq!(record.get_string("a")?, "\"listen\"");
        assert_eq!(record.get_scalar("r")?, -1.0);
        assert_eq!(record.get_string("sp")?, "'l'");
        Ok(())
    }

    #[test]
    fn test_unknown_field() {
        assert!(matches!(
            "s,a,reward".parse::<StepFields>(),
            Err(SimError::UnknownStepField(name)) if name == "reward"
        ));
    }
}
