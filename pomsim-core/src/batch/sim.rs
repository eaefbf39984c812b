//! Simulation descriptors.
use crate::{
    error::SimError,
    record::{check_reserved, Record, RecordValue},
};
use anyhow::Result;

/// A self-contained description of one simulation in a batch.
///
/// A descriptor owns its process, policy and updater, and the seed of its
/// random number generator. Runs of different descriptors share no mutable
/// state, so they can be executed in any order and on any thread.
///
/// To mix policies of different types in one batch, use boxed policies,
/// e.g., `Box<dyn Policy<P, B> + Send>`.
#[derive(Debug, Clone)]
pub struct Sim<P, Pol, U> {
    /// The process.
    pub process: P,

    /// The policy.
    pub policy: Pol,

    /// The belief updater.
    pub updater: U,

    /// The maximum number of steps of the run.
    pub max_steps: usize,

    /// Seed of the random number generator of the run.
    pub seed: u64,

    /// Caller-defined values copied into the result row of the run.
    ///
    /// The keys [`REWARD_KEY`](crate::record::REWARD_KEY) and
    /// [`ERROR_KEY`](crate::record::ERROR_KEY) are reserved.
    pub metadata: Record,
}

impl<P, Pol, U> Sim<P, Pol, U> {
    /// Returns a builder of [`Sim`].
    pub fn builder() -> SimBuilder<P, Pol, U> {
        SimBuilder::default()
    }
}

/// Builder of [`Sim`].
///
/// The process, policy, updater and step ceiling are required. The seed
/// defaults to zero and the metadata to an empty record.
#[derive(Debug, Clone)]
pub struct SimBuilder<P, Pol, U> {
    process: Option<P>,
    policy: Option<Pol>,
    updater: Option<U>,
    max_steps: Option<usize>,
    seed: u64,
    metadata: Record,
}

impl<P, Pol, U> Default for SimBuilder<P, Pol, U> {
    fn default() -> Self {
        Self {
            process: None,
            policy: None,
            updater: None,
            max_steps: None,
            seed: 0,
            metadata: Record::empty(),
        }
    }
}

impl<P, Pol, U> SimBuilder<P, Pol, U> {
    /// Sets the process.
    pub fn process(mut self, v: P) -> Self {
        self.process = Some(v);
        self
    }

    /// Sets the policy.
    pub fn policy(mut self, v: Pol) -> Self {
        self.policy = Some(v);
        self
    }

    /// Sets the belief updater.
    pub fn updater(mut self, v: U) -> Self {
        self.updater = Some(v);
        self
    }

    /// Sets the maximum number of steps.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = Some(v);
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Adds a metadata value.
    pub fn metadata(mut self, k: impl Into<String>, v: impl Into<RecordValue>) -> Self {
        self.metadata.insert(k, v);
        self
    }

    /// Merges a record into the metadata.
    pub fn metadata_record(mut self, record: Record) -> Self {
        self.metadata.merge_inplace(record);
        self
    }

    /// Builds the descriptor.
    ///
    /// A missing required field, or metadata using a reserved key, is a
    /// [`SimError::Config`].
    pub fn build(self) -> Result<Sim<P, Pol, U>> {
        let missing = |name: &str| SimError::Config(format!("simulation without {}", name));
        check_reserved(&self.metadata, "metadata")?;

        Ok(Sim {
            process: self.process.ok_or_else(|| missing("process"))?,
            policy: self.policy.ok_or_else(|| missing("policy"))?,
            updater: self.updater.ok_or_else(|| missing("updater"))?,
            max_steps: self.max_steps.ok_or_else(|| missing("max_steps"))?,
            seed: self.seed,
            metadata: self.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let err = Sim::<u8, u8, u8>::builder()
            .process(0)
            .updater(0)
            .max_steps(10)
            .build()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::Config(msg)) if msg.contains("policy")
        ));

        let err = Sim::<u8, u8, u8>::builder()
            .process(0)
            .policy(0)
            .updater(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_steps"));
    }

    #[test]
    fn test_build() -> Result<()> {
        let sim = Sim::<u8, u8, u8>::builder()
            .process(1)
            .policy(2)
            .updater(3)
            .max_steps(10)
            .seed(7)
            .metadata("policy", "listen")
            .build()?;
        assert_eq!(sim.seed, 7);
        assert_eq!(sim.metadata.get_string("policy")?, "listen");
        Ok(())
    }

    #[test]
    fn test_reserved_metadata_keys() {
        for key in [crate::record::ERROR_KEY, crate::record::REWARD_KEY] {
            let err = Sim::<u8, u8, u8>::builder()
                .process(1)
                .policy(2)
                .updater(3)
                .max_steps(10)
                .metadata(key, "none")
                .build()
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SimError>(),
                Some(SimError::Config(msg)) if msg.contains(key)
            ));
        }

        let record = Record::from_scalar(crate::record::REWARD_KEY, 1.0);
        assert!(Sim::<u8, u8, u8>::builder()
            .process(1)
            .policy(2)
            .updater(3)
            .max_steps(10)
            .metadata_record(record)
            .build()
            .is_err());
    }
}
