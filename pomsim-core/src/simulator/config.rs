//! Configuration of simulators.
use crate::error::SimError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration shared by [`StepThroughSimulator`], [`RolloutSimulator`] and
/// [`HistoryRecorder`].
///
/// [`StepThroughSimulator`]: super::StepThroughSimulator
/// [`RolloutSimulator`]: super::RolloutSimulator
/// [`HistoryRecorder`]: super::HistoryRecorder
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimulatorConfig {
    /// The maximum number of actions taken in a run.
    ///
    /// Reaching this ceiling ends the run normally, like a terminal state.
    /// It is required by every driver, except that a rollout may bound its
    /// length with `eps` alone when the discount is below one.
    pub max_steps: Option<usize>,

    /// Seed of the random number generator driving the process.
    pub seed: u64,

    /// Rollouts stop once the discount `γ^t` falls below this value.
    pub eps: Option<f64>,

    /// If `true`, [`HistoryRecorder`](super::HistoryRecorder) returns the
    /// partial history and the error message instead of the error.
    pub capture_errors: bool,

    /// Reports progress of each run, in steps, through the log.
    pub show_progress: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            seed: 0,
            eps: None,
            capture_errors: false,
            show_progress: false,
        }
    }
}

impl SimulatorConfig {
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

    /// Sets the discount threshold of rollouts.
    pub fn eps(mut self, v: f64) -> Self {
        self.eps = Some(v);
        self
    }

    /// Sets if errors are captured in histories.
    pub fn capture_errors(mut self, v: bool) -> Self {
        self.capture_errors = v;
        self
    }

    /// Sets if progress is reported.
    pub fn show_progress(mut self, v: bool) -> Self {
        self.show_progress = v;
        self
    }

    /// The step ceiling, which must be configured.
    pub(crate) fn step_ceiling(&self) -> Result<usize, SimError> {
        self.max_steps
            .ok_or_else(|| SimError::Config("max_steps is required".to_string()))
    }

    /// Constructs [`SimulatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SimulatorConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_simulator_config() -> Result<()> {
        let config = SimulatorConfig::default()
            .max_steps(100)
            .seed(42)
            .eps(1e-3)
            .capture_errors(true);

        let dir = TempDir::new("simulator_config")?;
        let path = dir.path().join("simulator_config.yaml");
        config.save(&path)?;
        let config_ = SimulatorConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_step_ceiling() -> Result<()> {
        assert_eq!(SimulatorConfig::default().max_steps(0).step_ceiling()?, 0);
        assert!(matches!(
            SimulatorConfig::default().step_ceiling(),
            Err(SimError::Config(msg)) if msg.contains("max_steps")
        ));
        Ok(())
    }
}
