//! Configuration of [`BatchRunner`](super::BatchRunner).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`BatchRunner`](super::BatchRunner).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Number of worker threads.
    ///
    /// With a single worker, simulations run on the calling thread.
    /// The default value is the available parallelism of the machine.
    pub n_workers: usize,

    /// Reports the number of finished simulations through the log.
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            n_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            show_progress: false,
        }
    }
}

impl BatchConfig {
    /// Sets the number of worker threads.
    pub fn n_workers(mut self, v: usize) -> Self {
        self.n_workers = v;
        self
    }

    /// Sets if progress is reported.
    pub fn show_progress(mut self, v: bool) -> Self {
        self.show_progress = v;
        self
    }

    /// Constructs [`BatchConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`BatchConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
