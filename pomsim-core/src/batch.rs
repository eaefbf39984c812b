//! Batch simulation.
//!
//! A batch is an ordered collection of [`Sim`] descriptors. [`BatchRunner`]
//! runs them, sequentially or on worker threads, and collects one row per
//! descriptor in a [`ResultTable`](crate::record::ResultTable).
mod config;
mod runner;
mod sim;
pub use config::BatchConfig;
pub use runner::{AnalysisFn, BatchRunner};
pub use sim::{Sim, SimBuilder};
