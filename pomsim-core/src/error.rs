//! Errors in the library.
use thiserror::Error;

/// Errors raised by simulators, records and result tables.
///
/// Trait methods of the library return [`anyhow::Result`]; these variants are
/// converted into [`anyhow::Error`] where they are raised and can be recovered
/// with [`anyhow::Error::downcast_ref`].
#[derive(Error, Debug)]
pub enum SimError {
    /// A simulator or simulation descriptor was configured incorrectly.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A state, action or observation outside the domain of the process.
    #[error("Out of domain: {0}")]
    Domain(String),

    /// A name in a step field selection is not known.
    #[error("Unknown step field: {0}")]
    UnknownStepField(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// A simulation in a batch panicked.
    #[error("Simulation {index} panicked: {message}")]
    WorkerPanic {
        /// Position of the simulation in the batch.
        index: usize,

        /// Panic payload, if it was a string.
        message: String,
    },
}
