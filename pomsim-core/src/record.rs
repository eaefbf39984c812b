//! Records and result tables.
//!
//! * [`Record`] - a set of named values of various types, see [`RecordValue`]
//! * [`ResultTable`] - ordered rows of records produced by batch simulations,
//!   with summary statistics and CSV export
//!
//! ```rust
//! use pomsim_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("t", RecordValue::Integer(0));
//! record.insert("r", RecordValue::Scalar(-1.0));
//! record.insert("a", RecordValue::String("Listen".to_string()));
//! ```
mod base;
mod table;

pub use base::{Record, RecordValue};
pub(crate) use table::check_reserved;
pub use table::{ResultTable, ERROR_KEY, REWARD_KEY};
