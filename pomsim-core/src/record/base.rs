//! Base implementation of records.
//!
//! A [`Record`] is a set of named values. Simulators use records for selected
//! step fields and for rows of batch result tables, where the keys are the
//! column names.
use crate::error::SimError;
use std::{
    collections::{
        hash_map::{Iter, Keys},
        HashMap,
    },
    fmt,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically a reward.
    Scalar(f64),

    /// An integer value, such as a time step or a seed.
    Integer(i64),

    /// A text value, useful for labels, debug representations and error messages.
    String(String),
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for RecordValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<i64> for RecordValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<usize> for RecordValue {
    fn from(v: usize) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// A container for storing key-value pairs of various data types.
///
/// ```rust
/// use pomsim_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("reward", -1.0);
/// record.insert("policy", RecordValue::String("listen".to_string()));
///
/// assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
/// assert_eq!(record.get_string("policy").unwrap(), "listen");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: impl Into<RecordValue>) {
        self.0.insert(k.into(), v.into());
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record has a value for `k`.
    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from the second record
    /// overwrites the value from the first record.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    ///
    /// Integer values are converted to scalars.
    pub fn get_scalar(&self, k: &str) -> Result<f64, SimError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(RecordValue::Integer(v)) => Ok(*v as f64),
            Some(_) => Err(SimError::RecordValueTypeError("Scalar".to_string())),
            None => Err(SimError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets an integer value from the record.
    pub fn get_integer(&self, k: &str) -> Result<i64, SimError> {
        match self.0.get(k) {
            Some(RecordValue::Integer(v)) => Ok(*v),
            Some(_) => Err(SimError::RecordValueTypeError("Integer".to_string())),
            None => Err(SimError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, SimError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(SimError::RecordValueTypeError("String".to_string())),
            None => Err(SimError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of values in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
