//! Row-oriented result table of batch simulations.
use super::{Record, RecordValue};
use crate::error::SimError;
use anyhow::Result;
use std::{collections::HashSet, fs::File, io::Write, path::Path};
use xxhash_rust::xxh3::Xxh3Builder;

/// Column holding the discounted reward of a run.
pub const REWARD_KEY: &str = "reward";

/// Column marking a failed run, holding the error message.
pub const ERROR_KEY: &str = "error";

/// Fails if `record` uses a column the batch runner writes itself.
pub(crate) fn check_reserved(record: &Record, source: &str) -> Result<(), SimError> {
    for key in [REWARD_KEY, ERROR_KEY] {
        if record.contains_key(key) {
            return Err(SimError::Config(format!("{} uses reserved key '{}'", source, key)));
        }
    }
    Ok(())
}

fn min(vs: &[f64]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f64::INFINITY, f64::min))
}

fn max(vs: &[f64]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn mean(vs: &[f64]) -> f64 {
    vs.iter().sum::<f64>() / vs.len() as f64
}

/// Sample standard deviation; zero for fewer than two values.
fn std_dev(vs: &[f64]) -> f64 {
    if vs.len() < 2 {
        return 0.0;
    }
    let m = mean(vs);
    let ss: f64 = vs.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (vs.len() - 1) as f64).sqrt()
}

fn median(mut vs: Vec<f64>) -> RecordValue {
    vs.sort_by(|x, y| x.total_cmp(y));
    let n = vs.len();
    if n % 2 == 1 {
        RecordValue::Scalar(vs[n / 2])
    } else {
        RecordValue::Scalar(0.5 * (vs[n / 2 - 1] + vs[n / 2]))
    }
}

/// Results of a batch of simulations, one [`Record`] per simulation.
///
/// Rows are in the order of the simulation descriptors, regardless of the
/// order in which the simulations finished. A failed simulation has its
/// metadata and an [`ERROR_KEY`] column instead of computed statistics.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<Record>,
}

impl ResultTable {
    /// Constructs a table from rows.
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// The row at `ix`.
    pub fn row(&self, ix: usize) -> Option<&Record> {
        self.rows.get(ix)
    }

    /// Consumes the table, returning its rows.
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// Sorted union of the keys of all rows.
    pub fn columns(&self) -> Vec<String> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for row in self.rows.iter() {
            for k in row.keys() {
                keys.insert(k.clone());
            }
        }
        let mut keys: Vec<_> = keys.into_iter().collect();
        keys.sort();
        keys
    }

    /// Values of a column, `None` where a row lacks the key.
    pub fn column(&self, key: &str) -> Vec<Option<&RecordValue>> {
        self.rows.iter().map(|row| row.get(key)).collect()
    }

    /// Returns `true` if the row at `ix` records a failure.
    pub fn is_failed(&self, ix: usize) -> bool {
        self.rows
            .get(ix)
            .map_or(false, |row| row.contains_key(ERROR_KEY))
    }

    /// Positions and messages of failed rows.
    pub fn errors(&self) -> Vec<(usize, String)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(ix, row)| row.get_string(ERROR_KEY).ok().map(|e| (ix, e)))
            .collect()
    }

    /// Number of failed rows.
    pub fn n_failed(&self) -> usize {
        self.rows.iter().filter(|row| row.contains_key(ERROR_KEY)).count()
    }

    /// Scalar values of a column over successful rows.
    pub fn scalars(&self, key: &str) -> Result<Vec<f64>, SimError> {
        self.rows
            .iter()
            .filter(|row| !row.contains_key(ERROR_KEY))
            .map(|row| row.get_scalar(key))
            .collect()
    }

    /// Summary statistics of a scalar column over successful rows.
    ///
    /// The returned record has the keys `{key}_count`, `{key}_mean`,
    /// `{key}_std`, `{key}_sem`, `{key}_min`, `{key}_max` and `{key}_median`.
    pub fn summarize(&self, key: &str) -> Result<Record, SimError> {
        let vs = self.scalars(key)?;
        if vs.is_empty() {
            return Err(SimError::RecordKeyError(format!(
                "no successful rows with {}",
                key
            )));
        }
        let n = vs.len();
        let sd = std_dev(&vs);

        Ok(Record::from_slice(&[
            (format!("{}_count", key), RecordValue::Integer(n as i64)),
            (format!("{}_mean", key), RecordValue::Scalar(mean(&vs))),
            (format!("{}_std", key), RecordValue::Scalar(sd)),
            (
                format!("{}_sem", key),
                RecordValue::Scalar(sd / (n as f64).sqrt()),
            ),
            (format!("{}_min", key), min(&vs)),
            (format!("{}_max", key), max(&vs)),
            (format!("{}_median", key), median(vs)),
        ]))
    }

    /// Writes the table as CSV, with [`ResultTable::columns`] as the header.
    ///
    /// Missing values are written as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let columns = self.columns();
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&columns)?;
        for row in self.rows.iter() {
            wtr.write_record(
                columns
                    .iter()
                    .map(|k| row.get(k).map_or(String::new(), |v| v.to_string())),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Saves the table as a CSV file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }
}

impl std::ops::Index<usize> for ResultTable {
    type Output = Record;

    fn index(&self, ix: usize) -> &Self::Output {
        &self.rows[ix]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResultTable {
        let mut rows = vec![];
        for (i, r) in [1.0, 2.0, 3.0, 6.0].iter().enumerate() {
            let mut row = Record::from_scalar(REWARD_KEY, *r);
            row.insert("seed", i);
            rows.push(row);
        }
        let mut failed = Record::empty();
        failed.insert("seed", 4usize);
        failed.insert(ERROR_KEY, "Out of domain: action");
        rows.push(failed);
        ResultTable::new(rows)
    }

    #[test]
    fn test_columns_and_errors() {
        let t = table();
        assert_eq!(t.columns(), vec!["error", "reward", "seed"]);
        assert_eq!(t.n_failed(), 1);
        assert_eq!(t.errors(), vec![(4, "Out of domain: action".to_string())]);
        assert!(t.is_failed(4));
        assert!(!t.is_failed(0));
        assert_eq!(t.column(REWARD_KEY)[4], None);
    }

    #[test]
    fn test_summarize() -> Result<()> {
        let s = table().summarize(REWARD_KEY)?;
        assert_eq!(s.get_integer("reward_count")?, 4);
        assert_eq!(s.get_scalar("reward_mean")?, 3.0);
        assert_eq!(s.get_scalar("reward_min")?, 1.0);
        assert_eq!(s.get_scalar("reward_max")?, 6.0);
        assert_eq!(s.get_scalar("reward_median")?, 2.5);
        assert!((s.get_scalar("reward_std")? - (14.0f64 / 3.0).sqrt()).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_write_csv() -> Result<()> {
        let mut buf = Vec::new();
        table().write_csv(&mut buf)?;
        let text = String::from_utf8(buf)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "error,reward,seed");
        assert_eq!(lines[1], ",1,0");
        assert_eq!(lines[5], "Out of domain: action,,4");
        Ok(())
    }
}
