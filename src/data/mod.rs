//! Student records and dataset loading.
//!
//! The dataset is a CSV file with the five study-habit columns, plus the
//! `Performance Index` target column in training data. Records are validated
//! on load; a missing column or an unparseable cell is a schema violation
//! reported before any downstream stage runs.

use crate::error::{RendimientoError, Result};
use crate::primitives::Vector;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CSV column: hours studied per day.
pub const HOURS_STUDIED: &str = "Hours Studied";
/// CSV column: score on the previous exam.
pub const PREVIOUS_SCORES: &str = "Previous Scores";
/// CSV column: sleep hours per day.
pub const SLEEP_HOURS: &str = "Sleep Hours";
/// CSV column: number of sample question papers practiced.
pub const SAMPLE_PAPERS: &str = "Sample Question Papers Practiced";
/// CSV column: whether the student does extracurricular activities.
pub const EXTRACURRICULAR: &str = "Extracurricular Activities";
/// CSV column: the regression target, present only in training data.
pub const PERFORMANCE_INDEX: &str = "Performance Index";

/// One student's study-habit inputs.
///
/// All five fields are required. `extracurricular` is a free string rather
/// than a closed enum: the category vocabulary is learned at fit time, and
/// values never seen during training encode to an all-zero one-hot block at
/// inference instead of failing.
///
/// # Examples
///
/// ```
/// use rendimiento::data::RawRecord;
///
/// let record = RawRecord::new(2.0, 75.0, 7.0, 10, "yes").expect("fields are in range");
/// assert_eq!(record.extracurricular, "yes");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Hours studied per day (>= 0).
    pub hours_studied: f32,
    /// Previous exam score (0..=100).
    pub previous_scores: f32,
    /// Sleep hours per day (>= 0).
    pub sleep_hours: f32,
    /// Sample question papers practiced.
    pub sample_papers: u32,
    /// Extracurricular activity category (e.g. "yes"/"no").
    pub extracurricular: String,
}

impl RawRecord {
    /// Creates a validated record.
    ///
    /// # Errors
    ///
    /// Returns a schema error if any field is out of its valid range.
    pub fn new(
        hours_studied: f32,
        previous_scores: f32,
        sleep_hours: f32,
        sample_papers: u32,
        extracurricular: &str,
    ) -> Result<Self> {
        let record = Self {
            hours_studied,
            previous_scores,
            sleep_hours,
            sample_papers,
            extracurricular: extracurricular.to_string(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Validates field ranges.
    ///
    /// # Errors
    ///
    /// Returns a schema error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.hours_studied.is_finite() || self.hours_studied < 0.0 {
            return Err(RendimientoError::schema(
                HOURS_STUDIED,
                format!("must be a finite value >= 0, got {}", self.hours_studied),
            ));
        }
        if !self.previous_scores.is_finite()
            || !(0.0..=100.0).contains(&self.previous_scores)
        {
            return Err(RendimientoError::schema(
                PREVIOUS_SCORES,
                format!("must be within [0, 100], got {}", self.previous_scores),
            ));
        }
        if !self.sleep_hours.is_finite() || self.sleep_hours < 0.0 {
            return Err(RendimientoError::schema(
                SLEEP_HOURS,
                format!("must be a finite value >= 0, got {}", self.sleep_hours),
            ));
        }
        if self.extracurricular.trim().is_empty() {
            return Err(RendimientoError::schema(
                EXTRACURRICULAR,
                "must be a non-empty category",
            ));
        }
        Ok(())
    }
}

/// A loaded training dataset: validated records plus their target values.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    /// Study-habit records, one per dataset row.
    pub records: Vec<RawRecord>,
    /// Performance index targets, aligned with `records`.
    pub target: Vector<f32>,
}

impl TrainingSet {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the set has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads the training dataset, requiring the target column.
///
/// # Errors
///
/// Returns a schema error if a column is missing or a cell fails to parse,
/// and a configuration error if the file contains no data rows.
pub fn load_training_set<P: AsRef<Path>>(path: P) -> Result<TrainingSet> {
    let mut reader = open_dataset(path.as_ref())?;
    let columns = FeatureColumns::resolve(reader.headers().map_err(csv_error)?)?;
    let target_idx = find_column(reader.headers().map_err(csv_error)?, PERFORMANCE_INDEX)?;

    let mut records = Vec::new();
    let mut target = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let line = row + 2; // header occupies line 1
        let record = result.map_err(csv_error)?;
        records.push(columns.parse_record(&record, line)?);
        let index = parse_cell::<f32>(&record, target_idx, PERFORMANCE_INDEX, line)?;
        if !index.is_finite() {
            return Err(RendimientoError::schema(
                PERFORMANCE_INDEX,
                format!("must be finite, got {index} at line {line}"),
            ));
        }
        target.push(index);
    }

    if records.is_empty() {
        return Err(RendimientoError::config("dataset contains no data rows"));
    }

    Ok(TrainingSet {
        records,
        target: Vector::from_vec(target),
    })
}

/// Loads study-habit records only, ignoring any target column.
///
/// Used by the inference side to draw the background reference sample from
/// the training distribution.
///
/// # Errors
///
/// Same error contract as [`load_training_set`], minus the target column.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let mut reader = open_dataset(path.as_ref())?;
    let columns = FeatureColumns::resolve(reader.headers().map_err(csv_error)?)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let record = result.map_err(csv_error)?;
        records.push(columns.parse_record(&record, line)?);
    }

    if records.is_empty() {
        return Err(RendimientoError::config("dataset contains no data rows"));
    }

    Ok(records)
}

/// Resolved indices of the five feature columns.
struct FeatureColumns {
    hours_studied: usize,
    previous_scores: usize,
    sleep_hours: usize,
    sample_papers: usize,
    extracurricular: usize,
}

impl FeatureColumns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        Ok(Self {
            hours_studied: find_column(headers, HOURS_STUDIED)?,
            previous_scores: find_column(headers, PREVIOUS_SCORES)?,
            sleep_hours: find_column(headers, SLEEP_HOURS)?,
            sample_papers: find_column(headers, SAMPLE_PAPERS)?,
            extracurricular: find_column(headers, EXTRACURRICULAR)?,
        })
    }

    fn parse_record(&self, record: &csv::StringRecord, line: usize) -> Result<RawRecord> {
        let raw = RawRecord {
            hours_studied: parse_cell(record, self.hours_studied, HOURS_STUDIED, line)?,
            previous_scores: parse_cell(record, self.previous_scores, PREVIOUS_SCORES, line)?,
            sleep_hours: parse_cell(record, self.sleep_hours, SLEEP_HOURS, line)?,
            sample_papers: parse_cell(record, self.sample_papers, SAMPLE_PAPERS, line)?,
            extracurricular: cell(record, self.extracurricular, EXTRACURRICULAR, line)?
                .to_string(),
        };
        raw.validate()?;
        Ok(raw)
    }
}

fn open_dataset(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(path).map_err(csv_error)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| RendimientoError::schema(name, "missing column in dataset"))
}

fn cell<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    field: &str,
    line: usize,
) -> Result<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| RendimientoError::schema(field, format!("missing value at line {line}")))
}

fn parse_cell<T>(record: &csv::StringRecord, idx: usize, field: &str, line: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = cell(record, idx, field, line)?;
    value.trim().parse::<T>().map_err(|e| {
        RendimientoError::schema(field, format!("unparseable value '{value}' at line {line}: {e}"))
    })
}

fn csv_error(err: csv::Error) -> RendimientoError {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => RendimientoError::Io(io),
        other => RendimientoError::schema("dataset", format!("{other:?}")),
    }
}
