use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::schema::Source;

// ---------------------------------------------------------------------------
// CellValue – a single value cell in a telemetry column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what CSV exports actually carry:
/// numeric readings, flag columns, the occasional free-text note, and blanks.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Float(f64),
    Integer(i64),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Float(v) => write!(f, "{v:.1}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "–"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for plotting and metrics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of a telemetry CSV
// ---------------------------------------------------------------------------

/// A single reading: the parsed timestamp plus the remaining columns.
///
/// The timestamp is kept apart from the value columns because it is the one
/// column every source guarantees; everything else is per-source.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub values: BTreeMap<String, CellValue>,
}

impl Record {
    /// Calendar date of this reading (time of day discarded).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Numeric value of a named column, if present and numeric.
    pub fn f64(&self, column: &str) -> Option<f64> {
        self.values.get(column).and_then(CellValue::as_f64)
    }
}

// ---------------------------------------------------------------------------
// Dataset – all loaded rows of one telemetry source
// ---------------------------------------------------------------------------

/// The parsed rows of one source, in file order. Immutable once loaded;
/// date filtering produces a new, possibly smaller `Dataset`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: Source,
    /// Ordered value column names (excludes `timestamp`).
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest timestamp, `None` when the dataset is empty.
    pub fn timestamp_extent(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.iter().map(|r| r.timestamp).min()?;
        let last = self.records.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }

    /// Timestamped numeric series for a column, skipping non-numeric cells.
    pub fn series(&self, column: &str) -> Vec<(NaiveDateTime, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.f64(column).map(|v| (r.timestamp, v)))
            .collect()
    }

    /// Most recent numeric value of a column. Exports are written in time
    /// order, so "most recent" is the last numeric cell in file order.
    pub fn last_f64(&self, column: &str) -> Option<f64> {
        self.records.iter().rev().find_map(|r| r.f64(column))
    }

    /// Minimum numeric value of a column across all records.
    pub fn min_f64(&self, column: &str) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|r| r.f64(column))
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
    }

    /// Sum of a column across all records (0.0 when no numeric cells).
    pub fn sum_f64(&self, column: &str) -> f64 {
        self.records.iter().filter_map(|r| r.f64(column)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str, col: &str, value: CellValue) -> Record {
        let timestamp = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        let mut values = BTreeMap::new();
        values.insert(col.to_string(), value);
        Record { timestamp, values }
    }

    #[test]
    fn extent_spans_min_and_max() {
        let ds = Dataset {
            source: Source::HeartRate,
            columns: vec!["bpm".into()],
            records: vec![
                record("2024-01-05 08:00:00", "bpm", CellValue::Integer(70)),
                record("2024-01-02 09:00:00", "bpm", CellValue::Integer(64)),
                record("2024-01-09 10:00:00", "bpm", CellValue::Integer(81)),
            ],
        };
        let (min, max) = ds.timestamp_extent().unwrap();
        assert_eq!(min.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(max.date(), NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn series_skips_non_numeric_cells() {
        let ds = Dataset {
            source: Source::HeartRate,
            columns: vec!["bpm".into()],
            records: vec![
                record("2024-01-01 00:00:00", "bpm", CellValue::Integer(60)),
                record("2024-01-02 00:00:00", "bpm", CellValue::Null),
                record("2024-01-03 00:00:00", "bpm", CellValue::Float(72.5)),
            ],
        };
        let series = ds.series("bpm");
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].1, 72.5);
        assert_eq!(ds.last_f64("bpm"), Some(72.5));
        assert_eq!(ds.min_f64("bpm"), Some(60.0));
    }
}
