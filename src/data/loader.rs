use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{CellValue, Dataset, Record};
use super::schema::Source;

// ---------------------------------------------------------------------------
// LoadError – why a single source failed to load
// ---------------------------------------------------------------------------

/// Typed per-source load failure. A failed source degrades to "absent" at the
/// pipeline boundary; the error itself is kept for logs and the status bar.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },
    #[error("{file} row {row}: unparseable timestamp '{value}'")]
    BadTimestamp {
        file: String,
        row: usize,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Timestamp formats accepted in exports, tried in order.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    // Bare dates map to midnight.
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)
}

fn guess_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(s.to_string())
}

/// Parse one source's CSV from any reader. Checks the declared schema
/// (timestamp plus the source's required value columns) against the header
/// before touching any rows.
pub fn parse_source<R: Read>(reader: R, source: Source) -> Result<Dataset, LoadError> {
    let file = source.file_name();
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| LoadError::Csv {
            file: file.to_string(),
            source: e,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let ts_idx = headers
        .iter()
        .position(|h| h == "timestamp")
        .ok_or_else(|| LoadError::MissingColumn {
            file: file.to_string(),
            column: "timestamp".to_string(),
        })?;

    for required in source.required_columns() {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn {
                file: file.to_string(),
                column: (*required).to_string(),
            });
        }
    }

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != ts_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in csv_reader.records().enumerate() {
        let row = result.map_err(|e| LoadError::Csv {
            file: file.to_string(),
            source: e,
        })?;

        let raw_ts = row.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::BadTimestamp {
            file: file.to_string(),
            row: row_no,
            value: raw_ts.to_string(),
        })?;

        let mut values = BTreeMap::new();
        for (col_idx, cell) in row.iter().enumerate() {
            if col_idx == ts_idx {
                continue;
            }
            if let Some(name) = headers.get(col_idx) {
                values.insert(name.clone(), guess_cell(cell));
            }
        }

        records.push(Record { timestamp, values });
    }

    Ok(Dataset {
        source,
        columns,
        records,
    })
}

/// Load one source from the data directory.
pub fn load_source(dir: &Path, source: Source) -> Result<Dataset, LoadError> {
    let path = dir.join(source.file_name());
    let file = std::fs::File::open(&path).map_err(|e| LoadError::Io {
        file: source.file_name().to_string(),
        source: e,
    })?;
    parse_source(file, source)
}

// ---------------------------------------------------------------------------
// Session – one load of all twelve sources
// ---------------------------------------------------------------------------

/// The immutable per-session load result: each source either parsed into a
/// `Dataset` or failed with a `LoadError`. Built once per data directory and
/// never mutated; every pipeline run reads from it.
pub struct Session {
    pub data_dir: PathBuf,
    slots: BTreeMap<Source, Result<Dataset, LoadError>>,
}

impl Session {
    /// Load every known source from `dir`. A failed source never aborts the
    /// session; it is recorded and logged, and the dashboards that need it
    /// simply render without it.
    pub fn load(dir: &Path) -> Session {
        let mut slots = BTreeMap::new();
        for source in Source::ALL {
            match load_source(dir, source) {
                Ok(ds) => {
                    log::info!("{}: {} rows", source.file_name(), ds.len());
                    slots.insert(source, Ok(ds));
                }
                Err(e) => {
                    log::warn!("{source} unavailable: {e}");
                    slots.insert(source, Err(e));
                }
            }
        }
        Session {
            data_dir: dir.to_path_buf(),
            slots,
        }
    }

    /// The boundary where typed load errors collapse to "absent": everything
    /// downstream of the loader sees `Option<&Dataset>`.
    pub fn get(&self, source: Source) -> Option<&Dataset> {
        match self.slots.get(&source) {
            Some(Ok(ds)) => Some(ds),
            _ => None,
        }
    }

    /// All sources in declaration order, present or not. Feeds the range
    /// computer so every loaded dataset contributes to the global bounds.
    pub fn datasets(&self) -> impl Iterator<Item = Option<&Dataset>> + '_ {
        Source::ALL.into_iter().map(|s| self.get(s))
    }

    pub fn present_count(&self) -> usize {
        self.datasets().flatten().count()
    }

    /// Load failures, for the status bar and diagnostics.
    pub fn failures(&self) -> Vec<(Source, &LoadError)> {
        Source::ALL
            .into_iter()
            .filter_map(|s| match self.slots.get(&s) {
                Some(Err(e)) => Some((s, e)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_schema() {
        let csv = "timestamp,bpm\n2024-01-01 08:00:00,62\n2024-01-02 08:00:00,71.5\n";
        let ds = parse_source(csv.as_bytes(), Source::HeartRate).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.columns, vec!["bpm".to_string()]);
        assert_eq!(ds.records[0].f64("bpm"), Some(62.0));
        assert_eq!(ds.records[1].f64("bpm"), Some(71.5));
    }

    #[test]
    fn accepts_bare_dates_and_t_separator() {
        let csv = "timestamp,calories\n2024-01-01,1800\n2024-01-02T09:30:00,2100\n";
        let ds = parse_source(csv.as_bytes(), Source::Calories).unwrap();
        assert_eq!(ds.records[0].timestamp.time().to_string(), "00:00:00");
        assert_eq!(
            ds.records[1].date(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn missing_required_column_is_typed() {
        let csv = "timestamp,heart\n2024-01-01,62\n";
        let err = parse_source(csv.as_bytes(), Source::HeartRate).unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "bpm"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_timestamp_column_is_typed() {
        let csv = "date,bpm\n2024-01-01,62\n";
        let err = parse_source(csv.as_bytes(), Source::HeartRate).unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "timestamp"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_reports_row() {
        let csv = "timestamp,bpm\n2024-01-01 08:00:00,62\nnot-a-date,70\n";
        let err = parse_source(csv.as_bytes(), Source::HeartRate).unwrap_err();
        match err {
            LoadError::BadTimestamp { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected BadTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn session_degrades_missing_sources_to_absent() {
        let dir = std::env::temp_dir().join("watchboard_session_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("heart_rate.csv"),
            "timestamp,bpm\n2024-01-01 08:00:00,62\n",
        )
        .unwrap();

        let session = Session::load(&dir);
        assert!(session.get(Source::HeartRate).is_some());
        assert!(session.get(Source::Sleep).is_none());
        assert_eq!(session.present_count(), 1);
        assert_eq!(session.failures().len(), Source::ALL.len() - 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
