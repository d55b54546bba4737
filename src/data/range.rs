use chrono::NaiveDate;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// GlobalBounds / DateWindow
// ---------------------------------------------------------------------------

/// Earliest and latest calendar dates across every loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// The user-requested filter window. `start <= end` is not enforced here;
/// `validate` classifies an inverted window instead of panicking on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ---------------------------------------------------------------------------
// Range computer
// ---------------------------------------------------------------------------

/// Overall date bounds across all present, non-empty datasets, truncated to
/// calendar-date granularity. `None` when no dataset is present or every
/// present one is empty; the caller treats that as "no data available".
pub fn compute_bounds<'a, I>(datasets: I) -> Option<GlobalBounds>
where
    I: IntoIterator<Item = Option<&'a Dataset>>,
{
    let mut bounds: Option<GlobalBounds> = None;
    for ds in datasets.into_iter().flatten() {
        let Some((first, last)) = ds.timestamp_extent() else {
            continue;
        };
        let (min, max) = (first.date(), last.date());
        bounds = Some(match bounds {
            None => GlobalBounds { min, max },
            Some(b) => GlobalBounds {
                min: b.min.min(min),
                max: b.max.max(max),
            },
        });
    }
    bounds
}

// ---------------------------------------------------------------------------
// Range validator
// ---------------------------------------------------------------------------

/// Outcome of checking a window against the available bounds. Anything but
/// `Ok` halts the current pass before filtering; the user recovers by
/// changing the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCheck {
    Ok,
    /// Start date after end date.
    InvertedRange,
    /// Zero overlap between the window and the available bounds.
    OutsideBounds,
    /// No dataset loaded at all, or every loaded one is empty.
    NoData,
}

/// Classify a requested window. Checked in order: no data, inverted window,
/// zero overlap. A window that only partially overlaps the bounds is `Ok` —
/// it still yields a non-empty slice, just a smaller one.
pub fn validate(window: DateWindow, bounds: Option<GlobalBounds>) -> RangeCheck {
    let Some(bounds) = bounds else {
        return RangeCheck::NoData;
    };
    if window.start > window.end {
        return RangeCheck::InvertedRange;
    }
    if window.end < bounds.min || window.start > bounds.max {
        return RangeCheck::OutsideBounds;
    }
    RangeCheck::Ok
}

// ---------------------------------------------------------------------------
// Date filter
// ---------------------------------------------------------------------------

/// Restrict a dataset to records whose calendar date falls inside the window
/// (inclusive on both ends), preserving record order. Absent propagates to
/// absent. Every source is filtered with the same validated window so all
/// role views see a temporally consistent slice.
pub fn filter_by_date(dataset: Option<&Dataset>, window: DateWindow) -> Option<Dataset> {
    let ds = dataset?;
    let records = ds
        .records
        .iter()
        .filter(|r| window.contains(r.date()))
        .cloned()
        .collect();
    Some(Dataset {
        source: ds.source,
        columns: ds.columns.clone(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::data::model::{CellValue, Record};
    use crate::data::schema::Source;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(source: Source, timestamps: &[&str]) -> Dataset {
        let records = timestamps
            .iter()
            .enumerate()
            .map(|(i, ts)| {
                let timestamp =
                    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
                let mut values = BTreeMap::new();
                values.insert("value".to_string(), CellValue::Integer(i as i64));
                Record { timestamp, values }
            })
            .collect();
        Dataset {
            source,
            columns: vec!["value".to_string()],
            records,
        }
    }

    #[test]
    fn bounds_cover_every_dataset_extent() {
        let heart = dataset(
            Source::HeartRate,
            &["2024-01-03 08:00:00", "2024-01-20 23:59:00"],
        );
        let sleep = dataset(
            Source::Sleep,
            &["2024-01-01 22:00:00", "2024-01-15 06:00:00"],
        );
        let bounds = compute_bounds([Some(&heart), None, Some(&sleep)]).unwrap();
        assert_eq!(bounds.min, date(2024, 1, 1));
        assert_eq!(bounds.max, date(2024, 1, 20));

        // Tight bound: no dataset's extent escapes the computed bounds.
        for ds in [&heart, &sleep] {
            let (lo, hi) = ds.timestamp_extent().unwrap();
            assert!(bounds.min <= lo.date());
            assert!(bounds.max >= hi.date());
        }
    }

    #[test]
    fn bounds_truncate_time_of_day() {
        let ds = dataset(Source::Stress, &["2024-03-05 23:45:00"]);
        let bounds = compute_bounds([Some(&ds)]).unwrap();
        assert_eq!(bounds.min, date(2024, 3, 5));
        assert_eq!(bounds.max, date(2024, 3, 5));
    }

    #[test]
    fn no_sources_means_no_bounds() {
        assert_eq!(compute_bounds(std::iter::empty::<Option<&Dataset>>()), None);
        let all_absent: [Option<&Dataset>; 2] = [None, None];
        assert_eq!(compute_bounds(all_absent), None);

        let empty = dataset(Source::Falls, &[]);
        assert_eq!(compute_bounds([Some(&empty), None]), None);
    }

    #[test]
    fn empty_datasets_do_not_shrink_bounds() {
        let empty = dataset(Source::Falls, &[]);
        let ds = dataset(Source::Energy, &["2024-02-10 12:00:00"]);
        let bounds = compute_bounds([Some(&empty), Some(&ds)]).unwrap();
        assert_eq!(bounds.min, date(2024, 2, 10));
    }

    #[test]
    fn validate_without_bounds_is_no_data() {
        let window = DateWindow::new(date(2024, 1, 10), date(2024, 1, 20));
        assert_eq!(validate(window, None), RangeCheck::NoData);
        // Even an inverted window classifies as NoData first; there is
        // nothing to filter either way.
        let inverted = DateWindow::new(date(2024, 1, 20), date(2024, 1, 10));
        assert_eq!(validate(inverted, None), RangeCheck::NoData);
    }

    #[test]
    fn inverted_window_beats_outside_bounds() {
        let bounds = Some(GlobalBounds {
            min: date(2024, 1, 1),
            max: date(2024, 1, 31),
        });
        // Both inverted and entirely outside the bounds.
        let window = DateWindow::new(date(2024, 3, 10), date(2024, 3, 1));
        assert_eq!(validate(window, bounds), RangeCheck::InvertedRange);
    }

    #[test]
    fn zero_overlap_is_rejected_partial_overlap_is_not() {
        let bounds = Some(GlobalBounds {
            min: date(2024, 1, 1),
            max: date(2024, 1, 31),
        });

        let after = DateWindow::new(date(2024, 2, 1), date(2024, 2, 5));
        assert_eq!(validate(after, bounds), RangeCheck::OutsideBounds);

        let before = DateWindow::new(date(2023, 12, 1), date(2023, 12, 31));
        assert_eq!(validate(before, bounds), RangeCheck::OutsideBounds);

        // Extends past the data on both sides but overlaps: accepted.
        let straddling = DateWindow::new(date(2023, 12, 15), date(2024, 2, 15));
        assert_eq!(validate(straddling, bounds), RangeCheck::Ok);

        // One day of overlap at the edge is still enough.
        let edge = DateWindow::new(date(2024, 1, 31), date(2024, 2, 28));
        assert_eq!(validate(edge, bounds), RangeCheck::Ok);
    }

    #[test]
    fn fully_contained_window_is_ok() {
        let bounds = Some(GlobalBounds {
            min: date(2024, 1, 1),
            max: date(2024, 1, 31),
        });
        let window = DateWindow::new(date(2024, 1, 10), date(2024, 1, 20));
        assert_eq!(validate(window, bounds), RangeCheck::Ok);
    }

    #[test]
    fn filter_keeps_inclusive_window_in_order() {
        let ds = dataset(
            Source::Calories,
            &[
                "2024-01-09 23:59:00",
                "2024-01-10 00:00:00",
                "2024-01-15 12:00:00",
                "2024-01-20 23:00:00",
                "2024-01-21 00:01:00",
            ],
        );
        let window = DateWindow::new(date(2024, 1, 10), date(2024, 1, 20));
        let filtered = filter_by_date(Some(&ds), window).unwrap();
        let dates: Vec<NaiveDate> = filtered.records.iter().map(|r| r.date()).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 10), date(2024, 1, 15), date(2024, 1, 20)]
        );
        // Input untouched.
        assert_eq!(ds.len(), 5);
    }

    #[test]
    fn filter_propagates_absence() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        assert!(filter_by_date(None, window).is_none());
    }

    #[test]
    fn filter_is_idempotent() {
        let ds = dataset(
            Source::Spo2,
            &[
                "2024-01-05 01:00:00",
                "2024-01-12 02:00:00",
                "2024-01-29 03:00:00",
            ],
        );
        let window = DateWindow::new(date(2024, 1, 6), date(2024, 1, 28));
        let once = filter_by_date(Some(&ds), window).unwrap();
        let twice = filter_by_date(Some(&once), window).unwrap();
        let dates =
            |d: &Dataset| d.records.iter().map(|r| r.timestamp).collect::<Vec<_>>();
        assert_eq!(dates(&once), dates(&twice));
    }

    #[test]
    fn narrower_window_yields_subsequence() {
        let ds = dataset(
            Source::Activity,
            &[
                "2024-01-02 10:00:00",
                "2024-01-08 10:00:00",
                "2024-01-14 10:00:00",
                "2024-01-22 10:00:00",
                "2024-01-28 10:00:00",
            ],
        );
        let wide = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        let narrow = DateWindow::new(date(2024, 1, 8), date(2024, 1, 22));

        let wide_ts: Vec<_> = filter_by_date(Some(&ds), wide)
            .unwrap()
            .records
            .iter()
            .map(|r| r.timestamp)
            .collect();
        let narrow_ts: Vec<_> = filter_by_date(Some(&ds), narrow)
            .unwrap()
            .records
            .iter()
            .map(|r| r.timestamp)
            .collect();

        // Every narrow record appears in the wide slice, in the same order.
        let mut wide_iter = wide_ts.iter();
        for ts in &narrow_ts {
            assert!(wide_iter.any(|w| w == ts));
        }
    }
}
