use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::data::loader::Session;
use crate::data::model::Dataset;
use crate::data::range::{compute_bounds, filter_by_date, validate, DateWindow, GlobalBounds, RangeCheck};
use crate::data::schema::Source;

// ---------------------------------------------------------------------------
// Role – who is looking at the dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Athlete,
    Coach,
    Trainer,
    TeamDoctor,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Athlete, Role::Coach, Role::Trainer, Role::TeamDoctor];

    pub fn label(self) -> &'static str {
        match self {
            Role::Athlete => "Athlete",
            Role::Coach => "Coach",
            Role::Trainer => "Trainer",
            Role::TeamDoctor => "Team Doctor",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Everything derived (bounds, validation outcome, filtered slices) is
/// recomputed from scratch by `rerun_pipeline` whenever an input changes:
/// single-threaded, no caching subtleties, each run independent.
pub struct AppState {
    /// One immutable load of all sources (None until a folder is opened).
    pub session: Option<Session>,

    pub role: Role,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Derived: global bounds across the loaded sources.
    pub bounds: Option<GlobalBounds>,
    /// Derived: outcome of validating the current window.
    pub check: RangeCheck,
    /// Derived: per-source filtered slice; only populated when `check` is Ok.
    filtered: BTreeMap<Source, Option<Dataset>>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            session: None,
            role: Role::Athlete,
            start_date: today,
            end_date: today,
            bounds: None,
            check: RangeCheck::NoData,
            filtered: BTreeMap::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load all sources from a data directory and reset the window to the
    /// full available range.
    pub fn load_dir(&mut self, dir: &Path) {
        let session = Session::load(dir);
        let present = session.present_count();
        log::info!(
            "loaded {present}/{} sources from {}",
            Source::ALL.len(),
            dir.display()
        );
        if present == 0 {
            self.status_message = Some(format!("No readable sources in {}", dir.display()));
        } else {
            self.status_message = None;
        }

        self.bounds = compute_bounds(session.datasets());
        if let Some(bounds) = self.bounds {
            self.start_date = bounds.min;
            self.end_date = bounds.max;
        }
        self.session = Some(session);
        self.rerun_pipeline();
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }

    /// Re-execute bounds → validate → filter for the current inputs. Called
    /// after every input change; cheap enough to never be worth caching.
    pub fn rerun_pipeline(&mut self) {
        self.filtered.clear();

        let Some(session) = &self.session else {
            self.bounds = None;
            self.check = RangeCheck::NoData;
            return;
        };

        self.bounds = compute_bounds(session.datasets());
        self.check = validate(self.window(), self.bounds);
        if self.check != RangeCheck::Ok {
            return;
        }

        let window = self.window();
        for source in Source::ALL {
            self.filtered
                .insert(source, filter_by_date(session.get(source), window));
        }
    }

    /// The filtered slice of one source for the current window; absent when
    /// the source failed to load or validation halted the pipeline.
    pub fn filtered(&self, source: Source) -> Option<&Dataset> {
        self.filtered.get(&source).and_then(|d| d.as_ref())
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn set_window(&mut self, start: NaiveDate, end: NaiveDate) {
        if start != self.start_date || end != self.end_date {
            self.start_date = start;
            self.end_date = end;
            self.rerun_pipeline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_dir(files: &[(&str, &str)]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "watchboard_state_test_{}",
            files.first().map(|(n, _)| *n).unwrap_or("empty")
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn pipeline_filters_all_present_sources_with_one_window() {
        let dir = session_dir(&[
            (
                "heart_rate.csv",
                "timestamp,bpm\n2024-01-01 08:00:00,60\n2024-01-15 08:00:00,70\n2024-01-31 08:00:00,80\n",
            ),
            (
                "stress.csv",
                "timestamp,stress_score\n2024-01-10 12:00:00,40\n2024-01-25 12:00:00,55\n",
            ),
        ]);

        let mut state = AppState::default();
        state.load_dir(&dir);

        // Window defaults to the full bounds.
        assert_eq!(state.check, RangeCheck::Ok);
        assert_eq!(state.filtered(Source::HeartRate).unwrap().len(), 3);

        state.set_window(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        );
        assert_eq!(state.check, RangeCheck::Ok);
        assert_eq!(state.filtered(Source::HeartRate).unwrap().len(), 1);
        assert_eq!(state.filtered(Source::Stress).unwrap().len(), 1);
        // Absent source stays absent after filtering.
        assert!(state.filtered(Source::Sleep).is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn validation_failure_halts_before_filtering() {
        let dir = session_dir(&[(
            "calories.csv",
            "timestamp,calories\n2024-01-05 09:00:00,1900\n",
        )]);

        let mut state = AppState::default();
        state.load_dir(&dir);
        state.set_window(
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        assert_eq!(state.check, RangeCheck::InvertedRange);
        assert!(state.filtered(Source::Calories).is_none());

        state.set_window(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
        );
        assert_eq!(state.check, RangeCheck::OutsideBounds);
        assert!(state.filtered(Source::Calories).is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_state_reports_no_data() {
        let state = AppState::default();
        assert_eq!(state.check, RangeCheck::NoData);
        assert!(state.filtered(Source::HeartRate).is_none());
    }
}
