use std::fmt;

// ---------------------------------------------------------------------------
// Source – the fixed set of telemetry exports
// ---------------------------------------------------------------------------

/// The twelve known telemetry sources, one CSV file each.
///
/// Each source declares its file name and the value columns the dashboards
/// read from it; the loader checks the declared columns once at load time so
/// a malformed export fails with a typed error instead of a missing-column
/// lookup somewhere in the UI. Every source additionally requires a
/// `timestamp` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Calories,
    Activity,
    HeartRate,
    Sleep,
    Stress,
    Energy,
    Spo2,
    BloodPressure,
    Ecg,
    Falls,
    BodyComp,
    Antioxidants,
}

impl Source {
    pub const ALL: [Source; 12] = [
        Source::Calories,
        Source::Activity,
        Source::HeartRate,
        Source::Sleep,
        Source::Stress,
        Source::Energy,
        Source::Spo2,
        Source::BloodPressure,
        Source::Ecg,
        Source::Falls,
        Source::BodyComp,
        Source::Antioxidants,
    ];

    /// File name of the export inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Source::Calories => "calories.csv",
            Source::Activity => "activity.csv",
            Source::HeartRate => "heart_rate.csv",
            Source::Sleep => "sleep.csv",
            Source::Stress => "stress.csv",
            Source::Energy => "energy.csv",
            Source::Spo2 => "spo2.csv",
            Source::BloodPressure => "bp.csv",
            Source::Ecg => "ecg.csv",
            Source::Falls => "falls.csv",
            Source::BodyComp => "body_comp.csv",
            Source::Antioxidants => "antioxidants.csv",
        }
    }

    /// Value columns the dashboards read from this source. `timestamp` is
    /// implied for all sources. Antioxidants is loaded for its date range
    /// only, so nothing beyond the timestamp is required.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Source::Calories => &["calories"],
            Source::Activity => &["active_minutes"],
            Source::HeartRate => &["bpm"],
            Source::Sleep => &["deep", "light", "rem"],
            Source::Stress => &["stress_score"],
            Source::Energy => &["energy_score"],
            Source::Spo2 => &["oxygen_percent"],
            Source::BloodPressure => &["systolic", "diastolic"],
            Source::Ecg => &["abnormal_flag"],
            Source::Falls => &["fall_detected"],
            Source::BodyComp => &["body_fat", "muscle_mass"],
            Source::Antioxidants => &[],
        }
    }

    /// Human-readable name for labels and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Source::Calories => "Calories",
            Source::Activity => "Activity",
            Source::HeartRate => "Heart Rate",
            Source::Sleep => "Sleep",
            Source::Stress => "Stress",
            Source::Energy => "Energy",
            Source::Spo2 => "SpO2",
            Source::BloodPressure => "Blood Pressure",
            Source::Ecg => "ECG",
            Source::Falls => "Falls",
            Source::BodyComp => "Body Composition",
            Source::Antioxidants => "Antioxidants",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sources_have_distinct_files() {
        let mut names: Vec<_> = Source::ALL.iter().map(|s| s.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Source::ALL.len());
    }

    #[test]
    fn antioxidants_needs_only_timestamp() {
        assert!(Source::Antioxidants.required_columns().is_empty());
    }
}
