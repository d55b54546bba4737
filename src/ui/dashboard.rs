use chrono::NaiveDateTime;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Dataset;
use crate::data::range::RangeCheck;
use crate::data::schema::Source;
use crate::state::{AppState, Role};
use crate::theme::role_color;

use super::plot::{labelled_bar_chart, line_chart, multi_line_chart};

// ---------------------------------------------------------------------------
// Central panel entry point
// ---------------------------------------------------------------------------

/// Render the central panel: either the current role's dashboard, or the
/// blocking message for whatever halted the pipeline.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    match state.check {
        RangeCheck::NoData => {
            blocking_message(
                ui,
                "No valid data found",
                "Open a data folder containing telemetry CSV exports (File → Open data folder…).",
            );
            return;
        }
        RangeCheck::InvertedRange => {
            blocking_message(
                ui,
                "Date Range Error",
                "Start date cannot be after end date. Adjust the date pickers in the side panel.",
            );
            return;
        }
        RangeCheck::OutsideBounds => {
            let detail = match state.bounds {
                Some(b) => format!(
                    "The selected date range is outside the available dataset.\n\nAvailable data: {} → {}\n\nAdjust the date pickers in the side panel.",
                    b.min, b.max
                ),
                None => "The selected date range is outside the available dataset.".to_string(),
            };
            blocking_message(ui, "Date Range Error", &detail);
            return;
        }
        RangeCheck::Ok => {}
    }

    ui.heading(RichText::new(format!("{} Dashboard", state.role.label())).color(role_color(state.role)));
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.role {
            Role::Athlete => athlete_view(ui, state),
            Role::Coach => coach_view(ui, state),
            Role::Trainer => trainer_view(ui, state),
            Role::TeamDoctor => doctor_view(ui, state),
        });
}

fn blocking_message(ui: &mut Ui, title: &str, detail: &str) {
    ui.add_space(32.0);
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(0x3a, 0x20, 0x20))
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(title).color(Color32::from_rgb(0xff, 0x4d, 0x4d)));
            ui.label(detail);
        });
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// A row of big numbers, one per metric.
fn metric_row(ui: &mut Ui, metrics: &[(&str, String)]) {
    ui.horizontal(|ui: &mut Ui| {
        for (label, value) in metrics {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(*label).small().weak());
                    ui.label(RichText::new(value).size(24.0).strong());
                });
            });
        }
    });
    ui.add_space(8.0);
}

fn warning_banner(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .color(Color32::from_rgb(0xff, 0xb3, 0x47))
            .strong(),
    );
    ui.add_space(4.0);
}

fn alert_banner(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(Color32::from_rgb(0xff, 0x4d, 0x4d)).strong());
    ui.add_space(4.0);
}

/// Last numeric value of a column formatted as a whole number, "0" when the
/// source is absent or has no numeric cells.
fn last_metric(ds: Option<&Dataset>, column: &str) -> String {
    ds.and_then(|d| d.last_f64(column))
        .map(|v| format!("{}", v.round() as i64))
        .unwrap_or_else(|| "0".to_string())
}

fn single_chart(ui: &mut Ui, state: &AppState, source: Source, column: &str, title: &str, id: &str) {
    match state.filtered(source) {
        Some(ds) => line_chart(ui, id, title, &ds.series(column), role_color(state.role)),
        None => absent_note(ui, source),
    }
}

fn absent_note(ui: &mut Ui, source: Source) {
    ui.label(RichText::new(format!("{source} data unavailable")).weak().italics());
    ui.add_space(8.0);
}

/// Per-record sleep quality: deep + light + rem minutes.
fn sleep_quality_series(sleep: &Dataset) -> Vec<(NaiveDateTime, f64)> {
    sleep
        .records
        .iter()
        .filter_map(|r| {
            let total = r.f64("deep")? + r.f64("light")? + r.f64("rem")?;
            Some((r.timestamp, total))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Athlete
// ---------------------------------------------------------------------------

fn athlete_view(ui: &mut Ui, state: &AppState) {
    metric_row(
        ui,
        &[
            ("Energy Score", last_metric(state.filtered(Source::Energy), "energy_score")),
            ("Calories", last_metric(state.filtered(Source::Calories), "calories")),
            (
                "Active Minutes",
                last_metric(state.filtered(Source::Activity), "active_minutes"),
            ),
        ],
    );

    if let Some(sleep) = state.filtered(Source::Sleep) {
        line_chart(
            ui,
            "athlete_sleep",
            "Sleep Quality",
            &sleep_quality_series(sleep),
            role_color(state.role),
        );
    }

    if state.filtered(Source::Stress).is_some() {
        single_chart(ui, state, Source::Stress, "stress_score", "Stress Trend", "athlete_stress");
    }
}

// ---------------------------------------------------------------------------
// Coach
// ---------------------------------------------------------------------------

fn coach_view(ui: &mut Ui, state: &AppState) {
    if let Some(energy) = state.filtered(Source::Energy) {
        if energy.last_f64("energy_score").is_some_and(|v| v < 65.0) {
            warning_banner(ui, "⚠ Athlete may be under-recovered.");
        }
    }

    single_chart(ui, state, Source::Calories, "calories", "Calories Burned", "coach_calories");
    single_chart(
        ui,
        state,
        Source::Activity,
        "active_minutes",
        "Active Minutes",
        "coach_activity",
    );
    single_chart(ui, state, Source::HeartRate, "bpm", "Heart Rate", "coach_heart");
    single_chart(ui, state, Source::Energy, "energy_score", "Readiness Score", "coach_energy");
}

// ---------------------------------------------------------------------------
// Trainer
// ---------------------------------------------------------------------------

/// Heart-rate zone for one reading. Right-closed bins:
/// (0,100] Z1, (100,120] Z2, (120,140] Z3, (140,160] Z4, (160,220] Z5.
/// Readings outside (0,220] fall in no zone.
pub fn zone_for(bpm: f64) -> Option<usize> {
    const EDGES: [f64; 6] = [0.0, 100.0, 120.0, 140.0, 160.0, 220.0];
    (0..5).find(|&z| bpm > EDGES[z] && bpm <= EDGES[z + 1])
}

fn zone_counts(heart: &Dataset) -> [f64; 5] {
    let mut counts = [0.0; 5];
    for (_, bpm) in heart.series("bpm") {
        if let Some(z) = zone_for(bpm) {
            counts[z] += 1.0;
        }
    }
    counts
}

fn trainer_view(ui: &mut Ui, state: &AppState) {
    if let Some(heart) = state.filtered(Source::HeartRate) {
        labelled_bar_chart(
            ui,
            "trainer_zones",
            "Heart Rate Zones",
            &["Z1", "Z2", "Z3", "Z4", "Z5"],
            &zone_counts(heart),
            role_color(state.role),
        );
    }

    if state.filtered(Source::BodyComp).is_some() {
        single_chart(ui, state, Source::BodyComp, "body_fat", "Body Fat %", "trainer_fat");
        single_chart(
            ui,
            state,
            Source::BodyComp,
            "muscle_mass",
            "Muscle Mass",
            "trainer_muscle",
        );
    }

    if let Some(sleep) = state.filtered(Source::Sleep) {
        multi_line_chart(
            ui,
            "trainer_sleep",
            "Sleep Stages",
            &[
                ("deep", sleep.series("deep")),
                ("light", sleep.series("light")),
                ("rem", sleep.series("rem")),
            ],
        );
    }
}

// ---------------------------------------------------------------------------
// Team Doctor
// ---------------------------------------------------------------------------

fn doctor_view(ui: &mut Ui, state: &AppState) {
    if let Some(spo2) = state.filtered(Source::Spo2) {
        if spo2.min_f64("oxygen_percent").is_some_and(|v| v < 92.0) {
            alert_banner(ui, "⚠ Low SpO₂ detected.");
        }
    }

    if let Some(ecg) = state.filtered(Source::Ecg) {
        metric_row(
            ui,
            &[(
                "ECG Abnormal Events",
                format!("{}", ecg.sum_f64("abnormal_flag").round() as i64),
            )],
        );
    }

    single_chart(ui, state, Source::HeartRate, "bpm", "Heart Rate", "doctor_heart");
    single_chart(ui, state, Source::Spo2, "oxygen_percent", "Blood Oxygen", "doctor_spo2");

    if let Some(bp) = state.filtered(Source::BloodPressure) {
        multi_line_chart(
            ui,
            "doctor_bp",
            "Blood Pressure",
            &[
                ("systolic", bp.series("systolic")),
                ("diastolic", bp.series("diastolic")),
            ],
        );
    }

    if let Some(falls) = state.filtered(Source::Falls) {
        fall_events_table(ui, falls);
    }
}

/// Table of detected fall events (`fall_detected == 1`).
fn fall_events_table(ui: &mut Ui, falls: &Dataset) {
    ui.strong("Fall Events");
    let events: Vec<_> = falls
        .records
        .iter()
        .filter(|r| r.f64("fall_detected") == Some(1.0))
        .collect();

    if events.is_empty() {
        ui.label(RichText::new("No falls detected in the selected range.").weak());
        return;
    }

    egui::Grid::new("fall_events")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("timestamp");
            for col in &falls.columns {
                ui.strong(col);
            }
            ui.end_row();

            for record in events {
                ui.label(record.timestamp.format("%Y-%m-%d %H:%M").to_string());
                for col in &falls.columns {
                    let cell = record
                        .values
                        .get(col)
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    ui.label(cell);
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::zone_for;

    #[test]
    fn zone_bins_are_right_closed() {
        assert_eq!(zone_for(100.0), Some(0));
        assert_eq!(zone_for(100.5), Some(1));
        assert_eq!(zone_for(120.0), Some(1));
        assert_eq!(zone_for(155.0), Some(3));
        assert_eq!(zone_for(220.0), Some(4));
        assert_eq!(zone_for(0.0), None);
        assert_eq!(zone_for(250.0), None);
    }
}
