use chrono::NaiveDateTime;
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::theme::generate_palette;

const CHART_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// Time axis helpers
// ---------------------------------------------------------------------------

/// Plot x coordinate for a timestamp: seconds since the Unix epoch.
pub fn timestamp_x(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

fn format_date(x: f64) -> String {
    chrono::DateTime::from_timestamp(x as i64, 0)
        .map(|dt| dt.date_naive().format("%b %d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Chart widgets
// ---------------------------------------------------------------------------

/// A single time series as a line with point markers.
pub fn line_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    series: &[(NaiveDateTime, f64)],
    color: Color32,
) {
    ui.strong(title);
    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_formatter(|mark, _range| format_date(mark.value))
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let points: Vec<[f64; 2]> = series
                .iter()
                .map(|&(ts, v)| [timestamp_x(ts), v])
                .collect();
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(color)
                    .width(3.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(color)
                    .radius(2.5),
            );
        });
    ui.add_space(8.0);
}

/// Several named series in one plot, coloured from the shared palette.
pub fn multi_line_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    series: &[(&str, Vec<(NaiveDateTime, f64)>)],
) {
    ui.strong(title);
    let palette = generate_palette(series.len());
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| format_date(mark.value))
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for ((name, points), color) in series.iter().zip(palette) {
                let plot_points: PlotPoints = points
                    .iter()
                    .map(|&(ts, v)| [timestamp_x(ts), v])
                    .collect();
                plot_ui.line(Line::new(plot_points).name(*name).color(color).width(2.0));
            }
        });
    ui.add_space(8.0);
}

/// A labelled bar chart (heart-rate zone counts).
pub fn labelled_bar_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    labels: &[&str],
    counts: &[f64],
    color: Color32,
) {
    ui.strong(title);
    let owned_labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if (mark.value - idx as f64).abs() < 1e-6 {
                owned_labels.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = counts
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(i as f64, c).width(0.6).fill(color))
                .collect();
            plot_ui.bar_chart(BarChart::new(bars));
        });
    ui.add_space(8.0);
}
