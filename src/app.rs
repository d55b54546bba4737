use eframe::egui;

use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WatchboardApp {
    pub state: AppState,
}

impl WatchboardApp {
    /// Start with the conventional `data/` directory if it exists next to
    /// the executable's working directory; otherwise wait for File → Open.
    pub fn new() -> Self {
        let mut state = AppState::default();
        let default_dir = std::path::Path::new("data");
        if default_dir.is_dir() {
            state.load_dir(default_dir);
        }
        Self { state }
    }
}

impl Default for WatchboardApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for WatchboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: role dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::central_panel(ui, &self.state);
        });
    }
}
