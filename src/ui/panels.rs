use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::schema::Source;
use crate::state::{AppState, Role};

// ---------------------------------------------------------------------------
// Left side panel – system controls
// ---------------------------------------------------------------------------

/// Render the control panel: role selector and the date window pickers,
/// captioned with the available bounds.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("System Controls");
    ui.separator();

    ui.strong("Select Role");
    let current = state.role;
    egui::ComboBox::from_id_salt("role_selector")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for role in Role::ALL {
                if ui.selectable_label(current == role, role.label()).clicked() {
                    state.set_role(role);
                }
            }
        });
    ui.add_space(8.0);

    let mut start = state.start_date;
    let mut end = state.end_date;

    ui.strong("Start Date");
    ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
    ui.strong("End Date");
    ui.add(DatePickerButton::new(&mut end).id_salt("end_date"));
    state.set_window(start, end);

    ui.add_space(8.0);
    if let Some(bounds) = state.bounds {
        ui.label(
            RichText::new(format!("Available data: {} → {}", bounds.min, bounds.max))
                .small()
                .weak(),
        );
    }

    ui.separator();
    source_status(ui, state);
}

/// Per-source availability list for the current session.
fn source_status(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        ui.label("No data folder loaded.");
        return;
    };

    ui.strong("Sources");
    for source in Source::ALL {
        match session.get(source) {
            Some(ds) => {
                ui.label(format!("{source}: {} rows", ds.len()));
            }
            None => {
                ui.label(RichText::new(format!("{source}: unavailable")).weak());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}/{} sources loaded from {}",
                session.present_count(),
                Source::ALL.len(),
                session.data_dir.display()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open telemetry data folder")
        .pick_folder();

    if let Some(dir) = folder {
        state.load_dir(&dir);
    }
}
