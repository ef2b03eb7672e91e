use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use thermo_panda::data::GroupKey;

use crate::state::{AppState, RangeInput};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone the Arc so we can mutate state while iterating locations.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Time range ----
            ui.strong("Time range");
            if let Some(range) = state.range.as_mut() {
                changed |= time_range_widgets(ui, range);
            }
            if ui.small_button("Reset range").clicked() {
                state.range = RangeInput::for_dataset(&dataset);
                changed = true;
            }
            ui.separator();

            if !dataset.has_locations {
                return;
            }

            // ---- Locations ----
            changed |= ui
                .checkbox(&mut state.group_by_location, "Group by location")
                .changed();

            let header_text = format!(
                "Locations  ({}/{})",
                state.selected_locations.len(),
                dataset.locations.len()
            );

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("locations")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none();
                        }
                    });

                    for loc in &dataset.locations {
                        let mut checked = state.selected_locations.contains(loc);
                        let mut text = RichText::new(loc);
                        if let Some(cm) = &state.color_map {
                            text = text.color(cm.color_for(&GroupKey::Location(loc.clone())));
                        }
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_location(loc);
                        }
                    }
                });
        });

    if changed {
        state.refilter();
    }
}

/// Sliders for a numeric time index, date pickers for calendar dates.
/// Returns whether any value changed.
fn time_range_widgets(ui: &mut Ui, range: &mut RangeInput) -> bool {
    match range {
        RangeInput::Numeric { lo, hi, min, max } => {
            let bounds = *min..=*max;
            let mut changed = ui
                .add(egui::Slider::new(lo, bounds.clone()).text("from"))
                .changed();
            changed |= ui.add(egui::Slider::new(hi, bounds).text("to")).changed();
            changed
        }
        RangeInput::Dates { lo, hi, min, max } => {
            let mut changed = false;
            ui.horizontal(|ui: &mut Ui| {
                ui.label("From");
                changed |= ui
                    .add(DatePickerButton::new(lo).id_salt("range_from"))
                    .changed();
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("To");
                changed |= ui
                    .add(DatePickerButton::new(hi).id_salt("range_to"))
                    .changed();
            });
            ui.weak(format!("Data covers {min} → {max}"));
            changed
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} readings loaded, {} selected",
                ds.len(),
                state.result.indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open environment readings")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
