use eframe::egui::{self, Color32, RichText, Ui};

use thermo_panda::data::summary::{format_delta, format_metric};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// One row per group: reading count, means, and first→last deltas.
pub fn summary_grid(ui: &mut Ui, state: &AppState) {
    if state.result.summaries.is_empty() {
        ui.label(RichText::new("No data for the current selection.").italics());
        return;
    }

    let columns = &state.config.columns;

    egui::Grid::new("summary_grid")
        .striped(true)
        .num_columns(6)
        .spacing([24.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Group");
            ui.strong("Readings");
            ui.strong(format!("Average {}", columns.temperature));
            ui.strong(format!("Average {}", columns.humidity));
            ui.strong("Δ temperature");
            ui.strong("Δ humidity");
            ui.end_row();

            for (key, summary) in &state.result.summaries {
                let mut label = RichText::new(key.to_string()).strong();
                if let Some(cm) = &state.color_map {
                    label = label.color(cm.color_for(key));
                }
                ui.label(label);
                ui.label(summary.count.to_string());
                metric_label(ui, format_metric(summary.mean_temperature), summary.mean_temperature.is_some());
                metric_label(ui, format_metric(summary.mean_humidity), summary.mean_humidity.is_some());
                metric_label(ui, format_delta(summary.delta_temperature), summary.delta_temperature.is_some());
                metric_label(ui, format_delta(summary.delta_humidity), summary.delta_humidity.is_some());
                ui.end_row();
            }
        });
}

/// Large value, or a greyed "no data" marker.
fn metric_label(ui: &mut Ui, text: String, present: bool) {
    let rich = RichText::new(text).size(18.0);
    if present {
        ui.label(rich.strong());
    } else {
        ui.label(rich.italics().color(Color32::GRAY));
    }
}

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

/// First few rows of the loaded file, unfiltered.
pub fn preview_grid(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let columns = &state.config.columns;
    let show_location = dataset.has_locations;

    egui::Grid::new("preview_grid")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong(&columns.time);
            ui.strong(&columns.temperature);
            ui.strong(&columns.humidity);
            if show_location {
                ui.strong(columns.location.as_deref().unwrap_or("Location"));
            }
            ui.end_row();

            for r in dataset.readings.iter().take(state.config.preview_rows) {
                ui.label(r.timestamp.to_string());
                ui.label(cell(r.temperature));
                ui.label(cell(r.humidity));
                if show_location {
                    ui.label(r.location.as_deref().unwrap_or(""));
                }
                ui.end_row();
            }
        });
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}
