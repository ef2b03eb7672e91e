use eframe::egui::{self, ScrollArea, Ui};

use thermo_panda::DashboardConfig;

use crate::state::AppState;
use crate::ui::{metrics, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ThermoPandaApp {
    pub state: AppState,
}

impl ThermoPandaApp {
    /// Build the app and try the configured data file straight away.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        let path = state.config.data_path.clone();
        state.load(&path);
        Self { state }
    }
}

impl eframe::App for ThermoPandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview, charts, metrics ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a CSV of readings  (File → Open…)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Temperature and Humidity Over Time");

                    egui::CollapsingHeader::new("Preview of data")
                        .default_open(true)
                        .show(ui, |ui: &mut Ui| metrics::preview_grid(ui, &self.state));
                    ui.separator();

                    plot::time_series_plots(ui, &self.state);
                    ui.separator();

                    ui.heading("Summary Statistics");
                    metrics::summary_grid(ui, &self.state);
                });
        });
    }
}
