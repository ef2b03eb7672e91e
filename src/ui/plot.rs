use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use thermo_panda::data::{GroupKey, Reading, TimeKind, Timestamp};

use crate::color::ColorMap;
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 240.0;

/// Points of one series, keyed by group.
type SeriesMap = BTreeMap<GroupKey, Vec<[f64; 2]>>;

/// Shared x axis of both charts.
struct Axes<'a> {
    x_label: &'a str,
    time_kind: TimeKind,
}

// ---------------------------------------------------------------------------
// Time-series plots (central panel)
// ---------------------------------------------------------------------------

/// Render the temperature and humidity line charts for the current selection.
pub fn time_series_plots(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(criteria)) = (&state.dataset, state.criteria()) else {
        return;
    };

    if state.result.is_empty() {
        ui.label("No readings match the current filters.");
        return;
    }

    let mut temperature = SeriesMap::new();
    let mut humidity = SeriesMap::new();
    for r in state.result.readings(&dataset.readings) {
        let key = criteria.group_key(r);
        push_point(&mut temperature, &key, r, r.temperature);
        push_point(&mut humidity, &key, r, r.humidity);
    }

    let columns = &state.config.columns;
    let color_map = state.color_map.as_ref();
    let axes = Axes {
        x_label: &columns.time,
        time_kind: dataset.time_kind,
    };
    series_plot(ui, "temperature_plot", &columns.temperature, &axes, temperature, color_map);
    series_plot(ui, "humidity_plot", &columns.humidity, &axes, humidity, color_map);
}

/// Missing values leave a gap in the series rather than a fake zero.
fn push_point(series: &mut SeriesMap, key: &GroupKey, reading: &Reading, value: Option<f64>) {
    let points = series.entry(key.clone()).or_default();
    if let Some(v) = value {
        points.push([reading.timestamp.as_plot_x(), v]);
    }
}

fn series_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    axes: &Axes<'_>,
    mut series: SeriesMap,
    color_map: Option<&ColorMap>,
) {
    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(axes.x_label)
        .y_axis_label(y_label)
        .link_axis("time_axis", [true, false])
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if axes.time_kind == TimeKind::Date {
        plot = plot.x_axis_formatter(|mark, _range| {
            Timestamp::date_from_plot_x(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        });
    }

    plot.show(ui, |plot_ui| {
        for (key, points) in series.iter_mut() {
            // File order need not be time order.
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));

            let color = color_map
                .map(|cm| cm.color_for(key))
                .unwrap_or(Color32::LIGHT_BLUE);

            let line = Line::new(PlotPoints::from(std::mem::take(points)))
                .name(key.to_string())
                .color(color)
                .width(1.5);

            plot_ui.line(line);
        }
    });
}
