use std::fmt;

use super::model::Reading;

// ---------------------------------------------------------------------------
// GroupKey
// ---------------------------------------------------------------------------

/// Which slice of the selection a [`Summary`] describes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// The whole selection (no grouping requested).
    All,
    Location(String),
    /// Readings without a location label, when grouping by location.
    Unlabelled,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::All => write!(f, "all"),
            GroupKey::Location(l) => write!(f, "{l}"),
            GroupKey::Unlabelled => write!(f, "<no location>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Mean and first-to-last delta for one group.
///
/// Every metric is `None` when it cannot be computed (no rows, or no values
/// present); callers render that as "no data", never as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub count: usize,
    pub mean_temperature: Option<f64>,
    pub mean_humidity: Option<f64>,
    /// `temperature(last) - temperature(first)` by timestamp.
    pub delta_temperature: Option<f64>,
    /// `humidity(last) - humidity(first)` by timestamp.
    pub delta_humidity: Option<f64>,
}

impl Summary {
    /// Metrics as `f64`, with `NaN` standing in for "no data".
    pub fn as_nan_array(&self) -> [f64; 4] {
        [
            self.mean_temperature,
            self.mean_humidity,
            self.delta_temperature,
            self.delta_humidity,
        ]
        .map(|m| m.unwrap_or(f64::NAN))
    }
}

/// Compute the summary of a group. Readings need not be sorted: first and
/// last are picked by timestamp, ties resolved by position.
pub fn summarize(readings: &[&Reading]) -> Summary {
    // min_by_key keeps the earliest equal element, max_by_key the latest.
    let first = readings.iter().min_by_key(|r| r.timestamp);
    let last = readings.iter().max_by_key(|r| r.timestamp);

    let delta = |field: fn(&Reading) -> Option<f64>| match (first, last) {
        (Some(f), Some(l)) => Some(field(l)? - field(f)?),
        _ => None,
    };

    Summary {
        count: readings.len(),
        mean_temperature: mean(readings.iter().filter_map(|r| r.temperature)),
        mean_humidity: mean(readings.iter().filter_map(|r| r.humidity)),
        delta_temperature: delta(|r| r.temperature),
        delta_humidity: delta(|r| r.humidity),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Render a metric for display: one decimal, or "no data".
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "no data".to_string(),
    }
}

/// Like [`format_metric`] but with an explicit sign, for deltas.
pub fn format_delta(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.1}"),
        None => "no data".to_string(),
    }
}
