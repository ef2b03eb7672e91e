use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TimeKind – how the timestamp column is interpreted
// ---------------------------------------------------------------------------

/// Representation of the time axis. One kind applies to a whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeKind {
    /// Decide from the first non-empty timestamp cell.
    #[default]
    Auto,
    /// Raw numeric time index (`0.5`, `12`, ...).
    Numeric,
    /// Calendar date or date-time (`2024-03-01`, `2024-03-01 12:00:00`).
    Date,
}

// ---------------------------------------------------------------------------
// Timestamp – a single cell of the time column
// ---------------------------------------------------------------------------

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A comparable point on the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    Index(f64),
    Date(NaiveDateTime),
}

// -- Manual Eq/Ord: indices are always finite, so total_cmp is a true order --

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Timestamp::Index(a), Timestamp::Index(b)) => a.total_cmp(b),
            (Timestamp::Date(a), Timestamp::Date(b)) => a.cmp(b),
            (Timestamp::Index(_), Timestamp::Date(_)) => Ordering::Less,
            (Timestamp::Date(_), Timestamp::Index(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Index(v) => write!(f, "{v}"),
            Timestamp::Date(d) if d.time() == NaiveTime::MIN => write!(f, "{}", d.date()),
            Timestamp::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl Timestamp {
    /// Parse a raw cell as the given kind. `Auto` tries numeric first.
    ///
    /// Returns a human-readable reason on failure.
    pub fn parse(raw: &str, kind: TimeKind) -> Result<Self, String> {
        let s = raw.trim();
        if s.is_empty() {
            return Err("empty timestamp".to_string());
        }
        match kind {
            TimeKind::Numeric => parse_index(s),
            TimeKind::Date => parse_date(s),
            TimeKind::Auto => parse_index(s).or_else(|_| parse_date(s)),
        }
    }

    /// Which concrete kind this timestamp is.
    pub fn kind(&self) -> TimeKind {
        match self {
            Timestamp::Index(_) => TimeKind::Numeric,
            Timestamp::Date(_) => TimeKind::Date,
        }
    }

    /// Position on a plot's x axis. Dates map to fractional days since the
    /// Unix epoch.
    pub fn as_plot_x(&self) -> f64 {
        match self {
            Timestamp::Index(v) => *v,
            Timestamp::Date(d) => {
                let utc = d.and_utc();
                utc.timestamp() as f64 / SECONDS_PER_DAY
                    + f64::from(utc.timestamp_subsec_nanos()) / 1e9 / SECONDS_PER_DAY
            }
        }
    }

    /// Inverse of [`Timestamp::as_plot_x`] for date axes, used for tick labels.
    pub fn date_from_plot_x(x: f64) -> Option<NaiveDateTime> {
        let secs = (x * SECONDS_PER_DAY).round();
        if !secs.is_finite() {
            return None;
        }
        DateTime::from_timestamp(secs as i64, 0).map(|d| d.naive_utc())
    }

    /// Start of the given calendar day.
    pub fn day_start(date: NaiveDate) -> Self {
        Timestamp::Date(date.and_time(NaiveTime::MIN))
    }

    /// Last representable instant of the given calendar day.
    pub fn day_end(date: NaiveDate) -> Self {
        // One nanosecond before midnight, wrapping back into the same day.
        let (end, _) = NaiveTime::MIN.overflowing_sub_signed(Duration::nanoseconds(1));
        Timestamp::Date(date.and_time(end))
    }
}

fn parse_index(s: &str) -> Result<Timestamp, String> {
    let v: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a numeric time index"))?;
    if !v.is_finite() {
        return Err(format!("'{s}' is not a finite time index"));
    }
    Ok(Timestamp::Index(v))
}

fn parse_date(s: &str) -> Result<Timestamp, String> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Timestamp::day_start(d));
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Timestamp::Date(dt));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Timestamp::Date(dt.naive_utc()));
    }
    Err(format!("'{s}' is not a recognised date"))
}

// ---------------------------------------------------------------------------
// Reading – one row of the CSV
// ---------------------------------------------------------------------------

/// One timestamped observation. Missing numeric cells stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: Timestamp,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub location: Option<String>,
}

impl Reading {
    pub fn new(
        timestamp: Timestamp,
        temperature: Option<f64>,
        humidity: Option<f64>,
        location: Option<&str>,
    ) -> Self {
        Reading {
            timestamp,
            temperature,
            humidity,
            location: location.map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All readings of one file, in file order, with pre-computed indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the readings came from (empty for in-memory datasets).
    pub source: PathBuf,
    /// Readings in file order.
    pub readings: Vec<Reading>,
    /// Concrete time kind of every reading.
    pub time_kind: TimeKind,
    /// Whether the file carried a location column at all.
    pub has_locations: bool,
    /// Sorted distinct location labels.
    pub locations: BTreeSet<String>,
    bounds: Option<(Timestamp, Timestamp)>,
}

impl Dataset {
    /// Build indices from already-parsed readings.
    pub fn from_readings(source: PathBuf, readings: Vec<Reading>, has_locations: bool) -> Self {
        let locations: BTreeSet<String> = readings
            .iter()
            .filter_map(|r| r.location.clone())
            .collect();

        let bounds = readings.iter().fold(None, |acc, r| match acc {
            None => Some((r.timestamp, r.timestamp)),
            Some((lo, hi)) => Some((lo.min(r.timestamp), hi.max(r.timestamp))),
        });

        let time_kind = readings
            .first()
            .map(|r| r.timestamp.kind())
            .unwrap_or(TimeKind::Numeric);

        Dataset {
            source,
            readings,
            time_kind,
            has_locations: has_locations || !locations.is_empty(),
            locations,
            bounds,
        }
    }

    /// Record the time kind the loader resolved, which matters when the
    /// file has no rows to infer it from.
    pub fn with_time_kind(mut self, kind: TimeKind) -> Self {
        if kind != TimeKind::Auto {
            self.time_kind = kind;
        }
        self
    }

    /// Observed `(min, max)` timestamps, `None` for an empty dataset.
    pub fn time_bounds(&self) -> Option<(Timestamp, Timestamp)> {
        self.bounds
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_prefers_numeric_then_date() {
        assert_eq!(
            Timestamp::parse("3.5", TimeKind::Auto).unwrap(),
            Timestamp::Index(3.5)
        );
        let d = Timestamp::parse("2024-02-29", TimeKind::Auto).unwrap();
        assert_eq!(d.to_string(), "2024-02-29");
    }

    #[test]
    fn date_formats_are_accepted() {
        for raw in [
            "2024-01-05 13:45:00",
            "2024-01-05T13:45:00",
            "2024-01-05 13:45",
            "2024-01-05T13:45:00Z",
        ] {
            let ts = Timestamp::parse(raw, TimeKind::Date).unwrap();
            assert_eq!(ts.to_string(), "2024-01-05 13:45:00", "{raw}");
        }
    }

    #[test]
    fn rejects_bad_timestamps() {
        assert!(Timestamp::parse("", TimeKind::Auto).is_err());
        assert!(Timestamp::parse("NaN", TimeKind::Numeric).is_err());
        assert!(Timestamp::parse("inf", TimeKind::Numeric).is_err());
        assert!(Timestamp::parse("2024-01-05", TimeKind::Numeric).is_err());
        assert!(Timestamp::parse("12", TimeKind::Date).is_err());
        assert!(Timestamp::parse("yesterday", TimeKind::Auto).is_err());
    }

    #[test]
    fn ordering_is_total() {
        let a = Timestamp::Index(-1.0);
        let b = Timestamp::Index(2.0);
        assert!(a < b);
        let d1 = Timestamp::parse("2024-01-01", TimeKind::Date).unwrap();
        let d2 = Timestamp::parse("2024-01-01 00:00:01", TimeKind::Date).unwrap();
        assert!(d1 < d2);
    }

    #[test]
    fn plot_x_round_trips_dates() {
        let ts = Timestamp::parse("2023-06-15 06:00:00", TimeKind::Date).unwrap();
        let x = ts.as_plot_x();
        let back = Timestamp::date_from_plot_x(x).unwrap();
        assert_eq!(Timestamp::Date(back), ts);
    }

    #[test]
    fn day_end_is_inclusive_of_whole_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let late = Timestamp::parse("2024-03-01 23:59:59", TimeKind::Date).unwrap();
        assert!(Timestamp::day_start(day) <= late);
        assert!(late <= Timestamp::day_end(day));
        let end = Timestamp::day_end(day);
        assert_eq!(
            end,
            Timestamp::Date(day.and_hms_nano_opt(23, 59, 59, 999_999_999).unwrap())
        );
        assert!(end < Timestamp::day_start(day.succ_opt().unwrap()));
    }

    #[test]
    fn dataset_indices() {
        let readings = vec![
            Reading::new(Timestamp::Index(5.0), Some(1.0), None, Some("B")),
            Reading::new(Timestamp::Index(1.0), None, Some(2.0), Some("A")),
            Reading::new(Timestamp::Index(3.0), Some(3.0), Some(4.0), None),
        ];
        let ds = Dataset::from_readings(PathBuf::new(), readings, true);
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.time_bounds(),
            Some((Timestamp::Index(1.0), Timestamp::Index(5.0)))
        );
        assert_eq!(
            ds.locations.iter().cloned().collect::<Vec<_>>(),
            vec!["A".to_string(), "B".to_string()]
        );
        assert_eq!(ds.time_kind, TimeKind::Numeric);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::from_readings(PathBuf::new(), Vec::new(), false);
        assert!(ds.is_empty());
        assert!(ds.time_bounds().is_none());
        assert!(!ds.has_locations);
        assert_eq!(ds.time_kind, TimeKind::Numeric);
        let dated = Dataset::from_readings(PathBuf::new(), Vec::new(), false)
            .with_time_kind(TimeKind::Date);
        assert_eq!(dated.time_kind, TimeKind::Date);
    }
}
