use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use thermo_panda::data::summary::{format_delta, format_metric};
use thermo_panda::data::{Dataset, FilterCriteria, FilterResult, TimeKind, TimeRange, Timestamp};

// ---------------------------------------------------------------------------
// Headless mode: criteria from flags, summary table on stdout
// ---------------------------------------------------------------------------

/// Filter flags given on the command line.
#[derive(Debug, Default, Clone)]
pub struct ReportArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub locations: Vec<String>,
}

/// Turn flags into criteria; unset bounds fall back to the dataset's.
/// `None` when the dataset is empty.
pub fn criteria_from_args(dataset: &Dataset, args: &ReportArgs) -> Result<Option<FilterCriteria>> {
    let Some(mut criteria) = FilterCriteria::everything(dataset) else {
        return Ok(None);
    };

    let lo = match &args.from {
        Some(raw) => parse_bound(raw, dataset.time_kind, false).context("invalid --from")?,
        None => criteria.range.lo,
    };
    let hi = match &args.to {
        Some(raw) => parse_bound(raw, dataset.time_kind, true).context("invalid --to")?,
        None => criteria.range.hi,
    };
    criteria.range = TimeRange::new(lo, hi);

    if !args.locations.is_empty() {
        if !dataset.has_locations {
            bail!("--location given but {} has no location column", dataset.source.display());
        }
        criteria.locations = Some(args.locations.iter().cloned().collect());
    }
    Ok(Some(criteria))
}

/// A bare date as an upper bound means "through the end of that day".
fn parse_bound(raw: &str, kind: TimeKind, upper: bool) -> Result<Timestamp> {
    if kind == TimeKind::Date {
        if let Ok(day) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            return Ok(if upper {
                Timestamp::day_end(day)
            } else {
                Timestamp::day_start(day)
            });
        }
    }
    Timestamp::parse(raw, kind).map_err(anyhow::Error::msg)
}

/// Render the group summaries as a plain-text table.
pub fn render(result: &FilterResult) -> String {
    let mut out = String::new();
    if result.summaries.is_empty() {
        out.push_str("No readings match the given filters.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<16} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "group", "readings", "avg temp", "avg hum", "Δ temp", "Δ hum"
    );
    for (key, s) in &result.summaries {
        let _ = writeln!(
            out,
            "{:<16} {:>8} {:>10} {:>10} {:>10} {:>10}",
            key.to_string(),
            s.count,
            format_metric(s.mean_temperature),
            format_metric(s.mean_humidity),
            format_delta(s.delta_temperature),
            format_delta(s.delta_humidity),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use thermo_panda::data::{GroupKey, Reading, filter_and_summarize};

    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_readings(
            PathBuf::from("mem.csv"),
            vec![
                Reading::new(Timestamp::Index(1.0), Some(20.0), Some(50.0), Some("A")),
                Reading::new(Timestamp::Index(2.0), Some(22.0), Some(55.0), Some("A")),
                Reading::new(Timestamp::Index(1.0), Some(18.0), Some(40.0), Some("B")),
            ],
            true,
        )
    }

    #[test]
    fn flags_narrow_the_selection() {
        let ds = dataset();
        let args = ReportArgs {
            from: Some("1".into()),
            to: Some("2".into()),
            locations: vec!["A".into()],
        };
        let criteria = criteria_from_args(&ds, &args).unwrap().unwrap();
        let result = filter_and_summarize(&ds.readings, &criteria);
        let table = render(&result);
        assert!(table.contains("21.0"));
        assert!(table.contains("52.5"));
        assert!(table.contains("+2.0"));
        assert!(table.contains("+5.0"));
        assert!(!table.lines().any(|l| l.starts_with("B ")));
    }

    #[test]
    fn no_flags_keeps_unlabelled_readings() {
        let mut readings = dataset().readings;
        readings.push(Reading::new(Timestamp::Index(1.5), Some(30.0), None, None));
        let ds = Dataset::from_readings(PathBuf::from("mem.csv"), readings, true);
        let criteria = criteria_from_args(&ds, &ReportArgs::default()).unwrap().unwrap();
        let result = filter_and_summarize(&ds.readings, &criteria);
        assert_eq!(result.indices, vec![0, 1, 2, 3]);
        assert_eq!(result.summaries[&GroupKey::Unlabelled].count, 1);
    }

    #[test]
    fn empty_selection_is_reported() {
        let ds = dataset();
        let args = ReportArgs {
            locations: vec!["C".into()],
            ..ReportArgs::default()
        };
        let criteria = criteria_from_args(&ds, &args).unwrap().unwrap();
        let result = filter_and_summarize(&ds.readings, &criteria);
        assert_eq!(render(&result), "No readings match the given filters.\n");
    }

    #[test]
    fn date_upper_bound_covers_the_day() {
        let hi = parse_bound("2024-01-02", TimeKind::Date, true).unwrap();
        let late = Timestamp::parse("2024-01-02 22:00:00", TimeKind::Date).unwrap();
        assert!(late <= hi);
        assert!(parse_bound("noon", TimeKind::Date, false).is_err());
    }

    #[test]
    fn location_flag_needs_location_column() {
        let ds = Dataset::from_readings(
            PathBuf::from("plain.csv"),
            vec![Reading::new(Timestamp::Index(0.0), Some(1.0), Some(1.0), None)],
            false,
        );
        let args = ReportArgs {
            locations: vec!["A".into()],
            ..ReportArgs::default()
        };
        assert!(criteria_from_args(&ds, &args).is_err());
    }
}
