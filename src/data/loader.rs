use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::error::LoadError;
use super::model::{Dataset, Reading, TimeKind, Timestamp};
use crate::config::ColumnMapping;

/// Cell contents treated as "no data" in numeric columns (case-insensitive).
const MISSING_MARKERS: &[&str] = &["", "nan", "na", "n/a", "null", "none", "-"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a CSV file.
///
/// Layout: a header row, then one reading per row. Column names come from
/// `columns`; extra columns are ignored. The location column is optional.
pub fn load_csv(path: &Path, columns: &ColumnMapping) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::FileNotAccessible {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
    let headers = reader.headers().map_err(|e| csv_error(e, 1))?.clone();
    let layout = ColumnLayout::resolve(path, &headers, columns)?;

    let mut kind = columns.time_kind;
    let mut readings = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        // Header is line 1, so the n-th data row sits on line n + 2.
        let fallback_line = row_no as u64 + 2;
        let record = result.map_err(|e| csv_error(e, fallback_line))?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);

        let raw_time = record.get(layout.time).unwrap_or("");
        if kind == TimeKind::Auto && !raw_time.is_empty() {
            kind = match Timestamp::parse(raw_time, TimeKind::Numeric) {
                Ok(_) => TimeKind::Numeric,
                Err(_) => TimeKind::Date,
            };
            log::debug!("Time column '{}' detected as {kind:?}", columns.time);
        }
        let timestamp = Timestamp::parse(raw_time, kind)
            .map_err(|reason| parse_error(line, &columns.time, raw_time, reason))?;

        let temperature = numeric_cell(&record, layout.temperature, line, &columns.temperature)?;
        let humidity = numeric_cell(&record, layout.humidity, line, &columns.humidity)?;
        let location = layout
            .location
            .and_then(|idx| record.get(idx))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        readings.push(Reading {
            timestamp,
            temperature,
            humidity,
            location,
        });
    }

    let dataset = Dataset::from_readings(path.to_path_buf(), readings, layout.location.is_some())
        .with_time_kind(kind);
    log::info!(
        "Loaded {} readings from {} ({} locations)",
        dataset.len(),
        path.display(),
        dataset.locations.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Positions of the configured columns within the header row.
struct ColumnLayout {
    time: usize,
    temperature: usize,
    humidity: usize,
    location: Option<usize>,
}

impl ColumnLayout {
    fn resolve(
        path: &Path,
        headers: &StringRecord,
        columns: &ColumnMapping,
    ) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let time = find(&columns.time);
        let temperature = find(&columns.temperature);
        let humidity = find(&columns.humidity);

        match (time, temperature, humidity) {
            (Some(time), Some(temperature), Some(humidity)) => Ok(ColumnLayout {
                time,
                temperature,
                humidity,
                location: columns.location.as_deref().and_then(find),
            }),
            _ => {
                let missing = [
                    (time, &columns.time),
                    (temperature, &columns.temperature),
                    (humidity, &columns.humidity),
                ]
                .into_iter()
                .filter(|(idx, _)| idx.is_none())
                .map(|(_, name)| name.clone())
                .collect();
                Err(LoadError::SchemaMismatch {
                    path: path.to_path_buf(),
                    missing,
                })
            }
        }
    }
}

// -- Cell helpers --

fn numeric_cell(
    record: &StringRecord,
    idx: usize,
    line: u64,
    column: &str,
) -> Result<Option<f64>, LoadError> {
    let raw = record.get(idx).unwrap_or("");
    if MISSING_MARKERS
        .iter()
        .any(|m| raw.eq_ignore_ascii_case(m))
    {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(parse_error(line, column, raw, "not a finite number".to_string())),
        Err(_) => Err(parse_error(line, column, raw, format!("'{raw}' is not a number"))),
    }
}

fn parse_error(line: u64, column: &str, value: &str, reason: String) -> LoadError {
    LoadError::Parse {
        line,
        column: column.to_string(),
        value: value.to_string(),
        reason,
    }
}

fn csv_error(err: csv::Error, fallback_line: u64) -> LoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
    LoadError::Parse {
        line,
        column: String::new(),
        value: String::new(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{contents}").unwrap();
        tmp
    }

    fn short_columns() -> ColumnMapping {
        ColumnMapping {
            time: "t".into(),
            temperature: "temp".into(),
            humidity: "hum".into(),
            location: Some("loc".into()),
            time_kind: TimeKind::Auto,
        }
    }

    #[test]
    fn loads_default_column_names() {
        let tmp = write_csv(
            "Time,Temperature (°C),Humidity (%)\n0,20.5,40\n1,21.0,42.5\n",
        );
        let ds = load_csv(tmp.path(), &ColumnMapping::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.time_kind, TimeKind::Numeric);
        assert!(!ds.has_locations);
        assert_eq!(ds.readings[1].temperature, Some(21.0));
        assert_eq!(ds.readings[1].humidity, Some(42.5));
        assert_eq!(ds.readings[1].location, None);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_csv(Path::new("/definitely/not/here.csv"), &short_columns()).unwrap_err();
        match &err {
            LoadError::FileNotAccessible { path, .. } => {
                assert_eq!(path, Path::new("/definitely/not/here.csv"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn schema_mismatch_lists_every_missing_column() {
        let tmp = write_csv("t,other\n1,2\n");
        let err = load_csv(tmp.path(), &short_columns()).unwrap_err();
        match err {
            LoadError::SchemaMismatch { missing, .. } => {
                assert_eq!(missing, vec!["temp".to_string(), "hum".to_string()])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn location_column_is_optional() {
        let tmp = write_csv("t,temp,hum\n1,2,3\n");
        let ds = load_csv(tmp.path(), &short_columns()).unwrap();
        assert!(!ds.has_locations);
        assert!(ds.locations.is_empty());
    }

    #[test]
    fn missing_values_are_none() {
        let tmp = write_csv("t,temp,hum,loc\n1,,NaN,A\n2,NA,null,\n");
        let ds = load_csv(tmp.path(), &short_columns()).unwrap();
        assert_eq!(ds.readings[0].temperature, None);
        assert_eq!(ds.readings[0].humidity, None);
        assert_eq!(ds.readings[0].location.as_deref(), Some("A"));
        assert_eq!(ds.readings[1].temperature, None);
        assert_eq!(ds.readings[1].location, None);
    }

    #[test]
    fn malformed_date_reports_line() {
        let tmp = write_csv("t,temp,hum\n2024-01-01,1,2\n2024-01-02,1,2\n2024-13-45,1,2\n");
        let err = load_csv(tmp.path(), &short_columns()).unwrap_err();
        match err {
            LoadError::Parse {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 4);
                assert_eq!(column, "t");
                assert_eq!(value, "2024-13-45");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_number_reports_line() {
        let tmp = write_csv("t,temp,hum\n1,warm,2\n");
        let err = load_csv(tmp.path(), &short_columns()).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("temp"));
    }

    #[test]
    fn mixed_time_kinds_fail() {
        let tmp = write_csv("t,temp,hum\n1,1,1\n2024-01-01,1,1\n");
        let err = load_csv(tmp.path(), &short_columns()).unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn forced_date_kind() {
        let mut columns = short_columns();
        columns.time_kind = TimeKind::Date;
        let tmp = write_csv("t,temp,hum\n2024-01-01 06:30:00,1,1\n");
        let ds = load_csv(tmp.path(), &columns).unwrap();
        assert_eq!(ds.time_kind, TimeKind::Date);
        assert_eq!(ds.readings[0].timestamp.to_string(), "2024-01-01 06:30:00");
    }

    #[test]
    fn forced_date_kind_survives_empty_file() {
        let mut columns = short_columns();
        columns.time_kind = TimeKind::Date;
        let tmp = write_csv("t,temp,hum\n");
        let ds = load_csv(tmp.path(), &columns).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.time_kind, TimeKind::Date);
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let tmp = write_csv("t,temp,hum\n1,2,3\n4,5\n");
        let err = load_csv(tmp.path(), &short_columns()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(err.line(), Some(3));
    }
}
