//! CSV loading for the daily rental dataset.
//!
//! Fetches the file from a URL or reads it from disk, parses every row into a
//! [`RentalRecord`], validates it and returns the columnar [`RentalTable`].

use std::io::Read;
use std::time::Instant;

use chrono::NaiveDate;
use dashboard_core::error::DataLoadError;
use dashboard_core::models::{DataSource, RentalRecord, RentalTable, DATE_FORMAT};
use serde::Deserialize;
use tracing::{debug, info, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load, parse and validate the dataset at `source`.
///
/// Remote sources are fetched with a blocking GET, so call this from a
/// blocking context (e.g. `tokio::task::spawn_blocking`).
pub fn load(source: &DataSource) -> Result<RentalTable, DataLoadError> {
    let started = Instant::now();
    let body = fetch(source)?;
    debug!(bytes = body.len(), "fetched dataset from {}", source);

    let records = parse_records(body.as_slice())?;
    let table = RentalTable::from_records(&records);

    info!(
        "Loaded {} rows from {} in {:.2}s",
        table.len(),
        source,
        started.elapsed().as_secs_f64()
    );
    Ok(table)
}

/// Parse CSV text into validated records.
///
/// Columns are matched by header name; extra columns are ignored and a
/// missing required column is a CSV error. Each row must carry a
/// `YYYY-MM-DD` date and satisfy `cnt == casual + registered`.
pub fn parse_records<R: Read>(input: R) -> Result<Vec<RentalRecord>, DataLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<RawRentalRow>().enumerate() {
        let row_number = idx + 1;
        let record = row?.into_record(row_number)?;
        if !record.totals_consistent() {
            return Err(DataLoadError::InconsistentTotals {
                row: row_number,
                date: record.dteday,
                casual: record.casual,
                registered: record.registered,
                total: record.cnt,
            });
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(DataLoadError::Empty);
    }

    warn_if_unordered(&records);
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Row as it appears in the file, before date parsing.
#[derive(Debug, Deserialize)]
struct RawRentalRow {
    #[serde(default)]
    instant: Option<u32>,
    dteday: String,
    season: u8,
    yr: u8,
    mnth: u8,
    holiday: u8,
    weekday: u8,
    workingday: u8,
    weathersit: u8,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u32,
    registered: u32,
    cnt: u32,
}

impl RawRentalRow {
    fn into_record(self, row: usize) -> Result<RentalRecord, DataLoadError> {
        let dteday = NaiveDate::parse_from_str(&self.dteday, DATE_FORMAT).map_err(|_| {
            DataLoadError::DateParse {
                row,
                value: self.dteday.clone(),
            }
        })?;

        Ok(RentalRecord {
            instant: self.instant,
            dteday,
            season: self.season,
            yr: self.yr,
            mnth: self.mnth,
            holiday: self.holiday,
            weekday: self.weekday,
            workingday: self.workingday,
            weathersit: self.weathersit,
            temp: self.temp,
            atemp: self.atemp,
            hum: self.hum,
            windspeed: self.windspeed,
            casual: self.casual,
            registered: self.registered,
            cnt: self.cnt,
        })
    }
}

/// Read the raw bytes behind `source`.
fn fetch(source: &DataSource) -> Result<Vec<u8>, DataLoadError> {
    match source {
        DataSource::Url(url) => {
            let fetch_err = |message: String| DataLoadError::Fetch {
                url: url.clone(),
                message,
            };
            let response = reqwest::blocking::get(url).map_err(|e| fetch_err(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(fetch_err(format!("HTTP status {}", status)));
            }
            let bytes = response.bytes().map_err(|e| fetch_err(e.to_string()))?;
            Ok(bytes.to_vec())
        }
        DataSource::File(path) => std::fs::read(path).map_err(|source| DataLoadError::FileRead {
            path: path.clone(),
            source,
        }),
    }
}

/// Downstream code assumes ascending, unique dates; the loader only reports
/// violations.
fn warn_if_unordered(records: &[RentalRecord]) {
    let out_of_order = records
        .windows(2)
        .filter(|pair| pair[1].dteday <= pair[0].dteday)
        .count();
    if out_of_order > 0 {
        warn!(
            "Dataset dates are not strictly ascending ({} out-of-order or duplicate rows)",
            out_of_order
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";

    fn csv_text(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    fn sample_rows() -> Vec<&'static str> {
        vec![
            "1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985",
            "2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801",
            "3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349",
        ]
    }

    // ── parse_records ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_records_valid() {
        let text = csv_text(&sample_rows());
        let records = parse_records(text.as_bytes()).expect("parse");

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].dteday,
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap()
        );
        assert_eq!(records[0].instant, Some(1));
        assert_eq!(records[2].cnt, 1349);
        assert!((records[1].hum - 0.696087).abs() < 1e-12);
    }

    #[test]
    fn test_parse_records_cnt_identity_holds_for_every_row() {
        let text = csv_text(&sample_rows());
        let records = parse_records(text.as_bytes()).expect("parse");
        assert!(records.iter().all(|r| r.cnt == r.casual + r.registered));
    }

    #[test]
    fn test_parse_records_without_instant_and_extra_column() {
        let text = "dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt,note\n\
                    2011-01-01,1,0,1,0,6,0,2,0.3,0.3,0.8,0.1,331,654,985,ignored\n";
        let records = parse_records(text.as_bytes()).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].instant, None);
    }

    #[test]
    fn test_parse_records_rejects_bad_date() {
        let text = csv_text(&[
            "1,2011-01-01,1,0,1,0,6,0,2,0.3,0.3,0.8,0.1,331,654,985",
            "2,01/02/2011,1,0,1,0,0,0,2,0.3,0.3,0.7,0.2,131,670,801",
        ]);
        let err = parse_records(text.as_bytes()).unwrap_err();
        assert!(
            matches!(err, DataLoadError::DateParse { row: 2, ref value } if value == "01/02/2011"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_parse_records_rejects_missing_column() {
        let text = "dteday,season,cnt\n2011-01-01,1,985\n";
        let err = parse_records(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Csv(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_parse_records_rejects_non_numeric_value() {
        let text = csv_text(&["1,2011-01-01,1,0,1,0,6,0,2,warm,0.3,0.8,0.1,331,654,985"]);
        let err = parse_records(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Csv(_)));
    }

    #[test]
    fn test_parse_records_rejects_inconsistent_totals() {
        let text = csv_text(&["1,2011-01-01,1,0,1,0,6,0,2,0.3,0.3,0.8,0.1,331,654,1000"]);
        let err = parse_records(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InconsistentTotals {
                row: 1,
                casual: 331,
                registered: 654,
                total: 1000,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_records_rejects_empty() {
        let text = csv_text(&[]);
        let err = parse_records(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty));
    }

    #[test]
    fn test_parse_records_accepts_unsorted_input() {
        let mut rows = sample_rows();
        rows.reverse();
        let records = parse_records(csv_text(&rows).as_bytes()).expect("parse");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].cnt, 1349);
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(csv_text(&sample_rows()).as_bytes())
            .expect("write");

        let table = load(&DataSource::File(file.path().to_path_buf())).expect("load");

        assert_eq!(table.len(), 3);
        assert_eq!(table.column("cnt"), Some(&[985.0, 801.0, 1349.0][..]));
        assert_eq!(table.numeric_column_names()[0], "instant");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.csv");
        let err = load(&DataSource::File(path.clone())).unwrap_err();
        match err {
            DataLoadError::FileRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
