//! CSV price feed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use reversion_core::error::DataError;
use reversion_core::traits::PriceFeed;
use reversion_core::types::{PricePoint, PriceSeries};
use std::path::{Path, PathBuf};
use tracing::debug;

const DATE_COLUMNS: [&str; 4] = ["Date", "date", "timestamp", "Timestamp"];
const CLOSE_COLUMNS: [&str; 3] = ["Close", "close", "Adj Close"];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Close cell markers exporters write for a missing value.
const MISSING_MARKERS: [&str; 5] = ["nan", "null", "none", "na", "n/a"];

/// Reads one `{SYMBOL}.csv` file per ticker from a directory.
#[derive(Debug, Clone)]
pub struct CsvPriceFeed {
    dir: PathBuf,
}

impl CsvPriceFeed {
    /// Create a feed over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data directory not found: {}", dir.display()),
            )));
        }
        Ok(Self { dir })
    }

    /// Data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Locate the file for `symbol`.
    pub fn path_for(&self, symbol: &str) -> Option<PathBuf> {
        let upper = symbol.to_uppercase();
        let lower = symbol.to_lowercase();
        [
            format!("{}.csv", upper),
            format!("{}.csv", lower),
            format!("{}_daily.csv", upper),
            format!("{}_daily.csv", lower),
        ]
        .into_iter()
        .map(|name| self.dir.join(name))
        .find(|path| path.is_file())
    }
}

impl PriceFeed for CsvPriceFeed {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        let path = self
            .path_for(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;

        let series = load_file(&path, symbol)?.between(start, end);
        if series.is_empty() {
            return Err(DataError::NoDataAvailable {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        debug!(symbol, bars = series.len(), path = %path.display(), "Loaded CSV prices");
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Load a whole CSV file as a series, oldest first.
///
/// Rows whose close is missing (empty, a null marker such as `NaN` or `null`,
/// or a non-finite number) are dropped.
pub fn load_file(path: &Path, symbol: &str) -> Result<PriceSeries, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(e.to_string()))?
        .clone();
    let date_idx = column(&headers, &DATE_COLUMNS)
        .ok_or_else(|| DataError::ParseError(format!("{}: no date column", path.display())))?;
    let close_idx = column(&headers, &CLOSE_COLUMNS)
        .ok_or_else(|| DataError::ParseError(format!("{}: no close column", path.display())))?;

    let mut points = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        let close = match record.get(close_idx) {
            Some(raw) if !is_missing(raw) => raw
                .parse::<f64>()
                .map_err(|e| DataError::ParseError(format!("bad close {:?}: {}", raw, e)))?,
            _ => continue,
        };
        if !close.is_finite() {
            continue;
        }
        let date = parse_date(record.get(date_idx).unwrap_or_default())?;

        points.push(PricePoint::new(date, close));
    }

    points.sort_by_key(|p| p.date);
    PriceSeries::new(symbol, points)
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty() || MISSING_MARKERS.iter().any(|m| raw.eq_ignore_ascii_case(m))
}

/// First header matching one of `names`, in preference order.
fn column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
}

/// Parse the date formats found in common exports.
fn parse_date(raw: &str) -> Result<NaiveDate, DataError> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.date());
        }
    }

    // Unix timestamp, milliseconds if it has more than 10 digits
    if let Ok(ts) = raw.parse::<i64>() {
        let dt = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = dt {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!("Could not parse date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15").unwrap(), day(2024, 1, 15));
        assert_eq!(parse_date("2024/01/15").unwrap(), day(2024, 1, 15));
        assert_eq!(parse_date("01/15/2024").unwrap(), day(2024, 1, 15));
        assert_eq!(parse_date("15-01-2024").unwrap(), day(2024, 1, 15));
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), day(2024, 1, 15));
        assert_eq!(parse_date("1705312800").unwrap(), day(2024, 1, 15));
        assert_eq!(parse_date("1705312800000").unwrap(), day(2024, 1, 15));
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_fetch_sorts_and_filters() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "SPY.csv",
            "Date,Open,Close,Volume\n\
             2024-01-04,1,103.0,10\n\
             2024-01-02,1,101.0,10\n\
             2024-01-03,1,102.0,10\n\
             2024-01-05,1,104.0,10\n",
        );
        let feed = CsvPriceFeed::new(dir.path()).unwrap();

        let series = feed.fetch("SPY", day(2024, 1, 3), day(2024, 1, 4)).unwrap();
        assert_eq!(series.closes(), vec![102.0, 103.0]);
        assert_eq!(series.first_date(), Some(day(2024, 1, 3)));
    }

    #[test]
    fn test_prefers_close_over_adjusted() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "qqq_daily.csv",
            "date,Adj Close,Close\n2024-01-02,99.5,100.0\n2024-01-03,100.5,101.0\n",
        );
        let feed = CsvPriceFeed::new(dir.path()).unwrap();

        let series = feed.fetch("QQQ", day(2024, 1, 1), day(2024, 12, 31)).unwrap();
        assert_eq!(series.closes(), vec![100.0, 101.0]);
        assert_eq!(series.symbol(), "QQQ");
    }

    #[test]
    fn test_empty_close_rows_dropped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "IWM.csv", "Date,Close\n2024-01-02,50.0\n2024-01-03,\n2024-01-04,51.0\n");
        let feed = CsvPriceFeed::new(dir.path()).unwrap();

        let series = feed.fetch("IWM", day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_null_marker_closes_dropped() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "EEM.csv",
            "Date,Close\n2024-01-02,40.0\n2024-01-03,NaN\n2024-01-04,null\n\
             2024-01-05,nan\n2024-01-08,N/A\n2024-01-09,inf\n2024-01-10,41.0\n",
        );
        let feed = CsvPriceFeed::new(dir.path()).unwrap();

        let series = feed.fetch("EEM", day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        assert_eq!(series.closes(), vec![40.0, 41.0]);
        assert_eq!(series.dates(), vec![day(2024, 1, 2), day(2024, 1, 10)]);
    }

    #[test]
    fn test_missing_symbol() {
        let dir = TempDir::new().unwrap();
        let feed = CsvPriceFeed::new(dir.path()).unwrap();

        let err = feed.fetch("NOPE", day(2024, 1, 1), day(2024, 1, 31)).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_range_without_rows() {
        let dir = TempDir::new().unwrap();
        write(&dir, "DIA.csv", "Date,Close\n2020-01-02,300.0\n");
        let feed = CsvPriceFeed::new(dir.path()).unwrap();

        let err = feed.fetch("DIA", day(2024, 1, 1), day(2024, 1, 31)).unwrap_err();
        assert!(matches!(err, DataError::NoDataAvailable { .. }));
    }

    #[test]
    fn test_bad_rows_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "BAD.csv", "Date,Close\n2024-01-02,abc\n");
        write(&dir, "NEG.csv", "Date,Close\n2024-01-02,-5.0\n");
        write(&dir, "NOCLOSE.csv", "Date,Open\n2024-01-02,5.0\n");
        let feed = CsvPriceFeed::new(dir.path()).unwrap();
        let (start, end) = (day(2024, 1, 1), day(2024, 1, 31));

        assert!(matches!(feed.fetch("BAD", start, end), Err(DataError::ParseError(_))));
        assert!(matches!(feed.fetch("NEG", start, end), Err(DataError::InvalidSeries(_))));
        assert!(matches!(feed.fetch("NOCLOSE", start, end), Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_missing_directory() {
        assert!(CsvPriceFeed::new("/definitely/not/here").is_err());
    }
}
