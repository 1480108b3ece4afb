use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDateTime;

use super::cache::DatasetCache;
use super::error::LoadError;
use super::model::{Dataset, Record};
use super::source::DataSource;

/// Timestamp column, after header lower-casing.
pub const DATE_COLUMN: &str = "date/time";
pub const LAT_COLUMN: &str = "lat";
pub const LON_COLUMN: &str = "lon";
pub const BASE_COLUMN: &str = "base";

/// Accepted timestamp layouts, tried in order. The first is the upstream
/// `9/1/2014 0:01:00`; the others cover ISO text as written by CSV export.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Loads datasets from one [`DataSource`], memoized by row-count bound.
pub struct Loader<S> {
    source: S,
    cache: DatasetCache,
}

impl<S: DataSource> Loader<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, DatasetCache::new())
    }

    /// Use a pre-populated (or shared-in-tests) cache.
    pub fn with_cache(source: S, cache: DatasetCache) -> Self {
        Loader { source, cache }
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Return the dataset holding at most `row_limit` records.
    ///
    /// On a cache hit nothing is fetched. On a miss the source is opened and
    /// read; a failed load leaves the cache untouched.
    pub fn load(&mut self, row_limit: usize) -> Result<Arc<Dataset>, LoadError> {
        if row_limit == 0 {
            return Err(LoadError::InvalidRowLimit(row_limit));
        }
        if let Some(ds) = self.cache.get(row_limit) {
            log::debug!("Cache hit for {row_limit} rows");
            return Ok(ds);
        }

        let origin = self.source.describe();
        let reader = self.source.open()?;
        let dataset = read_dataset(reader, row_limit, &origin)?;
        log::info!(
            "Loaded {} records ({} bases) from {origin}",
            dataset.len(),
            dataset.bases.len()
        );
        Ok(self.cache.insert(row_limit, Arc::new(dataset)))
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row, column names matched case-insensitively.
/// Required columns: `date/time`, `lat`, `lon`, `base`; any others are ignored.
/// Reading stops after `row_limit` data rows.
pub fn read_dataset<R: Read>(reader: R, row_limit: usize, origin: &str) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::unavailable(origin, format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::unavailable(origin, format!("CSV missing '{name}' column")))
    };
    let date_idx = column(DATE_COLUMN)?;
    let lat_idx = column(LAT_COLUMN)?;
    let lon_idx = column(LON_COLUMN)?;
    let base_idx = column(BASE_COLUMN)?;

    let mut records = Vec::new();

    for (idx, result) in reader.records().take(row_limit).enumerate() {
        // 1-based, header excluded
        let row_no = idx + 1;
        let row = result.map_err(|e| LoadError::unavailable(origin, format!("CSV row {row_no}: {e}")))?;
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let timestamp = parse_timestamp(field(date_idx)).ok_or_else(|| LoadError::MalformedTimestamp {
            row: row_no,
            raw: field(date_idx).to_string(),
        })?;
        let latitude = parse_coordinate(field(lat_idx), row_no, LAT_COLUMN, origin)?;
        let longitude = parse_coordinate(field(lon_idx), row_no, LON_COLUMN, origin)?;

        records.push(Record {
            timestamp,
            latitude,
            longitude,
            base: field(base_idx).to_string(),
        });
    }

    Ok(Dataset::from_records(records))
}

/// Parse a timestamp in any of the accepted layouts.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_coordinate(s: &str, row: usize, col: &str, origin: &str) -> Result<f64, LoadError> {
    s.parse::<f64>()
        .map_err(|_| LoadError::unavailable(origin, format!("CSV row {row}: {col} '{s}' is not a number")))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::{Cursor, Write};
    use std::rc::Rc;

    use chrono::{Datelike, Timelike};
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;
    use crate::data::source::decompress_if_gzip;

    const UPSTREAM: &str = "\
Date/Time,Lat,Lon,Base
9/1/2014 0:01:00,40.2201,-74.0021,B02512
9/1/2014 0:01:00,40.7500,-74.0027,B02512
9/1/2014 5:03:00,40.7559,-73.9864,B02598
9/2/2014 17:06:00,40.7450,-73.9889,B02617
9/30/2014 23:55:00,40.8145,-73.9444,B02764
";

    /// In-memory source that counts how many times it was opened.
    struct MemorySource {
        payload: Vec<u8>,
        opens: Rc<Cell<usize>>,
    }

    impl MemorySource {
        fn new(payload: impl Into<Vec<u8>>) -> (Self, Rc<Cell<usize>>) {
            let opens = Rc::new(Cell::new(0));
            let src = MemorySource {
                payload: payload.into(),
                opens: opens.clone(),
            };
            (src, opens)
        }
    }

    impl DataSource for MemorySource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn open(&self) -> Result<Box<dyn Read>, LoadError> {
            self.opens.set(self.opens.get() + 1);
            decompress_if_gzip(Box::new(Cursor::new(self.payload.clone())))
                .map_err(|e| LoadError::unavailable("memory", e))
        }
    }

    fn gzip(text: &str) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(text.as_bytes()).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn test_parse_upstream_rows() {
        let ds = read_dataset(UPSTREAM.as_bytes(), 100, "test").unwrap();
        assert_eq!(ds.len(), 5);
        let first = &ds.records[0];
        assert_eq!(first.base, "B02512");
        assert_eq!((first.timestamp.month(), first.timestamp.day()), (9, 1));
        assert_eq!((first.timestamp.hour(), first.timestamp.minute()), (0, 1));
        assert!((first.latitude - 40.2201).abs() < 1e-9);
        assert!((first.longitude + 74.0021).abs() < 1e-9);
        assert_eq!(ds.records[3].hour(), 17);
        assert_eq!(ds.bases.len(), 4);
    }

    #[test]
    fn test_row_limit_is_an_upper_bound() {
        for limit in [1, 2, 5, 6, 1_000] {
            let ds = read_dataset(UPSTREAM.as_bytes(), limit, "test").unwrap();
            assert!(ds.len() <= limit, "limit={limit}");
            assert_eq!(ds.len(), limit.min(5));
        }
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let csv = "DATE/TIME,LAT,lon,BaSe\n2014-09-01 05:00:00,40.7,-73.9,B02512\n";
        let ds = read_dataset(csv.as_bytes(), 10, "test").unwrap();
        assert_eq!(ds.records[0].hour(), 5);
    }

    #[test]
    fn test_missing_base_column() {
        let csv = "Date/Time,Lat,Lon\n9/1/2014 0:01:00,40.2201,-74.0021\n";
        let err = read_dataset(csv.as_bytes(), 10, "test").unwrap_err();
        assert!(matches!(err, LoadError::DataUnavailable { .. }), "{err}");
        assert!(err.to_string().contains("'base'"));
    }

    #[test]
    fn test_malformed_timestamp_rejects_load() {
        let csv = "Date/Time,Lat,Lon,Base\n9/1/2014 0:01:00,40.1,-74.0,B02512\nyesterday,40.1,-74.0,B02512\n";
        match read_dataset(csv.as_bytes(), 10, "test") {
            Err(LoadError::MalformedTimestamp { row, raw }) => {
                // second data row, counted from 1 below the header
                assert_eq!(row, 2);
                assert_eq!(raw, "yesterday");
            }
            other => panic!("expected MalformedTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_row_beyond_limit_is_not_read() {
        let csv = "Date/Time,Lat,Lon,Base\n9/1/2014 0:01:00,40.1,-74.0,B02512\nyesterday,40.1,-74.0,B02512\n";
        let ds = read_dataset(csv.as_bytes(), 1, "test").unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let csv = "Date/Time,Lat,Lon,Base\n9/1/2014 0:01:00,north,-74.0,B02512\n";
        let err = read_dataset(csv.as_bytes(), 10, "test").unwrap_err();
        assert!(matches!(err, LoadError::DataUnavailable { .. }));
        assert!(err.to_string().contains("CSV row 1: lat 'north'"), "{err}");
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        assert!(parse_timestamp("9/1/2014 0:01:00").is_some());
        assert!(parse_timestamp("09/01/2014 00:01:00").is_some());
        assert!(parse_timestamp("2014-09-01T05:15:00").is_some());
        assert!(parse_timestamp("2014-09-01 05:15:00").is_some());
        assert!(parse_timestamp("2014-09-01").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_load_caches_by_row_limit() {
        let (src, opens) = MemorySource::new(gzip(UPSTREAM));
        let mut loader = Loader::new(src);

        let a = loader.load(3).unwrap();
        let b = loader.load(3).unwrap();
        assert_eq!(opens.get(), 1, "second load must be a cache hit");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.records, b.records);

        let c = loader.load(4).unwrap();
        assert_eq!(opens.get(), 2);
        assert_eq!(c.len(), 4);
        assert_eq!(loader.cache().len(), 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let (src, opens) = MemorySource::new("Date/Time,Lat,Lon\n9/1/2014 0:01:00,40.2,-74.0\n");
        let mut loader = Loader::new(src);

        assert!(matches!(loader.load(10), Err(LoadError::DataUnavailable { .. })));
        assert!(!loader.cache().contains(10));
        assert!(loader.load(10).is_err());
        assert_eq!(opens.get(), 2, "a failure must be retried on the next call");
    }

    #[test]
    fn test_truncated_gzip_is_unavailable() {
        let mut bytes = gzip(UPSTREAM);
        bytes.truncate(bytes.len() / 2);
        let (src, _) = MemorySource::new(bytes);
        let mut loader = Loader::new(src);
        assert!(matches!(loader.load(1_000), Err(LoadError::DataUnavailable { .. })));
    }

    #[test]
    fn test_zero_row_limit() {
        let (src, opens) = MemorySource::new(UPSTREAM);
        let mut loader = Loader::new(src);
        assert!(matches!(loader.load(0), Err(LoadError::InvalidRowLimit(0))));
        assert_eq!(opens.get(), 0);
    }

    #[test]
    fn test_injected_cache_is_served_without_fetch() {
        let mut cache = DatasetCache::new();
        cache.insert(7, Arc::new(crate::data::model::fixtures::three_pickups()));
        let (src, opens) = MemorySource::new(UPSTREAM);
        let mut loader = Loader::with_cache(src, cache);

        assert_eq!(loader.load(7).unwrap().len(), 3);
        assert_eq!(opens.get(), 0);
    }
}
