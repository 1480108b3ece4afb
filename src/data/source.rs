use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

use flate2::read::MultiGzDecoder;

use super::error::LoadError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// ---------------------------------------------------------------------------
// DataSource – where the CSV bytes come from
// ---------------------------------------------------------------------------

/// A readable CSV payload, possibly gzip-compressed.
pub trait DataSource {
    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;

    /// Open a fresh stream over the raw payload.
    fn open(&self) -> Result<Box<dyn Read>, LoadError>;
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn open(&self) -> Result<Box<dyn Read>, LoadError> {
        (**self).open()
    }
}

/// Wrap `raw` in a gzip decoder when it starts with the gzip magic bytes.
///
/// Works whether or not the HTTP layer already stripped a
/// `Content-Encoding: gzip`.
pub fn decompress_if_gzip(raw: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
    let mut buffered = BufReader::new(raw);
    let is_gzip = buffered.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        Ok(Box::new(MultiGzDecoder::new(buffered)))
    } else {
        Ok(Box::new(buffered))
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// The fixed remote resource, fetched with a blocking GET.
///
/// The response body is streamed, so only as many bytes as the loader
/// consumes are transferred.
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| LoadError::unavailable(url.clone(), e))?;
        Ok(HttpSource { url, client })
    }
}

impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn open(&self) -> Result<Box<dyn Read>, LoadError> {
        log::info!("Fetching {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| LoadError::unavailable(self.describe(), e))?;
        decompress_if_gzip(Box::new(response)).map_err(|e| LoadError::unavailable(self.describe(), e))
    }
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

/// A CSV (or `.csv.gz`) file on disk, picked from the File menu.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Box<dyn Read>, LoadError> {
        let file = std::fs::File::open(&self.path).map_err(|e| LoadError::unavailable(self.describe(), e))?;
        decompress_if_gzip(Box::new(file)).map_err(|e| LoadError::unavailable(self.describe(), e))
    }
}
