//! Reading raw trip files from disk or over HTTP.

use flate2::read::GzDecoder;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Where a trip file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Path(PathBuf),
    Url(String),
}

impl Location {
    /// `http(s)://` sources become URLs; anything else is a path, joined to
    /// `data_dir` when relative.
    pub fn parse(source: &str, data_dir: &Path) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Location::Url(source.to_string())
        } else {
            Location::Path(data_dir.join(source))
        }
    }

    fn is_gzip(&self) -> bool {
        match self {
            Location::Path(path) => path.extension().is_some_and(|ext| ext == "gz"),
            Location::Url(url) => url.ends_with(".gz"),
        }
    }

    /// Opens the source for reading, decompressing `.gz` files on the fly.
    pub fn open(&self) -> Result<Box<dyn Read>> {
        let raw: Box<dyn Read> = match self {
            Location::Path(path) => {
                let file = File::open(path).map_err(|e| self.unavailable(e))?;
                Box::new(BufReader::new(file))
            }
            Location::Url(url) => Box::new(Cursor::new(
                fetch_bytes(url).map_err(|e| self.unavailable(e))?,
            )),
        };

        if self.is_gzip() {
            debug!(location = %self, "Decompressing gzip source");
            Ok(Box::new(GzDecoder::new(raw)))
        } else {
            Ok(raw)
        }
    }

    pub(crate) fn unavailable(&self, reason: impl fmt::Display) -> Error {
        Error::SourceUnavailable {
            location: self.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(path) => write!(f, "{}", path.display()),
            Location::Url(url) => f.write_str(url),
        }
    }
}

#[tracing::instrument(fields(source = %url))]
fn fetch_bytes(url: &str) -> reqwest::Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = resp.bytes()?.to_vec();
    debug!(bytes = bytes.len(), "Source bytes received");
    Ok(bytes)
}
