//! Error types for loading and analysing trip datasets.

use thiserror::Error;

/// An error that can occur while resolving, reading or parsing a city's trip data.
#[derive(Error, Debug)]
pub enum Error {
    /// The city is not part of the configured registry
    #[error("unknown city '{0}'")]
    UnknownCity(String),
    /// The source could not be opened, fetched or decompressed
    #[error("cannot read trip data from '{location}': {reason}")]
    SourceUnavailable {
        /// Path or URL of the source
        location: String,
        /// What went wrong while reading it
        reason: String,
    },
    /// A record carries a value that cannot be parsed
    #[error("line {line}: '{value}' is not a valid {field}")]
    MalformedRecord {
        /// 1-based line number in the source, header included
        line: u64,
        /// Header name of the offending column
        field: &'static str,
        /// Raw cell content
        value: String,
    },
    /// A column every dataset needs is absent from the header
    #[error("required column '{0}' is missing from the header")]
    MissingColumn(&'static str),
    /// A month or day selection outside the recognised values
    #[error("'{value}' is not a valid {kind} filter")]
    InvalidFilter {
        /// "month" or "day"
        kind: &'static str,
        /// The rejected input
        value: String,
    },
    /// The registry configuration file could not be used
    #[error("invalid registry configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
