//! Error types for office document metadata handling.

use crate::properties::ValueKind;
use crate::types::Dialect;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an extract, edit, or remove operation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The container holds neither office nor openoffice metadata entries.
    #[error("File not valid: no office or openoffice metadata found")]
    UnsupportedContainer,

    /// The dialect was detected but one of its metadata entries could not be read.
    #[error("Missing metadata entry '{entry}' in {dialect} container")]
    MissingMetadataEntry { dialect: Dialect, entry: String },

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or serialization error.
    #[error("XML error: {0}")]
    XmlError(String),
}

/// Non-fatal conversion failures.
///
/// These only ever affect the display value of a single property; the raw
/// value is always kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// A duration or minute count could not be parsed.
    #[error("Malformed duration: '{value}'")]
    MalformedDuration { value: String },

    /// An enumerated value fell outside the known set.
    #[error("Unrecognized {kind} value: '{value}'")]
    UnrecognizedEnumValue { kind: ValueKind, value: String },

    /// A timestamp could not be parsed.
    #[error("Invalid date: '{value}'")]
    InvalidDate { value: String },
}

impl ConversionError {
    /// Display string used in place of a value that failed to convert.
    pub fn fallback_display(&self) -> &'static str {
        match self {
            Self::MalformedDuration { .. } => "",
            Self::UnrecognizedEnumValue { .. } => "Unknown",
            Self::InvalidDate { .. } => "Invalid Date",
        }
    }
}
