//! Domain types for representing extracted document metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Core properties part of an office container.
pub const OFFICE_CORE_ENTRY: &str = "docProps/core.xml";
/// Extended (application) properties part of an office container.
pub const OFFICE_APP_ENTRY: &str = "docProps/app.xml";
/// Custom properties part of an office container.
pub const OFFICE_CUSTOM_ENTRY: &str = "docProps/custom.xml";
/// Combined metadata part of an openoffice container.
pub const OPENOFFICE_META_ENTRY: &str = "meta.xml";

/// The metadata encoding used by a document container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Office Open XML: `docProps/core.xml` plus `docProps/app.xml`.
    Office,
    /// OpenDocument: a single `meta.xml`.
    OpenOffice,
}

impl Dialect {
    /// Classify a container by the entry names it holds.
    ///
    /// Returns `None` when the container is unrecognized.
    pub fn detect<'a, I>(entry_names: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut has_core = false;
        let mut has_app = false;
        let mut has_meta = false;

        for name in entry_names {
            match name {
                OFFICE_CORE_ENTRY => has_core = true,
                OFFICE_APP_ENTRY => has_app = true,
                OPENOFFICE_META_ENTRY => has_meta = true,
                _ => {}
            }
        }

        if has_core && has_app {
            Some(Self::Office)
        } else if has_meta {
            Some(Self::OpenOffice)
        } else {
            None
        }
    }

    /// Entries holding metadata, in load order.
    pub fn metadata_entries(&self) -> &'static [&'static str] {
        match self {
            Self::Office => &[OFFICE_CORE_ENTRY, OFFICE_APP_ENTRY],
            Self::OpenOffice => &[OPENOFFICE_META_ENTRY],
        }
    }

    /// Auxiliary entries dropped when metadata is stripped.
    pub fn auxiliary_entries(&self) -> &'static [&'static str] {
        match self {
            Self::Office => &[OFFICE_CUSTOM_ENTRY],
            Self::OpenOffice => &[],
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Office => f.write_str("office"),
            Self::OpenOffice => f.write_str("openoffice"),
        }
    }
}

/// Known document formats and their MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Docx,
    Dotx,
    Docm,
    Dotm,
    Xlsx,
    Xlsm,
    Xlsb,
    Xltx,
    Xltm,
    Pptx,
    Ppsx,
    Ppsm,
    Pptm,
    Potx,
    Potm,
    Odt,
    Odp,
    Ods,
    Ots,
    Otp,
    Ott,
}

impl DocumentFormat {
    const ALL: [DocumentFormat; 21] = [
        Self::Docx,
        Self::Dotx,
        Self::Docm,
        Self::Dotm,
        Self::Xlsx,
        Self::Xlsm,
        Self::Xlsb,
        Self::Xltx,
        Self::Xltm,
        Self::Pptx,
        Self::Ppsx,
        Self::Ppsm,
        Self::Pptm,
        Self::Potx,
        Self::Potm,
        Self::Odt,
        Self::Odp,
        Self::Ods,
        Self::Ots,
        Self::Otp,
        Self::Ott,
    ];

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Detect format from the extension of a file name or path.
    pub fn from_filename(filename: &str) -> Option<Self> {
        filename
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
    }

    /// Check for the ZIP local file header magic (`PK\x03\x04`).
    pub fn is_zip(bytes: &[u8]) -> bool {
        bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04])
    }

    /// Canonical lowercase file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Dotx => "dotx",
            Self::Docm => "docm",
            Self::Dotm => "dotm",
            Self::Xlsx => "xlsx",
            Self::Xlsm => "xlsm",
            Self::Xlsb => "xlsb",
            Self::Xltx => "xltx",
            Self::Xltm => "xltm",
            Self::Pptx => "pptx",
            Self::Ppsx => "ppsx",
            Self::Ppsm => "ppsm",
            Self::Pptm => "pptm",
            Self::Potx => "potx",
            Self::Potm => "potm",
            Self::Odt => "odt",
            Self::Odp => "odp",
            Self::Ods => "ods",
            Self::Ots => "ots",
            Self::Otp => "otp",
            Self::Ott => "ott",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Dotx => "application/vnd.openxmlformats-officedocument.wordprocessingml.template",
            Self::Docm => "application/vnd.ms-word.document.macroEnabled.12",
            Self::Dotm => "application/vnd.ms-word.template.macroEnabled.12",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xlsm => "application/vnd.ms-excel.sheet.macroEnabled.12",
            Self::Xlsb => "application/vnd.ms-excel.sheet.binary.macroEnabled.12",
            Self::Xltx => "application/vnd.openxmlformats-officedocument.spreadsheetml.template",
            Self::Xltm => "application/vnd.ms-excel.template.macroEnabled.12",
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Ppsx => "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
            Self::Ppsm => "application/vnd.ms-powerpoint.slideshow.macroEnabled.12",
            Self::Pptm => "application/vnd.ms-powerpoint.presentation.macroEnabled.12",
            Self::Potx => "application/vnd.openxmlformats-officedocument.presentationml.template",
            Self::Potm => "application/vnd.ms-powerpoint.template.macroEnabled.12",
            Self::Odt => "application/vnd.oasis.opendocument.text",
            Self::Odp => "application/vnd.oasis.opendocument.presentation",
            Self::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            Self::Ots => "application/vnd.oasis.opendocument.spreadsheet-template",
            Self::Otp => "application/vnd.oasis.opendocument.presentation-template",
            Self::Ott => "application/vnd.oasis.opendocument.text-template",
        }
    }

    /// The metadata dialect files of this format normally carry.
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Odt | Self::Odp | Self::Ods | Self::Ots | Self::Otp | Self::Ott => {
                Dialect::OpenOffice
            }
            _ => Dialect::Office,
        }
    }
}

/// A flattened, path-addressed leaf of a metadata document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaLeaf {
    /// Slash-joined element names from below the root down to the leaf,
    /// with `@name` as the last segment for attribute leaves.
    pub path: String,

    /// Text content or attribute value.
    pub value: String,
}

impl MetaLeaf {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// A property value: one string, or several when a property repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Add another occurrence, promoting a scalar to a two-element list.
    pub fn push(&mut self, value: String) {
        match self {
            Self::Scalar(first) => {
                let first = std::mem::take(first);
                *self = Self::List(vec![first, value]);
            }
            Self::List(values) => values.push(value),
        }
    }

    /// The value to write into the `index`-th matching node.
    ///
    /// Lists clamp to their last element once `index` runs past the end.
    pub fn value_for_match(&self, index: usize) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(values) => values
                .get(index)
                .or_else(|| values.last())
                .map(String::as_str),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(values) => Some(values),
        }
    }

    fn into_first(self) -> String {
        match self {
            Self::Scalar(value) => value,
            Self::List(values) => values.into_iter().next().unwrap_or_default(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.write_str(value),
            Self::List(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

/// An editable property as returned by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableRecord {
    /// Raw value as stored in the document. Callers edit this field.
    pub value: PropertyValue,

    /// Human-readable rendering of `value`.
    pub display_value: PropertyValue,

    /// Path of the first leaf this record came from; used to locate the
    /// target nodes when edits are written back.
    pub xml_path: String,
}

impl EditableRecord {
    pub fn new(value: String, display_value: String, xml_path: impl Into<String>) -> Self {
        Self {
            value: PropertyValue::Scalar(value),
            display_value: PropertyValue::Scalar(display_value),
            xml_path: xml_path.into(),
        }
    }

    /// Fold a later occurrence of the same property into this record.
    pub fn merge(&mut self, other: EditableRecord) {
        self.value.push(other.value.into_first());
        self.display_value.push(other.display_value.into_first());
    }
}

/// A read-only grouped property (heading pairs / titles of parts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOnlyRecord {
    pub value: Vec<String>,
    pub display_value: Vec<String>,
}

impl ReadOnlyRecord {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            display_value: values.clone(),
            value: values,
        }
    }
}

/// Editable properties keyed by friendly name (or raw path when unknown).
pub type EditableMap = IndexMap<String, EditableRecord>;

/// Read-only groups keyed by heading name.
pub type ReadOnlyMap = IndexMap<String, ReadOnlyRecord>;

/// Everything extracted from one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub editable: EditableMap,
    pub read_only: ReadOnlyMap,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.editable.is_empty() && self.read_only.is_empty()
    }
}
