//! Static table mapping metadata paths to friendly names and value kinds.
//!
//! Office paths are relative to the `cp:coreProperties` / `Properties` root,
//! openoffice paths to the `office:document-meta` root. Keys are matched
//! verbatim, namespace prefix included.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// How a raw property value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Date,
    DocSecurityEnum,
    Boolean,
    Iso8601Duration,
    IntMinutes,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Date => "date",
            Self::DocSecurityEnum => "document security",
            Self::Boolean => "boolean",
            Self::Iso8601Duration => "ISO-8601 duration",
            Self::IntMinutes => "minute count",
        };
        f.write_str(name)
    }
}

/// A known property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub friendly_name: &'static str,
    pub kind: ValueKind,
}

const fn prop(friendly_name: &'static str, kind: ValueKind) -> PropertyDescriptor {
    PropertyDescriptor {
        friendly_name,
        kind,
    }
}

use ValueKind as K;

/// Every path the resolver knows about.
///
/// `Slide Titles`, `Title`, `Theme` and `Worksheets` are heading texts rather
/// than paths; they name the read-only groups rebuilt from heading pairs.
pub const PROPERTY_DESCRIPTORS: &[(&str, PropertyDescriptor)] = &[
    // office: docProps/core.xml
    ("cp:category", prop("category", K::String)),
    ("cp:contentStatus", prop("contentStatus", K::String)),
    ("cp:keywords", prop("keywords", K::String)),
    ("cp:lastModifiedBy", prop("lastModifiedBy", K::String)),
    ("cp:lastPrinted", prop("lastPrinted", K::Date)),
    ("cp:revision", prop("revisionNumber", K::Integer)),
    ("dc:creator", prop("creator", K::String)),
    ("dc:description", prop("description", K::String)),
    ("dc:language", prop("language", K::String)),
    ("dc:subject", prop("subject", K::String)),
    ("dc:title", prop("title", K::String)),
    ("dcterms:created", prop("created", K::Date)),
    ("dcterms:modified", prop("modified", K::Date)),
    // office: docProps/app.xml
    ("Application", prop("application", K::String)),
    ("AppVersion", prop("appVersion", K::Float)),
    ("Characters", prop("characters", K::Integer)),
    ("CharactersWithSpaces", prop("charactersWithSpaces", K::Integer)),
    ("Company", prop("company", K::String)),
    ("DocSecurity", prop("docSecurity", K::DocSecurityEnum)),
    ("HiddenSlides", prop("hiddenSlides", K::Integer)),
    ("HyperlinkBase", prop("hyperlinkBase", K::String)),
    ("HyperlinksChanged", prop("hyperlinksChanged", K::Boolean)),
    ("Lines", prop("lines", K::Integer)),
    ("LinksUpToDate", prop("linksUpToDate", K::Boolean)),
    ("Manager", prop("manager", K::String)),
    ("MMClips", prop("mmClips", K::String)),
    ("Notes", prop("notes", K::String)),
    ("Pages", prop("pages", K::Integer)),
    ("Paragraphs", prop("paragraphs", K::Integer)),
    ("PresentationFormat", prop("presentationFormat", K::String)),
    ("ScaleCrop", prop("scaleCrop", K::Boolean)),
    ("SharedDoc", prop("sharedDoc", K::Boolean)),
    ("Slides", prop("slides", K::Integer)),
    ("Template", prop("template", K::String)),
    ("TotalTime", prop("totalTime", K::IntMinutes)),
    ("Words", prop("words", K::Integer)),
    // office: heading pair names
    ("Slide Titles", prop("slideTitles", K::String)),
    ("Theme", prop("theme", K::String)),
    ("Title", prop("titles", K::String)),
    ("Worksheets", prop("worksheets", K::String)),
    // openoffice: meta.xml
    ("office:meta/dc:creator", prop("lastModifiedBy", K::String)),
    ("office:meta/dc:date", prop("modified", K::Date)),
    ("office:meta/meta:creation-date", prop("created", K::Date)),
    ("office:meta/meta:editing-cycles", prop("revision", K::Integer)),
    ("office:meta/meta:editing-duration", prop("totalTime", K::Iso8601Duration)),
    ("office:meta/meta:generator", prop("application", K::String)),
    ("office:meta/meta:initial-creator", prop("creator", K::String)),
    ("office:meta/meta:template", prop("template", K::String)),
    ("office:meta/meta:template/@xlink:href", prop("template", K::String)),
    ("office:meta/meta:template/@xlink:type", prop("templateType", K::String)),
    (
        "office:meta/meta:document-statistic/@meta:character-count",
        prop("characters", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:image-count",
        prop("images", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:non-whitespace-character-count",
        prop("whitespaceCharacters", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:object-count",
        prop("objects", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:page-count",
        prop("pages", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:paragraph-count",
        prop("paragraphs", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:row-count",
        prop("rows", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:table-count",
        prop("tables", K::String),
    ),
    (
        "office:meta/meta:document-statistic/@meta:word-count",
        prop("words", K::String),
    ),
];

static STANDARD_TABLE: LazyLock<PropertyTable> =
    LazyLock::new(|| PropertyTable::from_entries(PROPERTY_DESCRIPTORS));

/// Lookup table over property descriptors, keyed by exact path.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    entries: HashMap<&'static str, PropertyDescriptor>,
}

impl PropertyTable {
    /// The built-in table for both dialects.
    pub fn standard() -> &'static PropertyTable {
        &STANDARD_TABLE
    }

    /// Build a table from `(path, descriptor)` pairs. Later duplicates win.
    pub fn from_entries(entries: &[(&'static str, PropertyDescriptor)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&PropertyDescriptor> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
