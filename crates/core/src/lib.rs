//! Core domain types, property table, and metadata translation for
//! office document metadata.

pub mod convert;
pub mod error;
pub mod properties;
pub mod translate;
pub mod types;

pub use convert::{parse_timestamp, pluralize_minutes, Iso8601Duration};
pub use error::{ConversionError, Error, Result};
pub use properties::{PropertyDescriptor, PropertyTable, ValueKind, PROPERTY_DESCRIPTORS};
pub use translate::MetadataTranslator;
pub use types::{
    Dialect, DocumentFormat, EditableMap, EditableRecord, MetaLeaf, Metadata, PropertyValue,
    ReadOnlyMap, ReadOnlyRecord,
};
