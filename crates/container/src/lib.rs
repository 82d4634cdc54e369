//! Zip/XML backend for office document metadata.
//!
//! Office Open XML containers keep metadata in `docProps/core.xml` and
//! `docProps/app.xml`; OpenDocument containers keep it in `meta.xml`. This
//! crate opens the container, parses those parts into mutable trees, and
//! writes them back after editing or stripping.

pub mod archive;
pub mod blank;
pub mod edit;
pub mod flatten;
pub mod parts;
pub mod processor;
pub mod tree;

pub use archive::{Container, ContainerPatch};
pub use edit::{apply_edits, EditTarget};
pub use flatten::flatten;
pub use parts::{load_metadata_parts, MetadataPart};
pub use processor::MetadataProcessor;
pub use tree::{XmlDocument, XmlElement, XmlNode};

use docmeta_core::{EditableMap, Metadata, Result};

/// Extract metadata using the standard property table.
pub fn extract(data: &[u8]) -> Result<Metadata> {
    MetadataProcessor::new().extract(data)
}

/// Apply edited records and return the rewritten container.
pub fn edit(data: &[u8], editable: &EditableMap) -> Result<Vec<u8>> {
    MetadataProcessor::new().edit(data, editable)
}

/// Strip all metadata and return the rewritten container.
pub fn remove(data: &[u8]) -> Result<Vec<u8>> {
    MetadataProcessor::new().remove(data)
}
