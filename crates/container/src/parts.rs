//! Loading the metadata parts of a container.

use crate::archive::Container;
use crate::tree::XmlDocument;
use docmeta_core::{Dialect, Error, Result};

/// One parsed metadata entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPart {
    pub entry: &'static str,
    pub document: XmlDocument,
}

/// Read and parse every metadata entry of `dialect`, in load order
/// (`core.xml` before `app.xml` for office containers).
pub fn load_metadata_parts(
    container: &mut Container<'_>,
    dialect: Dialect,
) -> Result<Vec<MetadataPart>> {
    dialect
        .metadata_entries()
        .iter()
        .map(|&entry| {
            if !container.has_entry(entry) {
                return Err(Error::MissingMetadataEntry {
                    dialect,
                    entry: entry.to_string(),
                });
            }

            let text = container.read_text(entry)?;
            let document = XmlDocument::parse(&text).map_err(|e| match e {
                Error::XmlError(msg) => Error::XmlError(format!("'{}': {}", entry, msg)),
                other => other,
            })?;
            log::debug!("Loaded '{}' ({} bytes)", entry, text.len());

            Ok(MetadataPart { entry, document })
        })
        .collect()
}
