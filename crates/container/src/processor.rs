//! Extract, edit, and strip operations over whole containers.

use crate::archive::{Container, ContainerPatch};
use crate::blank::blank_parts;
use crate::edit::apply_edits;
use crate::flatten::flatten;
use crate::parts::load_metadata_parts;
use docmeta_core::{Dialect, EditableMap, MetaLeaf, Metadata, MetadataTranslator, PropertyTable, Result};

/// Runs metadata operations on document bytes.
///
/// Every call opens and parses its own copy of the container, so a single
/// processor can be shared freely. Input bytes are never modified.
#[derive(Debug, Clone, Copy)]
pub struct MetadataProcessor<'t> {
    translator: MetadataTranslator<'t>,
}

impl MetadataProcessor<'static> {
    /// Create a processor over the standard property table.
    pub fn new() -> Self {
        Self::with_table(PropertyTable::standard())
    }
}

impl Default for MetadataProcessor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> MetadataProcessor<'t> {
    pub fn with_table(table: &'t PropertyTable) -> Self {
        Self {
            translator: MetadataTranslator::new(table),
        }
    }

    /// Detect the metadata dialect of a container.
    pub fn detect(&self, data: &[u8]) -> Result<Dialect> {
        Container::open(data)?.dialect()
    }

    /// Read the metadata of a container.
    pub fn extract(&self, data: &[u8]) -> Result<Metadata> {
        self.extract_with_dialect(data).map(|(_, metadata)| metadata)
    }

    /// Read the metadata of a container along with its detected dialect.
    pub fn extract_with_dialect(&self, data: &[u8]) -> Result<(Dialect, Metadata)> {
        let mut container = Container::open(data)?;
        let dialect = container.dialect()?;

        let leaves: Vec<MetaLeaf> = load_metadata_parts(&mut container, dialect)?
            .iter()
            .flat_map(|part| flatten(&part.document))
            .collect();
        log::debug!("Flattened {} leaves", leaves.len());

        Ok((dialect, self.translator.translate(&leaves)))
    }

    /// Write `editable` back into the container and return the new bytes.
    ///
    /// Every record is applied to every metadata part. Entries other than
    /// the metadata parts are copied through untouched.
    pub fn edit(&self, data: &[u8], editable: &EditableMap) -> Result<Vec<u8>> {
        let mut container = Container::open(data)?;
        let dialect = container.dialect()?;

        let mut patch = ContainerPatch::new();
        for mut part in load_metadata_parts(&mut container, dialect)? {
            let written = apply_edits(&mut part.document, editable);
            log::debug!("Updated {} element(s) in '{}'", written, part.entry);
            patch.replace(part.entry, part.document.to_xml_string()?);
        }

        container.rewrite(&patch)
    }

    /// Replace all metadata with blank parts and return the new bytes.
    pub fn remove(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut container = Container::open(data)?;
        let dialect = container.dialect()?;

        let mut patch = ContainerPatch::new();
        for (entry, blank) in blank_parts(dialect) {
            patch.replace(*entry, *blank);
        }
        for entry in dialect.auxiliary_entries() {
            if container.has_entry(entry) {
                log::debug!("Removing auxiliary entry '{}'", entry);
                patch.remove(*entry);
            }
        }

        container.rewrite(&patch)
    }
}
