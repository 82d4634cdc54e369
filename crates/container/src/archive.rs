//! ZIP container access and entry-preserving rewrites.

use docmeta_core::{Dialect, Error, Result};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// An opened document container backed by the caller's bytes.
pub struct Container<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Container<'a> {
    /// Open a container from raw bytes. The bytes are never modified.
    pub fn open(data: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self { archive })
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names()
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.entry_names().any(|entry| entry == name)
    }

    /// Classify the container, failing when no metadata dialect is present.
    pub fn dialect(&self) -> Result<Dialect> {
        let dialect = Dialect::detect(self.entry_names()).ok_or(Error::UnsupportedContainer)?;
        log::debug!("Detected {} container", dialect);
        Ok(dialect)
    }

    /// Read an entry as UTF-8 text.
    pub fn read_text(&mut self, name: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", name, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?;

        Ok(content)
    }

    /// Write a new container with `patch` applied.
    ///
    /// Untouched entries are raw-copied without recompression, and replaced
    /// entries keep their position.
    pub fn rewrite(&mut self, patch: &ContainerPatch) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut written: HashSet<&str> = HashSet::new();

        for i in 0..self.archive.len() {
            let entry = self
                .archive
                .by_index_raw(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;
            let name = entry.name().to_string();

            if patch.removals.contains(&name) {
                log::debug!("Dropping '{}'", name);
                continue;
            }

            match patch.replacements.get_key_value(&name) {
                Some((key, content)) => {
                    let options = FileOptions::default().compression_method(entry.compression());
                    drop(entry);
                    write_entry(&mut writer, key, content, options)?;
                    written.insert(key.as_str());
                }
                None => writer
                    .raw_copy_file(entry)
                    .map_err(|e| Error::ZipError(format!("Failed to copy '{}': {}", name, e)))?,
            }
        }

        for (name, content) in &patch.replacements {
            if !written.contains(name.as_str()) {
                write_entry(&mut writer, name, content, FileOptions::default())?;
            }
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

fn write_entry(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    content: &[u8],
    options: FileOptions,
) -> Result<()> {
    log::debug!("Writing '{}' ({} bytes)", name, content.len());
    writer
        .start_file(name, options)
        .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
    writer.write_all(content)?;
    Ok(())
}

/// Pending changes to a container's entries.
#[derive(Debug, Clone, Default)]
pub struct ContainerPatch {
    replacements: IndexMap<String, Vec<u8>>,
    removals: HashSet<String>,
}

impl ContainerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or add) an entry.
    pub fn replace(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        let name = name.into();
        self.removals.remove(&name);
        self.replacements.insert(name, content.into());
        self
    }

    /// Drop an entry.
    pub fn remove(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.replacements.shift_remove(&name);
        self.removals.insert(name);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty() && self.removals.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an in-memory zip with deflated entries.
    pub(crate) fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            let options = if *name == "mimetype" {
                FileOptions::default().compression_method(zip::CompressionMethod::Stored)
            } else {
                FileOptions::default()
            };
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Entry names in archive order.
    pub(crate) fn ordered_names(container: &mut Container<'_>) -> Vec<String> {
        (0..container.archive.len())
            .map(|i| container.archive.by_index_raw(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_open_and_read() {
        let data = build_zip(&[("a.txt", "alpha"), ("dir/b.xml", "<b/>")]);
        let mut container = Container::open(&data).unwrap();

        assert!(container.has_entry("dir/b.xml"));
        assert!(!container.has_entry("b.xml"));
        assert_eq!(container.read_text("a.txt").unwrap(), "alpha");
        assert!(matches!(
            container.read_text("missing"),
            Err(Error::ZipError(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            Container::open(b"definitely not a zip"),
            Err(Error::ZipError(_))
        ));
    }

    #[test]
    fn test_unrecognized_dialect() {
        let data = build_zip(&[("word/document.xml", "<w:document/>")]);
        let container = Container::open(&data).unwrap();
        assert!(matches!(container.dialect(), Err(Error::UnsupportedContainer)));
    }

    #[test]
    fn test_rewrite_keeps_order_and_untouched_entries() {
        let data = build_zip(&[
            ("mimetype", "application/vnd.oasis.opendocument.text"),
            ("meta.xml", "<old/>"),
            ("content.xml", "<content/>"),
            ("extra.xml", "<x/>"),
        ]);
        let mut container = Container::open(&data).unwrap();
        let mut patch = ContainerPatch::new();
        patch.replace("meta.xml", "<new/>").remove("extra.xml");
        let out = container.rewrite(&patch).unwrap();

        let mut rewritten = Container::open(&out).unwrap();
        assert_eq!(
            ordered_names(&mut rewritten),
            ["mimetype", "meta.xml", "content.xml"]
        );
        assert_eq!(rewritten.read_text("meta.xml").unwrap(), "<new/>");
        assert_eq!(rewritten.read_text("content.xml").unwrap(), "<content/>");
        assert_eq!(
            rewritten.read_text("mimetype").unwrap(),
            "application/vnd.oasis.opendocument.text"
        );
    }

    #[test]
    fn test_rewrite_adds_new_entries_last() {
        let data = build_zip(&[("a.txt", "a")]);
        let mut container = Container::open(&data).unwrap();
        let mut patch = ContainerPatch::new();
        patch.replace("b.txt", "b");
        let out = container.rewrite(&patch).unwrap();

        let mut rewritten = Container::open(&out).unwrap();
        assert_eq!(ordered_names(&mut rewritten), ["a.txt", "b.txt"]);
    }

    #[test]
    fn test_patch_last_call_wins() {
        let mut patch = ContainerPatch::new();
        assert!(patch.is_empty());
        patch.replace("x", "1").remove("x");
        assert!(patch.replacements.is_empty());
        patch.replace("x", "2");
        assert!(patch.removals.is_empty());
        assert!(!patch.is_empty());
    }
}
