//! Blank metadata parts written when a document is stripped.

use docmeta_core::types::{OFFICE_APP_ENTRY, OFFICE_CORE_ENTRY, OPENOFFICE_META_ENTRY};
use docmeta_core::Dialect;

/// Empty extended-properties part.
pub const BLANK_APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"></Properties>"#;

/// Empty core-properties part.
pub const BLANK_CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"></cp:coreProperties>"#;

/// Empty OpenDocument meta part.
pub const BLANK_META_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:xlink="http://www.w3.org/1999/xlink" office:version="1.1"></office:document-meta>"#;

/// Entry name and blank content for each metadata part of `dialect`.
pub fn blank_parts(dialect: Dialect) -> &'static [(&'static str, &'static str)] {
    match dialect {
        Dialect::Office => &[
            (OFFICE_CORE_ENTRY, BLANK_CORE_XML),
            (OFFICE_APP_ENTRY, BLANK_APP_XML),
        ],
        Dialect::OpenOffice => &[(OPENOFFICE_META_ENTRY, BLANK_META_XML)],
    }
}
