//! WASM-compatible wrapper for office document metadata.
//!
//! Exposes extraction, editing, and stripping over byte buffers to
//! JavaScript callers in browsers and workers.

use docmeta_container::MetadataProcessor;
use docmeta_core::{Dialect, DocumentFormat, EditableMap, Metadata};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of extracting metadata from a document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Metadata dialect of the container (`office` or `openoffice`).
    pub dialect: Dialect,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// Extract metadata from a document.
///
/// # Arguments
/// * `data` - The raw bytes of the document
///
/// # Returns
/// A plain object `{ dialect, editable, readOnly }`, or throws on error.
#[wasm_bindgen]
pub fn extract_metadata(data: &[u8]) -> Result<JsValue, JsValue> {
    let result = extract_metadata_impl(data).map_err(|e| JsValue::from_str(&e))?;

    // Plain objects rather than `Map`s, so the result reads like JSON.
    result
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn extract_metadata_impl(data: &[u8]) -> Result<ExtractionResult, String> {
    check_zip(data)?;

    let (dialect, metadata) = MetadataProcessor::new()
        .extract_with_dialect(data)
        .map_err(|e| e.to_string())?;

    Ok(ExtractionResult { dialect, metadata })
}

/// Write edited properties back into a document.
///
/// # Arguments
/// * `data` - The raw bytes of the document
/// * `editable` - The `editable` object returned by `extract_metadata`,
///   with values changed
///
/// # Returns
/// The bytes of the edited document.
#[wasm_bindgen]
pub fn edit_metadata(data: &[u8], editable: JsValue) -> Result<Vec<u8>, JsValue> {
    let editable: EditableMap = serde_wasm_bindgen::from_value(editable)
        .map_err(|e| JsValue::from_str(&format!("Invalid editable metadata: {}", e)))?;

    edit_metadata_impl(data, &editable).map_err(|e| JsValue::from_str(&e))
}

fn edit_metadata_impl(data: &[u8], editable: &EditableMap) -> Result<Vec<u8>, String> {
    check_zip(data)?;
    MetadataProcessor::new()
        .edit(data, editable)
        .map_err(|e| e.to_string())
}

/// Strip all metadata from a document and return the new bytes.
#[wasm_bindgen]
pub fn remove_metadata(data: &[u8]) -> Result<Vec<u8>, JsValue> {
    remove_metadata_impl(data).map_err(|e| JsValue::from_str(&e))
}

fn remove_metadata_impl(data: &[u8]) -> Result<Vec<u8>, String> {
    check_zip(data)?;
    MetadataProcessor::new()
        .remove(data)
        .map_err(|e| e.to_string())
}

/// MIME type for a filename, if its extension is a supported document format.
#[wasm_bindgen]
pub fn mime_type_for(filename: &str) -> Option<String> {
    DocumentFormat::from_filename(filename).map(|format| format.mime_type().to_string())
}

fn check_zip(data: &[u8]) -> Result<(), String> {
    if DocumentFormat::is_zip(data) {
        Ok(())
    } else {
        Err("File not valid: not a zip-based office document".to_string())
    }
}
