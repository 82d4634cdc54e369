//! Translation of flattened metadata leaves into editable and read-only records.
//!
//! Office `app.xml` stores grouped lists (slide titles, worksheet names, ...)
//! as a flat run of `HeadingPairs` name/count leaves followed by a flat run of
//! `TitlesOfParts` values. Those are regrouped into read-only records; every
//! other leaf becomes an editable record.

use crate::properties::PropertyTable;
use crate::types::{EditableMap, EditableRecord, MetaLeaf, Metadata, ReadOnlyMap, ReadOnlyRecord};

/// Path of a heading name inside `HeadingPairs`.
pub const HEADING_NAME_PATH: &str = "HeadingPairs/vt:vector/vt:variant/vt:lpstr";
/// Path of a heading count inside `HeadingPairs`.
pub const HEADING_COUNT_PATH: &str = "HeadingPairs/vt:vector/vt:variant/vt:i4";
/// Path of a part title inside `TitlesOfParts`.
pub const PART_TITLE_PATH: &str = "TitlesOfParts/vt:vector/vt:lpstr";

/// A heading being filled with part titles.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeadingPair {
    name: String,
    declared_count: usize,
    collected_values: Vec<String>,
}

impl HeadingPair {
    fn has_capacity(&self) -> bool {
        self.collected_values.len() < self.declared_count
    }
}

/// Turns flattened leaves into [`Metadata`] using a property table.
#[derive(Debug, Clone, Copy)]
pub struct MetadataTranslator<'t> {
    table: &'t PropertyTable,
}

impl Default for MetadataTranslator<'static> {
    fn default() -> Self {
        Self::new(PropertyTable::standard())
    }
}

impl<'t> MetadataTranslator<'t> {
    /// Create a translator over the given property table.
    pub fn new(table: &'t PropertyTable) -> Self {
        Self { table }
    }

    /// Translate leaves, in document order, into editable and read-only maps.
    pub fn translate(&self, leaves: &[MetaLeaf]) -> Metadata {
        let read_only = self.reconstruct_lists(leaves);

        let editable = leaves
            .iter()
            .filter(|leaf| !is_structural(&leaf.path))
            .fold(EditableMap::new(), |mut editable, leaf| {
                let (name, record) = self.resolve(leaf);
                merge_into(&mut editable, name, record);
                editable
            });

        Metadata {
            editable,
            read_only,
        }
    }

    /// Resolve one leaf to its friendly name and record.
    ///
    /// Unknown paths pass through with the raw path as name and the raw value
    /// as display value.
    pub fn resolve(&self, leaf: &MetaLeaf) -> (String, EditableRecord) {
        match self.table.get(&leaf.path) {
            Some(descriptor) => (
                descriptor.friendly_name.to_string(),
                EditableRecord::new(
                    leaf.value.clone(),
                    descriptor.kind.display_value(&leaf.value),
                    leaf.path.as_str(),
                ),
            ),
            None => (
                leaf.path.clone(),
                EditableRecord::new(leaf.value.clone(), leaf.value.clone(), leaf.path.as_str()),
            ),
        }
    }

    /// Regroup heading pairs and part titles into read-only records.
    pub fn reconstruct_lists(&self, leaves: &[MetaLeaf]) -> ReadOnlyMap {
        let mut pairs: Vec<HeadingPair> = Vec::new();

        for (idx, leaf) in leaves.iter().enumerate() {
            match leaf.path.as_str() {
                HEADING_NAME_PATH => {
                    let name = match self.table.get(&leaf.value) {
                        Some(descriptor) => descriptor.friendly_name.to_string(),
                        None => leaf.value.replace(' ', ""),
                    };
                    let declared_count = declared_count(leaves.get(idx + 1), &name);
                    pairs.push(HeadingPair {
                        name,
                        declared_count,
                        collected_values: Vec::new(),
                    });
                }
                PART_TITLE_PATH => {
                    match pairs.iter_mut().find(|pair| pair.has_capacity()) {
                        Some(pair) => pair.collected_values.push(leaf.value.clone()),
                        None => log::debug!("Part title '{}' has no heading left", leaf.value),
                    }
                }
                _ => {}
            }
        }

        pairs
            .into_iter()
            .map(|pair| (pair.name, ReadOnlyRecord::new(pair.collected_values)))
            .collect()
    }
}

/// Insert a record, turning repeated names into parallel lists.
pub fn merge_into(editable: &mut EditableMap, name: String, record: EditableRecord) {
    match editable.get_mut(&name) {
        Some(existing) => existing.merge(record),
        None => {
            editable.insert(name, record);
        }
    }
}

fn is_structural(path: &str) -> bool {
    matches!(path, HEADING_NAME_PATH | HEADING_COUNT_PATH | PART_TITLE_PATH)
}

fn declared_count(next: Option<&MetaLeaf>, name: &str) -> usize {
    match next {
        Some(leaf) if leaf.path == HEADING_COUNT_PATH => match leaf.value.trim().parse() {
            Ok(count) => count,
            Err(_) => {
                log::warn!("Heading '{}' has a non-integer count '{}'", name, leaf.value);
                0
            }
        },
        _ => {
            log::warn!("Heading '{}' is not followed by a count", name);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyValue;

    fn leaf(path: &str, value: &str) -> MetaLeaf {
        MetaLeaf::new(path, value)
    }

    fn heading(name: &str, count: &str) -> [MetaLeaf; 2] {
        [leaf(HEADING_NAME_PATH, name), leaf(HEADING_COUNT_PATH, count)]
    }

    #[test]
    fn test_resolves_known_and_unknown_paths() {
        let leaves = vec![
            leaf("dc:title", "A title"),
            leaf("TotalTime", "3"),
            leaf("DocSecurity", "0"),
            leaf("x:custom", "raw"),
        ];
        let metadata = MetadataTranslator::default().translate(&leaves);

        let title = &metadata.editable["title"];
        assert_eq!(title.value, PropertyValue::from("A title"));
        assert_eq!(title.xml_path, "dc:title");

        let total_time = &metadata.editable["totalTime"];
        assert_eq!(total_time.value, PropertyValue::from("3"));
        assert_eq!(total_time.display_value, PropertyValue::from("3 minutes"));

        assert_eq!(
            metadata.editable["docSecurity"].display_value,
            PropertyValue::from("None")
        );

        let custom = &metadata.editable["x:custom"];
        assert_eq!(custom.display_value, PropertyValue::from("raw"));
        assert_eq!(custom.xml_path, "x:custom");
        assert!(metadata.read_only.is_empty());
    }

    #[test]
    fn test_duplicates_become_lists_in_order() {
        let leaves = vec![
            leaf("Company", "University of Manchester"),
            leaf("Manager", "M"),
            leaf("Company", "Kilburn"),
            leaf("Company", "Third"),
        ];
        let metadata = MetadataTranslator::default().translate(&leaves);
        let company = &metadata.editable["company"];

        assert_eq!(
            company.value.as_list().unwrap(),
            ["University of Manchester", "Kilburn", "Third"]
        );
        assert_eq!(company.display_value.as_list().map(|v| v.len()), Some(3));
        assert_eq!(company.xml_path, "Company");
        assert_eq!(metadata.editable.len(), 2);
    }

    #[test]
    fn test_editable_keeps_document_order() {
        let leaves = vec![leaf("Words", "1"), leaf("dc:title", "t"), leaf("Pages", "2")];
        let metadata = MetadataTranslator::default().translate(&leaves);
        let names: Vec<&str> = metadata.editable.keys().map(String::as_str).collect();
        assert_eq!(names, ["words", "title", "pages"]);
    }

    #[test]
    fn test_heading_pairs_group_titles() {
        let mut leaves = vec![leaf("Application", "PowerPoint")];
        leaves.extend(heading("Theme", "1"));
        leaves.extend(heading("Slide Titles", "3"));
        leaves.extend(heading("Fonts Used", "1"));
        for title in ["Office Theme", "Intro", "Agenda", "Agenda", "Arial"] {
            leaves.push(leaf(PART_TITLE_PATH, title));
        }

        let metadata = MetadataTranslator::default().translate(&leaves);

        assert_eq!(metadata.read_only["theme"].value, ["Office Theme"]);
        assert_eq!(
            metadata.read_only["slideTitles"].value,
            ["Intro", "Agenda", "Agenda"]
        );
        assert_eq!(metadata.read_only["FontsUsed"].display_value, ["Arial"]);

        let flattened: Vec<&String> = metadata
            .read_only
            .values()
            .flat_map(|record| record.value.iter())
            .collect();
        assert_eq!(flattened, ["Office Theme", "Intro", "Agenda", "Agenda", "Arial"]);

        // Structural leaves never become editable properties.
        assert_eq!(metadata.editable.len(), 1);
        assert!(metadata.editable.contains_key("application"));
    }

    #[test]
    fn test_surplus_titles_are_dropped() {
        let mut leaves = heading("Worksheets", "1").to_vec();
        leaves.push(leaf(PART_TITLE_PATH, "Sheet1"));
        leaves.push(leaf(PART_TITLE_PATH, "Sheet2"));

        let read_only = MetadataTranslator::default().reconstruct_lists(&leaves);
        assert_eq!(read_only["worksheets"].value, ["Sheet1"]);
    }

    #[test]
    fn test_repeated_heading_replaces_earlier_group() {
        let mut leaves = heading("Worksheets", "1").to_vec();
        leaves.extend(heading("Theme", "1"));
        leaves.extend(heading("Worksheets", "2"));
        for title in ["Sheet1", "Office Theme", "Sheet2", "Sheet3"] {
            leaves.push(leaf(PART_TITLE_PATH, title));
        }

        let read_only = MetadataTranslator::default().reconstruct_lists(&leaves);
        let names: Vec<&str> = read_only.keys().map(String::as_str).collect();
        assert_eq!(names, ["worksheets", "theme"]);
        assert_eq!(read_only["worksheets"].value, ["Sheet2", "Sheet3"]);
        assert_eq!(read_only["theme"].value, ["Office Theme"]);
    }

    #[test]
    fn test_missing_or_bad_count_means_no_capacity() {
        let leaves = vec![
            leaf(HEADING_NAME_PATH, "Title"),
            leaf(HEADING_NAME_PATH, "Slide Titles"),
            leaf(HEADING_COUNT_PATH, "many"),
            leaf(PART_TITLE_PATH, "orphan"),
        ];
        let read_only = MetadataTranslator::default().reconstruct_lists(&leaves);
        assert!(read_only["titles"].value.is_empty());
        assert!(read_only["slideTitles"].value.is_empty());
    }

    #[test]
    fn test_custom_table_is_used() {
        use crate::properties::{PropertyDescriptor, ValueKind};

        let table = PropertyTable::from_entries(&[(
            "Flag",
            PropertyDescriptor {
                friendly_name: "flag",
                kind: ValueKind::Boolean,
            },
        )]);
        let metadata = MetadataTranslator::new(&table)
            .translate(&[leaf("Flag", "true"), leaf("dc:title", "t")]);

        assert_eq!(metadata.editable["flag"].display_value, PropertyValue::from("Yes"));
        assert!(metadata.editable.contains_key("dc:title"));
    }

    #[test]
    fn test_translation_is_fresh_each_call() {
        let leaves = vec![leaf("Company", "A")];
        let translator = MetadataTranslator::default();
        let mut first = translator.translate(&leaves);
        first.editable["company"].value = PropertyValue::from("changed");
        let second = translator.translate(&leaves);
        assert_eq!(second.editable["company"].value, PropertyValue::from("A"));
    }
}
