//! Writing edited property values back into metadata trees.
//!
//! Targets are located by element name only, anywhere in the tree, not by
//! the full path the value was read from. A name that also appears outside
//! the original location gets the edit too.
//!
//! List values are spread over the matches in document order for attribute
//! paths as well as text paths, repeating the last value once the list runs
//! out. A missing attribute is added.

use crate::tree::{XmlDocument, XmlElement};
use docmeta_core::EditableMap;

/// Where an `xmlPath` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget<'a> {
    /// An attribute on every element named `element`.
    Attribute { element: &'a str, attribute: &'a str },
    /// The text of every element named `element`.
    Text { element: &'a str },
}

impl<'a> EditTarget<'a> {
    /// Parse an `xmlPath`. Empty paths have no target.
    pub fn from_xml_path(path: &'a str) -> Option<Self> {
        if path.is_empty() {
            return None;
        }

        let mut segments = path.rsplit('/');
        let last = segments.next()?;

        if path.contains("/@") {
            let element = segments.next()?;
            let attribute = last.strip_prefix('@').unwrap_or(last);
            Some(Self::Attribute { element, attribute })
        } else {
            Some(Self::Text { element: last })
        }
    }

    pub fn element(&self) -> &'a str {
        match self {
            Self::Attribute { element, .. } | Self::Text { element } => *element,
        }
    }

    fn apply(&self, element: &mut XmlElement, value: &str) {
        match self {
            Self::Attribute { attribute, .. } => element.set_attribute(attribute, value),
            Self::Text { .. } => element.set_text(value),
        }
    }
}

/// Apply every record of `editable` to `document`.
///
/// List values are spread over the matching elements in document order,
/// repeating the last value when there are more matches than values.
/// Returns the number of elements written.
pub fn apply_edits(document: &mut XmlDocument, editable: &EditableMap) -> usize {
    let mut written = 0;

    for (name, record) in editable {
        let Some(target) = EditTarget::from_xml_path(&record.xml_path) else {
            continue;
        };

        let mut matches = 0;
        document.visit_named_mut(target.element(), &mut |element: &mut XmlElement| {
            if let Some(value) = record.value.value_for_match(matches) {
                target.apply(element, value);
            }
            matches += 1;
        });

        if matches > 0 {
            log::debug!("Wrote '{}' to {} <{}> element(s)", name, matches, target.element());
        }
        written += matches;
    }

    written
}
