//! Flattening of a metadata tree into path-addressed leaves.

use crate::tree::{XmlDocument, XmlElement};
use docmeta_core::MetaLeaf;

/// Empty openoffice elements whose data lives entirely in attributes.
const ATTRIBUTE_CARRIERS: [&str; 2] = [
    "office:meta/meta:document-statistic",
    "office:meta/meta:template",
];

/// Flatten a document into leaves, in document order.
///
/// Paths start below the root element. Sibling elements with the same name
/// share a path.
pub fn flatten(document: &XmlDocument) -> Vec<MetaLeaf> {
    flatten_children(&document.root, "", Vec::new())
}

fn flatten_children(parent: &XmlElement, prefix: &str, leaves: Vec<MetaLeaf>) -> Vec<MetaLeaf> {
    parent.child_elements().fold(leaves, |mut leaves, element| {
        let path = if prefix.is_empty() {
            element.name.clone()
        } else {
            format!("{}/{}", prefix, element.name)
        };

        if let Some(text) = element.sole_text() {
            leaves.push(MetaLeaf::new(path, text));
            leaves
        } else if !element.children.is_empty() {
            flatten_children(element, &path, leaves)
        } else if ATTRIBUTE_CARRIERS.contains(&path.as_str()) {
            leaves.extend(
                element
                    .attributes
                    .iter()
                    .map(|(name, value)| MetaLeaf::new(format!("{}/@{}", path, name), value.as_str())),
            );
            leaves
        } else {
            leaves.push(MetaLeaf::new(path, ""));
            leaves
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(leaves: &[MetaLeaf]) -> Vec<&str> {
        leaves.iter().map(|l| l.path.as_str()).collect()
    }

    #[test]
    fn test_text_leaves_below_root() {
        let doc = XmlDocument::parse(
            r#"<cp:coreProperties xmlns:cp="urn:cp" xmlns:dc="urn:dc"><dc:title>A title</dc:title><cp:revision>2</cp:revision></cp:coreProperties>"#,
        )
        .unwrap();
        let leaves = flatten(&doc);
        assert_eq!(
            leaves,
            [
                MetaLeaf::new("dc:title", "A title"),
                MetaLeaf::new("cp:revision", "2"),
            ]
        );
    }

    #[test]
    fn test_nested_and_repeated_paths() {
        let doc = XmlDocument::parse(
            "<Properties><HeadingPairs><vt:vector><vt:variant><vt:lpstr>Title</vt:lpstr></vt:variant><vt:variant><vt:i4>2</vt:i4></vt:variant></vt:vector></HeadingPairs><TitlesOfParts><vt:vector><vt:lpstr>One</vt:lpstr><vt:lpstr>Two</vt:lpstr></vt:vector></TitlesOfParts></Properties>",
        )
        .unwrap();
        let leaves = flatten(&doc);
        assert_eq!(
            paths(&leaves),
            [
                "HeadingPairs/vt:vector/vt:variant/vt:lpstr",
                "HeadingPairs/vt:vector/vt:variant/vt:i4",
                "TitlesOfParts/vt:vector/vt:lpstr",
                "TitlesOfParts/vt:vector/vt:lpstr",
            ]
        );
        assert_eq!(leaves[3].value, "Two");
    }

    #[test]
    fn test_empty_element_yields_empty_leaf() {
        let doc = XmlDocument::parse("<Properties><Company/><Manager></Manager></Properties>").unwrap();
        assert_eq!(
            flatten(&doc),
            [MetaLeaf::new("Company", ""), MetaLeaf::new("Manager", "")]
        );
    }

    #[test]
    fn test_attribute_carriers_expand_to_attribute_leaves() {
        let doc = XmlDocument::parse(
            r#"<office:document-meta><office:meta><meta:generator>LibreOffice</meta:generator><meta:template xlink:href="t.ott" xlink:type="simple"/><meta:document-statistic meta:page-count="1" meta:paragraph-count="0"/><meta:user-defined meta:name="x"/></office:meta></office:document-meta>"#,
        )
        .unwrap();
        let leaves = flatten(&doc);
        assert_eq!(
            leaves,
            [
                MetaLeaf::new("office:meta/meta:generator", "LibreOffice"),
                MetaLeaf::new("office:meta/meta:template/@xlink:href", "t.ott"),
                MetaLeaf::new("office:meta/meta:template/@xlink:type", "simple"),
                MetaLeaf::new("office:meta/meta:document-statistic/@meta:page-count", "1"),
                MetaLeaf::new("office:meta/meta:document-statistic/@meta:paragraph-count", "0"),
                MetaLeaf::new("office:meta/meta:user-defined", ""),
            ]
        );
    }

    #[test]
    fn test_flatten_is_repeatable() {
        let doc = XmlDocument::parse("<r><a>1</a><b>2</b></r>").unwrap();
        assert_eq!(flatten(&doc), flatten(&doc));
        assert_eq!(flatten(&doc).len(), 2);
    }

    #[test]
    fn test_empty_root_has_no_leaves() {
        let doc = XmlDocument::parse(r#"<Properties xmlns="urn:p"></Properties>"#).unwrap();
        assert!(flatten(&doc).is_empty());
    }
}
