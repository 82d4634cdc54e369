//! Small mutable XML tree built from quick-xml events.
//!
//! Element and attribute names are kept as written (`dc:title`, not a
//! resolved namespace URI), which is what metadata paths are matched on.

use docmeta_core::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// The `<?xml ...?>` declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl XmlDeclaration {
    fn from_event(decl: &BytesDecl<'_>) -> Result<Self> {
        let version = decl.version().map_err(xml_error)?;
        let encoding = decl.encoding().transpose().map_err(xml_error)?;
        let standalone = decl.standalone().transpose().map_err(xml_error)?;

        Ok(Self {
            version: lossy(&version),
            encoding: encoding.map(|e| lossy(&e)),
            standalone: standalone.map(|s| lossy(&s)),
        })
    }
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Unescaped character data.
    Text(String),
    CData(String),
    Comment(String),
}

/// An element with its attributes (in document order) and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = Self::new(lossy(start.name().as_ref()));

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::XmlError(format!("Bad attribute: {}", e)))?;
            let value = attr.unescape_value().map_err(xml_error)?;
            element
                .attributes
                .push((lossy(attr.key.as_ref()), value.into_owned()));
        }

        Ok(element)
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Text content when the element's only child is a text node.
    pub fn sole_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [XmlNode::Text(text)] | [XmlNode::CData(text)] => Some(text),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, adding it when absent.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Overwrite the leading text node, or append one if the element has none.
    ///
    /// A leading CDATA section becomes plain text, which the writer escapes.
    pub fn set_text(&mut self, value: &str) {
        let text = XmlNode::Text(value.to_string());
        let has_leading_text = matches!(
            self.children.first(),
            Some(XmlNode::Text(_) | XmlNode::CData(_))
        );
        if has_leading_text {
            self.children[0] = text;
        } else {
            self.children.push(text);
        }
    }

    /// Visit this element and every descendant named `name`, in document order.
    pub fn visit_named_mut<F>(&mut self, name: &str, visit: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        if self.name == name {
            visit(self);
        }
        for child in &mut self.children {
            if let XmlNode::Element(element) = child {
                element.visit_named_mut(name, visit);
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(XmlNode::Text(existing)) => existing.push_str(text),
            _ => self.children.push(XmlNode::Text(text.to_string())),
        }
    }

    /// Drop whitespace-only text sitting between child elements.
    fn drop_ignorable_whitespace(&mut self) {
        if self.children.iter().any(|c| matches!(c, XmlNode::Element(_))) {
            self.children
                .retain(|c| !matches!(c, XmlNode::Text(text) if text.trim().is_empty()));
        }
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return writer.write_event(Event::Empty(start)).map_err(xml_error);
        }

        writer.write_event(Event::Start(start)).map_err(xml_error)?;
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write(writer)?,
                XmlNode::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(xml_error)?,
                XmlNode::CData(text) => writer
                    .write_event(Event::CData(BytesCData::new(text.as_str())))
                    .map_err(xml_error)?,
                XmlNode::Comment(text) => writer
                    .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                    .map_err(xml_error)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(xml_error)
    }
}

/// A parsed XML part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub declaration: Option<XmlDeclaration>,
    pub root: XmlElement,
}

impl XmlDocument {
    /// Parse XML text into a tree.
    pub fn parse(xml: &str) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);

        let mut declaration = None;
        let mut root = None;
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Decl(ref e)) => {
                    declaration = Some(XmlDeclaration::from_event(e)?);
                }
                Ok(Event::Start(ref e)) => {
                    stack.push(XmlElement::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = XmlElement::from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| Error::XmlError("Unexpected closing tag".to_string()))?;
                    element.drop_ignorable_whitespace();
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e.unescape().map_err(xml_error)?;
                        parent.push_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = lossy(&e.into_inner());
                        parent.children.push(XmlNode::CData(text));
                    }
                }
                Ok(Event::Comment(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Comment(lossy(e)));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::XmlError(format!("Unclosed element '{}'", open.name)));
        }

        let root = root.ok_or_else(|| Error::XmlError("Document has no root element".to_string()))?;
        Ok(Self { declaration, root })
    }

    /// Serialize the tree back to XML text.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        if let Some(decl) = &self.declaration {
            let event = BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            );
            writer.write_event(Event::Decl(event)).map_err(xml_error)?;
        }
        self.root.write(&mut writer)?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::XmlError(format!("Serialized XML is not UTF-8: {}", e)))
    }

    /// Visit every element named `name`, root included, in document order.
    pub fn visit_named_mut<F>(&mut self, name: &str, visit: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        self.root.visit_named_mut(name, visit);
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::XmlError(format!(
            "Second root element '{}'",
            element.name
        )));
    }
    Ok(())
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_prefixed_names_and_attributes() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><office:document-meta xmlns:office="urn:o" office:version="1.2"><office:meta><meta:document-statistic meta:page-count="1" meta:word-count="12"/></office:meta></office:document-meta>"#;
        let doc = XmlDocument::parse(xml).unwrap();

        assert_eq!(doc.root.name, "office:document-meta");
        assert_eq!(doc.root.attribute("office:version"), Some("1.2"));
        let meta = doc.root.child_elements().next().unwrap();
        let stats = meta.child_elements().next().unwrap();
        assert_eq!(stats.name, "meta:document-statistic");
        assert_eq!(stats.attribute("meta:word-count"), Some("12"));
        assert!(stats.children.is_empty());

        let decl = doc.declaration.unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(decl.standalone.as_deref(), Some("yes"));
    }

    #[test]
    fn test_whitespace_between_elements_is_dropped() {
        let xml = "<root>\n  <a> padded </a>\n  <b/>\n</root>";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.root.children.len(), 2);
        assert_eq!(doc.root.child_elements().next().unwrap().sole_text(), Some(" padded "));
    }

    #[test]
    fn test_entities_are_unescaped_and_reescaped() {
        let xml = "<root><t>Smith &amp; Sons &lt;Ltd&gt;</t></root>";
        let doc = XmlDocument::parse(xml).unwrap();
        let t = doc.root.child_elements().next().unwrap();
        assert_eq!(t.sole_text(), Some("Smith & Sons <Ltd>"));

        let out = doc.to_xml_string().unwrap();
        assert!(out.contains("Smith &amp; Sons &lt;Ltd&gt;"));
        assert_eq!(XmlDocument::parse(&out).unwrap(), doc);
    }

    #[test]
    fn test_serialize_round_trip() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Properties xmlns="urn:p" xmlns:vt="urn:vt"><Company/><Pages>1</Pages><!-- note --><Notes><![CDATA[a<b]]></Notes></Properties>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), xml);
    }

    #[test]
    fn test_set_text_overwrites_or_appends() {
        let mut filled = XmlElement::new("Company");
        filled.children.push(XmlNode::Text("Old".to_string()));
        filled.set_text("New");
        assert_eq!(filled.sole_text(), Some("New"));

        let mut empty = XmlElement::new("Company");
        empty.set_text("Google");
        assert_eq!(empty.sole_text(), Some("Google"));
    }

    #[test]
    fn test_set_text_replaces_cdata_with_escaped_text() {
        let mut doc =
            XmlDocument::parse("<Properties><Notes><![CDATA[old]]></Notes></Properties>").unwrap();
        doc.visit_named_mut("Notes", &mut |e: &mut XmlElement| e.set_text("a]]>b"));

        let out = doc.to_xml_string().unwrap();
        assert!(!out.contains("CDATA"));

        let reparsed = XmlDocument::parse(&out).unwrap();
        let notes = reparsed.root.child_elements().next().unwrap();
        assert_eq!(notes.sole_text(), Some("a]]>b"));
    }

    #[test]
    fn test_set_attribute_updates_or_adds() {
        let mut element = XmlElement::new("meta:document-statistic");
        element.set_attribute("meta:page-count", "1");
        element.set_attribute("meta:page-count", "27");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attribute("meta:page-count"), Some("27"));
    }

    #[test]
    fn test_visit_named_in_document_order() {
        let xml = "<root><c>1</c><g><c>2</c></g><c>3</c></root>";
        let mut doc = XmlDocument::parse(xml).unwrap();
        let mut seen = Vec::new();
        doc.visit_named_mut("c", &mut |element: &mut XmlElement| {
            seen.push(element.sole_text().unwrap_or_default().to_string());
        });
        assert_eq!(seen, ["1", "2", "3"]);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(matches!(
            XmlDocument::parse("<root><a></root>"),
            Err(Error::XmlError(_))
        ));
        assert!(matches!(XmlDocument::parse(""), Err(Error::XmlError(_))));
        assert!(matches!(
            XmlDocument::parse("<root>"),
            Err(Error::XmlError(_))
        ));
    }
}
