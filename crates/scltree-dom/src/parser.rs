//! Build a [`Document`] from XML text using quick-xml's streaming reader.
//!
//! Comments, processing instructions, and the DOCTYPE are skipped. Text and
//! CDATA directly inside an element are concatenated into that element's
//! direct text; whitespace-only text (indentation) is dropped.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::document::{Document, NodeId};
use crate::error::{DomError, DomResult};

/// File extensions of the SCL family (plus plain XML) accepted by the loader.
pub const SCL_EXTENSIONS: [&str; 8] = ["scd", "ssd", "sed", "icd", "iid", "cid", "isd", "xml"];

/// Returns `true` if the path carries one of [`SCL_EXTENSIONS`].
pub fn has_scl_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCL_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

impl Document {
    /// Parse a document from XML text.
    pub fn parse_str(xml: &str) -> DomResult<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);
        let mut doc: Option<Document> = None;
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let id = open_element(&mut doc, &stack, e, position)?;
                    stack.push(id);
                }
                Event::Empty(ref e) => {
                    open_element(&mut doc, &stack, e, position)?;
                }
                Event::End(_) => {
                    if let (Some(doc), Some(id)) = (doc.as_mut(), stack.pop()) {
                        doc.finish_text(id);
                    }
                }
                Event::Text(ref e) => {
                    if let (Some(doc), Some(&top)) = (doc.as_mut(), stack.last()) {
                        let text = e.unescape()?;
                        doc.append_text(top, &text);
                    }
                }
                Event::CData(e) => {
                    if let (Some(doc), Some(&top)) = (doc.as_mut(), stack.last()) {
                        let raw = e.into_inner();
                        doc.append_text(top, &String::from_utf8_lossy(&raw));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let (Some(doc), Some(&open)) = (doc.as_ref(), stack.last()) {
            return Err(DomError::Parse {
                position: reader.buffer_position() as u64,
                message: format!("unclosed element <{}>", doc.get(open).tag),
            });
        }

        let doc = doc.ok_or(DomError::EmptyDocument)?;
        debug!(elements = doc.len(), "parsed document");
        Ok(doc)
    }

    /// Read and parse a document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> DomResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let doc = Self::parse_str(&text)?;
        debug!(path = %path.display(), elements = doc.len(), "loaded document");
        Ok(doc)
    }
}

fn open_element(
    doc: &mut Option<Document>,
    stack: &[NodeId],
    start: &BytesStart<'_>,
    position: u64,
) -> DomResult<NodeId> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| DomError::Parse {
            position,
            message: e.to_string(),
        })?
        .to_string();

    let id = match (doc.as_mut(), stack.last()) {
        (Some(doc), Some(&parent)) => doc.add_element(parent, tag),
        (Some(_), None) => {
            return Err(DomError::Parse {
                position,
                message: format!("second root element <{tag}>"),
            });
        }
        (None, _) => {
            let created = Document::new(tag);
            let root = NodeId::first();
            *doc = Some(created);
            root
        }
    };

    if let Some(doc) = doc.as_mut() {
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DomError::Xml(e.into()))?;
            let name = std::str::from_utf8(attr.key.as_ref()).map_err(|e| DomError::Parse {
                position,
                message: e.to_string(),
            })?;
            let value = attr.unescape_value()?;
            doc.set_attribute(id, name, value.as_ref());
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scltree_types::TreeView;
    use std::io::Write;

    #[test]
    fn parses_elements_attributes_and_text() {
        let doc = Document::parse_str(r#"<Root a="1" b="x &amp; y"><Leaf>  hi  </Leaf><Empty/></Root>"#)
            .unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.tag(root), "Root");
        assert_eq!(doc.attribute(root, "b"), Some("x & y"));
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(doc.text(children[0]), Some("  hi  "));
        assert_eq!(doc.tag(children[1]), "Empty");
        assert_eq!(doc.text(children[1]), None);
    }

    #[test]
    fn indentation_is_not_text() {
        let doc = Document::parse_str("<Root>\n  <Line id=\"1\"/>\n  <Line id=\"2\"/>\n</Root>").unwrap();
        assert_eq!(doc.text(doc.root().unwrap()), None);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn skips_declaration_and_comments() {
        let doc = Document::parse_str(
            "\u{feff}<?xml version=\"1.0\"?><!-- header --><SCL><!-- inner --><Header id=\"h\"/></SCL>",
        )
        .unwrap();
        assert_eq!(doc.tag(doc.root().unwrap()), "SCL");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn cdata_counts_as_direct_text() {
        let doc = Document::parse_str("<a><![CDATA[1 < 2]]></a>").unwrap();
        assert_eq!(doc.text(doc.root().unwrap()), Some("1 < 2"));
    }

    #[test]
    fn keeps_namespace_prefixes_in_tags() {
        let doc = Document::parse_str(r#"<SCL xmlns:v="urn:v"><v:Private type="x"/></SCL>"#).unwrap();
        let child = doc.children(doc.root().unwrap()).next().unwrap();
        assert_eq!(doc.tag(child), "v:Private");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(Document::parse_str("<!-- nothing -->"), Err(DomError::EmptyDocument)));
    }

    #[test]
    fn second_root_is_rejected() {
        assert!(matches!(
            Document::parse_str("<a/><b/>"),
            Err(DomError::Parse { .. })
        ));
    }

    #[test]
    fn mismatched_end_tag_is_rejected() {
        assert!(Document::parse_str("<a><b></a>").is_err());
    }

    #[test]
    fn recognizes_scl_extensions() {
        assert!(has_scl_extension(Path::new("station.SCD")));
        assert!(has_scl_extension(Path::new("ied.cid")));
        assert!(!has_scl_extension(Path::new("notes.txt")));
        assert!(!has_scl_extension(Path::new("noext")));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::Builder::new().suffix(".icd").tempfile().unwrap();
        write!(file, "<SCL><IED name=\"X\"/></SCL>").unwrap();
        let doc = Document::from_path(file.path()).unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Document::from_path("/definitely/not/here.scd"),
            Err(DomError::Io(_))
        ));
    }
}
