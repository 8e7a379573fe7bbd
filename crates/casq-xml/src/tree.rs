//! An owned, namespace-resolved element tree.
//!
//! CellDesigner files are small enough to hold in memory, and the reader
//! needs random access (alias tables referencing species defined elsewhere in
//! the document), so a tree is a better fit than streaming the events
//! directly.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::{XmlError, XmlResult};

/// An attribute with its namespace resolved to a URI.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub ns: Option<String>,
    pub local: String,
    pub value: String,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with namespace-resolved name and attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub ns: Option<String>,
    pub local: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(ns: Option<&str>, local: &str) -> Self {
        Element {
            ns: ns.map(str::to_string),
            local: local.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse a complete document and return its root element.
    pub fn parse(text: &str) -> XmlResult<Element> {
        let mut reader = NsReader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();
        loop {
            let (resolution, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(start) => {
                    let ns = namespace_uri(&resolution)?;
                    let element = element_from_start(&reader, ns, &start)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let ns = namespace_uri(&resolution)?;
                    let element = element_from_start(&reader, ns, &start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => return Ok(element),
                    }
                }
                Event::End(end) => {
                    let done = stack.pop().ok_or_else(|| {
                        XmlError::UnexpectedClose(
                            String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                        )
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(done)),
                        None => return Ok(done),
                    }
                }
                Event::Text(text) => {
                    let value = text.unescape()?;
                    if !value.trim().is_empty() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(Node::Text(value.into_owned()));
                        }
                    }
                }
                Event::CData(data) => {
                    let value = std::str::from_utf8(&data)?.to_string();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(value));
                    }
                }
                Event::Eof => return Err(XmlError::NoRoot),
                // declaration, comments, processing instructions, doctype
                _ => {}
            }
        }
    }

    /// True if this element has the given namespace URI and local name.
    pub fn is(&self, ns: Option<&str>, local: &str) -> bool {
        self.local == local && self.ns.as_deref() == ns
    }

    /// Value of the first attribute with this local name, any namespace.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Value of the attribute with this exact namespace URI and local name.
    pub fn attr_ns(&self, ns: Option<&str>, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.local == local && a.ns.as_deref() == ns)
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, ns: Option<&str>, local: &str, value: &str) {
        self.attrs.push(Attribute {
            ns: ns.map(str::to_string),
            local: local.to_string(),
            value: value.to_string(),
        });
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First direct child element with this name.
    pub fn find(&self, ns: Option<&str>, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(ns, local))
    }

    /// Direct child elements with this name.
    pub fn find_all<'a>(
        &'a self,
        ns: Option<&'a str>,
        local: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.is(ns, local))
    }

    /// First element with this name anywhere below, depth first.
    pub fn descendant(&self, ns: Option<&str>, local: &str) -> Option<&Element> {
        for child in self.elements() {
            if child.is(ns, local) {
                return Some(child);
            }
            if let Some(found) = child.descendant(ns, local) {
                return Some(found);
            }
        }
        None
    }

    /// All elements with this name anywhere below, depth first.
    pub fn descendants<'a>(&'a self, ns: Option<&'a str>, local: &'a str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(ns, local, &mut found);
        found
    }

    fn collect_descendants<'a>(
        &'a self,
        ns: Option<&str>,
        local: &str,
        found: &mut Vec<&'a Element>,
    ) {
        for child in self.elements() {
            if child.is(ns, local) {
                found.push(child);
            }
            child.collect_descendants(ns, local, found);
        }
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }

    /// Serialize this element using local names only, dropping namespace
    /// prefixes. Used for XHTML note bodies where the consumer expects
    /// plain HTML tags.
    pub fn to_local_xml(&self) -> String {
        let mut out = String::new();
        self.write_local(&mut out);
        out
    }

    /// Serialize the children of this element using local names only.
    pub fn inner_local_xml(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Element(e) => e.write_local(&mut out),
                Node::Text(t) => out.push_str(&escape(t.as_str())),
            }
        }
        out
    }

    fn write_local(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.local);
        for attr in &self.attrs {
            out.push(' ');
            out.push_str(&attr.local);
            out.push_str("=\"");
            out.push_str(&escape(attr.value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Element(e) => e.write_local(out),
                Node::Text(t) => out.push_str(&escape(t.as_str())),
            }
        }
        out.push_str("</");
        out.push_str(&self.local);
        out.push('>');
    }
}

fn element_from_start(
    reader: &NsReader<&[u8]>,
    ns: Option<String>,
    start: &quick_xml::events::BytesStart,
) -> XmlResult<Element> {
    let local = std::str::from_utf8(start.local_name().as_ref())?.to_string();
    let mut element = Element {
        ns,
        local,
        attrs: Vec::new(),
        children: Vec::new(),
    };
    for attr in start.attributes() {
        let attr = attr?;
        // namespace declarations are consumed by the reader
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let (resolution, local) = reader.resolve_attribute(attr.key);
        element.attrs.push(Attribute {
            ns: namespace_uri(&resolution)?,
            local: std::str::from_utf8(local.as_ref())?.to_string(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(element)
}

fn namespace_uri(resolution: &ResolveResult) -> XmlResult<Option<String>> {
    match resolution {
        ResolveResult::Bound(ns) => Ok(Some(std::str::from_utf8(ns.as_ref())?.to_string())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolves_namespaces() {
        let doc = r#"<?xml version="1.0"?>
            <sbml xmlns="http://example.org/sbml" xmlns:cd="http://example.org/cd">
                <model id="m1">
                    <cd:extension><cd:class>PROTEIN</cd:class></cd:extension>
                </model>
            </sbml>"#;
        let root = Element::parse(doc).unwrap();
        assert!(root.is(Some("http://example.org/sbml"), "sbml"));
        let model = root.find(Some("http://example.org/sbml"), "model").unwrap();
        assert_eq!(model.attr("id"), Some("m1"));
        let class = model.descendant(Some("http://example.org/cd"), "class").unwrap();
        assert_eq!(class.text(), "PROTEIN");
    }

    #[test]
    fn test_prefixed_attributes() {
        let doc = r##"<rdf:RDF xmlns:rdf="http://rdf.example/ns#">
            <rdf:Description rdf:about="#s1"/>
        </rdf:RDF>"##;
        let root = Element::parse(doc).unwrap();
        let descr = root.find(Some("http://rdf.example/ns#"), "Description").unwrap();
        assert_eq!(descr.attr_ns(Some("http://rdf.example/ns#"), "about"), Some("#s1"));
    }

    #[test]
    fn test_descendants_depth_first() {
        let doc = "<a><b><c n='1'/></b><c n='2'/></a>";
        let root = Element::parse(doc).unwrap();
        let found = root.descendants(None, "c");
        let order: Vec<_> = found.iter().filter_map(|e| e.attr("n")).collect();
        assert_eq!(order, vec!["1", "2"]);
    }

    #[test]
    fn test_local_serialization_strips_prefixes() {
        let doc = r#"<x:body xmlns:x="http://www.w3.org/1999/xhtml"><x:p>a &amp; b</x:p></x:body>"#;
        let root = Element::parse(doc).unwrap();
        assert_eq!(root.to_local_xml(), "<body><p>a &amp; b</p></body>");
        assert_eq!(root.inner_local_xml(), "<p>a &amp; b</p>");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        assert!(matches!(Element::parse("  "), Err(XmlError::NoRoot)));
    }
}
