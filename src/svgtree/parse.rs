// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::Error;
use super::{AId, Attribute, Document, EId, NodeData, NodeId, NodeKind};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";


impl Document {
    /// Parses a `Document` from a string.
    pub fn parse(text: &str) -> Result<Document, Error> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, xml_opt)?;
        parse(&xml)
    }

    /// Parses a `Document` from raw data.
    ///
    /// GZip compressed data (SVGZ) is decompressed first.
    pub fn parse_data(data: &[u8]) -> Result<Document, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::parse(text)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::parse(text)
        }
    }

    fn append(&mut self, parent_id: NodeId, kind: NodeKind) -> NodeId {
        let new_child_id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent_id),
            prev_sibling: None,
            next_sibling: None,
            children: None,
            kind,
        });

        let last_child_id = self.nodes[parent_id.0].children.map(|(_, id)| id);
        self.nodes[new_child_id.0].prev_sibling = last_child_id;

        if let Some(id) = last_child_id {
            self.nodes[id.0].next_sibling = Some(new_child_id);
        }

        self.nodes[parent_id.0].children = Some(
            if let Some((first_child_id, _)) = self.nodes[parent_id.0].children {
                (first_child_id, new_child_id)
            } else {
                (new_child_id, new_child_id)
            }
        );

        new_child_id
    }
}

/// Decompresses an SVGZ file.
pub(crate) fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder.read_to_end(&mut decoded).map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}

fn parse(xml: &roxmltree::Document) -> Result<Document, Error> {
    let mut doc = Document {
        nodes: Vec::new(),
        attrs: Vec::new(),
        links: HashMap::new(),
    };

    // Add a root node.
    doc.nodes.push(NodeData {
        parent: None,
        prev_sibling: None,
        next_sibling: None,
        children: None,
        kind: NodeKind::Root,
    });

    let style_sheet = resolve_css(xml);

    parse_xml_node_children(xml.root(), doc.root().id, &style_sheet, 0, &mut doc)?;

    // Check that the root element is `svg`.
    match doc.root().first_element_child() {
        Some(child) => {
            if child.tag_name() != Some(EId::Svg) {
                return Err(roxmltree::Error::NoRootNode.into());
            }
        }
        None => return Err(roxmltree::Error::NoRootNode.into()),
    }

    // Collect all elements with `id` attribute.
    let mut links = HashMap::new();
    for node in doc.descendants() {
        if let Some(id) = node.attribute::<&str>(AId::Id) {
            links.insert(id.to_string(), node.id);
        }
    }
    doc.links = links;

    Ok(doc)
}

fn parse_tag_name(node: roxmltree::Node) -> Option<EId> {
    if !node.is_element() {
        return None;
    }

    if node.tag_name().namespace() != Some(SVG_NS) {
        return None;
    }

    EId::from_str(node.tag_name().name())
}

fn parse_xml_node_children(
    parent: roxmltree::Node,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    for node in parent.children() {
        parse_xml_node(node, parent_id, style_sheet, depth, doc)?;
    }

    Ok(())
}

fn parse_xml_node(
    node: roxmltree::Node,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    if depth > 1024 {
        return Err(Error::ElementsLimitReached);
    }

    let tag_name = match parse_tag_name(node) {
        Some(id) => id,
        None => return Ok(()),
    };

    if tag_name == EId::Style {
        return Ok(());
    }

    let node_id = parse_svg_element(node, parent_id, tag_name, style_sheet, doc)?;
    parse_xml_node_children(node, node_id, style_sheet, depth + 1, doc)
}

fn parse_svg_element(
    xml_node: roxmltree::Node,
    parent_id: NodeId,
    tag_name: EId,
    style_sheet: &simplecss::StyleSheet,
    doc: &mut Document,
) -> Result<NodeId, Error> {
    let attrs_start_idx = doc.attrs.len();

    // Copy presentational attributes first.
    for attr in xml_node.attributes() {
        match attr.namespace() {
              None
            | Some(SVG_NS)
            | Some(XLINK_NS)
            | Some(XML_NAMESPACE_NS) => {}
            _ => continue,
        }

        let aid = try_opt_continue!(AId::from_str(attr.name()));
        append_attribute(parent_id, aid, attr.value(), doc);
    }

    let mut insert_attribute = |aid, value: &str| {
        // Check that attribute already exists.
        let idx = doc.attrs[attrs_start_idx..].iter_mut().position(|a| a.name == aid);

        // Append an attribute as usual.
        let added = append_attribute(parent_id, aid, value, doc);

        // Check that attribute was actually added, because it could be skipped.
        if added {
            if let Some(idx) = idx {
                // Swap the last attribute with an existing one.
                let last_idx = doc.attrs.len() - 1;
                doc.attrs.swap(attrs_start_idx + idx, last_idx);
                // Remove last.
                doc.attrs.pop();
            }
        }
    };

    // Apply CSS.
    for rule in &style_sheet.rules {
        if rule.selector.matches(&XmlNode(xml_node)) {
            for declaration in &rule.declarations {
                if let Some(aid) = AId::from_str(declaration.name) {
                    // Parse only the presentation attributes.
                    if aid.is_presentation() {
                        insert_attribute(aid, declaration.value);
                    }
                }
            }
        }
    }

    // Split a `style` attribute.
    if let Some(value) = xml_node.attribute("style") {
        for declaration in simplecss::DeclarationTokenizer::from(value) {
            if let Some(aid) = AId::from_str(declaration.name) {
                if aid.is_presentation() {
                    insert_attribute(aid, declaration.value);
                }
            }
        }
    }

    if doc.nodes.len() > 1_000_000 {
        return Err(Error::ElementsLimitReached);
    }

    let node_id = doc.append(parent_id, NodeKind::Element {
        tag_name,
        attributes: attrs_start_idx..doc.attrs.len(),
    });

    Ok(node_id)
}

fn append_attribute(
    parent_id: NodeId,
    aid: AId,
    value: &str,
    doc: &mut Document,
) -> bool {
    match aid {
        // The `style` attribute will be split into attributes, so we don't need it.
        AId::Style |
        // No need to copy a `class` attribute since CSS were already resolved.
        AId::Class => return false,
        _ => {}
    }

    if aid.is_presentation() && value.trim() == "inherit" {
        return resolve_inherit(parent_id, aid, doc);
    }

    doc.attrs.push(Attribute {
        name: aid,
        value: value.to_string(),
    });

    true
}

fn resolve_inherit(parent_id: NodeId, aid: AId, doc: &mut Document) -> bool {
    let parent = doc.get(parent_id);
    let node = if aid.is_inheritable() {
        // Inheritable attributes can inherit a value from an any ancestor.
        parent.ancestors().find(|n| n.has_attribute(aid))
    } else {
        // Non-inheritable attributes can inherit a value only from a direct parent.
        Some(parent).filter(|n| n.has_attribute(aid))
    };

    let value = node.and_then(|n| n.raw_attribute(aid)).map(|v| v.to_string());
    match value {
        Some(value) => {
            doc.attrs.push(Attribute { name: aid, value });
            true
        }
        None => false,
    }
}

fn resolve_css<'a>(xml: &'a roxmltree::Document<'a>) -> simplecss::StyleSheet<'a> {
    let mut sheet = simplecss::StyleSheet::new();

    for node in xml.descendants().filter(|n| n.has_tag_name("style")) {
        match node.attribute("type") {
            Some("text/css") => {}
            Some(_) => continue,
            None => {}
        }

        sheet.parse_more(try_opt_continue!(node.text()));
    }

    sheet
}

struct XmlNode<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl simplecss::Element for XmlNode<'_, '_> {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(XmlNode)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.0.prev_sibling_element().map(XmlNode)
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name().name() == local_name
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute(local_name) {
            Some(value) => operator.matches(value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            // Since we are querying a static SVG we can ignore other pseudo-classes.
            _ => false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_svg_root() {
        let res = Document::parse("<html xmlns='http://www.w3.org/1999/xhtml'/>");
        assert!(matches!(res, Err(Error::ParsingFailed(roxmltree::Error::NoRootNode))));
    }

    #[test]
    fn foreign_elements_are_skipped() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg' xmlns:x='http://example.com'>
            <x:custom/>
            <unknownElement/>
            <rect/>
        </svg>
        ").unwrap();

        let children: Vec<_> = doc.root_element().children().collect();
        assert_eq!(children.len(), 1);
        assert!(children[0].has_tag_name(EId::Rect));
    }

    #[test]
    fn inherit_value() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <g flood-color='red'>
                <feFlood id='fl1' flood-color='inherit'/>
            </g>
        </svg>
        ").unwrap();

        let fl1 = doc.element_by_id("fl1").unwrap();
        assert_eq!(fl1.attribute::<&str>(AId::FloodColor), Some("red"));
    }

    #[test]
    fn svgz() {
        use std::io::Write;

        let text = "<svg xmlns='http://www.w3.org/2000/svg'><rect id='r1'/></svg>";
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        let data = encoder.finish().unwrap();

        let doc = Document::parse_data(&data).unwrap();
        assert!(doc.element_by_id("r1").is_some());
    }

    #[test]
    fn nesting_limit() {
        let nested = |n: usize| format!(
            "<svg xmlns='http://www.w3.org/2000/svg'>{}{}</svg>", "<g>".repeat(n), "</g>".repeat(n)
        );

        assert!(Document::parse(&nested(1000)).is_ok());
        assert!(matches!(Document::parse(&nested(1100)), Err(Error::ElementsLimitReached)));
    }

    #[test]
    fn malformed_svgz() {
        let res = Document::parse_data(&[0x1f, 0x8b, 0x00]);
        assert!(matches!(res, Err(Error::MalformedGZip)));
    }
}
