// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A read-only SVG tree.

Contains only SVG elements. Attribute values are stored as is
and parsed on access.
*/

#![allow(missing_docs)]
#![allow(missing_debug_implementations)]

use std::collections::HashMap;
use std::str::FromStr;

use crate::BridgeError;

mod names;
mod parse;

pub use names::{AId, EId};

type Range = std::ops::Range<usize>;


pub struct Document {
    nodes: Vec<NodeData>,
    attrs: Vec<Attribute>,
    links: HashMap<String, NodeId>,
}

impl Document {
    #[inline]
    pub fn root(&self) -> Node {
        Node { id: NodeId(0), d: &self.nodes[0], doc: self }
    }

    /// Returns the root `svg` element.
    ///
    /// Parsing guarantees that it's always present.
    pub fn root_element(&self) -> Node {
        match self.root().first_element_child() {
            Some(node) => node,
            None => self.root(),
        }
    }

    pub fn descendants(&self) -> Descendants {
        self.root().descendants()
    }

    #[inline]
    pub fn element_by_id(&self, id: &str) -> Option<Node> {
        let node_id = self.links.get(id)?;
        Some(self.get(*node_id))
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Node {
        Node { id, d: &self.nodes[id.0], doc: self }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        if !self.root().has_children() {
            return write!(f, "Document []");
        }

        macro_rules! writeln_indented {
            ($depth:expr, $f:expr, $fmt:expr) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt)?;
            };
            ($depth:expr, $f:expr, $fmt:expr, $($arg:tt)*) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt, $($arg)*)?;
            };
        }

        fn print_children(parent: Node, depth: usize, f: &mut std::fmt::Formatter)
            -> Result<(), std::fmt::Error>
        {
            for child in parent.children() {
                writeln_indented!(depth, f, "Element {{");
                writeln_indented!(depth, f, "    tag_name: {:?}", child.tag_name());

                if !child.attributes().is_empty() {
                    writeln_indented!(depth + 1, f, "attributes: [");
                    for attr in child.attributes() {
                        writeln_indented!(depth + 2, f, "{:?}", attr);
                    }
                    writeln_indented!(depth + 1, f, "]");
                }

                if child.has_children() {
                    writeln_indented!(depth, f, "    children: [");
                    print_children(child, depth + 2, f)?;
                    writeln_indented!(depth, f, "    ]");
                }

                writeln_indented!(depth, f, "}}");
            }

            Ok(())
        }

        writeln!(f, "Document [")?;
        print_children(self.root(), 1, f)?;
        writeln!(f, "]")?;

        Ok(())
    }
}


/// A node index inside its [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);


enum NodeKind {
    Root,
    Element {
        tag_name: EId,
        attributes: Range,
    },
}


struct NodeData {
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    children: Option<(NodeId, NodeId)>,
    kind: NodeKind,
}

#[derive(Clone)]
pub struct Attribute {
    pub name: AId,
    pub value: String,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "Attribute {{ name: {:?}, value: {} }}", self.name, self.value)
    }
}


#[derive(Clone, Copy)]
pub struct Node<'a> {
    id: NodeId,
    doc: &'a Document,
    d: &'a NodeData,
}

impl Eq for Node<'_> {}

impl PartialEq for Node<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
           self.id == other.id
        && std::ptr::eq(self.doc, other.doc)
        && std::ptr::eq(self.d, other.d)
    }
}

impl<'a> Node<'a> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.d.kind, NodeKind::Element { .. })
    }

    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    #[inline]
    pub fn tag_name(&self) -> Option<EId> {
        match self.d.kind {
            NodeKind::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    #[inline]
    pub fn has_tag_name(&self, name: EId) -> bool {
        match self.d.kind {
            NodeKind::Element { tag_name, .. } => tag_name == name,
            _ => false,
        }
    }

    /// Returns the tag name as a string, for diagnostics.
    pub fn tag_name_str(&self) -> &'static str {
        self.tag_name().map(|t| t.to_str()).unwrap_or("root")
    }

    pub fn element_id(&self) -> &'a str {
        self.attribute(AId::Id).unwrap_or("")
    }

    /// Parses an attribute value.
    ///
    /// Logs a warning when the value cannot be parsed.
    pub fn attribute<V: FromValue<'a>>(&self, aid: AId) -> Option<V> {
        let value = self.raw_attribute(aid)?;
        match V::parse(*self, aid, value) {
            Some(v) => Some(v),
            None => {
                log::warn!("Failed to parse {} value: '{}'.", aid, value);
                None
            }
        }
    }

    /// Returns a raw attribute value, when it's set and not empty.
    pub fn raw_attribute(&self, aid: AId) -> Option<&'a str> {
        self.attributes().iter()
            .find(|a| a.name == aid)
            .map(|a| a.value.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn has_attribute(&self, aid: AId) -> bool {
        self.raw_attribute(aid).is_some()
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        match self.d.kind {
            NodeKind::Element { ref attributes, .. } => &self.doc.attrs[attributes.clone()],
            _ => &[],
        }
    }

    /// Parses a length attribute.
    ///
    /// Unlike `attribute()`, a malformed value is an error.
    pub fn length_attribute(&self, aid: AId) -> Result<Option<svgtypes::Length>, BridgeError> {
        match self.raw_attribute(aid) {
            Some(value) => parse_length(self.tag_name_str(), aid, value).map(Some),
            None => Ok(None),
        }
    }

    pub fn find_attribute<V: FromValue<'a>>(&self, aid: AId) -> Option<V> {
        self.find_attribute_impl(aid).and_then(|n| n.attribute(aid))
    }

    fn find_attribute_impl(&self, aid: AId) -> Option<Node<'a>> {
        if aid.is_inheritable() {
            self.ancestors().find(|n| n.has_attribute(aid))
        } else {
            if self.has_attribute(aid) {
                Some(*self)
            } else {
                // Non-inheritable attributes can inherit a value only from a direct parent.
                let n = self.parent_element()?;
                if n.has_attribute(aid) {
                    Some(n)
                } else {
                    None
                }
            }
        }
    }

    /// Finds the first element in the `xlink:href` chain, starting from the current one,
    /// that has the specified attribute.
    pub fn chained_attribute_node(&self, aid: AId) -> Result<Option<Node<'a>>, BridgeError> {
        Ok(self.href_chain()?.into_iter().find(|n| n.has_attribute(aid)))
    }

    /// Returns a raw attribute value from the `xlink:href` chain.
    pub fn chained_attribute(&self, aid: AId) -> Result<Option<&'a str>, BridgeError> {
        Ok(self.chained_attribute_node(aid)?.and_then(|n| n.raw_attribute(aid)))
    }

    /// Collects the current element and all elements linked via `xlink:href`.
    ///
    /// A cyclic chain is an error.
    pub fn href_chain(&self) -> Result<Vec<Node<'a>>, BridgeError> {
        let mut iter = self.href_iter();
        let chain: Vec<Node> = iter.by_ref().collect();
        if iter.is_cyclic {
            return Err(BridgeError::CircularReference(self.element_id().to_string()));
        }

        Ok(chain)
    }

    #[inline]
    fn gen_node(&self, id: NodeId) -> Node<'a> {
        Node { id, d: &self.doc.nodes[id.0], doc: self.doc }
    }

    pub fn parent(&self) -> Option<Self> {
        self.d.parent.map(|id| self.gen_node(id))
    }

    pub fn parent_element(&self) -> Option<Self> {
        self.ancestors().skip(1).find(|n| n.is_element())
    }

    pub fn prev_sibling(&self) -> Option<Self> {
        self.d.prev_sibling.map(|id| self.gen_node(id))
    }

    pub fn next_sibling(&self) -> Option<Self> {
        self.d.next_sibling.map(|id| self.gen_node(id))
    }

    pub fn first_child(&self) -> Option<Self> {
        self.d.children.map(|(id, _)| self.gen_node(id))
    }

    pub fn first_element_child(&self) -> Option<Self> {
        self.children().find(|n| n.is_element())
    }

    pub fn last_child(&self) -> Option<Self> {
        self.d.children.map(|(_, id)| self.gen_node(id))
    }

    pub fn has_children(&self) -> bool {
        self.d.children.is_some()
    }

    /// Returns an iterator over ancestor nodes starting at this node.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors(Some(*self))
    }

    /// Returns an iterator over children nodes.
    pub fn children(&self) -> Children<'a> {
        Children { front: self.first_child(), back: self.last_child() }
    }

    /// Returns an iterator which traverses the subtree starting at this node.
    pub fn traverse(&self) -> Traverse<'a> {
        Traverse { root: *self, edge: None }
    }

    /// Returns an iterator over this node and its descendants.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants(self.traverse())
    }

    pub fn href_iter(&self) -> HrefIter<'a> {
        HrefIter {
            doc: self.document(),
            visited: Vec::new(),
            curr: Some(self.id()),
            is_cyclic: false,
        }
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.d.kind {
            NodeKind::Root => write!(f, "Root"),
            NodeKind::Element { .. } => {
                write!(f, "Element {{ tag_name: {:?}, attributes: {:?} }}",
                       self.tag_name(), self.attributes())
            }
        }
    }
}

pub(crate) fn parse_length(element: &str, aid: AId, value: &str) -> Result<svgtypes::Length, BridgeError> {
    svgtypes::Length::from_str(value).map_err(|_| BridgeError::MalformedLength {
        element: element.to_string(),
        attribute: aid.to_string(),
        value: value.to_string(),
    })
}

macro_rules! axis_iterators {
    ($($i:ident($f:path);)*) => {
        $(
            #[derive(Clone)]
            pub struct $i<'a>(Option<Node<'a>>);

            impl<'a> Iterator for $i<'a> {
                type Item = Node<'a>;

                #[inline]
                fn next(&mut self) -> Option<Self::Item> {
                    let node = self.0.take();
                    self.0 = node.as_ref().and_then($f);
                    node
                }
            }
        )*
    };
}

axis_iterators! {
    Ancestors(Node::parent);
    PrevSiblings(Node::prev_sibling);
    NextSiblings(Node::next_sibling);
}


#[derive(Clone)]
pub struct Children<'a> {
    front: Option<Node<'a>>,
    back: Option<Node<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.front.take();
        if self.front == self.back {
            self.back = None;
        } else {
            self.front = node.as_ref().and_then(Node::next_sibling);
        }
        node
    }
}


#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Edge<'a> {
    Open(Node<'a>),
    Close(Node<'a>),
}


#[derive(Clone)]
pub struct Traverse<'a> {
    root: Node<'a>,
    edge: Option<Edge<'a>>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Edge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.edge {
            Some(Edge::Open(node)) => {
                self.edge = Some(match node.first_child() {
                    Some(first_child) => Edge::Open(first_child),
                    None => Edge::Close(node),
                });
            }
            Some(Edge::Close(node)) => {
                if node == self.root {
                    self.edge = None;
                } else if let Some(next_sibling) = node.next_sibling() {
                    self.edge = Some(Edge::Open(next_sibling));
                } else {
                    self.edge = node.parent().map(Edge::Close);
                }
            }
            None => {
                self.edge = Some(Edge::Open(self.root));
            }
        }

        self.edge
    }
}


#[derive(Clone)]
pub struct Descendants<'a>(Traverse<'a>);

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for edge in &mut self.0 {
            if let Edge::Open(node) = edge {
                return Some(node);
            }
        }

        None
    }
}


/// An iterator over elements linked via `xlink:href`.
///
/// Stops on the first element that was already visited.
pub struct HrefIter<'a> {
    doc: &'a Document,
    visited: Vec<NodeId>,
    curr: Option<NodeId>,
    is_cyclic: bool,
}

impl<'a> HrefIter<'a> {
    /// Checks that the iteration was stopped by a reference cycle.
    pub fn is_cyclic(&self) -> bool {
        self.is_cyclic
    }
}

impl<'a> Iterator for HrefIter<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.doc.get(self.curr?);
        if self.visited.contains(&curr.id) {
            log::warn!(
                "Element '#{}' cannot reference itself via 'xlink:href'.",
                curr.element_id()
            );
            self.is_cyclic = true;
            self.curr = None;
            return None;
        }

        self.visited.push(curr.id);
        self.curr = curr.attribute::<Node>(AId::Href).map(|n| n.id);
        Some(curr)
    }
}


pub trait FromValue<'a>: Sized {
    /// Parses an attribute value.
    ///
    /// When `None` is returned, the attribute value will be logged as a parsing failure.
    fn parse(node: Node<'a>, aid: AId, value: &'a str) -> Option<Self>;
}

impl<'a> FromValue<'a> for &'a str {
    #[inline]
    fn parse(_: Node, _: AId, value: &'a str) -> Option<Self> {
        Some(value)
    }
}

impl<'a> FromValue<'a> for f64 {
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        svgtypes::Number::from_str(value).ok().map(|v| v.0)
    }
}

impl<'a> FromValue<'a> for svgtypes::Length {
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        svgtypes::Length::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for svgtypes::Color {
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        svgtypes::Color::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for svgtypes::AspectRatio {
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        svgtypes::AspectRatio::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for svgtypes::ViewBox {
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        svgtypes::ViewBox::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for svgtypes::Transform {
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        svgtypes::Transform::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for Vec<f64> {
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        let mut list = Vec::new();
        for n in svgtypes::NumberListParser::from(value) {
            list.push(n.ok()?);
        }

        Some(list)
    }
}

impl<'a> FromValue<'a> for Node<'a> {
    fn parse(node: Node<'a>, aid: AId, value: &str) -> Option<Self> {
        let id = if aid == AId::Href {
            svgtypes::IRI::from_str(value).ok().map(|v| v.0)
        } else {
            svgtypes::FuncIRI::from_str(value).ok().map(|v| v.0)
        }?;

        node.document().element_by_id(id)
    }
}

pub trait EnumFromStr: Sized {
    fn enum_from_str(text: &str) -> Option<Self>;
}

impl<'a, T: EnumFromStr> FromValue<'a> for T {
    #[inline]
    fn parse(_: Node, _: AId, value: &str) -> Option<Self> {
        EnumFromStr::enum_from_str(value)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_chain_1() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f1' xlink:href='#f2'/>
            <filter id='f2' x='5'/>
        </svg>
        ").unwrap();

        let f1 = doc.element_by_id("f1").unwrap();
        let chain = f1.href_chain().unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(f1.chained_attribute(AId::X).unwrap(), Some("5"));
    }

    #[test]
    fn href_chain_cyclic() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f1' xlink:href='#f2'/>
            <filter id='f2' xlink:href='#f3'/>
            <filter id='f3' xlink:href='#f2'/>
        </svg>
        ").unwrap();

        let f1 = doc.element_by_id("f1").unwrap();
        assert_eq!(f1.href_chain().err(), Some(BridgeError::CircularReference("f1".to_string())));
    }

    #[test]
    fn strict_length() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <rect id='r1' x='10mm' y='qwe'/>
        </svg>
        ").unwrap();

        let rect = doc.element_by_id("r1").unwrap();
        assert!(rect.length_attribute(AId::X).unwrap().is_some());
        assert!(rect.length_attribute(AId::Width).unwrap().is_none());
        assert!(matches!(
            rect.length_attribute(AId::Y),
            Err(BridgeError::MalformedLength { .. })
        ));
    }

    #[test]
    fn style_attribute() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <style>#fl2 { flood-opacity: 0.25 }</style>
            <feFlood id='fl1' style='flood-color:red' flood-color='green'/>
            <feFlood id='fl2'/>
        </svg>
        ").unwrap();

        let fl1 = doc.element_by_id("fl1").unwrap();
        assert_eq!(fl1.attribute::<&str>(AId::FloodColor), Some("red"));
        let fl2 = doc.element_by_id("fl2").unwrap();
        assert_eq!(fl2.attribute::<f64>(AId::FloodOpacity), Some(0.25));
    }

    #[test]
    fn inherited_attribute() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg' font-size='20'>
            <g opacity='0.5'>
                <rect id='r1'/>
            </g>
        </svg>
        ").unwrap();

        let rect = doc.element_by_id("r1").unwrap();
        assert_eq!(rect.find_attribute::<f64>(AId::FontSize), Some(20.0));
        // Non-inheritable, but can be taken from a direct parent.
        assert_eq!(rect.find_attribute::<f64>(AId::Opacity), Some(0.5));
    }
}
