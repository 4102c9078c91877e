// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Graphics nodes.
//!
//! Graphics nodes are stored in a [`NodeArena`] and are referenced by
//! [`GvtNodeId`]. The arena also keeps a side-table that maps DOM elements
//! to the nodes built from them.

use std::collections::HashMap;
use std::rc::Rc;

use kurbo::Shape;

use crate::filter::{self, FilterChain};
use crate::svgtree::{self, AId, EId, NodeId};
use crate::units::{self, UnitContext, Units};
use crate::{BridgeContext, BridgeError, Rect};

/// A graphics node index inside a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GvtNodeId(usize);

impl GvtNodeId {
    /// Creates a new id from a raw index.
    #[inline]
    pub fn new(id: usize) -> Self {
        GvtNodeId(id)
    }

    /// Returns a raw index.
    #[inline]
    pub fn get(&self) -> usize {
        self.0
    }
}


/// A graphics node.
#[derive(Clone, Debug)]
pub struct GraphicsNode {
    /// Tag name of the element the node was built from.
    pub tag: EId,

    /// Geometry bounds in the node's own user space.
    ///
    /// `None` when the node has no geometry, like an empty group.
    pub bounds: Option<Rect>,

    /// Node transform.
    ///
    /// `transform` in the SVG. Includes the `x`/`y` offset of `use`.
    pub transform: kurbo::Affine,

    /// An attached filter.
    pub filter: Option<Rc<FilterChain>>,

    /// Child nodes.
    pub children: Vec<GvtNodeId>,

    /// Parent node.
    pub parent: Option<GvtNodeId>,
}

impl GraphicsNode {
    /// Creates a new node without children and filters.
    pub fn new(tag: EId, bounds: Option<Rect>) -> Self {
        GraphicsNode {
            tag,
            bounds,
            transform: kurbo::Affine::IDENTITY,
            filter: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Returns geometry bounds in the parent's user space.
    pub fn transformed_bounds(&self) -> Option<Rect> {
        self.bounds.map(|r| transform_rect(self.transform, r))
    }
}

fn transform_rect(ts: kurbo::Affine, r: Rect) -> Rect {
    Rect::from(ts.transform_rect_bbox(r.to_kurbo()))
}


/// A graphics nodes storage.
///
/// Nodes are never moved. A removed node leaves a hole, so ids stay valid.
#[derive(Default, Debug)]
pub struct NodeArena {
    nodes: Vec<Option<GraphicsNode>>,
    by_element: HashMap<NodeId, GvtNodeId>,
    by_node: HashMap<GvtNodeId, NodeId>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena::default()
    }

    /// Appends a node.
    pub fn insert(&mut self, node: GraphicsNode) -> GvtNodeId {
        self.nodes.push(Some(node));
        GvtNodeId(self.nodes.len() - 1)
    }

    /// Returns a node.
    pub fn get(&self, id: GvtNodeId) -> Option<&GraphicsNode> {
        self.nodes.get(id.0).and_then(|n| n.as_ref())
    }

    /// Returns a mutable node.
    pub fn get_mut(&mut self, id: GvtNodeId) -> Option<&mut GraphicsNode> {
        self.nodes.get_mut(id.0).and_then(|n| n.as_mut())
    }

    /// Removes a node and its binding.
    ///
    /// Children are not removed.
    pub fn remove(&mut self, id: GvtNodeId) -> Option<GraphicsNode> {
        if let Some(element) = self.by_node.remove(&id) {
            self.by_element.remove(&element);
        }

        self.nodes.get_mut(id.0).and_then(|n| n.take())
    }

    /// Binds an element to a node.
    ///
    /// Previous bindings of both the element and the node are replaced.
    pub fn bind(&mut self, element: NodeId, id: GvtNodeId) {
        self.unbind_element(element);
        self.unbind_node(id);
        self.by_element.insert(element, id);
        self.by_node.insert(id, element);
    }

    /// Removes an element binding in both directions.
    pub fn unbind_element(&mut self, element: NodeId) -> Option<GvtNodeId> {
        let id = self.by_element.remove(&element)?;
        self.by_node.remove(&id);
        Some(id)
    }

    /// Removes a node binding in both directions.
    pub fn unbind_node(&mut self, id: GvtNodeId) -> Option<NodeId> {
        let element = self.by_node.remove(&id)?;
        self.by_element.remove(&element);
        Some(element)
    }

    /// Returns a node bound to an element.
    pub fn node_of(&self, element: NodeId) -> Option<GvtNodeId> {
        self.by_element.get(&element).cloned()
    }

    /// Returns an element bound to a node.
    pub fn element_of(&self, id: GvtNodeId) -> Option<NodeId> {
        self.by_node.get(&id).cloned()
    }

    /// Returns the number of alive nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Checks that the arena has no alive nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


/// Builds graphics nodes from SVG elements.
pub trait GvtBuilder {
    /// Builds a graphics node and all its descendants.
    ///
    /// Returns `Ok(None)` for elements that are not rendered.
    fn build(
        &self,
        ctx: &BridgeContext,
        element: svgtree::Node,
    ) -> Result<Option<GvtNodeId>, BridgeError>;
}


/// A default graphics nodes builder.
///
/// Supports basic shapes, groups and `use`. Other elements are not rendered.
#[derive(Clone, Copy, Default, Debug)]
pub struct ShapeBuilder;

impl GvtBuilder for ShapeBuilder {
    fn build(
        &self,
        ctx: &BridgeContext,
        element: svgtree::Node,
    ) -> Result<Option<GvtNodeId>, BridgeError> {
        build_element(ctx, element, &mut Vec::new())
    }
}

fn build_element(
    ctx: &BridgeContext,
    element: svgtree::Node,
    use_stack: &mut Vec<NodeId>,
) -> Result<Option<GvtNodeId>, BridgeError> {
    let tag = try_opt_or!(element.tag_name(), Ok(None));
    if element.raw_attribute(AId::Display) == Some("none") {
        return Ok(None);
    }

    let mut transform = element.attribute::<svgtypes::Transform>(AId::Transform)
        .map(|ts| kurbo::Affine::new([ts.a, ts.b, ts.c, ts.d, ts.e, ts.f]))
        .unwrap_or(kurbo::Affine::IDENTITY);

    let children = match tag {
        EId::G | EId::Svg | EId::A | EId::Symbol => {
            build_children(ctx, element, use_stack)
        }
        EId::Use => {
            let uc = UnitContext::for_element(element, ctx.options());
            let x = units::resolve_length_attribute(element, AId::X, Units::UserSpaceOnUse, &uc)?;
            let y = units::resolve_length_attribute(element, AId::Y, Units::UserSpaceOnUse, &uc)?;
            transform = transform * kurbo::Affine::translate((x.unwrap_or(0.0), y.unwrap_or(0.0)));

            let target = try_opt_warn_or!(
                element.attribute::<svgtree::Node>(AId::Href), Ok(None),
                "'use' references an unknown element. Skipped."
            );

            if target.id() == element.id() || use_stack.contains(&element.id()) {
                return Err(BridgeError::CircularReference(element.element_id().to_string()));
            }

            use_stack.push(element.id());
            let child = build_element(ctx, target, use_stack);
            use_stack.pop();

            child?.into_iter().collect()
        }
        _ if tag.is_graphic() => Vec::new(),
        _ => return Ok(None),
    };

    let bounds = if tag.is_graphic() && tag != EId::Use {
        let uc = UnitContext::for_element(element, ctx.options());
        shape_bounds(element, tag, &uc)?
    } else {
        ctx.children_bounds(&children)
    };

    let mut node = GraphicsNode::new(tag, bounds);
    node.transform = transform;
    node.children = children.clone();
    let id = ctx.insert_node(node);
    for child in children {
        ctx.set_parent(child, id);
    }

    if std::ptr::eq(element.document(), ctx.document()) && ctx.node_of(element).is_none() {
        ctx.bind(element, id);
    }

    if element.has_attribute(AId::Filter) {
        filter::convert_filter(element, id, ctx);
    }

    Ok(Some(id))
}

fn build_children(
    ctx: &BridgeContext,
    parent: svgtree::Node,
    use_stack: &mut Vec<NodeId>,
) -> Vec<GvtNodeId> {
    let mut children = Vec::new();
    for child in parent.children() {
        // Symbols are rendered only via `use`.
        if child.has_tag_name(EId::Symbol) {
            continue;
        }

        match build_element(ctx, child, use_stack) {
            Ok(Some(id)) => children.push(id),
            Ok(None) => {}
            Err(e) => ctx.report(&e),
        }
    }

    children
}

/// Computes geometry bounds of a basic shape.
fn shape_bounds(
    element: svgtree::Node,
    tag: EId,
    uc: &UnitContext,
) -> Result<Option<Rect>, BridgeError> {
    let length = |aid: AId| -> Result<f64, BridgeError> {
        let n = units::resolve_length_attribute(element, aid, Units::UserSpaceOnUse, uc)?;
        Ok(n.unwrap_or(0.0))
    };

    let rect = match tag {
        EId::Rect | EId::Image => {
            let width = length(AId::Width)?;
            let height = length(AId::Height)?;
            if !(width > 0.0 && height > 0.0) {
                log::warn!("{} '{}' has an invalid size. Skipped.", tag, element.element_id());
                return Ok(None);
            }

            Rect::new(length(AId::X)?, length(AId::Y)?, width, height)
        }
        EId::Circle => {
            let r = length(AId::R)?;
            if !(r > 0.0) {
                return Ok(None);
            }

            let (cx, cy) = (length(AId::Cx)?, length(AId::Cy)?);
            Rect::new(cx - r, cy - r, r * 2.0, r * 2.0)
        }
        EId::Ellipse => {
            let (rx, ry) = (length(AId::Rx)?, length(AId::Ry)?);
            if !(rx > 0.0 && ry > 0.0) {
                return Ok(None);
            }

            let (cx, cy) = (length(AId::Cx)?, length(AId::Cy)?);
            Rect::new(cx - rx, cy - ry, rx * 2.0, ry * 2.0)
        }
        EId::Line => {
            let (x1, y1) = (length(AId::X1)?, length(AId::Y1)?);
            let (x2, y2) = (length(AId::X2)?, length(AId::Y2)?);
            Rect::from_ltrb(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
        }
        EId::Polyline | EId::Polygon => {
            let text = try_opt_or!(element.raw_attribute(AId::Points), Ok(None));
            let mut bbox: Option<kurbo::Rect> = None;
            for (x, y) in svgtypes::PointsParser::from(text) {
                let p = kurbo::Point::new(x, y);
                bbox = Some(match bbox {
                    Some(r) => r.union_pt(p),
                    None => kurbo::Rect::from_points(p, p),
                });
            }

            Rect::from(try_opt_or!(bbox, Ok(None)))
        }
        EId::Path => {
            let text = try_opt_or!(element.raw_attribute(AId::D), Ok(None));
            let path = match kurbo::BezPath::from_svg(text) {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("Path '{}' has an invalid data: {}. Skipped.", element.element_id(), e);
                    return Ok(None);
                }
            };

            if path.elements().is_empty() {
                return Ok(None);
            }

            Rect::from(path.bounding_box())
        }
        _ => return Ok(None),
    };

    Ok(Some(rect))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::FuzzyEq;

    #[test]
    fn bind_unbind() {
        let doc = svgtree::Document::parse(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect id='r1'/><rect id='r2'/></svg>"
        ).unwrap();
        let r1 = doc.element_by_id("r1").unwrap().id();
        let r2 = doc.element_by_id("r2").unwrap().id();

        let mut arena = NodeArena::new();
        let n1 = arena.insert(GraphicsNode::new(EId::Rect, None));
        let n2 = arena.insert(GraphicsNode::new(EId::Rect, None));

        arena.bind(r1, n1);
        assert_eq!(arena.node_of(r1), Some(n1));
        assert_eq!(arena.element_of(n1), Some(r1));

        // Rebinding a node removes the previous element binding.
        arena.bind(r2, n1);
        assert_eq!(arena.node_of(r1), None);
        assert_eq!(arena.node_of(r2), Some(n1));

        assert_eq!(arena.unbind_element(r2), Some(n1));
        assert_eq!(arena.element_of(n1), None);
        assert_eq!(arena.node_of(r2), None);

        arena.bind(r1, n2);
        assert!(arena.remove(n2).is_some());
        assert_eq!(arena.node_of(r1), None);
        assert!(arena.get(n2).is_none());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn transformed_bounds() {
        let mut node = GraphicsNode::new(EId::Rect, Some(Rect::new(0.0, 0.0, 10.0, 20.0)));
        node.transform = kurbo::Affine::translate((5.0, 5.0)) * kurbo::Affine::scale(2.0);
        let r = node.transformed_bounds().unwrap();
        assert!(r.fuzzy_eq(&Rect::new(5.0, 5.0, 20.0, 40.0)));
    }

    #[test]
    fn rotated_bounds() {
        let mut node = GraphicsNode::new(EId::Rect, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        node.transform = kurbo::Affine::rotate(std::f64::consts::FRAC_PI_2);
        let r = node.transformed_bounds().unwrap();
        let expected = [-10.0, 0.0, 10.0, 10.0];
        for (a, b) in [r.x, r.y, r.width, r.height].iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9, "{}", r);
        }
    }
}
