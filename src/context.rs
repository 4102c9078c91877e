// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::Rc;

use crate::filter::{FilterChain, FilterKind, FilterNode, FilterRef, PrimitiveRegistry};
use crate::gvt::{GraphicsNode, GvtBuilder, GvtNodeId, NodeArena, ShapeBuilder};
use crate::loader::{DocumentLoader, FileLoader};
use crate::svgtree::{self, AId, Document, NodeId};
use crate::geom::f64_bound;
use crate::{BridgeError, Options, Rect};

/// Receives non-fatal errors.
///
/// An error reported here means that an element or a filter primitive
/// was skipped, but the rest of the document is still processed.
pub trait ErrorReporter {
    /// Reports an error.
    fn report(&self, error: &BridgeError);
}

/// A default reporter that writes errors to the `log` facade.
#[derive(Clone, Copy, Default, Debug)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &BridgeError) {
        log::warn!("{}", error);
    }
}


/// Computed style properties used by filter primitives.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ComputedStyle {
    /// `flood-color` in the SVG.
    pub flood_color: rgb::RGB8,

    /// `flood-opacity` in the SVG, multiplied by the `flood-color` alpha.
    pub flood_opacity: f64,
}


/// A bridge between an SVG document and graphics nodes.
///
/// Owns the graphics nodes arena and all collaborators
/// used during nodes and filters building.
pub struct BridgeContext<'a> {
    doc: &'a Document,
    opt: &'a Options,
    arena: RefCell<NodeArena>,
    registry: PrimitiveRegistry,
    loader: Box<dyn DocumentLoader>,
    gvt_builder: Box<dyn GvtBuilder>,
    reporter: Box<dyn ErrorReporter>,
    active_filters: RefCell<Vec<(usize, NodeId)>>,
    active_images: RefCell<Vec<String>>,
}

impl<'a> BridgeContext<'a> {
    /// Creates a new context with default collaborators.
    pub fn new(doc: &'a Document, opt: &'a Options) -> Self {
        BridgeContext {
            doc,
            opt,
            arena: RefCell::new(NodeArena::new()),
            registry: PrimitiveRegistry::default(),
            loader: Box::new(FileLoader::new(opt)),
            gvt_builder: Box::new(ShapeBuilder),
            reporter: Box::new(LogReporter),
            active_filters: RefCell::new(Vec::new()),
            active_images: RefCell::new(Vec::new()),
        }
    }

    /// Sets a document loader.
    pub fn with_loader<T: DocumentLoader + 'static>(mut self, loader: T) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Sets an error reporter.
    pub fn with_reporter<T: ErrorReporter + 'static>(mut self, reporter: T) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Sets a graphics nodes builder.
    pub fn with_gvt_builder<T: GvtBuilder + 'static>(mut self, builder: T) -> Self {
        self.gvt_builder = Box::new(builder);
        self
    }

    /// Sets a filter primitives registry.
    pub fn with_registry(mut self, registry: PrimitiveRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the main document.
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Returns processing options.
    #[inline]
    pub fn options(&self) -> &'a Options {
        self.opt
    }

    /// Returns filter primitives registry.
    #[inline]
    pub fn registry(&self) -> &PrimitiveRegistry {
        &self.registry
    }

    /// Builds graphics nodes for the whole document.
    ///
    /// Returns `None` when the root element is not rendered.
    pub fn build_root(&self) -> Option<GvtNodeId> {
        self.build_graphics_node(self.doc.root_element()).unwrap_or_else(|e| {
            self.report(&e);
            None
        })
    }

    /// Builds a graphics node using the current `GvtBuilder`.
    pub fn build_graphics_node(
        &self,
        element: svgtree::Node,
    ) -> Result<Option<GvtNodeId>, BridgeError> {
        self.gvt_builder.build(self, element)
    }

    /// Reports a non-fatal error.
    pub fn report(&self, error: &BridgeError) {
        self.reporter.report(error);
    }


    /// Appends a graphics node to the arena.
    pub fn insert_node(&self, node: GraphicsNode) -> GvtNodeId {
        self.arena.borrow_mut().insert(node)
    }

    /// Returns a copy of a graphics node.
    pub fn graphics_node(&self, id: GvtNodeId) -> Option<GraphicsNode> {
        self.arena.borrow().get(id).cloned()
    }

    /// Sets a node's parent.
    pub fn set_parent(&self, id: GvtNodeId, parent: GvtNodeId) {
        if let Some(node) = self.arena.borrow_mut().get_mut(id) {
            node.parent = Some(parent);
        }
    }

    /// Attaches a filter to a node.
    pub fn set_filter(&self, id: GvtNodeId, filter: Rc<FilterChain>) {
        if let Some(node) = self.arena.borrow_mut().get_mut(id) {
            node.filter = Some(filter);
        }
    }

    /// Returns a filter attached to a node.
    pub fn filter_of(&self, id: GvtNodeId) -> Option<Rc<FilterChain>> {
        self.arena.borrow().get(id).and_then(|n| n.filter.clone())
    }

    /// Binds a main document element to a node.
    pub fn bind(&self, element: svgtree::Node, id: GvtNodeId) {
        self.arena.borrow_mut().bind(element.id(), id);
    }

    /// Removes an element binding.
    ///
    /// Both the element to node and the node to element mappings are removed.
    pub fn unbind(&self, element: svgtree::Node) -> Option<GvtNodeId> {
        self.arena.borrow_mut().unbind_element(element.id())
    }

    /// Returns a node bound to a main document element.
    pub fn node_of(&self, element: svgtree::Node) -> Option<GvtNodeId> {
        self.arena.borrow().node_of(element.id())
    }

    /// Returns a main document element bound to a node.
    pub fn element_of(&self, id: GvtNodeId) -> Option<svgtree::Node<'a>> {
        let element = self.arena.borrow().element_of(id)?;
        Some(self.doc.get(element))
    }

    /// Returns a node bound to an element with the specified `id`.
    pub fn graphics_node_by_id(&self, id: &str) -> Option<GvtNodeId> {
        self.node_of(self.doc.element_by_id(id)?)
    }

    /// Returns node's geometry bounds.
    pub fn geometry_bounds(&self, id: GvtNodeId) -> Option<Rect> {
        self.arena.borrow().get(id).and_then(|n| n.bounds)
    }

    /// Returns a union of children bounds in the parent's user space.
    pub fn children_bounds(&self, children: &[GvtNodeId]) -> Option<Rect> {
        let arena = self.arena.borrow();
        let mut bounds: Option<Rect> = None;
        for id in children {
            let r = try_opt_continue!(arena.get(*id).and_then(|n| n.transformed_bounds()));
            bounds = Some(match bounds {
                Some(b) => b.union(&r),
                None => r,
            });
        }

        bounds
    }

    /// Wraps a graphics node as a filter source.
    pub fn graphics_node_source(&self, id: GvtNodeId) -> FilterRef {
        let bounds = self.geometry_bounds(id).unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0));
        FilterNode::new(FilterKind::Source(id), bounds)
    }


    /// Resolves style properties used by filter primitives.
    pub fn computed_style(&self, element: svgtree::Node) -> ComputedStyle {
        let color = match element.raw_attribute(AId::FloodColor).map(str::trim) {
            Some("currentColor") => element.find_attribute::<svgtypes::Color>(AId::Color),
            Some(_) => element.attribute::<svgtypes::Color>(AId::FloodColor),
            None => None,
        }.unwrap_or_else(svgtypes::Color::black);

        let opacity = element.attribute::<f64>(AId::FloodOpacity).unwrap_or(1.0);
        let opacity = opacity * color.alpha as f64 / 255.0;

        ComputedStyle {
            flood_color: rgb::RGB8::new(color.red, color.green, color.blue),
            flood_opacity: f64_bound(0.0, opacity, 1.0),
        }
    }

    /// Loads raw resource data using the current `DocumentLoader`.
    pub fn load_data(&self, uri: &str) -> Result<Vec<u8>, BridgeError> {
        self.loader.load_data(uri)
    }

    /// Loads an SVG document using the current `DocumentLoader`.
    pub fn load_document(&self, uri: &str) -> Result<Document, BridgeError> {
        self.loader.load(uri)
    }


    /// Marks a filter as being built.
    ///
    /// Fails when the filter is already being built, which means that
    /// the filter references itself.
    pub(crate) fn enter_filter(&self, filter: svgtree::Node) -> Result<StackGuard<(usize, NodeId)>, BridgeError> {
        let key = (filter.document() as *const Document as usize, filter.id());
        if self.active_filters.borrow().contains(&key) {
            return Err(BridgeError::CircularReference(filter.element_id().to_string()));
        }

        self.active_filters.borrow_mut().push(key);
        Ok(StackGuard { stack: &self.active_filters })
    }

    /// Marks an external image as being loaded.
    pub(crate) fn enter_image(&self, uri: &str) -> Result<StackGuard<String>, BridgeError> {
        if self.active_images.borrow().iter().any(|u| u == uri) {
            return Err(BridgeError::CircularReference(uri.to_string()));
        }

        self.active_images.borrow_mut().push(uri.to_string());
        Ok(StackGuard { stack: &self.active_images })
    }
}

impl std::fmt::Debug for BridgeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("BridgeContext")
            .field("options", &self.opt)
            .field("arena", &self.arena)
            .field("registry", &self.registry)
            .finish()
    }
}


/// Pops the stack top on drop.
pub(crate) struct StackGuard<'s, T> {
    stack: &'s RefCell<Vec<T>>,
}

impl<T> Drop for StackGuard<'_, T> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}
