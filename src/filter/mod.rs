// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SVG filters.
//!
//! A `filter` element is converted into a [`FilterChain`]: a directed acyclic
//! graph of [`FilterNode`]s. Nodes are reference counted, since multiple
//! primitives can read the same named result.

use std::collections::HashMap;
use std::rc::Rc;

use crate::gvt::GvtNodeId;
use crate::svgtree::{self, AId, EId};
use crate::units::{UnitContext, Units};
use crate::{BridgeContext, BridgeError, Rect};

mod builder;
mod catalog;
mod color_matrix;
mod component_transfer;
mod composite;
mod displacement_map;
mod flood;
mod gaussian_blur;
mod image;
mod merge;
mod morphology;
mod offset;
mod pad;
mod results;
mod tile;
mod turbulence;

pub use self::builder::*;
pub use self::catalog::create;
pub use self::color_matrix::*;
pub use self::component_transfer::*;
pub use self::composite::*;
pub use self::displacement_map::*;
pub use self::flood::*;
pub use self::gaussian_blur::*;
pub use self::image::*;
pub use self::merge::*;
pub use self::morphology::*;
pub use self::offset::*;
pub use self::pad::*;
pub use self::results::*;
pub use self::tile::*;
pub use self::turbulence::*;

/// A shared filter node reference.
pub type FilterRef = Rc<FilterNode>;

/// An image producing operator.
#[derive(Debug)]
pub struct FilterNode {
    /// Operator kind and parameters.
    pub kind: FilterKind,

    /// Operator output extent in user space.
    pub bounds: Rect,
}

impl FilterNode {
    /// Creates a new shared node.
    #[inline]
    pub fn new(kind: FilterKind, bounds: Rect) -> FilterRef {
        Rc::new(FilterNode { kind, bounds })
    }

    /// Returns node's direct inputs.
    pub fn inputs(&self) -> Vec<&FilterRef> {
        match self.kind {
            FilterKind::Source(_) => Vec::new(),
            FilterKind::Pad(ref fe) => vec![&fe.input],
            FilterKind::GaussianBlur(ref fe) => vec![&fe.input],
            FilterKind::Offset(ref fe) => vec![&fe.input],
            FilterKind::Composite(ref fe) => vec![&fe.input1, &fe.input2],
            FilterKind::ColorMatrix(ref fe) => vec![&fe.input],
            FilterKind::Merge(ref fe) => fe.inputs.iter().collect(),
            FilterKind::Tile(ref fe) => vec![&fe.input],
            FilterKind::Turbulence(_) => Vec::new(),
            FilterKind::DisplacementMap(ref fe) => vec![&fe.input1, &fe.input2],
            FilterKind::Morphology(ref fe) => vec![&fe.input],
            FilterKind::Image(_) => Vec::new(),
            FilterKind::ComponentTransfer(ref fe) => vec![&fe.input],
            FilterKind::Flood(_) => Vec::new(),
        }
    }

    /// Checks that the node is a pad operator.
    pub fn is_pad(&self) -> bool {
        matches!(self.kind, FilterKind::Pad(_))
    }

    /// Returns the first non-pad node, starting from this one.
    pub fn unpadded(&self) -> &FilterNode {
        match self.kind {
            FilterKind::Pad(ref pad) => pad.input.unpadded(),
            _ => self,
        }
    }
}


/// A filter operator kind.
#[allow(missing_docs)]
#[derive(Debug)]
pub enum FilterKind {
    /// A rendering of a graphics node.
    Source(GvtNodeId),
    Pad(Pad),
    GaussianBlur(GaussianBlur),
    Offset(Offset),
    Composite(Composite),
    ColorMatrix(ColorMatrix),
    Merge(Merge),
    Tile(Tile),
    Turbulence(Turbulence),
    DisplacementMap(DisplacementMap),
    Morphology(Morphology),
    Image(Image),
    ComponentTransfer(ComponentTransfer),
    Flood(Flood),
}


/// A built filter.
#[derive(Debug)]
pub struct FilterChain {
    /// The terminal node.
    pub source: FilterRef,

    /// Filter region in user space.
    ///
    /// `x`, `y`, `width` and `height` in the SVG.
    pub region: Rect,

    /// Filter region resolution in pixels.
    ///
    /// `filterRes` in the SVG. `None` when not set.
    pub resolution: Option<(u32, u32)>,
}


/// A filter primitive kind.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PrimitiveKind {
    GaussianBlur,
    Offset,
    Composite,
    ColorMatrix,
    Merge,
    Tile,
    Turbulence,
    DisplacementMap,
    Morphology,
    Image,
    ComponentTransfer,
    Flood,
}

impl PrimitiveKind {
    /// Checks that the primitive produces an image without reading its inputs bounds.
    ///
    /// Such primitives default to the filter region.
    pub fn is_generator(&self) -> bool {
        matches!(self,
              PrimitiveKind::Tile
            | PrimitiveKind::Image
            | PrimitiveKind::Turbulence
            | PrimitiveKind::Flood
        )
    }
}


/// An immutable mapping from element names to primitive kinds.
#[derive(Clone, Debug)]
pub struct PrimitiveRegistry {
    kinds: HashMap<EId, PrimitiveKind>,
}

impl PrimitiveRegistry {
    /// Creates an empty registry.
    ///
    /// All filter primitives will be skipped.
    pub fn empty() -> Self {
        PrimitiveRegistry { kinds: HashMap::new() }
    }

    /// Registers an element.
    pub fn with(mut self, eid: EId, kind: PrimitiveKind) -> Self {
        self.kinds.insert(eid, kind);
        self
    }

    /// Returns a primitive kind of an element.
    #[inline]
    pub fn get(&self, eid: EId) -> Option<PrimitiveKind> {
        self.kinds.get(&eid).cloned()
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        PrimitiveRegistry::empty()
            .with(EId::FeColorMatrix, PrimitiveKind::ColorMatrix)
            .with(EId::FeComponentTransfer, PrimitiveKind::ComponentTransfer)
            .with(EId::FeComposite, PrimitiveKind::Composite)
            .with(EId::FeDisplacementMap, PrimitiveKind::DisplacementMap)
            .with(EId::FeFlood, PrimitiveKind::Flood)
            .with(EId::FeGaussianBlur, PrimitiveKind::GaussianBlur)
            .with(EId::FeImage, PrimitiveKind::Image)
            .with(EId::FeMerge, PrimitiveKind::Merge)
            .with(EId::FeMorphology, PrimitiveKind::Morphology)
            .with(EId::FeOffset, PrimitiveKind::Offset)
            .with(EId::FeTile, PrimitiveKind::Tile)
            .with(EId::FeTurbulence, PrimitiveKind::Turbulence)
    }
}


/// A parsed, not yet resolved filter primitive.
#[derive(Clone, Copy, Debug)]
pub struct FilterPrimitive<'a> {
    /// Primitive kind.
    pub kind: PrimitiveKind,
    /// Primitive element.
    pub element: svgtree::Node<'a>,
    /// `in` in the SVG.
    pub input: Option<&'a str>,
    /// `in2` in the SVG.
    pub input2: Option<&'a str>,
    /// `result` in the SVG.
    pub result: Option<&'a str>,
}

impl<'a> FilterPrimitive<'a> {
    /// Parses a filter primitive.
    ///
    /// Returns `None` for elements that are not registered.
    pub fn parse(element: svgtree::Node<'a>, registry: &PrimitiveRegistry) -> Option<Self> {
        let kind = registry.get(element.tag_name()?)?;
        Some(FilterPrimitive {
            kind,
            element,
            input: element.raw_attribute(AId::In).map(str::trim),
            input2: element.raw_attribute(AId::In2).map(str::trim),
            result: element.raw_attribute(AId::Result).map(str::trim),
        })
    }

    /// Returns the element's tag name, for diagnostics.
    pub fn tag_name(&self) -> &'static str {
        self.element.tag_name_str()
    }

    pub(crate) fn invalid(&self, reason: &str) -> BridgeError {
        BridgeError::InvalidFilterPrimitive {
            element: self.tag_name().to_string(),
            reason: reason.to_string(),
        }
    }
}


/// A filter chain state shared by all primitive constructors.
pub struct PrimitiveContext<'c> {
    /// The bridge context.
    pub bridge: &'c BridgeContext<'c>,

    /// The result of the previous primitive.
    pub current_in: FilterRef,

    /// The filter region.
    pub filter_region: Rect,

    /// `primitiveUnits` of the filter.
    pub primitive_units: Units,

    /// Geometry bounds of the filtered node.
    pub bbox: Option<Rect>,

    /// A length resolution context of the filter.
    pub units: UnitContext,
}

impl<'c> PrimitiveContext<'c> {
    /// Resolves the `in` or `in2` input of a primitive.
    pub fn input(
        &self,
        fe: &FilterPrimitive,
        aid: AId,
        results: &NamedResultMap,
    ) -> Result<FilterRef, BridgeError> {
        let name = if aid == AId::In2 { fe.input2 } else { fe.input };
        results.resolve(name, &self.current_in)
    }

    /// Resolves a primitive subregion.
    pub fn subregion(
        &self,
        fe: &FilterPrimitive,
        inputs: &[&FilterRef],
        results: &NamedResultMap,
    ) -> Result<Rect, BridgeError> {
        let default = crate::region::default_primitive_region(
            fe.kind, inputs, results, self.filter_region,
        );

        crate::region::primitive_region(
            fe.element, self.primitive_units, default, self.filter_region, self.bbox, &self.units,
        )
    }

    /// Scales a primitive number by the bounding box width.
    ///
    /// Used only with `primitiveUnits="objectBoundingBox"`.
    pub fn scale_x(&self, n: f64) -> f64 {
        match self.primitive_units {
            Units::UserSpaceOnUse => n,
            Units::ObjectBoundingBox => n * self.bbox.map(|r| r.width).unwrap_or(0.0),
        }
    }

    /// Scales a primitive number by the bounding box height.
    pub fn scale_y(&self, n: f64) -> f64 {
        match self.primitive_units {
            Units::UserSpaceOnUse => n,
            Units::ObjectBoundingBox => n * self.bbox.map(|r| r.height).unwrap_or(0.0),
        }
    }
}

impl std::fmt::Debug for PrimitiveContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PrimitiveContext")
            .field("filter_region", &self.filter_region)
            .field("primitive_units", &self.primitive_units)
            .field("bbox", &self.bbox)
            .finish()
    }
}


/// An output of a primitive constructor, before padding.
#[derive(Debug)]
pub struct PrimitiveOutput {
    /// Operator kind.
    pub kind: FilterKind,

    /// Natural operator extent.
    pub bounds: Rect,

    /// Resolved primitive subregion.
    pub region: Rect,
}

/// Parses a number pair, like `stdDeviation` or `radius`.
///
/// The second number defaults to the first one. Anything other than
/// one or two numbers is treated as not set.
pub(crate) fn number_pair(fe: svgtree::Node, aid: AId) -> Option<(f64, f64)> {
    let text = fe.raw_attribute(aid)?;
    let mut parser = svgtypes::NumberListParser::from(text);

    let n1 = parser.next().and_then(|n| n.ok());
    let n2 = parser.next().and_then(|n| n.ok());
    // Must have no more than two values.
    let n3 = parser.next().and_then(|n| n.ok());

    match (n1, n2, n3) {
        (Some(n1), Some(n2), None) => Some((n1, n2)),
        (Some(n1), None, None) => Some((n1, n1)),
        _ => {
            log::warn!("Failed to parse {} value: '{}'.", aid, text);
            None
        }
    }
}
