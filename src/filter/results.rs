// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{BridgeError, Rect};
use super::{ColorMatrix, ColorMatrixKind, FilterKind, FilterNode, FilterRef};

/// The filtered element rendering.
pub const SOURCE_GRAPHIC: &str = "SourceGraphic";

/// The alpha channel of the filtered element rendering.
pub const SOURCE_ALPHA: &str = "SourceAlpha";

const UNSUPPORTED_INPUTS: &[&str] = &[
    "BackgroundImage",
    "BackgroundAlpha",
    "FillPaint",
    "StrokePaint",
];

/// A mapping from primitive result names to filter nodes.
///
/// Always contains the `SourceGraphic` and `SourceAlpha` bindings.
/// A later primitive with the same `result` name replaces the previous one.
#[derive(Debug)]
pub struct NamedResultMap {
    source_graphic: FilterRef,
    source_alpha: FilterRef,
    results: HashMap<String, FilterRef>,
}

impl NamedResultMap {
    /// Creates a new map.
    ///
    /// `SourceAlpha` is derived from `source_graphic`.
    pub fn new(source_graphic: FilterRef, filter_region: Rect) -> Self {
        let alpha = FilterNode::new(FilterKind::ColorMatrix(ColorMatrix {
            input: source_graphic.clone(),
            kind: ColorMatrixKind::alpha_extraction(),
        }), source_graphic.bounds);
        let source_alpha = super::pad(alpha, filter_region);

        NamedResultMap {
            source_graphic,
            source_alpha,
            results: HashMap::new(),
        }
    }

    /// Returns the `SourceGraphic` binding.
    #[inline]
    pub fn source_graphic(&self) -> &FilterRef {
        &self.source_graphic
    }

    /// Returns the `SourceAlpha` binding.
    #[inline]
    pub fn source_alpha(&self) -> &FilterRef {
        &self.source_alpha
    }

    /// Checks that the node is either `SourceGraphic` or `SourceAlpha`.
    pub fn is_source(&self, node: &FilterRef) -> bool {
        Rc::ptr_eq(node, &self.source_graphic) || Rc::ptr_eq(node, &self.source_alpha)
    }

    /// Returns a node registered under the specified name.
    pub fn get(&self, name: &str) -> Option<&FilterRef> {
        match name {
            SOURCE_GRAPHIC => Some(&self.source_graphic),
            SOURCE_ALPHA => Some(&self.source_alpha),
            _ => self.results.get(name),
        }
    }

    /// Resolves an `in` attribute value.
    ///
    /// An empty or missing name resolves to `current_in`.
    pub fn resolve(
        &self,
        name: Option<&str>,
        current_in: &FilterRef,
    ) -> Result<FilterRef, BridgeError> {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(current_in.clone()),
        };

        if UNSUPPORTED_INPUTS.contains(&name) {
            return Err(BridgeError::UnsupportedFilterInput(name.to_string()));
        }

        match self.get(name) {
            Some(node) => Ok(node.clone()),
            None => Err(BridgeError::UnknownFilterReference(name.to_string())),
        }
    }

    /// Registers a node under the specified name.
    ///
    /// Built-in names cannot be overridden.
    pub fn register(&mut self, name: &str, node: FilterRef) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        if name == SOURCE_GRAPHIC || name == SOURCE_ALPHA || UNSUPPORTED_INPUTS.contains(&name) {
            log::warn!("Filter result '{}' cannot be overridden.", name);
            return;
        }

        self.results.insert(name.to_string(), node);
    }

    /// Returns the number of registered results, excluding the built-in ones.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Checks that no results were registered.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
