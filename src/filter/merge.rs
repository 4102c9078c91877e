// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::{AId, EId};
use crate::BridgeError;
use super::*;

/// A merge filter primitive.
///
/// `feMerge` element in the SVG.
#[derive(Debug)]
pub struct Merge {
    /// List of input layers that should be merged.
    ///
    /// Composited using `over`, in order.
    /// List of `feMergeNode`'s in the SVG.
    pub inputs: Vec<FilterRef>,
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let mut inputs = Vec::new();
    for child in fe.element.children().filter(|n| n.has_tag_name(EId::FeMergeNode)) {
        let name = child.raw_attribute(AId::In).map(str::trim);
        // A node with a bad input is skipped, not the whole merge.
        match results.resolve(name, &cx.current_in) {
            Ok(input) => inputs.push(input),
            Err(e) => cx.bridge.report(&e),
        }
    }

    if inputs.is_empty() {
        log::warn!("'feMerge' has no usable 'feMergeNode' children. Skipped.");
        return Ok(None);
    }

    let refs: Vec<&FilterRef> = inputs.iter().collect();
    let region = cx.subregion(fe, &refs, results)?;

    let mut bounds = inputs[0].bounds;
    for input in &inputs[1..] {
        bounds = bounds.union(&input.bounds);
    }

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Merge(Merge { inputs }),
        bounds,
        region,
    }))
}
