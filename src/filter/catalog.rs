// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::BridgeError;
use super::*;

/// Creates a filter node from a primitive.
///
/// The node is padded to its subregion and, when the primitive has
/// a `result` name, registered in `results`.
///
/// Returns `Ok(None)` when the primitive contributes nothing.
pub fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &mut NamedResultMap,
) -> Result<Option<FilterRef>, BridgeError> {
    let output = match fe.kind {
        PrimitiveKind::GaussianBlur => gaussian_blur::create(fe, cx, results)?,
        PrimitiveKind::Offset => offset::create(fe, cx, results)?,
        PrimitiveKind::Composite => composite::create(fe, cx, results)?,
        PrimitiveKind::ColorMatrix => color_matrix::create(fe, cx, results)?,
        PrimitiveKind::Merge => merge::create(fe, cx, results)?,
        PrimitiveKind::Tile => tile::create(fe, cx, results)?,
        PrimitiveKind::Turbulence => turbulence::create(fe, cx, results)?,
        PrimitiveKind::DisplacementMap => displacement_map::create(fe, cx, results)?,
        PrimitiveKind::Morphology => morphology::create(fe, cx, results)?,
        PrimitiveKind::Image => image::create(fe, cx, results)?,
        PrimitiveKind::ComponentTransfer => component_transfer::create(fe, cx, results)?,
        PrimitiveKind::Flood => flood::create(fe, cx, results)?,
    };

    let output = try_opt_or!(output, Ok(None));
    let node = pad(FilterNode::new(output.kind, output.bounds), output.region);

    if let Some(name) = fe.result {
        results.register(name, node.clone());
    }

    Ok(Some(node))
}
