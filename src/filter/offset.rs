// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;
use crate::BridgeError;
use super::*;

/// An offset filter primitive.
///
/// `feOffset` element in the SVG.
#[derive(Debug)]
pub struct Offset {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input: FilterRef,

    /// The amount to offset the input graphic along the X-axis in user space.
    pub dx: f64,

    /// The amount to offset the input graphic along the Y-axis in user space.
    pub dy: f64,
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let input = cx.input(fe, AId::In, results)?;
    let region = cx.subregion(fe, &[&input], results)?;

    let dx = cx.scale_x(fe.element.attribute::<f64>(AId::Dx).unwrap_or(0.0));
    let dy = cx.scale_y(fe.element.attribute::<f64>(AId::Dy).unwrap_or(0.0));
    let bounds = input.bounds.translate(dx, dy);

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Offset(Offset { input, dx, dy }),
        bounds,
        region,
    }))
}
