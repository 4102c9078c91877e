// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;
use crate::{BridgeError, Rect};
use super::*;

/// A Gaussian blur filter primitive.
///
/// `feGaussianBlur` element in the SVG.
#[derive(Debug)]
pub struct GaussianBlur {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input: FilterRef,

    /// A standard deviation along the X-axis in user space.
    ///
    /// `stdDeviation` in the SVG.
    pub std_dev_x: f64,

    /// A standard deviation along the Y-axis in user space.
    ///
    /// `stdDeviation` in the SVG.
    pub std_dev_y: f64,
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let (std_dev_x, std_dev_y) = number_pair(fe.element, AId::StdDeviation).unwrap_or((0.0, 0.0));
    let std_dev_x = cx.scale_x(std_dev_x);
    let std_dev_y = cx.scale_y(std_dev_y);

    // A zero or negative deviation disables the effect.
    if !(std_dev_x > 0.0 && std_dev_y > 0.0) {
        return Ok(None);
    }

    let input = cx.input(fe, AId::In, results)?;
    let region = cx.subregion(fe, &[&input], results)?;

    // The kernel covers three deviations in each direction.
    let bounds = inflate(input.bounds, std_dev_x * 3.0, std_dev_y * 3.0);

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::GaussianBlur(GaussianBlur { input, std_dev_x, std_dev_y }),
        bounds,
        region,
    }))
}

pub(super) fn inflate(r: Rect, dx: f64, dy: f64) -> Rect {
    Rect::new(r.x - dx, r.y - dy, r.width + dx * 2.0, r.height + dy * 2.0)
}
