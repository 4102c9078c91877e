// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::BridgeError;
use super::*;

/// A flood filter primitive.
///
/// `feFlood` element in the SVG.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Flood {
    /// A flood color.
    ///
    /// `flood-color` in the SVG.
    pub color: rgb::RGB8,

    /// A flood opacity in the 0..1 range.
    ///
    /// `flood-opacity` in the SVG.
    pub opacity: f64,
}

impl Default for Flood {
    fn default() -> Self {
        Flood {
            color: rgb::RGB8::new(0, 0, 0),
            opacity: 1.0,
        }
    }
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let style = cx.bridge.computed_style(fe.element);
    let region = cx.subregion(fe, &[], results)?;

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Flood(Flood {
            color: style.flood_color,
            opacity: style.flood_opacity,
        }),
        bounds: region,
        region,
    }))
}
