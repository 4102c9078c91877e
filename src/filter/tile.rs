// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;
use crate::{BridgeError, Rect};
use super::*;

/// A tile filter primitive.
///
/// `feTile` element in the SVG.
#[derive(Debug)]
pub struct Tile {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input: FilterRef,

    /// A tile period.
    ///
    /// Equals to the input bounds.
    pub tile: Rect,
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let input = cx.input(fe, AId::In, results)?;
    // Tiles fill the whole filter region by default, not the input bounds.
    let region = cx.subregion(fe, &[&input], results)?;

    let tile = input.bounds;
    if tile.is_empty() {
        log::warn!("'feTile' input has an empty region. Skipped.");
        return Ok(None);
    }

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Tile(Tile { input, tile }),
        bounds: region,
        region,
    }))
}
