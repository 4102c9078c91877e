// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::Rect;
use super::{FilterKind, FilterNode, FilterRef};

/// A pad operator.
///
/// Crops the input to the region and fills everything outside
/// the input, but inside the region, with transparent black.
#[derive(Debug)]
pub struct Pad {
    /// An input node.
    pub input: FilterRef,

    /// Output region.
    pub region: Rect,
}

/// Pads the node to the region.
///
/// The resulting node bounds are always equal to the region.
/// Padding an already padded node to the same region is a no-op.
pub fn pad(input: FilterRef, region: Rect) -> FilterRef {
    if let FilterKind::Pad(ref p) = input.kind {
        if p.region == region {
            return input;
        }
    }

    FilterNode::new(FilterKind::Pad(Pad { input, region }), region)
}
