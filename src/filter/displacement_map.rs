// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;
use crate::BridgeError;
use super::*;

/// A displacement map filter primitive.
///
/// `feDisplacementMap` element in the SVG.
#[derive(Debug)]
pub struct DisplacementMap {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input1: FilterRef,

    /// Identifies the displacement map.
    ///
    /// `in2` in the SVG.
    pub input2: FilterRef,

    /// Scale factor.
    ///
    /// `scale` in the SVG.
    pub scale: f64,

    /// Indicates a source color channel along the X-axis.
    ///
    /// `xChannelSelector` in the SVG.
    pub x_channel_selector: ColorChannel,

    /// Indicates a source color channel along the Y-axis.
    ///
    /// `yChannelSelector` in the SVG.
    pub y_channel_selector: ColorChannel,
}

/// A color channel.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ColorChannel {
    R,
    G,
    B,
    A,
}

impl_enum_default!(ColorChannel, R);

impl_enum_from_str!(ColorChannel,
    "R" => ColorChannel::R,
    "G" => ColorChannel::G,
    "B" => ColorChannel::B,
    "A" => ColorChannel::A
);

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let input1 = cx.input(fe, AId::In, results)?;
    let input2 = cx.input(fe, AId::In2, results)?;
    let region = cx.subregion(fe, &[&input1, &input2], results)?;
    let bounds = input1.bounds;

    let node = fe.element;
    let scale = node.attribute::<f64>(AId::Scale).unwrap_or(0.0);
    // Displacement is a distance in the primitive units.
    let scale = match cx.primitive_units {
        crate::Units::UserSpaceOnUse => scale,
        crate::Units::ObjectBoundingBox => {
            let bbox = cx.bbox.unwrap_or_else(|| crate::Rect::new(0.0, 0.0, 0.0, 0.0));
            scale * ((bbox.width * bbox.width + bbox.height * bbox.height) / 2.0).sqrt()
        }
    };

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::DisplacementMap(DisplacementMap {
            input1,
            input2,
            scale,
            x_channel_selector: node.attribute(AId::XChannelSelector).unwrap_or_default(),
            y_channel_selector: node.attribute(AId::YChannelSelector).unwrap_or_default(),
        }),
        bounds,
        region,
    }))
}
