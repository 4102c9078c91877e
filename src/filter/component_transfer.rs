// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::{self, AId, EId};
use crate::BridgeError;
use super::*;

/// A component-wise remapping filter primitive.
///
/// `feComponentTransfer` element in the SVG.
#[derive(Debug)]
pub struct ComponentTransfer {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input: FilterRef,

    /// `feFuncR` in the SVG.
    pub func_r: TransferFunction,

    /// `feFuncG` in the SVG.
    pub func_g: TransferFunction,

    /// `feFuncB` in the SVG.
    pub func_b: TransferFunction,

    /// `feFuncA` in the SVG.
    pub func_a: TransferFunction,
}

/// A transfer function used by `ComponentTransfer`.
#[derive(Clone, PartialEq, Debug)]
pub enum TransferFunction {
    /// Keeps a component as is.
    Identity,

    /// Applies a linear interpolation to a component.
    ///
    /// The number list can be empty.
    Table(Vec<f64>),

    /// Applies a step function to a component.
    ///
    /// The number list can be empty.
    Discrete(Vec<f64>),

    /// Applies a linear shift to a component.
    #[allow(missing_docs)]
    Linear {
        slope: f64,
        intercept: f64,
    },

    /// Applies an exponential shift to a component.
    #[allow(missing_docs)]
    Gamma {
        amplitude: f64,
        exponent: f64,
        offset: f64,
    },
}

impl_enum_default!(TransferFunction, Identity);

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let input = cx.input(fe, AId::In, results)?;
    let region = cx.subregion(fe, &[&input], results)?;
    let bounds = input.bounds;

    let mut kind = ComponentTransfer {
        input,
        func_r: TransferFunction::Identity,
        func_g: TransferFunction::Identity,
        func_b: TransferFunction::Identity,
        func_a: TransferFunction::Identity,
    };

    for child in fe.element.children() {
        let func = match child.tag_name() {
            Some(EId::FeFuncR) => &mut kind.func_r,
            Some(EId::FeFuncG) => &mut kind.func_g,
            Some(EId::FeFuncB) => &mut kind.func_b,
            Some(EId::FeFuncA) => &mut kind.func_a,
            _ => continue,
        };

        // The last function of the same channel wins.
        *func = convert_function(child);
    }

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::ComponentTransfer(kind),
        bounds,
        region,
    }))
}

fn convert_function(node: svgtree::Node) -> TransferFunction {
    let kind = match node.attribute::<&str>(AId::Type) {
        Some(v) => v.trim(),
        None => return TransferFunction::Identity,
    };

    match kind {
        "identity" => TransferFunction::Identity,
        "table" => {
            TransferFunction::Table(node.attribute(AId::TableValues).unwrap_or_default())
        }
        "discrete" => {
            TransferFunction::Discrete(node.attribute(AId::TableValues).unwrap_or_default())
        }
        "linear" => {
            TransferFunction::Linear {
                slope: node.attribute(AId::Slope).unwrap_or(1.0),
                intercept: node.attribute(AId::Intercept).unwrap_or(0.0),
            }
        }
        "gamma" => {
            TransferFunction::Gamma {
                amplitude: node.attribute(AId::Amplitude).unwrap_or(1.0),
                exponent: node.attribute(AId::Exponent).unwrap_or(1.0),
                offset: node.attribute(AId::Offset).unwrap_or(0.0),
            }
        }
        _ => {
            log::warn!("'{}' is not a valid transfer function type. Identity is used.", kind);
            TransferFunction::Identity
        }
    }
}
