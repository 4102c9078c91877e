// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::f64_bound;
use crate::svgtree::AId;
use crate::BridgeError;
use super::*;

/// A color matrix filter primitive.
///
/// `feColorMatrix` element in the SVG.
#[derive(Debug)]
pub struct ColorMatrix {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input: FilterRef,

    /// A matrix kind.
    ///
    /// `type` in the SVG.
    pub kind: ColorMatrixKind,
}

/// A color matrix filter primitive kind.
#[derive(Clone, PartialEq, Debug)]
pub enum ColorMatrixKind {
    /// A row-major 4x5 matrix.
    ///
    /// The last column is already scaled to the 0..255 range.
    Matrix([f64; 20]),

    /// A saturation ratio in the 0..1 range.
    Saturate(f64),

    /// A rotation angle in radians.
    HueRotate(f64),

    #[allow(missing_docs)]
    LuminanceToAlpha,
}

impl Default for ColorMatrixKind {
    fn default() -> Self {
        ColorMatrixKind::Matrix([
            1.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }
}

impl ColorMatrixKind {
    /// A matrix that keeps only the alpha channel.
    ///
    /// Used by `SourceAlpha`.
    pub fn alpha_extraction() -> Self {
        ColorMatrixKind::Matrix([
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let kind = convert_kind(fe)?;

    let input = cx.input(fe, AId::In, results)?;
    let region = cx.subregion(fe, &[&input], results)?;
    let bounds = input.bounds;

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::ColorMatrix(ColorMatrix { input, kind }),
        bounds,
        region,
    }))
}

fn convert_kind(fe: &FilterPrimitive) -> Result<ColorMatrixKind, BridgeError> {
    let values = fe.element.raw_attribute(AId::Values);
    match fe.element.raw_attribute(AId::Type).map(str::trim).unwrap_or("matrix") {
        "matrix" => {
            let values = match values {
                Some(v) => v,
                None => return Ok(ColorMatrixKind::default()),
            };

            let list = parse_numbers(fe, values)?;
            if list.len() != 20 {
                return Err(fe.invalid(
                    &format!("'values' must have 20 numbers, got {}", list.len())
                ));
            }

            let mut matrix = [0.0; 20];
            matrix.copy_from_slice(&list);
            // Offsets are in the 0..1 range.
            for row in 0..4 {
                matrix[row * 5 + 4] *= 255.0;
            }

            Ok(ColorMatrixKind::Matrix(matrix))
        }
        "saturate" => {
            let n = match values {
                Some(v) => parse_single(fe, v, true)?,
                None => 1.0,
            };

            Ok(ColorMatrixKind::Saturate(f64_bound(0.0, n, 1.0)))
        }
        "hueRotate" => {
            let n = match values {
                Some(v) => parse_single(fe, v, false)?,
                None => 0.0,
            };

            Ok(ColorMatrixKind::HueRotate(n.to_radians()))
        }
        "luminanceToAlpha" => Ok(ColorMatrixKind::LuminanceToAlpha),
        t => Err(fe.invalid(&format!("unknown type '{}'", t))),
    }
}

fn parse_numbers(fe: &FilterPrimitive, text: &str) -> Result<Vec<f64>, BridgeError> {
    let mut list = Vec::new();
    for n in svgtypes::NumberListParser::from(text) {
        match n {
            Ok(n) => list.push(n),
            Err(_) => return Err(fe.invalid(&format!("malformed 'values': '{}'", text))),
        }
    }

    Ok(list)
}

fn parse_single(fe: &FilterPrimitive, text: &str, allow_percent: bool) -> Result<f64, BridgeError> {
    let text = text.trim();
    if allow_percent && text.ends_with('%') {
        let n = parse_single(fe, &text[..text.len() - 1], false)?;
        return Ok(n / 100.0);
    }

    let list = parse_numbers(fe, text)?;
    if list.len() != 1 {
        return Err(fe.invalid(&format!("'values' must have a single number, got {}", list.len())));
    }

    Ok(list[0])
}
