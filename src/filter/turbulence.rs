// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;
use crate::BridgeError;
use super::*;

/// A turbulence generation filter primitive.
///
/// `feTurbulence` element in the SVG.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Turbulence {
    /// Identifies the base frequency for the noise function along the X-axis.
    ///
    /// `baseFrequency` in the SVG.
    pub base_frequency_x: f64,

    /// Identifies the base frequency for the noise function along the Y-axis.
    ///
    /// `baseFrequency` in the SVG.
    pub base_frequency_y: f64,

    /// Identifies the number of octaves for the noise function.
    ///
    /// `numOctaves` in the SVG.
    pub num_octaves: u32,

    /// The starting number for the pseudo random number generator.
    ///
    /// `seed` in the SVG.
    pub seed: i32,

    /// Smooth transitions at the border of tiles.
    ///
    /// `stitchTiles` in the SVG.
    pub stitch_tiles: bool,

    /// Indicates whether the filter primitive should perform a noise or turbulence function.
    ///
    /// `type` in the SVG.
    pub kind: TurbulenceKind,
}

/// A turbulence kind for the `feTurbulence` filter.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TurbulenceKind {
    FractalNoise,
    Turbulence,
}

impl_enum_default!(TurbulenceKind, Turbulence);

impl_enum_from_str!(TurbulenceKind,
    "fractalNoise"  => TurbulenceKind::FractalNoise,
    "turbulence"    => TurbulenceKind::Turbulence
);

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let turbulence = convert(fe);
    let region = cx.subregion(fe, &[], results)?;

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Turbulence(turbulence),
        bounds: region,
        region,
    }))
}

fn convert(fe: &FilterPrimitive) -> Turbulence {
    let node = fe.element;

    let (mut x, mut y) = number_pair(node, AId::BaseFrequency).unwrap_or((0.0, 0.0));
    if x.is_sign_negative() || y.is_sign_negative() {
        log::warn!("'baseFrequency' cannot be negative. Reset to zero.");
        x = x.max(0.0);
        y = y.max(0.0);
    }

    let mut num_octaves = node.attribute::<f64>(AId::NumOctaves).unwrap_or(1.0);
    if num_octaves.is_sign_negative() {
        num_octaves = 0.0;
    }

    Turbulence {
        base_frequency_x: x,
        base_frequency_y: y,
        num_octaves: num_octaves.round() as u32,
        seed: node.attribute::<f64>(AId::Seed).unwrap_or(0.0).trunc() as i32,
        stitch_tiles: node.attribute::<&str>(AId::StitchTiles) == Some("stitch"),
        kind: node.attribute(AId::Type).unwrap_or_default(),
    }
}


#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::svgtree::Document;

    fn parse(attrs: &str) -> Turbulence {
        let text = format!(
            "<svg xmlns='http://www.w3.org/2000/svg'><feTurbulence id='fe1' {}/></svg>",
            attrs
        );
        let doc = Document::parse(&text).unwrap();
        let node = doc.element_by_id("fe1").unwrap();
        convert(&FilterPrimitive::parse(node, &PrimitiveRegistry::default()).unwrap())
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(""), Turbulence {
            base_frequency_x: 0.0,
            base_frequency_y: 0.0,
            num_octaves: 1,
            seed: 0,
            stitch_tiles: false,
            kind: TurbulenceKind::Turbulence,
        });
    }

    #[test]
    fn all_attributes() {
        let t = parse("baseFrequency='0.05 0.1' numOctaves='3' seed='7.8' \
                       stitchTiles='stitch' type='fractalNoise'");
        assert_eq!(t, Turbulence {
            base_frequency_x: 0.05,
            base_frequency_y: 0.1,
            num_octaves: 3,
            seed: 7,
            stitch_tiles: true,
            kind: TurbulenceKind::FractalNoise,
        });
    }

    #[test]
    fn single_frequency() {
        let t = parse("baseFrequency='0.2'");
        assert_eq!((t.base_frequency_x, t.base_frequency_y), (0.2, 0.2));
    }

    #[test]
    fn negative_frequency() {
        let t = parse("baseFrequency='-0.2 0.3'");
        assert_eq!((t.base_frequency_x, t.base_frequency_y), (0.0, 0.3));
    }

    #[test]
    fn unknown_type() {
        assert_eq!(parse("type='noise' stitchTiles='noStitch'").kind, TurbulenceKind::Turbulence);
    }
}
