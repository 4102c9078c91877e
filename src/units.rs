// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Length and coordinate system resolution.

use svgtypes::{Length, LengthUnit as Unit};

use crate::svgtree::{self, AId, EId, EnumFromStr};
use crate::{BridgeError, Options, Size};

/// A coordinate system units.
///
/// `objectBoundingBox` in SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Units {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

impl_enum_from_str!(Units,
    "userSpaceOnUse"    => Units::UserSpaceOnUse,
    "objectBoundingBox" => Units::ObjectBoundingBox
);

/// Parses a `*Units` attribute value.
///
/// A missing value yields `default`, an unknown keyword is an error.
pub fn parse_units(
    node: svgtree::Node,
    value: Option<&str>,
    default: Units,
) -> Result<Units, BridgeError> {
    let value = match value {
        Some(v) => v.trim(),
        None => return Ok(default),
    };

    Units::enum_from_str(value).ok_or_else(|| BridgeError::InvalidUnits {
        element: node.tag_name_str().to_string(),
        value: value.to_string(),
    })
}


/// A length direction.
///
/// Defines which viewport dimension is used to resolve percentages.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Direction {
    Horizontal,
    Vertical,
    Other,
}

impl_enum_default!(Direction, Other);

impl Direction {
    /// Returns a direction of a geometry attribute.
    pub fn from_aid(aid: AId) -> Self {
        match aid {
            AId::X | AId::Cx | AId::Dx | AId::Rx | AId::X1 | AId::X2 | AId::Width => {
                Direction::Horizontal
            }
            AId::Y | AId::Cy | AId::Dy | AId::Ry | AId::Y1 | AId::Y2 | AId::Height => {
                Direction::Vertical
            }
            _ => Direction::Other,
        }
    }
}


/// A length resolution context.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct UnitContext {
    /// Target DPI.
    pub dpi: f64,
    /// Font size used for `em` and `ex` units.
    pub font_size: f64,
    /// A viewport size used for percentages.
    pub viewport: Size,
}

impl UnitContext {
    /// Creates a context for the specified element.
    ///
    /// The viewport is taken from the nearest `svg` ancestor.
    pub fn for_element(node: svgtree::Node, opt: &Options) -> Self {
        UnitContext {
            dpi: opt.dpi,
            font_size: resolve_font_size(node, opt),
            viewport: resolve_viewport(node, opt),
        }
    }
}


/// Resolves a raw value of the `element`'s `aid` attribute into user space units.
///
/// The direction is deduced from the attribute.
pub fn resolve_length(
    element: EId,
    aid: AId,
    raw: &str,
    ctx: &UnitContext,
) -> Result<f64, BridgeError> {
    let length = svgtree::parse_length(element.to_str(), aid, raw)?;
    Ok(convert_length(length, Direction::from_aid(aid), ctx))
}

/// Resolves a length attribute into user space units.
///
/// Returns `Ok(None)` when the attribute is not set.
pub fn resolve_length_attribute(
    node: svgtree::Node,
    aid: AId,
    units: Units,
    ctx: &UnitContext,
) -> Result<Option<f64>, BridgeError> {
    let length = match node.length_attribute(aid)? {
        Some(v) => v,
        None => return Ok(None),
    };

    let dir = Direction::from_aid(aid);
    let n = match units {
        Units::UserSpaceOnUse => convert_length(length, dir, ctx),
        Units::ObjectBoundingBox => convert_obb_length(length, dir, ctx),
    };

    Ok(Some(n))
}

/// Converts a length into user space units.
pub fn convert_length(length: Length, dir: Direction, ctx: &UnitContext) -> f64 {
    let dpi = ctx.dpi;
    let n = length.number;
    match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * ctx.font_size,
        Unit::Ex => n * ctx.font_size / 2.0,
        Unit::In => n * dpi,
        Unit::Cm => n * dpi / 2.54,
        Unit::Mm => n * dpi / 25.4,
        Unit::Pt => n * dpi / 72.0,
        Unit::Pc => n * dpi / 6.0,
        Unit::Percent => {
            let vp = ctx.viewport;
            match dir {
                Direction::Horizontal => convert_percent(length, vp.width),
                Direction::Vertical => convert_percent(length, vp.height),
                Direction::Other => {
                    let vp_len = (
                          vp.width * vp.width
                        + vp.height * vp.height
                    ).sqrt() / 2.0_f64.sqrt();

                    convert_percent(length, vp_len)
                }
            }
        }
    }
}

/// Converts a length into a bounding box fraction.
///
/// Percentages are divided by 100. Other units are converted as usual.
pub fn convert_obb_length(length: Length, dir: Direction, ctx: &UnitContext) -> f64 {
    if length.unit == Unit::Percent {
        length.number / 100.0
    } else {
        convert_length(length, dir, ctx)
    }
}

fn convert_percent(length: Length, base: f64) -> f64 {
    base * length.number / 100.0
}

/// Resolves the computed `font-size` of an element.
pub fn resolve_font_size(node: svgtree::Node, opt: &Options) -> f64 {
    let nodes: Vec<_> = node.ancestors().collect();
    let mut font_size = opt.font_size;
    for n in nodes.iter().rev().skip(1) { // skip Root
        if let Some(length) = n.attribute::<Length>(AId::FontSize) {
            let dpi = opt.dpi;
            let n = length.number;
            font_size = match length.unit {
                Unit::None | Unit::Px => n,
                Unit::Em => n * font_size,
                Unit::Ex => n * font_size / 2.0,
                Unit::In => n * dpi,
                Unit::Cm => n * dpi / 2.54,
                Unit::Mm => n * dpi / 25.4,
                Unit::Pt => n * dpi / 72.0,
                Unit::Pc => n * dpi / 6.0,
                Unit::Percent => {
                    // A percentage is relative to the parent `font-size`.
                    length.number * font_size * 0.01
                }
            }
        }
    }

    font_size
}

/// Resolves the viewport size of the nearest `svg` ancestor.
///
/// `viewBox` has priority over `width` and `height`.
pub fn resolve_viewport(node: svgtree::Node, opt: &Options) -> Size {
    let default = Size::new(opt.default_size.0, opt.default_size.1);

    let svg = match node.ancestors().skip(1).find(|n| n.has_tag_name(EId::Svg)) {
        Some(n) => n,
        None if node.has_tag_name(EId::Svg) => node,
        None => return default,
    };

    if let Some(vb) = svg.attribute::<svgtypes::ViewBox>(AId::ViewBox) {
        if vb.w > 0.0 && vb.h > 0.0 {
            return Size::new(vb.w, vb.h);
        }
    }

    // Percentages of the outermost viewport cannot be resolved.
    let ctx = UnitContext { dpi: opt.dpi, font_size: opt.font_size, viewport: default };
    let convert = |aid, def: f64| {
        match svg.attribute::<Length>(aid) {
            Some(l) if l.unit != Unit::Percent => convert_length(l, Direction::from_aid(aid), &ctx),
            _ => def,
        }
    };

    let width = convert(AId::Width, default.width);
    let height = convert(AId::Height, default.height);
    if width > 0.0 && height > 0.0 {
        Size::new(width, height)
    } else {
        default
    }
}


#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::FuzzyEq;

    fn ctx() -> UnitContext {
        UnitContext { dpi: 96.0, font_size: 12.0, viewport: Size::new(200.0, 100.0) }
    }

    macro_rules! test_length {
        ($name:ident, $text:expr, $aid:expr, $result:expr) => {
            #[test]
            fn $name() {
                let n = resolve_length(EId::Rect, $aid, $text, &ctx()).unwrap();
                assert!(n.fuzzy_eq(&$result), "{} != {}", n, $result);
            }
        };
    }

    test_length!(px,            "10",    AId::R,                10.0);
    test_length!(px_suffix,     "10px",  AId::R,                10.0);
    test_length!(inch,          "1in",   AId::R,                96.0);
    test_length!(cm,            "2.54cm", AId::R,               96.0);
    test_length!(mm,            "25.4mm", AId::R,               96.0);
    test_length!(pt,            "72pt",  AId::R,                96.0);
    test_length!(pc,            "6pc",   AId::R,                96.0);
    test_length!(em,            "2em",   AId::R,                24.0);
    test_length!(ex,            "2ex",   AId::R,                12.0);
    test_length!(percent_h,     "50%",   AId::Width,            100.0);
    test_length!(percent_v,     "50%",   AId::Y,                50.0);
    test_length!(percent_other, "100%",  AId::R,                (25000.0_f64).sqrt());

    #[test]
    fn malformed_length() {
        assert_eq!(
            resolve_length(EId::Circle, AId::R, "qwe", &ctx()),
            Err(BridgeError::MalformedLength {
                element: "circle".to_string(),
                attribute: "r".to_string(),
                value: "qwe".to_string(),
            })
        );
    }

    #[test]
    fn obb_percent() {
        let l = Length::new(10.0, Unit::Percent);
        assert!(convert_obb_length(l, Direction::Horizontal, &ctx()).fuzzy_eq(&0.1));
        let l = Length::new_number(0.5);
        assert!(convert_obb_length(l, Direction::Horizontal, &ctx()).fuzzy_eq(&0.5));
    }

    #[test]
    fn units_parsing() {
        let doc = svgtree::Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1'/>
        </svg>
        ").unwrap();
        let node = doc.element_by_id("f1").unwrap();

        assert_eq!(parse_units(node, None, Units::ObjectBoundingBox).unwrap(),
                   Units::ObjectBoundingBox);
        assert_eq!(parse_units(node, Some("userSpaceOnUse"), Units::ObjectBoundingBox).unwrap(),
                   Units::UserSpaceOnUse);
        assert!(matches!(
            parse_units(node, Some("userspaceonuse"), Units::ObjectBoundingBox),
            Err(BridgeError::InvalidUnits { .. })
        ));
    }

    #[test]
    fn viewport_and_font_size() {
        let doc = svgtree::Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg' width='300' height='150' font-size='20'>
            <g font-size='50%'>
                <rect id='r1'/>
            </g>
            <svg viewBox='0 0 40 30'>
                <rect id='r2'/>
            </svg>
        </svg>
        ").unwrap();
        let opt = Options::default();

        let r1 = doc.element_by_id("r1").unwrap();
        let ctx1 = UnitContext::for_element(r1, &opt);
        assert_eq!(ctx1.viewport, Size::new(300.0, 150.0));
        assert!(ctx1.font_size.fuzzy_eq(&10.0));

        let r2 = doc.element_by_id("r2").unwrap();
        assert_eq!(UnitContext::for_element(r2, &opt).viewport, Size::new(40.0, 30.0));
    }
}
