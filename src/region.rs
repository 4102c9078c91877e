// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Filter, filter primitive, mask and pattern regions.

use svgtypes::{Length, LengthUnit as Unit};

use crate::filter::{FilterRef, NamedResultMap, PrimitiveKind};
use crate::svgtree::{self, AId};
use crate::units::{self, Direction, UnitContext, Units};
use crate::{BridgeError, Rect};

/// A resolved region.
///
/// Always in user space, regardless of the `units` it was declared in.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Region {
    /// A region rectangle.
    pub rect: Rect,
    /// Units the region was declared in.
    pub units: Units,
}

/// Default values of the region attributes.
///
/// `None` indicates that an attribute is required.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RegionDefaults {
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

impl RegionDefaults {
    /// `-10%`, `-10%`, `120%`, `120%`.
    ///
    /// Used by `filter` and `mask`.
    pub fn extended() -> Self {
        RegionDefaults {
            x: Some(Length::new(-10.0, Unit::Percent)),
            y: Some(Length::new(-10.0, Unit::Percent)),
            width: Some(Length::new(120.0, Unit::Percent)),
            height: Some(Length::new(120.0, Unit::Percent)),
        }
    }

    /// `0`, `0`, required, required.
    ///
    /// Used by `pattern`.
    pub fn pattern() -> Self {
        RegionDefaults {
            x: Some(Length::zero()),
            y: Some(Length::zero()),
            width: None,
            height: None,
        }
    }
}

/// Attributes lookup policy.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Lookup {
    /// Only the element itself.
    Direct,
    /// The element and all elements referenced via `xlink:href`.
    Chained,
}

fn region_attribute(
    element: svgtree::Node,
    aid: AId,
    lookup: Lookup,
) -> Result<Option<Length>, BridgeError> {
    match lookup {
        Lookup::Direct => element.length_attribute(aid),
        Lookup::Chained => match element.chained_attribute_node(aid)? {
            Some(node) => node.length_attribute(aid),
            None => Ok(None),
        },
    }
}

/// Resolves a region.
///
/// `bbox` is the geometry bounding box of the referencing node
/// and is used only with `objectBoundingBox` units. When it is not set,
/// an `objectBoundingBox` region is empty.
pub fn resolve_region(
    element: svgtree::Node,
    lookup: Lookup,
    units: Units,
    defaults: &RegionDefaults,
    bbox: Option<Rect>,
    ctx: &UnitContext,
) -> Result<Region, BridgeError> {
    let mut values = [0.0; 4];
    let attrs = [
        (AId::X, defaults.x),
        (AId::Y, defaults.y),
        (AId::Width, defaults.width),
        (AId::Height, defaults.height),
    ];

    for (i, &(aid, default)) in attrs.iter().enumerate() {
        let length = match region_attribute(element, aid, lookup)?.or(default) {
            Some(v) => v,
            None => {
                return Err(BridgeError::MissingAttribute {
                    element: element.tag_name_str().to_string(),
                    attribute: aid.to_string(),
                });
            }
        };

        let dir = Direction::from_aid(aid);
        values[i] = match units {
            Units::UserSpaceOnUse => units::convert_length(length, dir, ctx),
            Units::ObjectBoundingBox => units::convert_obb_length(length, dir, ctx),
        };
    }

    check_size(element, values[2], values[3])?;

    let rect = match units {
        Units::UserSpaceOnUse => Rect::new(values[0], values[1], values[2], values[3]),
        Units::ObjectBoundingBox => match bbox {
            Some(bbox) => Rect::new(
                bbox.x + values[0] * bbox.width,
                bbox.y + values[1] * bbox.height,
                values[2] * bbox.width,
                values[3] * bbox.height,
            ),
            None => Rect::new(0.0, 0.0, 0.0, 0.0),
        },
    };

    Ok(Region { rect, units })
}

fn check_size(element: svgtree::Node, width: f64, height: f64) -> Result<(), BridgeError> {
    let illegal = |aid: AId| BridgeError::IllegalRegion {
        element: element.tag_name_str().to_string(),
        attribute: aid.to_string(),
    };

    if width < 0.0 {
        return Err(illegal(AId::Width));
    }

    if height < 0.0 {
        return Err(illegal(AId::Height));
    }

    Ok(())
}

/// Resolves the region of a `filter` element.
///
/// Region attributes and `filterUnits` are looked up along the `xlink:href` chain.
pub fn filter_chain_region(
    filter: svgtree::Node,
    bbox: Option<Rect>,
    ctx: &UnitContext,
) -> Result<Region, BridgeError> {
    let units = units::parse_units(
        filter, filter.chained_attribute(AId::FilterUnits)?, Units::ObjectBoundingBox,
    )?;

    resolve_region(filter, Lookup::Chained, units, &RegionDefaults::extended(), bbox, ctx)
}

/// Resolves the region of a `mask` element.
pub fn mask_region(
    mask: svgtree::Node,
    bbox: Option<Rect>,
    ctx: &UnitContext,
) -> Result<Region, BridgeError> {
    let units = units::parse_units(
        mask, mask.raw_attribute(AId::MaskUnits), Units::ObjectBoundingBox,
    )?;

    resolve_region(mask, Lookup::Direct, units, &RegionDefaults::extended(), bbox, ctx)
}

/// Resolves the tile region of a `pattern` element.
///
/// Unlike other regions, `width` and `height` are required.
pub fn pattern_region(
    pattern: svgtree::Node,
    bbox: Option<Rect>,
    ctx: &UnitContext,
) -> Result<Region, BridgeError> {
    let units = units::parse_units(
        pattern, pattern.chained_attribute(AId::PatternUnits)?, Units::ObjectBoundingBox,
    )?;

    resolve_region(pattern, Lookup::Chained, units, &RegionDefaults::pattern(), bbox, ctx)
}

/// Resolves a filter primitive subregion.
///
/// Each of the `x`, `y`, `width` and `height` attributes overrides
/// the corresponding side of the `default` region. The result is always
/// clipped by the filter region.
pub fn primitive_region(
    primitive: svgtree::Node,
    primitive_units: Units,
    default: Rect,
    filter_region: Rect,
    bbox: Option<Rect>,
    ctx: &UnitContext,
) -> Result<Rect, BridgeError> {
    let bbox = bbox.unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0));
    let resolve = |aid: AId, def: f64| -> Result<f64, BridgeError> {
        let length = match primitive.length_attribute(aid)? {
            Some(v) => v,
            None => return Ok(def),
        };

        let dir = Direction::from_aid(aid);
        let n = match primitive_units {
            Units::UserSpaceOnUse => units::convert_length(length, dir, ctx),
            Units::ObjectBoundingBox => {
                let n = units::convert_obb_length(length, dir, ctx);
                match aid {
                    AId::X => bbox.x + n * bbox.width,
                    AId::Y => bbox.y + n * bbox.height,
                    AId::Width => n * bbox.width,
                    _ => n * bbox.height,
                }
            }
        };

        Ok(n)
    };

    let x = resolve(AId::X, default.x)?;
    let y = resolve(AId::Y, default.y)?;
    let width = resolve(AId::Width, default.width)?;
    let height = resolve(AId::Height, default.height)?;
    check_size(primitive, width, height)?;

    Ok(Rect::new(x, y, width, height).intersect(&filter_region))
}

/// Returns the default subregion of a filter primitive.
///
/// Generators and primitives without inputs default to the filter region.
/// Other primitives default to the union of their inputs bounds, where
/// `SourceGraphic` and `SourceAlpha` contribute the whole filter region.
pub fn default_primitive_region(
    kind: PrimitiveKind,
    inputs: &[&FilterRef],
    results: &NamedResultMap,
    filter_region: Rect,
) -> Rect {
    if kind.is_generator() || inputs.is_empty() {
        return filter_region;
    }

    let mut region: Option<Rect> = None;
    for input in inputs {
        let bounds = if results.is_source(input) {
            filter_region
        } else {
            input.bounds
        };

        region = Some(match region {
            Some(r) => r.union(&bounds),
            None => bounds,
        });
    }

    region.unwrap_or(filter_region)
}


#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FuzzyEq, Options, Size};
    use crate::svgtree::Document;

    fn unit_ctx() -> UnitContext {
        UnitContext { dpi: 96.0, font_size: 12.0, viewport: Size::new(200.0, 200.0) }
    }

    macro_rules! test_filter_region {
        ($name:ident, $attrs:expr, $bbox:expr, $result:expr) => {
            #[test]
            fn $name() {
                let text = format!(
                    "<svg xmlns='http://www.w3.org/2000/svg'><filter id='f1' {}/></svg>",
                    $attrs
                );
                let doc = Document::parse(&text).unwrap();
                let filter = doc.element_by_id("f1").unwrap();
                let region = filter_chain_region(filter, Some(Rect::from($bbox)), &unit_ctx()).unwrap();
                assert!(region.rect.fuzzy_eq(&Rect::from($result)), "{}", region.rect);
            }
        };
    }

    test_filter_region!(filter_default,
        "", (0.0, 0.0, 100.0, 100.0), (-10.0, -10.0, 120.0, 120.0));
    test_filter_region!(filter_obb_percent,
        "x='10%' y='10%' width='80%' height='80%'", (0.0, 0.0, 200.0, 100.0), (20.0, 10.0, 160.0, 80.0));
    test_filter_region!(filter_obb_fraction,
        "x='0.5' y='0' width='0.5' height='1'", (10.0, 10.0, 100.0, 50.0), (60.0, 10.0, 50.0, 50.0));
    test_filter_region!(filter_user_space,
        "filterUnits='userSpaceOnUse' x='5' y='6' width='50%' height='25'",
        (0.0, 0.0, 1.0, 1.0), (5.0, 6.0, 100.0, 25.0));
    test_filter_region!(filter_user_space_defaults,
        "filterUnits='userSpaceOnUse'", (0.0, 0.0, 1.0, 1.0), (-20.0, -20.0, 240.0, 240.0));

    #[test]
    fn filter_region_is_deterministic() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1' x='10%' y='10%' width='80%' height='80%'/>
        </svg>
        ").unwrap();
        let filter = doc.element_by_id("f1").unwrap();
        let bbox = Some(Rect::new(0.0, 0.0, 200.0, 100.0));
        let r1 = filter_chain_region(filter, bbox, &unit_ctx()).unwrap();
        let r2 = filter_chain_region(filter, bbox, &unit_ctx()).unwrap();
        assert_eq!(r1, r2);
    }

    #[test]
    fn filter_region_inherited() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f1' xlink:href='#f2' x='0'/>
            <filter id='f2' filterUnits='userSpaceOnUse' x='50' y='40' width='30' height='20'/>
        </svg>
        ").unwrap();
        let filter = doc.element_by_id("f1").unwrap();
        let region = filter_chain_region(filter, None, &unit_ctx()).unwrap();
        assert_eq!(region.units, Units::UserSpaceOnUse);
        assert!(region.rect.fuzzy_eq(&Rect::new(0.0, 40.0, 30.0, 20.0)));
    }

    #[test]
    fn filter_region_without_bbox() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1'/>
        </svg>
        ").unwrap();
        let filter = doc.element_by_id("f1").unwrap();
        let region = filter_chain_region(filter, None, &unit_ctx()).unwrap();
        assert!(region.rect.is_empty());
    }

    #[test]
    fn negative_region() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1' width='-1'/>
            <filter id='f2' height='-5%'/>
        </svg>
        ").unwrap();
        let bbox = Some(Rect::new(0.0, 0.0, 10.0, 10.0));

        let f1 = doc.element_by_id("f1").unwrap();
        assert_eq!(filter_chain_region(f1, bbox, &unit_ctx()).unwrap_err(), BridgeError::IllegalRegion {
            element: "filter".to_string(),
            attribute: "width".to_string(),
        });

        let f2 = doc.element_by_id("f2").unwrap();
        assert_eq!(filter_chain_region(f2, bbox, &unit_ctx()).unwrap_err(), BridgeError::IllegalRegion {
            element: "filter".to_string(),
            attribute: "height".to_string(),
        });
    }

    #[test]
    fn zero_region_is_legal() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1' width='0'/>
        </svg>
        ").unwrap();
        let f1 = doc.element_by_id("f1").unwrap();
        let region = filter_chain_region(f1, Some(Rect::new(0.0, 0.0, 10.0, 10.0)), &unit_ctx()).unwrap();
        assert!(region.rect.is_empty());
    }

    #[test]
    fn invalid_units() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1' filterUnits='pixels'/>
        </svg>
        ").unwrap();
        let f1 = doc.element_by_id("f1").unwrap();
        assert!(matches!(
            filter_chain_region(f1, None, &unit_ctx()),
            Err(BridgeError::InvalidUnits { .. })
        ));
    }

    #[test]
    fn mask_defaults() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <mask id='m1'/>
            <mask id='m2' maskUnits='userSpaceOnUse' width='10' height='10'/>
        </svg>
        ").unwrap();
        let bbox = Some(Rect::new(0.0, 0.0, 100.0, 50.0));

        let m1 = doc.element_by_id("m1").unwrap();
        let region = mask_region(m1, bbox, &unit_ctx()).unwrap();
        assert!(region.rect.fuzzy_eq(&Rect::new(-10.0, -5.0, 120.0, 60.0)));

        let m2 = doc.element_by_id("m2").unwrap();
        let region = mask_region(m2, bbox, &unit_ctx()).unwrap();
        assert!(region.rect.fuzzy_eq(&Rect::new(-20.0, -20.0, 10.0, 10.0)));
    }

    #[test]
    fn pattern_requires_size() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <pattern id='p1' width='0.5'/>
            <pattern id='p2' xlink:href='#p3' height='0.25'/>
            <pattern id='p3' width='0.5' x='0.1'/>
        </svg>
        ").unwrap();
        let bbox = Some(Rect::new(0.0, 0.0, 100.0, 100.0));

        let p1 = doc.element_by_id("p1").unwrap();
        assert_eq!(pattern_region(p1, bbox, &unit_ctx()).unwrap_err(), BridgeError::MissingAttribute {
            element: "pattern".to_string(),
            attribute: "height".to_string(),
        });

        let p2 = doc.element_by_id("p2").unwrap();
        let region = pattern_region(p2, bbox, &unit_ctx()).unwrap();
        assert!(region.rect.fuzzy_eq(&Rect::new(10.0, 0.0, 50.0, 25.0)));
    }

    #[test]
    fn primitive_region_overrides() {
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1'>
                <feFlood id='fe1' x='10' width='500'/>
                <feFlood id='fe2' x='25%' height='50%'/>
            </filter>
        </svg>
        ").unwrap();
        let filter_region = Rect::new(0.0, 0.0, 100.0, 100.0);
        let bbox = Some(Rect::new(0.0, 0.0, 40.0, 80.0));

        let fe1 = doc.element_by_id("fe1").unwrap();
        let r = primitive_region(fe1, Units::UserSpaceOnUse, filter_region,
                                 filter_region, bbox, &unit_ctx()).unwrap();
        assert!(r.fuzzy_eq(&Rect::new(10.0, 0.0, 90.0, 100.0)));

        let fe2 = doc.element_by_id("fe2").unwrap();
        let r = primitive_region(fe2, Units::ObjectBoundingBox, filter_region,
                                 filter_region, bbox, &unit_ctx()).unwrap();
        assert!(r.fuzzy_eq(&Rect::new(10.0, 0.0, 90.0, 40.0)));
    }

    #[test]
    fn viewport_from_options() {
        let opt = Options::default();
        let doc = Document::parse("
        <svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f1' filterUnits='userSpaceOnUse' width='50%' height='50%'/>
        </svg>
        ").unwrap();
        let f1 = doc.element_by_id("f1").unwrap();
        let ctx = UnitContext::for_element(f1, &opt);
        let region = filter_chain_region(f1, None, &ctx).unwrap();
        assert!(region.rect.fuzzy_eq(&Rect::new(-10.0, -10.0, 50.0, 50.0)));
    }
}
