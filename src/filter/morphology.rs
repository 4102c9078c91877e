// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;
use crate::BridgeError;
use super::*;

/// A morphology filter primitive.
///
/// `feMorphology` element in the SVG.
#[derive(Debug)]
pub struct Morphology {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input: FilterRef,

    /// A filter operator.
    ///
    /// `operator` in the SVG.
    pub operator: MorphologyOperator,

    /// A filter radius along the X-axis in user space.
    ///
    /// `radius` in the SVG.
    pub radius_x: f64,

    /// A filter radius along the Y-axis in user space.
    ///
    /// `radius` in the SVG.
    pub radius_y: f64,
}

/// A morphology operation.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum MorphologyOperator {
    Erode,
    Dilate,
}

impl_enum_default!(MorphologyOperator, Erode);

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let operator = match fe.element.raw_attribute(AId::Operator).map(str::trim) {
        Some("erode") | None => MorphologyOperator::Erode,
        Some("dilate") => MorphologyOperator::Dilate,
        Some(text) => return Err(fe.invalid(&format!("unknown operator '{}'", text))),
    };

    let (radius_x, radius_y) = number_pair(fe.element, AId::Radius).unwrap_or((0.0, 0.0));
    let radius_x = cx.scale_x(radius_x);
    let radius_y = cx.scale_y(radius_y);

    // A zero or negative radius disables the effect.
    if !(radius_x > 0.0 && radius_y > 0.0) {
        return Ok(None);
    }

    let input = cx.input(fe, AId::In, results)?;
    let region = cx.subregion(fe, &[&input], results)?;
    let bounds = match operator {
        MorphologyOperator::Erode => input.bounds,
        MorphologyOperator::Dilate => super::gaussian_blur::inflate(input.bounds, radius_x, radius_y),
    };

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Morphology(Morphology { input, operator, radius_x, radius_y }),
        bounds,
        region,
    }))
}


#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::svgtree::Document;
    use crate::{ErrorReporter, FuzzyEq, Options};

    #[derive(Clone, Default)]
    struct Errors(Rc<RefCell<Vec<BridgeError>>>);

    impl ErrorReporter for Errors {
        fn report(&self, error: &BridgeError) {
            self.0.borrow_mut().push(error.clone());
        }
    }

    /// Returns the chain terminal node kind and bounds, plus reported errors.
    fn convert(attrs: &str) -> (Option<(MorphologyOperator, Rect)>, Vec<BridgeError>) {
        let text = format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='200' height='200'>\
                <filter id='f1'><feMorphology {}/></filter>\
                <rect id='rect1' width='100' height='100' filter='url(#f1)'/>\
             </svg>",
            attrs
        );

        let opt = Options::default();
        let doc = Document::parse(&text).unwrap();
        let errors = Errors::default();
        let ctx = BridgeContext::new(&doc, &opt).with_reporter(errors.clone());
        ctx.build_root();

        let rect = ctx.graphics_node_by_id("rect1").unwrap();
        let result = ctx.filter_of(rect).map(|chain| {
            let node = chain.source.unpadded();
            match node.kind {
                FilterKind::Morphology(ref fe) => (fe.operator, node.bounds),
                _ => panic!("not a morphology"),
            }
        });

        let errors = errors.0.borrow().clone();
        (result, errors)
    }

    macro_rules! test_skipped {
        ($name:ident, $attrs:expr) => {
            #[test]
            fn $name() {
                assert_eq!(convert($attrs), (None, Vec::new()));
            }
        };
    }

    macro_rules! test_bounds {
        ($name:ident, $attrs:expr, $op:expr, $rect:expr) => {
            #[test]
            fn $name() {
                let (result, errors) = convert($attrs);
                assert!(errors.is_empty());
                let (op, bounds) = result.unwrap();
                assert_eq!(op, $op);
                assert!(bounds.fuzzy_eq(&$rect), "{}", bounds);
            }
        };
    }

    test_skipped!(no_radius,        "");
    test_skipped!(zero_radius,      "radius='0'");
    test_skipped!(zero_radius_y,    "radius='2 0'");
    test_skipped!(negative_radius,  "radius='-1'");

    // The input is the filter region, since the source is padded to it.
    test_bounds!(erode,             "radius='2'",                   MorphologyOperator::Erode,  Rect::new(-10.0, -10.0, 120.0, 120.0));
    test_bounds!(dilate,            "radius='2' operator='dilate'", MorphologyOperator::Dilate, Rect::new(-12.0, -12.0, 124.0, 124.0));
    test_bounds!(dilate_pair,       "radius='2 4' operator='dilate'", MorphologyOperator::Dilate, Rect::new(-12.0, -14.0, 124.0, 128.0));

    #[test]
    fn unknown_operator() {
        let (result, errors) = convert("radius='2' operator='open'");
        assert!(result.is_none());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], BridgeError::InvalidFilterPrimitive { .. }));
    }
}
