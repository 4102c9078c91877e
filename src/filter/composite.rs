// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::svgtree::AId;
use crate::BridgeError;
use super::*;

/// A composite filter primitive.
///
/// `feComposite` element in the SVG.
#[derive(Debug)]
pub struct Composite {
    /// Identifies input for the given filter primitive.
    ///
    /// `in` in the SVG.
    pub input1: FilterRef,

    /// Identifies input for the given filter primitive.
    ///
    /// `in2` in the SVG.
    pub input2: FilterRef,

    /// A compositing operation.
    ///
    /// `operator` in the SVG.
    pub rule: CompositeRule,
}

/// An images compositing operation.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CompositeRule {
    Over,
    In,
    Out,
    Atop,
    Xor,
    Arithmetic {
        k1: f64,
        k2: f64,
        k3: f64,
        k4: f64,
    },
}

impl_enum_default!(CompositeRule, Over);

impl CompositeRule {
    /// Parses an `operator` attribute value.
    ///
    /// Matching is case-insensitive. `arithmetic` coefficients are set to zero.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let rule = if text.eq_ignore_ascii_case("over") {
            CompositeRule::Over
        } else if text.eq_ignore_ascii_case("in") {
            CompositeRule::In
        } else if text.eq_ignore_ascii_case("out") {
            CompositeRule::Out
        } else if text.eq_ignore_ascii_case("atop") {
            CompositeRule::Atop
        } else if text.eq_ignore_ascii_case("xor") {
            CompositeRule::Xor
        } else if text.eq_ignore_ascii_case("arithmetic") {
            CompositeRule::Arithmetic { k1: 0.0, k2: 0.0, k3: 0.0, k4: 0.0 }
        } else {
            return None;
        };

        Some(rule)
    }
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let rule = match fe.element.raw_attribute(AId::Operator) {
        Some(text) => match CompositeRule::parse(text) {
            Some(rule) => rule,
            None => return Err(fe.invalid(&format!("unknown operator '{}'", text))),
        },
        None => CompositeRule::default(),
    };

    let rule = match rule {
        CompositeRule::Arithmetic { .. } => {
            // Unparsable coefficients are ignored.
            CompositeRule::Arithmetic {
                k1: fe.element.attribute(AId::K1).unwrap_or(0.0),
                k2: fe.element.attribute(AId::K2).unwrap_or(0.0),
                k3: fe.element.attribute(AId::K3).unwrap_or(0.0),
                k4: fe.element.attribute(AId::K4).unwrap_or(0.0),
            }
        }
        _ => rule,
    };

    let input1 = cx.input(fe, AId::In, results)?;
    let input2 = cx.input(fe, AId::In2, results)?;
    let region = cx.subregion(fe, &[&input1, &input2], results)?;
    let bounds = input1.bounds.union(&input2.bounds);

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Composite(Composite { input1, input2, rule }),
        bounds,
        region,
    }))
}
