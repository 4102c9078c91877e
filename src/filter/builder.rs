// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use crate::gvt::GvtNodeId;
use crate::svgtree::{self, AId, EId};
use crate::units::{self, UnitContext, Units};
use crate::{BridgeContext, BridgeError};
use super::*;

/// Builds filter chains.
///
/// Primitives are processed in the document order. A primitive without
/// an explicit `in` reads the output of the previous primitive that
/// produced one.
#[derive(Clone, Copy, Debug)]
pub struct FilterChainBuilder<'r> {
    registry: &'r PrimitiveRegistry,
}

impl<'r> FilterChainBuilder<'r> {
    /// Creates a new builder.
    pub fn new(registry: &'r PrimitiveRegistry) -> Self {
        FilterChainBuilder { registry }
    }

    /// Builds a filter chain for a graphics node.
    ///
    /// `filtered` is the element the node was built from.
    ///
    /// Returns `Ok(None)` when the filter is disabled: no primitive
    /// produced an output or `filterRes` has a zero component.
    /// Errors of separate primitives are reported and do not abort the chain.
    pub fn build(
        &self,
        filtered_node: GvtNodeId,
        ctx: &BridgeContext,
        filter: svgtree::Node,
        filtered: svgtree::Node,
    ) -> Result<Option<FilterChain>, BridgeError> {
        let chain = filter.href_chain()?;

        let resolution = match filter.chained_attribute(AId::FilterRes)? {
            Some(text) => Some(try_opt_or!(parse_resolution(text)?, Ok(None))),
            None => None,
        };

        let uc = UnitContext::for_element(filtered, ctx.options());
        let bbox = ctx.geometry_bounds(filtered_node);
        let region = crate::region::filter_chain_region(filter, bbox, &uc)?.rect;

        let primitive_units = units::parse_units(
            filter, filter.chained_attribute(AId::PrimitiveUnits)?, Units::UserSpaceOnUse,
        )?;

        // Primitives are inherited as a whole.
        let content = try_opt_or!(chain.iter().find(|f| f.has_children()), Ok(None));

        let source = pad(ctx.graphics_node_source(filtered_node), region);
        let mut results = NamedResultMap::new(source.clone(), region);
        let mut cx = PrimitiveContext {
            bridge: ctx,
            current_in: source.clone(),
            filter_region: region,
            primitive_units,
            bbox,
            units: uc,
        };

        for child in content.children() {
            let fe = match FilterPrimitive::parse(child, self.registry) {
                Some(fe) => fe,
                None => {
                    log::warn!("'{}' is not a supported filter primitive. Skipped.", child.tag_name_str());
                    continue;
                }
            };

            match create(&fe, &cx, &mut results) {
                Ok(Some(node)) => cx.current_in = node,
                Ok(None) => {}
                Err(e) => ctx.report(&e),
            }
        }

        if Rc::ptr_eq(&cx.current_in, &source) {
            return Ok(None);
        }

        Ok(Some(FilterChain {
            source: cx.current_in,
            region,
            resolution,
        }))
    }
}

/// Parses `filterRes`.
///
/// Returns `Ok(None)` when any of the components is zero.
fn parse_resolution(text: &str) -> Result<Option<(u32, u32)>, BridgeError> {
    let malformed = || BridgeError::MalformedNumber {
        element: EId::Filter.to_string(),
        attribute: AId::FilterRes.to_string(),
        value: text.to_string(),
    };

    let mut list = Vec::new();
    for n in svgtypes::NumberListParser::from(text) {
        list.push(n.map_err(|_| malformed())?);
    }

    let (x, y) = match list.as_slice() {
        [x] => (*x, *x),
        [x, y] => (*x, *y),
        _ => return Err(malformed()),
    };

    if x < 0.0 || y < 0.0 {
        return Err(BridgeError::InvalidFilterResolution(text.to_string()));
    }

    if x.round() == 0.0 || y.round() == 0.0 {
        return Ok(None);
    }

    Ok(Some((x.round() as u32, y.round() as u32)))
}

/// Converts the `filter` attribute of an element and attaches
/// the result to the graphics node.
///
/// Returns `None` when the element has no usable filter. All errors are
/// reported via the context.
pub fn convert_filter(
    element: svgtree::Node,
    node: GvtNodeId,
    ctx: &BridgeContext,
) -> Option<Rc<FilterChain>> {
    let value = element.raw_attribute(AId::Filter)?;
    if value.trim() == "none" {
        return None;
    }

    let filter = try_opt_warn_or!(
        element.attribute::<svgtree::Node>(AId::Filter), None,
        "'{}' references an unknown filter '{}'.", element.element_id(), value
    );

    if !filter.has_tag_name(EId::Filter) {
        log::warn!("'{}' is not a filter. Filter of '{}' is ignored.",
                   filter.element_id(), element.element_id());
        return None;
    }

    let _guard = match ctx.enter_filter(filter) {
        Ok(guard) => guard,
        Err(e) => {
            ctx.report(&e);
            return None;
        }
    };

    let builder = FilterChainBuilder::new(ctx.registry());
    match builder.build(node, ctx, filter, element) {
        Ok(Some(chain)) => {
            let chain = Rc::new(chain);
            ctx.set_filter(node, chain.clone());
            Some(chain)
        }
        Ok(None) => {
            log::warn!("Filter '{}' is disabled.", filter.element_id());
            None
        }
        Err(e) => {
            ctx.report(&e);
            None
        }
    }
}


#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_res {
        ($name:ident, $text:expr, $result:expr) => {
            #[test]
            fn $name() {
                assert_eq!(parse_resolution($text), $result);
            }
        };
    }

    test_res!(res_single,   "100",      Ok(Some((100, 100))));
    test_res!(res_pair,     "100 50",   Ok(Some((100, 50))));
    test_res!(res_comma,    "10,20",    Ok(Some((10, 20))));
    test_res!(res_zero,     "0",        Ok(None));
    test_res!(res_zero_y,   "10 0",     Ok(None));
    test_res!(res_negative, "-1 10",    Err(BridgeError::InvalidFilterResolution("-1 10".to_string())));
    test_res!(res_empty,    "",         Err(BridgeError::MalformedNumber {
        element: "filter".to_string(), attribute: "filterRes".to_string(), value: String::new() }));
    test_res!(res_three,    "1 2 3",    Err(BridgeError::MalformedNumber {
        element: "filter".to_string(), attribute: "filterRes".to_string(), value: "1 2 3".to_string() }));
}
