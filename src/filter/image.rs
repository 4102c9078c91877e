// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use crate::gvt::GvtNodeId;
use crate::loader::{self, ImageFormat};
use crate::svgtree::{self, AId};
use crate::{BridgeContext, BridgeError};
use super::*;

/// An image filter primitive.
///
/// `feImage` element in the SVG.
#[derive(Debug)]
pub struct Image {
    /// Value of the `preserveAspectRatio` attribute.
    pub aspect: svgtypes::AspectRatio,

    /// Image data.
    pub data: ImageKind,
}

/// Kind of the `feImage` data.
#[derive(Clone)]
pub enum ImageKind {
    /// A raw PNG data. Should be decoded by the caller.
    Png(Rc<Vec<u8>>),

    /// A raw JPEG data. Should be decoded by the caller.
    Jpeg(Rc<Vec<u8>>),

    /// A graphics node built from an SVG element or an SVG document.
    Node(GvtNodeId),
}

impl std::fmt::Debug for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ImageKind::Png(_) => f.write_str("ImageKind::Png(..)"),
            ImageKind::Jpeg(_) => f.write_str("ImageKind::Jpeg(..)"),
            ImageKind::Node(id) => write!(f, "ImageKind::Node({:?})", id),
        }
    }
}

pub(super) fn create(
    fe: &FilterPrimitive,
    cx: &PrimitiveContext,
    results: &NamedResultMap,
) -> Result<Option<PrimitiveOutput>, BridgeError> {
    let href = try_opt_warn_or!(
        fe.element.raw_attribute(AId::Href).map(str::trim), Ok(None),
        "The 'feImage' element lacks the 'xlink:href' attribute. Skipped."
    );

    let data = try_opt_or!(resolve_href(fe.element, href, cx.bridge)?, Ok(None));
    let region = cx.subregion(fe, &[], results)?;

    Ok(Some(PrimitiveOutput {
        kind: FilterKind::Image(Image {
            aspect: fe.element.attribute(AId::PreserveAspectRatio).unwrap_or_default(),
            data,
        }),
        bounds: region,
        region,
    }))
}

/// Resolves an `feImage` reference.
///
/// Loading failures are reported and yield `None`. Only reference cycles are errors.
fn resolve_href(
    fe: svgtree::Node,
    href: &str,
    ctx: &BridgeContext,
) -> Result<Option<ImageKind>, BridgeError> {
    if let Some(id) = href.strip_prefix('#') {
        let node = try_opt_warn_or!(
            fe.document().element_by_id(id), Ok(None),
            "'feImage' references an unknown element '{}'. Skipped.", id
        );

        return Ok(ctx.build_graphics_node(node)?.map(ImageKind::Node));
    }

    let (uri, fragment) = match href.find('#') {
        Some(idx) if !href.starts_with("data:") => (&href[..idx], Some(&href[idx + 1..])),
        _ => (href, None),
    };

    let _guard = ctx.enter_image(uri)?;

    let data = match ctx.load_data(uri) {
        Ok(data) => data,
        Err(e) => {
            ctx.report(&e);
            return Ok(None);
        }
    };

    match loader::image_data_format(&data) {
        Some(ImageFormat::Png) => return Ok(Some(ImageKind::Png(Rc::new(data)))),
        Some(ImageFormat::Jpeg) => return Ok(Some(ImageKind::Jpeg(Rc::new(data)))),
        _ => {}
    }

    let doc = match svgtree::Document::parse_data(&data) {
        Ok(doc) => doc,
        Err(e) => {
            ctx.report(&BridgeError::DocumentLoading {
                uri: uri.to_string(),
                reason: e.to_string(),
            });
            return Ok(None);
        }
    };

    let node = match fragment {
        Some(id) => try_opt_warn_or!(
            doc.element_by_id(id), Ok(None),
            "'{}' has no element '{}'. Skipped.", uri, id
        ),
        None => doc.root_element(),
    };

    Ok(ctx.build_graphics_node(node)?.map(ImageKind::Node))
}
