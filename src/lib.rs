// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgbridge` turns SVG `filter` elements into graphs of image operators.

## Purpose

A renderer that supports SVG filters has to answer a lot of questions
before it can touch a single pixel: which region does the filter cover,
which coordinate system does each primitive use, which primitive reads
which named result and what happens when an `in` attribute is missing.

This crate answers them. It parses an SVG document into a read-only tree,
builds lightweight graphics nodes for the filtered elements and converts
every `filter` element into a [`FilterChain`]: a directed acyclic graph of
[`FilterNode`]s, each with its own resolved subregion. The actual pixel
kernels are left to the backend.

## Example

```
let text = "
<svg xmlns='http://www.w3.org/2000/svg' width='200' height='200'>
    <filter id='blur'>
        <feGaussianBlur stdDeviation='4'/>
    </filter>
    <rect id='rect1' width='100' height='100' filter='url(#blur)'/>
</svg>
";

let opt = svgbridge::Options::default();
let doc = svgbridge::svgtree::Document::parse(text).unwrap();
let ctx = svgbridge::BridgeContext::new(&doc, &opt);
let root = ctx.build_root().unwrap();
let rect = ctx.graphics_node_by_id("rect1").unwrap();
assert!(ctx.filter_of(rect).is_some());
# let _ = root;
```

## Limitations

- Pixel-level operators are not implemented. Only the operator graph is built.
- `BackgroundImage`, `BackgroundAlpha`, `FillPaint` and `StrokePaint`
  inputs are reported as unsupported.
- Scripting and animation are not supported.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]

/// Unwraps `Option` and invokes `continue` on `None`.
macro_rules! try_opt_continue {
    ($task:expr) => {
        match $task {
            Some(v) => v,
            None => continue,
        }
    };
}

/// Unwraps `Option` and invokes `return $ret` on `None`.
macro_rules! try_opt_or {
    ($task:expr, $ret:expr) => {
        match $task {
            Some(v) => v,
            None => return $ret,
        }
    };
}

/// Unwraps `Option` and invokes `return $ret` on `None` with a warning.
macro_rules! try_opt_warn_or {
    ($task:expr, $ret:expr, $msg:expr) => {
        match $task {
            Some(v) => v,
            None => {
                log::warn!($msg);
                return $ret;
            }
        }
    };
    ($task:expr, $ret:expr, $fmt:expr, $($arg:tt)*) => {
        match $task {
            Some(v) => v,
            None => {
                log::warn!($fmt, $($arg)*);
                return $ret;
            }
        }
    };
}

macro_rules! impl_enum_default {
    ($name:ident, $def_value:ident) => {
        impl Default for $name {
            #[inline]
            fn default() -> Self {
                $name::$def_value
            }
        }
    };
}

macro_rules! impl_enum_from_str {
    ($name:ident, $($string:pat => $result:expr),+) => {
        impl crate::svgtree::EnumFromStr for $name {
            fn enum_from_str(s: &str) -> Option<Self> {
                match s {
                    $($string => Some($result)),+,
                    _ => None,
                }
            }
        }
    };
}

pub mod filter;
pub mod gvt;
pub mod region;
pub mod svgtree;
pub mod units;
mod context;
mod error;
mod geom;
mod loader;
mod options;

pub use crate::context::*;
pub use crate::error::*;
pub use crate::filter::{FilterChain, FilterKind, FilterNode, FilterRef};
pub use crate::geom::*;
pub use crate::loader::{DocumentLoader, FileLoader};
pub use crate::options::*;
pub use crate::units::{Direction, Units};
