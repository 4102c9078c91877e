// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

macro_rules! names {
    ($(#[$meta:meta])* $name:ident; $($variant:ident => $text:expr,)+) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Parses a name from a string.
            pub fn from_str(text: &str) -> Option<Self> {
                match text {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Returns the name as a string.
            pub fn to_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_str())
            }
        }
    };
}

names! {
    /// An SVG element name.
    EId;
    A => "a",
    Circle => "circle",
    ClipPath => "clipPath",
    Defs => "defs",
    Ellipse => "ellipse",
    FeBlend => "feBlend",
    FeColorMatrix => "feColorMatrix",
    FeComponentTransfer => "feComponentTransfer",
    FeComposite => "feComposite",
    FeConvolveMatrix => "feConvolveMatrix",
    FeDiffuseLighting => "feDiffuseLighting",
    FeDisplacementMap => "feDisplacementMap",
    FeDistantLight => "feDistantLight",
    FeDropShadow => "feDropShadow",
    FeFlood => "feFlood",
    FeFuncA => "feFuncA",
    FeFuncB => "feFuncB",
    FeFuncG => "feFuncG",
    FeFuncR => "feFuncR",
    FeGaussianBlur => "feGaussianBlur",
    FeImage => "feImage",
    FeMerge => "feMerge",
    FeMergeNode => "feMergeNode",
    FeMorphology => "feMorphology",
    FeOffset => "feOffset",
    FePointLight => "fePointLight",
    FeSpecularLighting => "feSpecularLighting",
    FeSpotLight => "feSpotLight",
    FeTile => "feTile",
    FeTurbulence => "feTurbulence",
    Filter => "filter",
    G => "g",
    Image => "image",
    Line => "line",
    LinearGradient => "linearGradient",
    Mask => "mask",
    Path => "path",
    Pattern => "pattern",
    Polygon => "polygon",
    Polyline => "polyline",
    RadialGradient => "radialGradient",
    Rect => "rect",
    Stop => "stop",
    Style => "style",
    Svg => "svg",
    Symbol => "symbol",
    Text => "text",
    Use => "use",
}

names! {
    /// An SVG attribute name.
    AId;
    Amplitude => "amplitude",
    BaseFrequency => "baseFrequency",
    Class => "class",
    Color => "color",
    ColorInterpolationFilters => "color-interpolation-filters",
    Cx => "cx",
    Cy => "cy",
    D => "d",
    Display => "display",
    Dx => "dx",
    Dy => "dy",
    Exponent => "exponent",
    Fill => "fill",
    Filter => "filter",
    FilterRes => "filterRes",
    FilterUnits => "filterUnits",
    FloodColor => "flood-color",
    FloodOpacity => "flood-opacity",
    FontSize => "font-size",
    Height => "height",
    Href => "href",
    Id => "id",
    In => "in",
    In2 => "in2",
    Intercept => "intercept",
    K1 => "k1",
    K2 => "k2",
    K3 => "k3",
    K4 => "k4",
    Mask => "mask",
    MaskUnits => "maskUnits",
    NumOctaves => "numOctaves",
    Offset => "offset",
    Opacity => "opacity",
    Operator => "operator",
    PatternUnits => "patternUnits",
    Points => "points",
    PreserveAspectRatio => "preserveAspectRatio",
    PrimitiveUnits => "primitiveUnits",
    R => "r",
    Radius => "radius",
    Result => "result",
    Rx => "rx",
    Ry => "ry",
    Scale => "scale",
    Seed => "seed",
    Slope => "slope",
    StdDeviation => "stdDeviation",
    StitchTiles => "stitchTiles",
    Style => "style",
    TableValues => "tableValues",
    Transform => "transform",
    Type => "type",
    Values => "values",
    ViewBox => "viewBox",
    Width => "width",
    X => "x",
    X1 => "x1",
    X2 => "x2",
    XChannelSelector => "xChannelSelector",
    Y => "y",
    Y1 => "y1",
    Y2 => "y2",
    YChannelSelector => "yChannelSelector",
}

impl EId {
    /// Checks that the element produces a graphics node.
    pub fn is_graphic(&self) -> bool {
        matches!(self,
              EId::Circle
            | EId::Ellipse
            | EId::Image
            | EId::Line
            | EId::Path
            | EId::Polygon
            | EId::Polyline
            | EId::Rect
            | EId::Use
        )
    }

    /// Checks that the element is a container.
    pub fn is_container(&self) -> bool {
        matches!(self, EId::A | EId::G | EId::Svg | EId::Symbol)
    }
}

impl AId {
    /// Checks that the attribute is a presentation attribute.
    ///
    /// Only presentation attributes can be set via CSS.
    pub fn is_presentation(&self) -> bool {
        matches!(self,
              AId::Color
            | AId::ColorInterpolationFilters
            | AId::Display
            | AId::Fill
            | AId::Filter
            | AId::FloodColor
            | AId::FloodOpacity
            | AId::FontSize
            | AId::Mask
            | AId::Opacity
        )
    }

    /// Checks that the attribute value is inherited by child elements.
    pub fn is_inheritable(&self) -> bool {
        self.is_presentation() && !is_non_inheritable(*self)
    }
}

fn is_non_inheritable(id: AId) -> bool {
    matches!(id,
          AId::Display
        | AId::Filter
        | AId::FloodColor
        | AId::FloodOpacity
        | AId::Mask
        | AId::Opacity
    )
}
