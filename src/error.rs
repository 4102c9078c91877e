// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors that can occur while loading a document.
#[derive(Debug)]
pub enum Error {
    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// We do not allow SVG with more than 1_000_000 elements
    /// or nested deeper than 1024 levels for security reasons.
    ElementsLimitReached,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum number or nesting depth of SVG elements has been reached")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {}


/// Errors raised while bridging SVG elements to graphics and filter nodes.
///
/// None of them is fatal for the whole document. A failed filter primitive
/// contributes nothing, a failed filter leaves the element unfiltered.
#[derive(Clone, PartialEq, Debug)]
pub enum BridgeError {
    /// A length attribute cannot be parsed.
    MalformedLength {
        /// Element's tag name.
        element: String,
        /// Attribute's name.
        attribute: String,
        /// Raw attribute value.
        value: String,
    },

    /// A number attribute cannot be parsed.
    MalformedNumber {
        /// Element's tag name.
        element: String,
        /// Attribute's name.
        attribute: String,
        /// Raw attribute value.
        value: String,
    },

    /// A required attribute is not set.
    MissingAttribute {
        /// Element's tag name.
        element: String,
        /// Attribute's name.
        attribute: String,
    },

    /// A region has a negative width or height.
    IllegalRegion {
        /// Element's tag name.
        element: String,
        /// `width` or `height`.
        attribute: String,
    },

    /// A `*Units` attribute is neither `userSpaceOnUse` nor `objectBoundingBox`.
    InvalidUnits {
        /// Element's tag name.
        element: String,
        /// Raw attribute value.
        value: String,
    },

    /// An `in` or `in2` attribute references an unknown result.
    UnknownFilterReference(String),

    /// An `in` or `in2` attribute references a known, but unsupported input.
    UnsupportedFilterInput(String),

    /// A filter primitive has malformed required data.
    InvalidFilterPrimitive {
        /// Element's tag name.
        element: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A `filterRes` attribute has a negative value.
    InvalidFilterResolution(String),

    /// An element references itself, directly or indirectly.
    CircularReference(String),

    /// An external resource cannot be loaded.
    DocumentLoading {
        /// A requested URI.
        uri: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            BridgeError::MalformedLength { ref element, ref attribute, ref value } => {
                write!(f, "'{}' has an invalid '{}' length: '{}'", element, attribute, value)
            }
            BridgeError::MalformedNumber { ref element, ref attribute, ref value } => {
                write!(f, "'{}' has an invalid '{}' number: '{}'", element, attribute, value)
            }
            BridgeError::MissingAttribute { ref element, ref attribute } => {
                write!(f, "'{}' requires the '{}' attribute", element, attribute)
            }
            BridgeError::IllegalRegion { ref element, ref attribute } => {
                write!(f, "'{}' has a negative region '{}'", element, attribute)
            }
            BridgeError::InvalidUnits { ref element, ref value } => {
                write!(f, "'{}' has invalid units: '{}'", element, value)
            }
            BridgeError::UnknownFilterReference(ref name) => {
                write!(f, "filter result '{}' is not defined", name)
            }
            BridgeError::UnsupportedFilterInput(ref name) => {
                write!(f, "filter input '{}' is not supported", name)
            }
            BridgeError::InvalidFilterPrimitive { ref element, ref reason } => {
                write!(f, "'{}' is invalid: {}", element, reason)
            }
            BridgeError::InvalidFilterResolution(ref value) => {
                write!(f, "invalid 'filterRes' value: '{}'", value)
            }
            BridgeError::CircularReference(ref id) => {
                write!(f, "element '{}' references itself", id)
            }
            BridgeError::DocumentLoading { ref uri, ref reason } => {
                write!(f, "failed to load '{}' cause {}", uri, reason)
            }
        }
    }
}

impl std::error::Error for BridgeError {}
