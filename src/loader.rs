// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::svgtree::Document;
use crate::{BridgeError, Options};

/// Loads external resources referenced by a document.
///
/// Used by `feImage` to resolve references that are not fragments
/// of the current document.
pub trait DocumentLoader {
    /// Loads raw resource data.
    fn load_data(&self, uri: &str) -> Result<Vec<u8>, BridgeError>;

    /// Loads and parses an SVG document.
    fn load(&self, uri: &str) -> Result<Document, BridgeError> {
        let data = self.load_data(uri)?;
        Document::parse_data(&data).map_err(|e| BridgeError::DocumentLoading {
            uri: uri.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A default resources loader.
///
/// Supports `data:` URLs and local files. Relative paths are resolved
/// against `Options::resources_dir`.
#[derive(Clone, Debug)]
pub struct FileLoader {
    opt: Options,
}

impl FileLoader {
    /// Creates a new loader.
    pub fn new(opt: &Options) -> Self {
        FileLoader { opt: opt.clone() }
    }
}

impl DocumentLoader for FileLoader {
    fn load_data(&self, uri: &str) -> Result<Vec<u8>, BridgeError> {
        let error = |reason: String| BridgeError::DocumentLoading {
            uri: uri.to_string(),
            reason,
        };

        if uri.starts_with("data:") {
            return decode_data_url(uri).map_err(error);
        }

        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let path = self.opt.get_abs_path(Path::new(path));
        std::fs::read(&path).map_err(|e| error(e.to_string()))
    }
}

fn decode_data_url(uri: &str) -> Result<Vec<u8>, String> {
    let url = data_url::DataUrl::process(uri).map_err(|e| format!("{:?}", e))?;
    let (data, _) = url.decode_to_vec().map_err(|e| format!("{:?}", e))?;
    Ok(data)
}


/// A raster image format.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum ImageFormat {
    Png,
    Jpeg,
}

/// Checks that data has a PNG or a JPEG magic bytes.
pub(crate) fn image_data_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageFormat::Png)
    } else if data.starts_with(&[0xff, 0xd8, 0xff]) {
        Some(ImageFormat::Jpeg)
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_base64() {
        let loader = FileLoader::new(&Options::default());
        let data = loader.load_data("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(data, b"hello");
    }

    #[test]
    fn data_url_svg() {
        let loader = FileLoader::new(&Options::default());
        let doc = loader.load(
            "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg'%3E%3Crect id='r1'/%3E%3C/svg%3E"
        ).unwrap();
        assert!(doc.element_by_id("r1").is_some());
    }

    #[test]
    fn missing_file() {
        let loader = FileLoader::new(&Options::default());
        match loader.load_data("this/file/does/not/exist.svg") {
            Err(BridgeError::DocumentLoading { uri, .. }) => {
                assert_eq!(uri, "this/file/does/not/exist.svg");
            }
            v => panic!("unexpected result: {:?}", v),
        }
    }

    #[test]
    fn not_an_svg() {
        let loader = FileLoader::new(&Options::default());
        assert!(loader.load("data:text/plain,qwe").is_err());
    }

    #[test]
    fn magic_bytes() {
        assert_eq!(image_data_format(b"\x89PNG\r\n\x1a\n...."), Some(ImageFormat::Png));
        assert_eq!(image_data_format(&[0xff, 0xd8, 0xff, 0xe0]), Some(ImageFormat::Jpeg));
        assert_eq!(image_data_format(b"<svg"), None);
        assert_eq!(image_data_format(b""), None);
    }
}
