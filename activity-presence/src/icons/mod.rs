//! Icon resolution and caching.
//!
//! An icon identifier ("youtube", "notepad", "https://example.com") is turned
//! into PNG bytes by the [`resolver::IconResolver`], which layers:
//! - [`cache::IconCache`]: in-memory map plus one PNG per identifier on disk
//! - [`sources`]: the local executable icon and remote favicon candidates
//!
//! Every image that enters the cache goes through [`normalize_icon`], so the
//! cache only ever holds decodable PNGs larger than 1×1.

pub mod cache;
pub mod resolver;
pub mod sources;

pub use cache::{sanitize_file_name, IconCache};
pub use resolver::{IconResolver, Refresh};
pub use sources::{
    candidate_urls, ExecutableIconSource, HttpIconFetcher, IconFetcher, SystemExecutableIcons,
};

use crate::types::IconSourceError;
use image::ImageFormat;
use std::io::Cursor;

/// Icon decoded and re-encoded as PNG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIcon {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode any supported image format and re-encode it as PNG.
///
/// Images of 1×1 or smaller are rejected: favicon services answer unknown
/// domains with a transparent pixel instead of an error status.
pub fn normalize_icon(bytes: &[u8], origin: &str) -> Result<NormalizedIcon, IconSourceError> {
    let image = image::load_from_memory(bytes).map_err(|e| IconSourceError::Decode {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;

    let (width, height) = (image.width(), image.height());
    if width <= 1 && height <= 1 {
        return Err(IconSourceError::Placeholder {
            origin: origin.to_string(),
            width,
            height,
        });
    }

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| IconSourceError::Decode {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

    Ok(NormalizedIcon { png, width, height })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::sources::{ExecutableIconSource, IconFetcher};
    use crate::types::IconSourceError;
    use async_trait::async_trait;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Solid-colour PNG of the given size
    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// In-memory fetcher that records every URL it is asked for
    #[derive(Default)]
    pub struct FakeFetcher {
        responses: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn with(mut self, url: &str, body: Vec<u8>) -> Self {
            self.responses.insert(url.to_string(), body);
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl IconFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, IconSourceError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(body) if body.is_empty() => Err(IconSourceError::EmptyBody {
                    url: url.to_string(),
                }),
                Some(body) => Ok(body.clone()),
                None => Err(IconSourceError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    /// Executable icon source backed by a map of process name → image bytes
    #[derive(Default)]
    pub struct FakeExecutables {
        icons: HashMap<String, Vec<u8>>,
        lookups: Mutex<Vec<String>>,
    }

    impl FakeExecutables {
        pub fn with(mut self, process: &str, bytes: Vec<u8>) -> Self {
            self.icons.insert(process.to_string(), bytes);
            self
        }

        pub fn lookup_count(&self) -> usize {
            self.lookups.lock().unwrap().len()
        }
    }

    impl ExecutableIconSource for FakeExecutables {
        fn icon_bytes(&self, process_name: &str) -> Option<Vec<u8>> {
            self.lookups.lock().unwrap().push(process_name.to_string());
            self.icons.get(process_name).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::png;
    use super::*;

    #[test]
    fn test_normalize_png() {
        let icon = normalize_icon(&png(32, 16), "test").unwrap();
        assert_eq!((icon.width, icon.height), (32, 16));
        assert_eq!(image::guess_format(&icon.png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_normalize_rejects_single_pixel() {
        let err = normalize_icon(&png(1, 1), "https://s2").unwrap_err();
        assert!(matches!(
            err,
            IconSourceError::Placeholder { width: 1, height: 1, .. }
        ));
    }

    #[test]
    fn test_normalize_accepts_thin_images() {
        assert!(normalize_icon(&png(2, 1), "test").is_ok());
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let err = normalize_icon(b"<html>not found</html>", "https://x").unwrap_err();
        assert!(matches!(err, IconSourceError::Decode { .. }));
        assert!(err.to_string().contains("https://x"));
    }
}
