use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::try_join_all;
use log::debug;
use std::path::{Path, PathBuf};

use crate::error::EncodeError;

/// An image picked by the user, not yet encoded
#[derive(Debug, Clone)]
pub enum ImageResource {
    /// Image file on disk; the media type comes from the extension
    Path(PathBuf),
    /// Image already held in memory
    Bytes {
        name: String,
        data: Vec<u8>,
        mime_type: String,
    },
}

impl ImageResource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ImageResource::Path(path.into())
    }

    pub fn from_bytes(
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
    ) -> Self {
        ImageResource::Bytes {
            name: name.into(),
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Human readable name used in logs and errors
    pub fn name(&self) -> String {
        match self {
            ImageResource::Path(path) => path.display().to_string(),
            ImageResource::Bytes { name, .. } => name.clone(),
        }
    }

    /// Declared or inferred media type, if any
    pub fn mime_type(&self) -> Option<String> {
        match self {
            ImageResource::Path(path) => mime_type_for_path(path).map(str::to_string),
            ImageResource::Bytes { mime_type, .. } => Some(mime_type.clone()),
        }
    }

    /// Whether this resource looks like an image at all
    pub fn is_image(&self) -> bool {
        self.mime_type()
            .map(|mime| mime.starts_with("image/"))
            .unwrap_or(false)
    }
}

/// Base64 image data paired with its media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Infers an image media type from a file extension
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "jxl" => "image/jxl",
        _ => return None,
    };
    Some(mime)
}

/// Reads an image and converts it to base64
///
/// # Errors
/// Returns an error if:
/// - The image file cannot be read
/// - The image is empty
/// - The media type is unknown or not `image/*`
pub async fn encode(resource: &ImageResource) -> Result<EncodedImage, EncodeError> {
    let name = resource.name();
    let mime_type = resource
        .mime_type()
        .filter(|mime| mime.starts_with("image/"))
        .ok_or_else(|| {
            EncodeError::UnsupportedMediaType(resource.mime_type().unwrap_or(name.clone()))
        })?;

    let data = match resource {
        ImageResource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| EncodeError::Read {
                    path: name.clone(),
                    source,
                })?
        }
        ImageResource::Bytes { data, .. } => data.clone(),
    };

    if data.is_empty() {
        return Err(EncodeError::Empty(name));
    }

    debug!("Encoded {} ({}, {} bytes)", name, mime_type, data.len());

    Ok(EncodedImage {
        data: STANDARD.encode(&data),
        mime_type,
    })
}

/// Encodes every image concurrently, in order. The first failure fails the batch.
pub async fn encode_all(resources: &[ImageResource]) -> Result<Vec<EncodedImage>, EncodeError> {
    try_join_all(resources.iter().map(|resource| encode(resource))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(Path::new("fridge.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for_path(Path::new("a/b/shelf.webp")), Some("image/webp"));
        assert_eq!(mime_type_for_path(Path::new("leftovers.avif")), Some("image/avif"));
        assert_eq!(mime_type_for_path(Path::new("scan.TIF")), Some("image/tiff"));
        assert_eq!(mime_type_for_path(Path::new("scan.tiff")), Some("image/tiff"));
        assert_eq!(mime_type_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for_path(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_encode_bytes() {
        let image = ImageResource::from_bytes("onion.png", b"test data".to_vec(), "image/png");
        let encoded = encode(&image).await.unwrap();
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(encoded.data, "dGVzdCBkYXRh");
        assert_eq!(encoded.to_data_url(), "data:image/png;base64,dGVzdCBkYXRh");
    }

    #[tokio::test]
    async fn test_encode_file() {
        let mut file = tempfile::Builder::new().suffix(".jpeg").tempfile().unwrap();
        file.write_all(b"\xff\xd8\xff").unwrap();

        let encoded = encode(&ImageResource::from_path(file.path())).await.unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(encoded.data, STANDARD.encode(b"\xff\xd8\xff"));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let result = encode(&ImageResource::from_path("/definitely/not/here.png")).await;
        assert!(matches!(result, Err(EncodeError::Read { .. })));
    }

    #[tokio::test]
    async fn test_empty_and_non_image_rejected() {
        let empty = ImageResource::from_bytes("empty.png", Vec::new(), "image/png");
        assert!(matches!(encode(&empty).await, Err(EncodeError::Empty(_))));

        let text = ImageResource::from_bytes("list.txt", b"milk".to_vec(), "text/plain");
        assert!(matches!(
            encode(&text).await,
            Err(EncodeError::UnsupportedMediaType(mime)) if mime == "text/plain"
        ));
    }

    #[tokio::test]
    async fn test_encode_all_preserves_order_and_fails_fast() {
        let images = vec![
            ImageResource::from_bytes("a.png", b"a".to_vec(), "image/png"),
            ImageResource::from_bytes("b.gif", b"b".to_vec(), "image/gif"),
        ];
        let encoded = encode_all(&images).await.unwrap();
        assert_eq!(encoded[0].mime_type, "image/png");
        assert_eq!(encoded[1].mime_type, "image/gif");

        let mut broken = images.clone();
        broken.push(ImageResource::from_path("/missing.png"));
        assert!(encode_all(&broken).await.is_err());
    }
}
