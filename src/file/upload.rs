// src/file/upload.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rfd::FileDialog;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Image is too large ({size} bytes, limit is {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error("The file is not a readable image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Malformed image data")]
    InvalidDataUrl,

    #[error("Reading the image was interrupted")]
    Interrupted,
}

/// A photo held entirely in memory as a `data:` URL. No path is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    /// Unique per upload, so the same file picked twice is two images.
    pub id: String,
    pub file_name: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub data_url: String,
}

impl UploadedImage {
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Result<Self, UploadError> {
        let format = image::guess_format(bytes)?;
        let decoded = image::load_from_memory_with_format(bytes, format)?;

        Ok(Self {
            id: Uuid::now_v7().to_string(),
            file_name: file_name.to_string(),
            mime: format.to_mime_type().to_string(),
            width: decoded.width(),
            height: decoded.height(),
            data_url: format!("data:{};base64,{}", format.to_mime_type(), STANDARD.encode(bytes)),
        })
    }

    /// The base64 payload after the comma, as image APIs expect it.
    pub fn base64_payload(&self) -> &str {
        self.data_url
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(&self.data_url)
    }
}

/// Decodes a `data:<mime>;base64,<payload>` string back into pixels.
pub fn decode_data_url(data_url: &str) -> Result<image::RgbaImage, UploadError> {
    let (header, payload) = data_url.split_once(',').ok_or(UploadError::InvalidDataUrl)?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(UploadError::InvalidDataUrl);
    }

    let bytes = STANDARD.decode(payload).map_err(|_| UploadError::InvalidDataUrl)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

#[derive(Debug, Clone)]
pub struct ImageUploader {
    max_bytes: u64,
}

impl ImageUploader {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Opens the native picker. `None` when the user dismisses it.
    pub fn pick(&self) -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .set_title("Choose a meal photo")
            .pick_file()
    }

    pub fn read(&self, path: &Path) -> Result<UploadedImage, UploadError> {
        let read_error = |source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        };

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::Unsupported(path.display().to_string()));
        }

        let size = fs::metadata(path).map_err(read_error)?.len();
        if size > self.max_bytes {
            return Err(UploadError::TooLarge { size, limit: self.max_bytes });
        }

        let bytes = fs::read(path).map_err(read_error)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let image = UploadedImage::from_bytes(&file_name, &bytes)?;
        debug!("Read {} ({}x{}, {})", image.file_name, image.width, image.height, image.mime);
        Ok(image)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 40, 255]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    pub(crate) fn sample_image() -> UploadedImage {
        UploadedImage::from_bytes("plate.png", &png_bytes(3, 2)).unwrap()
    }

    #[test]
    fn png_becomes_self_contained_data_url() {
        let image = sample_image();
        assert_eq!(image.mime, "image/png");
        assert_eq!((image.width, image.height), (3, 2));
        assert!(image.data_url.starts_with("data:image/png;base64,"));
        assert!(!image.base64_payload().contains(','));
        assert_ne!(image.id, sample_image().id);
    }

    #[test]
    fn data_url_decodes_back_to_pixels() {
        let image = sample_image();
        let pixels = decode_data_url(&image.data_url).unwrap();
        assert_eq!(pixels.dimensions(), (3, 2));
        assert_eq!(pixels.get_pixel(0, 0).0, [200, 120, 40, 255]);
    }

    #[test]
    fn non_image_bytes_are_a_decode_failure() {
        let err = UploadedImage::from_bytes("notes.txt", b"definitely not a picture").unwrap_err();
        assert!(matches!(err, UploadError::Decode(_)));
    }

    #[test]
    fn truncated_png_is_a_decode_failure() {
        let bytes = png_bytes(4, 4);
        let err = UploadedImage::from_bytes("half.png", &bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, UploadError::Decode(_)));
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        assert!(matches!(decode_data_url("no comma here"), Err(UploadError::InvalidDataUrl)));
        assert!(matches!(decode_data_url("data:image/png,raw"), Err(UploadError::InvalidDataUrl)));
        assert!(matches!(decode_data_url("data:image/png;base64,@@@"), Err(UploadError::InvalidDataUrl)));
    }

    #[test]
    fn reader_enforces_size_limit_and_reports_missing_files() {
        let dir = std::env::temp_dir().join(format!("protein-score-upload-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("meal.png");
        fs::write(&path, png_bytes(8, 8)).unwrap();

        let image = ImageUploader::new(1024 * 1024).read(&path).unwrap();
        assert_eq!(image.file_name, "meal.png");

        let err = ImageUploader::new(10).read(&path).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit: 10, .. }));

        let err = ImageUploader::new(1024).read(&dir.join("missing.png")).unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));

        let notes = dir.join("notes.txt");
        fs::write(&notes, b"lunch").unwrap();
        let err = ImageUploader::new(1024).read(&notes).unwrap_err();
        assert!(matches!(err, UploadError::Unsupported(_)));

        // extension matching ignores case
        let upper = dir.join("MEAL.PNG");
        fs::write(&upper, png_bytes(2, 2)).unwrap();
        assert!(ImageUploader::new(1024 * 1024).read(&upper).is_ok());

        fs::remove_dir_all(&dir).unwrap();
    }
}
