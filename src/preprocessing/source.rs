use crate::error::DecodeError;
use image::{GrayImage, RgbImage};
use std::path::{Path, PathBuf};

/// Where a prescription photo comes from
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Self::Path(path.as_path())
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ImageSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes.as_slice())
    }
}

/// Decoded three-channel color photo, consumed by normalization
#[derive(Debug, Clone)]
pub struct RawImage(RgbImage);

impl RawImage {
    /// Decode a photo, sniffing the format from its content
    pub fn decode(source: ImageSource<'_>) -> Result<Self, DecodeError> {
        match source {
            ImageSource::Path(path) => {
                if !path.exists() {
                    return Err(DecodeError::NotFound(path.to_path_buf()));
                }
                let data = std::fs::read(path).map_err(|source| DecodeError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_bytes(&data)
            }
            ImageSource::Bytes(data) => Self::from_bytes(data),
        }
    }

    fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }
        let image = image::load_from_memory(data)?;
        Ok(Self(image.to_rgb8()))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn into_inner(self) -> RgbImage {
        self.0
    }
}

impl From<RgbImage> for RawImage {
    fn from(image: RgbImage) -> Self {
        Self(image)
    }
}

/// Binary (0/255) grayscale image ready for OCR
///
/// Only the preprocessing pipeline builds these, so every instance has gone
/// through binarization and has the same dimensions as its source photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage(GrayImage);

impl NormalizedImage {
    pub(crate) fn new(image: GrayImage) -> Self {
        debug_assert!(image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        Self(image)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.0
    }

    pub fn into_inner(self) -> GrayImage {
        self.0
    }
}
