use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Apply Otsu global thresholding
/// The cutoff adapts to each photo's lighting instead of being fixed
pub fn apply(image: GrayImage) -> GrayImage {
    let level = threshold_level(&image);
    tracing::debug!("Otsu threshold: {}", level);
    binarize(&image, level)
}

/// Lowest intensity of the bright class chosen by Otsu's method.
///
/// `otsu_level` reports the top of the dark class, so the bright class starts
/// one above it.
pub fn threshold_level(img: &GrayImage) -> u8 {
    otsu_level(img).saturating_add(1)
}

/// Pixels at or above `level` become white, the rest black
fn binarize(img: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        if img.get_pixel(x, y).0[0] >= level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
