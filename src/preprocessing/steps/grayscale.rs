use image::{imageops, GrayImage, RgbImage};

/// Collapse the color channels into one luminance channel
pub fn apply(image: RgbImage) -> GrayImage {
    imageops::grayscale(&image)
}
