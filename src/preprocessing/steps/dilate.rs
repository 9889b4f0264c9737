use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_dilate, Mask};
use std::sync::LazyLock;

/// 2x2 square structuring element anchored at its bottom-right cell, so each
/// output pixel sees itself and its left, top and top-left neighbours
static KERNEL: LazyLock<Mask> =
    LazyLock::new(|| Mask::from_image(&GrayImage::from_pixel(2, 2, Luma([255])), 1, 1));

/// Apply one pass of morphological dilation with a 2x2 square element
/// Grows white regions by one pixel toward the bottom-right, reconnecting
/// strokes that binarization left broken
pub fn apply(image: GrayImage) -> GrayImage {
    grayscale_dilate(&image, &KERNEL)
}
