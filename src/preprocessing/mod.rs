//! Image normalization for OCR
//!
//! Turns an unevenly lit, noisy photo of a paper prescription into a binary
//! image of the same size: grayscale, non-local means denoising, Otsu
//! thresholding, then a 2x2 dilation.

pub mod pipeline;
pub mod source;
pub mod steps;

pub use pipeline::{normalize, normalize_with_report, NormalizationReport, Pipeline, StepTiming};
pub use source::{ImageSource, NormalizedImage, RawImage};
