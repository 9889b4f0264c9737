//! Individual preprocessing steps

pub mod denoise;
pub mod dilate;
pub mod grayscale;
pub mod threshold;
