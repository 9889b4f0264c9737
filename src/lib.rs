//! Prescription photo OCR
//!
//! [`preprocessing::normalize`] turns a photo into a clean binary image,
//! [`OcrProcessor::extract`] runs OCR on it and cleans the text, and
//! [`OcrProcessor::process_prescription`] chains both.

pub mod cli;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod ocr;
pub mod preprocessing;
pub mod server;
pub mod text;

pub use engine::{OcrEngine, Recognition};
pub use error::{DecodeError, OcrEngineError, ProcessError};
pub use ocr::{OcrProcessor, Prescription};
pub use preprocessing::{normalize, ImageSource, NormalizedImage};
pub use text::{cleanup, ExtractedText};
