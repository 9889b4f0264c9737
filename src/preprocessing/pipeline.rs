use crate::error::DecodeError;
use image::GrayImage;
use serde::Serialize;
use std::time::Instant;

use super::source::{ImageSource, NormalizedImage, RawImage};
use super::steps;

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Timing stats for one normalization run
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizationReport {
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings, in pipeline order
    pub steps: Vec<StepTiming>,
}

/// Fixed grayscale -> denoise -> threshold -> dilate pipeline
#[derive(Debug, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a decoded photo into a binary image of the same size
    pub fn process(&self, raw: RawImage) -> (NormalizedImage, NormalizationReport) {
        let start = Instant::now();
        let mut steps_timing = Vec::new();
        let (width, height) = raw.dimensions();

        let step_start = Instant::now();
        let mut img = steps::grayscale::apply(raw.into_inner());
        record("grayscale", step_start, &mut steps_timing);

        img = self.run_step("denoise", img, &mut steps_timing, steps::denoise::apply);
        img = self.run_step("threshold", img, &mut steps_timing, steps::threshold::apply);
        img = self.run_step("dilate", img, &mut steps_timing, steps::dilate::apply);

        debug_assert_eq!(img.dimensions(), (width, height));

        let report = NormalizationReport {
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        };
        tracing::info!(
            "Normalized {}x{} image in {}ms",
            width,
            height,
            report.total_time_ms
        );

        (NormalizedImage::new(img), report)
    }

    fn run_step<F>(
        &self,
        name: &str,
        img: GrayImage,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> GrayImage
    where
        F: FnOnce(GrayImage) -> GrayImage,
    {
        let step_start = Instant::now();
        let result = step_fn(img);
        record(name, step_start, timings);
        result
    }
}

fn record(name: &str, step_start: Instant, timings: &mut Vec<StepTiming>) {
    let time_ms = step_start.elapsed().as_millis() as u64;
    tracing::debug!("Applied {} in {}ms", name, time_ms);
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms,
    });
}

/// Decode a photo and normalize it for OCR
pub fn normalize<'a>(source: impl Into<ImageSource<'a>>) -> Result<NormalizedImage, DecodeError> {
    normalize_with_report(source).map(|(image, _)| image)
}

/// Same as [`normalize`], also returning per-step timings
pub fn normalize_with_report<'a>(
    source: impl Into<ImageSource<'a>>,
) -> Result<(NormalizedImage, NormalizationReport), DecodeError> {
    let source = source.into();
    if let ImageSource::Path(path) = source {
        tracing::info!("Preprocessing image: {}", path.display());
    }

    let raw = RawImage::decode(source).inspect_err(|e| {
        tracing::error!("Error in preprocessing image: {}", e);
    })?;

    Ok(Pipeline::new().process(raw))
}
