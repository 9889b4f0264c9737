use image::{GrayImage, ImageFormat, Rgb, RgbImage};
use prescription_ocr::preprocessing::{normalize, normalize_with_report};
use prescription_ocr::DecodeError;
use std::io::{Cursor, Write};

/// Photo-like prescription: warm paper darkening to the right, two ink lines,
/// a little sensor noise
fn prescription_photo(width: u32, height: u32) -> RgbImage {
    let mut state = 0x9e37_79b9_u32;
    RgbImage::from_fn(width, height, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let noise = (state % 7) as i32 - 3;

        let ink = (10..width - 10).contains(&x) && ((10..13).contains(&y) || (25..28).contains(&y));
        let base = if ink { 40 } else { 230 - (x as i32 * 40 / width as i32) };
        let v = (base + noise).clamp(0, 255) as u8;
        Rgb([v, v.saturating_sub(5), v.saturating_sub(15)])
    })
}

fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), format)
        .expect("Failed to encode test image");
    data
}

fn assert_binary(img: &GrayImage) {
    for pixel in img.pixels() {
        assert!(
            pixel.0[0] == 0 || pixel.0[0] == 255,
            "Expected binary pixel, got {}",
            pixel.0[0]
        );
    }
}

#[test]
fn test_normalize_png_keeps_dimensions_and_is_binary() {
    let png = encode(&prescription_photo(80, 40), ImageFormat::Png);

    let image = normalize(&png).unwrap();

    assert_eq!(image.dimensions(), (80, 40));
    assert_binary(image.as_gray());
}

#[test]
fn test_normalize_jpeg_keeps_dimensions_and_is_binary() {
    let jpeg = encode(&prescription_photo(64, 48), ImageFormat::Jpeg);

    let image = normalize(&jpeg).unwrap();

    assert_eq!(image.width(), 64);
    assert_eq!(image.height(), 48);
    assert_binary(image.as_gray());
}

#[test]
fn test_normalize_separates_ink_from_paper() {
    let png = encode(&prescription_photo(80, 40), ImageFormat::Png);

    let gray = normalize(&png).unwrap().into_inner();

    // Ink lines
    assert_eq!(gray.get_pixel(40, 11).0[0], 0);
    assert_eq!(gray.get_pixel(20, 26).0[0], 0);
    // Paper, including the darker right side
    assert_eq!(gray.get_pixel(40, 20).0[0], 255);
    assert_eq!(gray.get_pixel(75, 35).0[0], 255);
}

#[test]
fn test_normalize_is_deterministic() {
    let png = encode(&prescription_photo(50, 30), ImageFormat::Png);

    let first = normalize(&png).unwrap();
    let second = normalize(&png).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_normalize_blank_photo_gives_uniform_output() {
    for value in [0u8, 255] {
        let png = encode(&RgbImage::from_pixel(20, 20, Rgb([value; 3])), ImageFormat::Png);
        let gray = normalize(&png).unwrap().into_inner();
        let first = gray.get_pixel(0, 0).0[0];
        assert!(gray.pixels().all(|p| p.0[0] == first));
    }
}

#[test]
fn test_normalize_from_path() {
    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .unwrap();
    file.write_all(&encode(&prescription_photo(30, 20), ImageFormat::Png))
        .unwrap();

    let (image, report) = normalize_with_report(file.path()).unwrap();

    assert_eq!(image.dimensions(), (30, 20));
    assert_eq!(report.steps.len(), 4);
}

#[test]
fn test_normalize_detects_format_from_content() {
    // JPEG bytes behind a .png name
    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .unwrap();
    file.write_all(&encode(&prescription_photo(30, 20), ImageFormat::Jpeg))
        .unwrap();

    assert_eq!(normalize(file.path()).unwrap().dimensions(), (30, 20));
}

#[test]
fn test_normalize_zero_byte_file_fails() {
    let file = tempfile::Builder::new()
        .suffix(".jpg")
        .tempfile()
        .unwrap();

    let err = normalize(file.path()).unwrap_err();
    assert!(matches!(err, DecodeError::Empty));
}

#[test]
fn test_normalize_corrupted_file_fails() {
    let mut file = tempfile::Builder::new()
        .suffix(".jpg")
        .tempfile()
        .unwrap();
    file.write_all(b"this is not a photograph").unwrap();

    let err = normalize(file.path()).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn test_normalize_truncated_png_fails() {
    let png = encode(&prescription_photo(40, 40), ImageFormat::Png);
    let truncated = &png[..png.len() / 2];

    let err = normalize(truncated).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn test_normalize_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uploaded_prescription.jpg");

    let err = normalize(&path).unwrap_err();
    assert!(matches!(err, DecodeError::NotFound(p) if p == path));
}
