use image::{GrayImage, Luma};

/// Filter strength; higher removes more noise but also more detail
const H: f64 = 3.0;
/// 7x7 comparison patch
const TEMPLATE_RADIUS: u32 = 3;
/// 21x21 search window
const SEARCH_RADIUS: u32 = 10;
/// Neighbours weighted below this contribute nothing
const WEIGHT_THRESHOLD: f64 = 0.001;

/// Apply non-local means denoising
/// Averages pixels whose surrounding patches look alike, so paper texture and
/// sensor noise are smoothed while stroke edges stay sharp
pub fn apply(image: GrayImage) -> GrayImage {
    non_local_means(&image, H, TEMPLATE_RADIUS, SEARCH_RADIUS)
}

/// Non-local means over a square search window.
///
/// Patch distances are evaluated one search offset at a time: for each offset
/// the squared difference between the image and its shifted copy is summed
/// into an integral image, which makes every patch distance a four-lookup box
/// sum. Cost is O(width * height * search_window²), independent of patch size.
/// Box sums are integers, so weights come from a table indexed by the sum.
fn non_local_means(
    img: &GrayImage,
    h: f64,
    template_radius: u32,
    search_radius: u32,
) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    let tr = template_radius as usize;
    let sr = search_radius as usize;
    let border = tr + sr;
    let padded = reflect_pad(img, border as i64);
    let padded_width = width as usize + 2 * border;

    // Region holding every patch of every output pixel, in padded coordinates
    // it starts at (sr, sr)
    let region_width = width as usize + 2 * tr;
    let region_height = height as usize + 2 * tr;
    let stride = region_width + 1;
    let patch_side = 2 * tr + 1;
    let weights = weight_table(h, (patch_side * patch_side) as f64);

    let pixel_count = (width * height) as usize;
    // Wrapping arithmetic: a box sum is at most patch_area * 255², so it comes
    // out exact even after the running totals overflow
    let mut integral = vec![0u32; stride * (region_height + 1)];
    let mut weighted_sum = vec![0f64; pixel_count];
    let mut weight_sum = vec![0f64; pixel_count];

    for dy in 0..=2 * sr {
        for dx in 0..=2 * sr {
            for ry in 0..region_height {
                let row = (ry + sr) * padded_width + sr;
                let shifted = (ry + dy) * padded_width + dx;
                let a = &padded[row..row + region_width];
                let b = &padded[shifted..shifted + region_width];

                let (above, below) = integral.split_at_mut((ry + 1) * stride);
                let above = &above[ry * stride + 1..];
                let below = &mut below[1..stride];

                let mut row_sum = 0u32;
                for rx in 0..region_width {
                    let d = a[rx].abs_diff(b[rx]) as u32;
                    row_sum = row_sum.wrapping_add(d * d);
                    below[rx] = above[rx].wrapping_add(row_sum);
                }
            }

            for y in 0..height as usize {
                let top = &integral[y * stride..(y + 1) * stride];
                let bottom = &integral[(y + patch_side) * stride..(y + patch_side + 1) * stride];
                let neighbours = &padded[(y + tr + dy) * padded_width + tr + dx..];
                let out = y * width as usize;

                for x in 0..width as usize {
                    let x2 = x + patch_side;
                    let sum = bottom[x2]
                        .wrapping_add(top[x])
                        .wrapping_sub(top[x2])
                        .wrapping_sub(bottom[x]);

                    let Some(&weight) = weights.get(sum as usize) else {
                        continue;
                    };

                    weighted_sum[out + x] += weight * neighbours[x] as f64;
                    weight_sum[out + x] += weight;
                }
            }
        }
    }

    // The zero offset always contributes weight 1, so weight_sum is never zero
    GrayImage::from_fn(width, height, |x, y| {
        let i = (y * width + x) as usize;
        let value = (weighted_sum[i] / weight_sum[i]).round().clamp(0.0, 255.0);
        Luma([value as u8])
    })
}

/// `exp(-(sum / patch_area) / h²)` for every squared-difference patch sum
/// whose weight reaches `WEIGHT_THRESHOLD`; larger sums are dropped
fn weight_table(h: f64, patch_area: f64) -> Vec<f64> {
    let h_sq = h * h;
    (0u32..)
        .map(|sum| (-(sum as f64 / patch_area) / h_sq).exp())
        .take_while(|&weight| weight >= WEIGHT_THRESHOLD)
        .collect()
}

/// Copy the image into a buffer padded on every side, mirroring edge pixels
/// without repeating them (reflect-101)
fn reflect_pad(img: &GrayImage, border: i64) -> Vec<u8> {
    let (width, height) = (img.width() as i64, img.height() as i64);
    let padded_width = width + 2 * border;
    let padded_height = height + 2 * border;

    let mut padded = Vec::with_capacity((padded_width * padded_height) as usize);
    for py in 0..padded_height {
        let y = reflect_101(py - border, height);
        for px in 0..padded_width {
            let x = reflect_101(px - border, width);
            padded.push(img.get_pixel(x as u32, y as u32).0[0]);
        }
    }
    padded
}

fn reflect_101(mut i: i64, len: i64) -> i64 {
    if len == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * (len - 1) - i;
        } else {
            return i;
        }
    }
}
