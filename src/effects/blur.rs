use image::GrayImage;

use crate::foundation::error::{PlinthError, PlinthResult};
use crate::raster::image::AlphaMask;
use crate::raster::layer::Layer;

/// Largest accepted Gaussian sigma, in pixels.
pub const MAX_BLUR_SIGMA: f32 = 256.0;

/// Half-width of the sampled kernel for `sigma` (three standard deviations).
pub fn kernel_radius(sigma: f32) -> u32 {
    if sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Gaussian-blur a coverage mask.
///
/// `sigma == 0` returns an identical copy. Otherwise the mask is first grown by
/// [`kernel_radius`] transparent pixels on every side so the falloff is never clipped, which
/// means the output is larger than the input.
pub fn blur_mask(mask: &AlphaMask, sigma: f32) -> PlinthResult<AlphaMask> {
    check_sigma(sigma)?;
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return Ok(mask.clone());
    }

    let (w, h) = (mask.width() + 2 * radius, mask.height() + 2 * radius);
    let mut padded = GrayImage::new(w, h);
    image::imageops::replace(
        &mut padded,
        mask.as_gray8(),
        i64::from(radius),
        i64::from(radius),
    );

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let out = blur_q16::<1>(padded.as_raw(), w, h, &kernel)?;
    let levels = GrayImage::from_raw(w, h, out)
        .ok_or_else(|| PlinthError::Other(anyhow::anyhow!("blurred mask size mismatch")))?;
    AlphaMask::new(levels)
}

/// Gaussian-blur a premultiplied layer, growing it by [`kernel_radius`] on every side.
pub fn blur_layer(layer: &Layer, sigma: f32) -> PlinthResult<Layer> {
    check_sigma(sigma)?;
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return Ok(layer.clone());
    }

    let padded = layer.padded(radius)?;
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let out = blur_q16::<4>(&padded.data, padded.width, padded.height, &kernel)?;
    Layer::from_premul(padded.width, padded.height, out)
}

fn check_sigma(sigma: f32) -> PlinthResult<()> {
    if !sigma.is_finite() || !(0.0..=MAX_BLUR_SIGMA).contains(&sigma) {
        return Err(PlinthError::invalid_parameter(format!(
            "blur radius must be finite and within [0, {MAX_BLUR_SIGMA}] (got {sigma})"
        )));
    }
    Ok(())
}

fn blur_q16<const C: usize>(
    src: &[u8],
    width: u32,
    height: u32,
    kernel: &[u32],
) -> PlinthResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(C))
        .ok_or_else(|| PlinthError::Other(anyhow::anyhow!("blur buffer size overflow")))?;
    if src.len() != expected_len {
        return Err(PlinthError::Other(anyhow::anyhow!(
            "blur expects src matching width*height*{C}"
        )));
    }

    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    horizontal_pass::<C>(src, &mut tmp, width, height, kernel);
    vertical_pass::<C>(&tmp, &mut out, width, height, kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PlinthResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PlinthError::invalid_parameter("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Fold rounding drift into the center tap so the kernel sums to exactly 1.0 in q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass<const C: usize>(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; C];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * C;
                for c in 0..C {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * C;
            for c in 0..C {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass<const C: usize>(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; C];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * C;
                for c in 0..C {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * C;
            for c in 0..C {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
