//! Subject segmentation: turning a photo into an RGBA cut-out.
//!
//! The studio pipeline only needs *some* function from photo to cut-out. Production setups plug
//! in a matting model behind [`Segmenter`]; the implementations here cover inputs that already
//! carry alpha and photos shot against a plain backdrop.

use crate::foundation::error::{PlinthError, PlinthResult};
use crate::raster::image::RasterImage;

/// Turns an arbitrary photo into a cut-out whose background is transparent.
pub trait Segmenter: Send + Sync {
    /// Return a fresh RGBA image the same size as `photo`.
    fn segment(&self, photo: &RasterImage) -> PlinthResult<RasterImage>;
}

impl<F> Segmenter for F
where
    F: Fn(&RasterImage) -> PlinthResult<RasterImage> + Send + Sync,
{
    fn segment(&self, photo: &RasterImage) -> PlinthResult<RasterImage> {
        self(photo)
    }
}

/// Trusts the input's own alpha channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepAlpha;

impl Segmenter for KeepAlpha {
    fn segment(&self, photo: &RasterImage) -> PlinthResult<RasterImage> {
        Ok(photo.clone())
    }
}

/// Keys out a plain backdrop whose color is estimated from the image border.
///
/// Color distance is Euclidean in RGB, normalized to `[0, 1]`. Pixels closer than `tolerance`
/// to the backdrop become transparent, pixels further than `tolerance + softness` keep their
/// alpha, and the band in between ramps linearly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderKeySegmenter {
    /// Distance below which a pixel counts as backdrop.
    pub tolerance: f32,
    /// Width of the linear ramp above `tolerance`.
    pub softness: f32,
}

impl Default for BorderKeySegmenter {
    fn default() -> Self {
        Self {
            tolerance: 0.12,
            softness: 0.08,
        }
    }
}

impl BorderKeySegmenter {
    /// Segmenter with the given tolerance and the default softness.
    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Per-channel median of the visible border pixels, or `None` when the border is empty.
    pub fn estimate_backdrop(&self, photo: &RasterImage) -> Option<[u8; 3]> {
        let (w, h) = photo.dimensions();
        let mut channels: [Vec<u8>; 3] = Default::default();
        for (x, y, px) in photo.as_rgba8().enumerate_pixels() {
            let on_border = x == 0 || y == 0 || x + 1 == w || y + 1 == h;
            if on_border && px.0[3] > 0 {
                for (c, v) in channels.iter_mut().zip(px.0) {
                    c.push(v);
                }
            }
        }
        if channels[0].is_empty() {
            return None;
        }
        let mut out = [0u8; 3];
        for (o, c) in out.iter_mut().zip(channels.iter_mut()) {
            c.sort_unstable();
            *o = c[c.len() / 2];
        }
        Some(out)
    }

    fn validate(&self) -> PlinthResult<()> {
        for (name, v) in [("tolerance", self.tolerance), ("softness", self.softness)] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(PlinthError::invalid_parameter(format!(
                    "segmenter {name} must be in [0, 1] (got {v})"
                )));
            }
        }
        Ok(())
    }

    fn coverage(&self, distance: f64) -> f64 {
        let tol = f64::from(self.tolerance);
        let soft = f64::from(self.softness);
        if distance <= tol {
            0.0
        } else if soft <= 0.0 || distance >= tol + soft {
            1.0
        } else {
            (distance - tol) / soft
        }
    }
}

impl Segmenter for BorderKeySegmenter {
    fn segment(&self, photo: &RasterImage) -> PlinthResult<RasterImage> {
        self.validate()?;
        let Some(key) = self.estimate_backdrop(photo) else {
            return Ok(photo.clone());
        };
        tracing::debug!(?key, tolerance = self.tolerance, "keying border backdrop");

        let norm = (3.0f64).sqrt() * 255.0;
        let mut out = photo.as_rgba8().clone();
        for px in out.pixels_mut() {
            let d2: f64 = px.0[..3]
                .iter()
                .zip(key)
                .map(|(&c, k)| (f64::from(c) - f64::from(k)).powi(2))
                .sum();
            let cov = self.coverage(d2.sqrt() / norm);
            px.0[3] = (f64::from(px.0[3]) * cov).round() as u8;
        }
        RasterImage::new(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/mod.rs"]
mod tests;
