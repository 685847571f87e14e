//! Canvas Finalizer: trims the composited canvas and derives an optional flattened preview.

use crate::effects::composite::over_in_place;
use crate::foundation::core::{PixelRect, Rgba8};
use crate::foundation::error::{PlinthError, PlinthResult};
use crate::raster::image::RasterImage;
use crate::raster::layer::Layer;

/// Output of [`finalize`].
#[derive(Clone, Debug)]
pub struct Finalized {
    /// Transparent result, always present.
    pub image: RasterImage,
    /// `image` flattened over the backdrop, when one was requested.
    pub preview: Option<RasterImage>,
    /// Region of the canvas that `image` covers.
    pub crop: PixelRect,
}

/// Crop `img` to the smallest rectangle holding every pixel with `alpha > 0`.
///
/// An image that is already tight comes back unchanged.
pub fn trim(img: &RasterImage) -> PlinthResult<RasterImage> {
    let bounds = img
        .alpha_bounds()
        .ok_or_else(|| PlinthError::empty_composition("nothing visible to trim"))?;
    if bounds == PixelRect::new(0, 0, img.width(), img.height()) {
        return Ok(img.clone());
    }
    img.crop(bounds)
}

/// Composite `img` over an opaque `backdrop` of the same size.
///
/// The backdrop's own alpha is ignored so the preview is always fully opaque.
pub fn flatten(img: &RasterImage, backdrop: Rgba8) -> PlinthResult<RasterImage> {
    let opaque = Rgba8 { a: 255, ..backdrop };
    let (w, h) = img.dimensions();
    let mut base = Layer::from_raster(&RasterImage::filled(w, h, opaque)?);
    over_in_place(&mut base.data, &Layer::from_raster(img).data)?;
    base.to_raster()
}

/// Turn the premultiplied canvas into the final transparent image and optional preview.
///
/// Fails with [`PlinthError::EmptyComposition`] when nothing on the canvas is visible, even
/// when `trim_canvas` is off.
pub fn finalize(
    canvas: &Layer,
    trim_canvas: bool,
    backdrop: Option<Rgba8>,
) -> PlinthResult<Finalized> {
    let bounds = canvas
        .alpha_bounds()
        .ok_or_else(|| PlinthError::empty_composition("canvas has no visible pixels"))?;
    let full = canvas.to_raster()?;

    let (image, crop) = if trim_canvas {
        (trim(&full)?, bounds)
    } else {
        (full, PixelRect::new(0, 0, canvas.width, canvas.height))
    };
    tracing::debug!(?crop, trimmed = trim_canvas, "finalized canvas");

    let preview = backdrop.map(|c| flatten(&image, c)).transpose()?;
    Ok(Finalized {
        image,
        preview,
        crop,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/studio/finalize.rs"]
mod tests;
