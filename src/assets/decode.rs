use std::path::Path;

use crate::foundation::error::{PlinthError, PlinthResult};
use crate::raster::image::RasterImage;

/// Decode an encoded image (PNG, JPEG, ...) into a straight-alpha RGBA raster.
///
/// Opaque color types are promoted with alpha 255.
pub fn decode_image(bytes: &[u8]) -> PlinthResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PlinthError::invalid_image(format!("decode image from memory: {e}")))?;
    RasterImage::from_dynamic(dyn_img)
}

/// Read and decode the image at `path`.
pub fn load_image(path: impl AsRef<Path>) -> PlinthResult<RasterImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| PlinthError::invalid_image(format!("read '{}': {e}", path.display())))?;
    let img = decode_image(&bytes)?;
    tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), "loaded image");
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
