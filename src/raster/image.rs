use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

use crate::foundation::core::{PixelRect, Rgba8};
use crate::foundation::error::{PlinthError, PlinthResult};

/// Straight-alpha RGBA8 raster with non-zero dimensions.
///
/// Every pipeline stage hands out a fresh `RasterImage`; nothing aliases a caller's buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    /// Wrap an RGBA buffer, rejecting zero-sized images.
    pub fn new(pixels: RgbaImage) -> PlinthResult<Self> {
        let (w, h) = pixels.dimensions();
        if w == 0 || h == 0 {
            return Err(PlinthError::invalid_image(format!(
                "image must have non-zero dimensions (got {w}x{h})"
            )));
        }
        Ok(Self { pixels })
    }

    /// Promote any decoded image to RGBA8. Opaque color types get alpha 255.
    pub fn from_dynamic(img: DynamicImage) -> PlinthResult<Self> {
        Self::new(img.into_rgba8())
    }

    /// Build from tightly packed straight RGBA8 bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> PlinthResult<Self> {
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            PlinthError::invalid_image(format!(
                "pixel buffer does not match {width}x{height} rgba8"
            ))
        })?;
        Self::new(pixels)
    }

    /// Solid-color image.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> PlinthResult<Self> {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(color.to_array())))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Straight RGBA8 value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Borrow the underlying buffer.
    pub fn as_rgba8(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Raw straight RGBA8 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Give up ownership of the buffer.
    pub fn into_rgba8(self) -> RgbaImage {
        self.pixels
    }

    /// Smallest rectangle holding every pixel with `alpha > 0`.
    pub fn alpha_bounds(&self) -> Option<PixelRect> {
        alpha_bounds_rgba8(self.as_raw(), self.width(), self.height())
    }

    /// Copy out a sub-rectangle, which must lie inside the image.
    pub fn crop(&self, rect: PixelRect) -> PlinthResult<Self> {
        let inside = rect.x >= 0
            && rect.y >= 0
            && rect.right() <= i64::from(self.width())
            && rect.bottom() <= i64::from(self.height());
        if !inside || rect.is_empty() {
            return Err(PlinthError::Other(anyhow::anyhow!(
                "crop rect {rect:?} outside {}x{} image",
                self.width(),
                self.height()
            )));
        }
        let view = image::imageops::crop_imm(
            &self.pixels,
            rect.x as u32,
            rect.y as u32,
            rect.width,
            rect.height,
        );
        Self::new(view.to_image())
    }
}

/// Single-channel 8-bit coverage mask describing a shadow or reflection shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    levels: GrayImage,
}

impl AlphaMask {
    /// Wrap a grayscale buffer, rejecting zero-sized masks.
    pub fn new(levels: GrayImage) -> PlinthResult<Self> {
        let (w, h) = levels.dimensions();
        if w == 0 || h == 0 {
            return Err(PlinthError::invalid_image(format!(
                "mask must have non-zero dimensions (got {w}x{h})"
            )));
        }
        Ok(Self { levels })
    }

    /// Mask built from `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> u8,
    ) -> PlinthResult<Self> {
        Self::new(GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)])))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.levels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.levels.height()
    }

    /// Coverage at `(x, y)`. Panics when out of bounds.
    pub fn level(&self, x: u32, y: u32) -> u8 {
        self.levels.get_pixel(x, y).0[0]
    }

    /// Highest coverage anywhere in the mask.
    pub fn max_level(&self) -> u8 {
        self.levels.as_raw().iter().copied().max().unwrap_or(0)
    }

    /// Borrow the underlying buffer.
    pub fn as_gray8(&self) -> &GrayImage {
        &self.levels
    }

    /// Raw coverage bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.levels.as_raw()
    }
}

pub(crate) fn alpha_bounds_rgba8(rgba: &[u8], width: u32, height: u32) -> Option<PixelRect> {
    let w = width as usize;
    if w == 0 {
        return None;
    }
    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    let mut found = false;

    for (row_idx, row) in rgba.chunks_exact(w * 4).take(height as usize).enumerate() {
        let mut cols = row.chunks_exact(4).enumerate().filter(|(_, px)| px[3] != 0);
        let Some((first, _)) = cols.next() else {
            continue;
        };
        let last = cols.last().map_or(first, |(x, _)| x);
        found = true;
        min_x = min_x.min(first);
        max_x = max_x.max(last);
        min_y = min_y.min(row_idx);
        max_y = row_idx;
    }

    found.then(|| {
        PixelRect::new(
            min_x as i64,
            min_y as i64,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        )
    })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
