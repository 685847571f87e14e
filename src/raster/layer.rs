use crate::foundation::core::{PixelRect, Rgba8};
use crate::foundation::error::{PlinthError, PlinthResult};
use crate::foundation::math::{
    mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::raster::image::{AlphaMask, RasterImage, alpha_bounds_rgba8};

/// Premultiplied RGBA8 buffer used for compositing.
///
/// Shadow, reflection and subject layers, and the oversized canvas they are painted onto, all
/// share this representation so blur and source-over stay exact for opaque pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer.
    pub fn transparent(width: u32, height: u32) -> PlinthResult<Self> {
        let len = rgba_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap premultiplied bytes, checking the length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> PlinthResult<Self> {
        if data.len() != rgba_len(width, height)? {
            return Err(PlinthError::Other(anyhow::anyhow!(
                "layer expects {width}x{height}x4 bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Premultiply a straight-alpha raster.
    pub fn from_raster(img: &RasterImage) -> Self {
        let mut data = img.as_raw().to_vec();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width: img.width(),
            height: img.height(),
            data,
        }
    }

    /// Tint `mask` with a solid `color`; output alpha is `mask * color.a`.
    pub fn from_mask(mask: &AlphaMask, color: Rgba8) -> Self {
        let tint = color.to_premul();
        let mut data = Vec::with_capacity(mask.as_raw().len() * 4);
        for &m in mask.as_raw() {
            let m = u16::from(m);
            data.extend_from_slice(&[
                mul_div255_u8(u16::from(tint[0]), m),
                mul_div255_u8(u16::from(tint[1]), m),
                mul_div255_u8(u16::from(tint[2]), m),
                mul_div255_u8(u16::from(tint[3]), m),
            ]);
        }
        Self {
            width: mask.width(),
            height: mask.height(),
            data,
        }
    }

    /// Convert back to a straight-alpha raster.
    pub fn to_raster(&self) -> PlinthResult<RasterImage> {
        let mut data = self.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        RasterImage::from_raw(self.width, self.height, data)
    }

    /// Premultiplied value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Highest alpha anywhere in the layer.
    pub fn max_alpha(&self) -> u8 {
        self.data
            .chunks_exact(4)
            .map(|px| px[3])
            .max()
            .unwrap_or(0)
    }

    /// Smallest rectangle holding every pixel with `alpha > 0`.
    pub fn alpha_bounds(&self) -> Option<PixelRect> {
        alpha_bounds_rgba8(&self.data, self.width, self.height)
    }

    /// Copy of this layer surrounded by `pad` transparent pixels on every side.
    pub fn padded(&self, pad: u32) -> PlinthResult<Self> {
        if pad == 0 {
            return Ok(self.clone());
        }
        let width = self.width + 2 * pad;
        let height = self.height + 2 * pad;
        let mut out = Self::transparent(width, height)?;
        let row = (self.width as usize) * 4;
        for y in 0..self.height as usize {
            let src = y * row;
            let dst = ((y + pad as usize) * (width as usize) + pad as usize) * 4;
            out.data[dst..dst + row].copy_from_slice(&self.data[src..src + row]);
        }
        Ok(out)
    }
}

pub(crate) fn rgba_len(width: u32, height: u32) -> PlinthResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| PlinthError::Other(anyhow::anyhow!("rgba buffer size overflow")))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/layer.rs"]
mod tests;
