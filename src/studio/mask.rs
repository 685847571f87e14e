//! Mask Builder: synthesizes shadow and reflection layers for a subject.
//!
//! Every builder works on the subject's *visible* bounds (pixels with `alpha > 0`), so
//! transparent padding around a cut-out never widens the shadow or lifts the contact line.
//! Layers are returned in paint order (back to front) with positions relative to the subject
//! image's top-left corner.

use image::imageops::{self, FilterType};

use crate::effects::blur::{blur_layer, blur_mask, kernel_radius};
use crate::foundation::core::PixelRect;
use crate::foundation::error::PlinthResult;
use crate::foundation::math::{mul_div255_u8, unit_to_u8};
use crate::raster::image::{AlphaMask, RasterImage};
use crate::raster::layer::Layer;
use crate::studio::params::{
    Falloff, GRADIENT_SQUASH, ReflectionParameters, SILHOUETTE_SQUASH, ShadowParameters,
    StudioStyle,
};

/// Occlusion layer width relative to the single-layer shadow width.
const OCCLUSION_WIDTH: f32 = 0.9;
/// Occlusion layer height relative to the single-layer shadow height.
const OCCLUSION_HEIGHT: f32 = 0.35;
/// Occlusion blur relative to `blur_radius`.
const OCCLUSION_BLUR: f32 = 0.25;
/// Ambient layer width relative to the single-layer shadow width.
const AMBIENT_WIDTH: f32 = 1.15;
/// Ambient opacity relative to `intensity`.
const AMBIENT_STRENGTH: f32 = 0.55;
/// Leftward shift of the ambient layer, relative to the subject's visible width.
const AMBIENT_BIAS: f32 = 0.03;
/// Fraction of a ground shadow's height that sits above the contact line.
const CONTACT_ANCHOR: f64 = 0.5;

/// What a synthesized layer represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRole {
    /// Large, soft, light shadow around the contact area.
    Ambient,
    /// Small, sharp, dark shadow right at the contact line.
    Occlusion,
    /// Single-layer ground shadow.
    Shadow,
    /// Mirrored copy of the subject's base.
    Reflection,
}

/// A synthesized layer and where its top-left corner goes, in subject coordinates.
#[derive(Clone, Debug)]
pub struct PlacedLayer {
    /// What the layer represents.
    pub role: LayerRole,
    /// Premultiplied pixels, blur padding included.
    pub layer: Layer,
    /// Left edge relative to the subject image.
    pub x: i64,
    /// Top edge relative to the subject image.
    pub y: i64,
}

impl PlacedLayer {
    /// Footprint in subject coordinates.
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.x, self.y, self.layer.width, self.layer.height)
    }
}

impl StudioStyle {
    /// Build the style's layers for `subject`, back to front.
    ///
    /// A subject without visible pixels yields no layers.
    pub fn build_layers(&self, subject: &RasterImage) -> PlinthResult<Vec<PlacedLayer>> {
        let Some(visible) = subject.alpha_bounds() else {
            return Ok(Vec::new());
        };
        let cutout = subject.crop(visible)?;

        let layers = match self {
            Self::Silhouette(p) if p.dual_layer => dual_layer_shadow(&cutout, visible, p)?,
            Self::Silhouette(p) => vec![silhouette_shadow(&cutout, visible, p)?],
            Self::Gradient(p) => vec![gradient_shadow(visible, p)?],
            Self::Reflection(p) => vec![reflection(&cutout, visible, p)?],
        };

        for l in &layers {
            tracing::debug!(
                style = self.name(),
                role = ?l.role,
                x = l.x,
                y = l.y,
                width = l.layer.width,
                height = l.layer.height,
                "built layer"
            );
        }
        Ok(layers)
    }
}

/// Subject alpha scaled by a flat `intensity`, same size as `subject`.
///
/// Fully opaque pixels all map to the same level, so an opaque subject yields a uniform mask.
pub fn silhouette_mask(subject: &RasterImage, intensity: f32) -> PlinthResult<AlphaMask> {
    let level = u16::from(unit_to_u8(intensity));
    let (w, h) = subject.dimensions();
    AlphaMask::from_fn(w, h, |x, y| {
        mul_div255_u8(u16::from(subject.pixel(x, y)[3]), level)
    })
}

/// Anisotropic resize of `mask` to `width x height` (both clamped to at least 1).
pub fn squash_mask(mask: &AlphaMask, width: u32, height: u32) -> PlinthResult<AlphaMask> {
    let resized = imageops::resize(
        mask.as_gray8(),
        width.max(1),
        height.max(1),
        FilterType::Triangle,
    );
    AlphaMask::new(resized)
}

/// Elliptical radial falloff filling a `width x height` rectangle.
///
/// With `d` the normalized elliptical distance of a pixel center from the rectangle center,
/// the level is `intensity * 255 * (1 - d^2)` inside the ellipse and `0` outside.
pub fn ellipse_falloff_mask(width: u32, height: u32, intensity: f32) -> PlinthResult<AlphaMask> {
    let peak = f64::from(intensity.clamp(0.0, 1.0)) * 255.0;
    let rx = f64::from(width.max(1)) / 2.0;
    let ry = f64::from(height.max(1)) / 2.0;
    AlphaMask::from_fn(width.max(1), height.max(1), |x, y| {
        let dx = (f64::from(x) + 0.5 - rx) / rx;
        let dy = (f64::from(y) + 0.5 - ry) / ry;
        let d2 = dx * dx + dy * dy;
        if d2 >= 1.0 {
            0
        } else {
            (peak * (1.0 - d2)).round() as u8
        }
    })
}

/// Per-row reflection levels: `opacity * 255 * (1 - y / (height - 1))^p`.
pub fn reflection_gradient(height: u32, opacity: f32, falloff: Falloff) -> Vec<u8> {
    let last = f64::from(height.saturating_sub(1).max(1));
    let peak = f64::from(opacity.clamp(0.0, 1.0)) * 255.0;
    (0..height)
        .map(|y| {
            let t = (f64::from(y) / last).min(1.0);
            (peak * (1.0 - t).powi(falloff.exponent())).round() as u8
        })
        .collect()
}

/// Mirrored, faded slice of the subject's base, before any blur.
///
/// The cut-out is flipped vertically and its top `length_fraction` of rows kept, so row 0 is
/// the subject's bottom row. Each row's alpha is multiplied by [`reflection_gradient`].
pub fn reflection_slice(
    cutout: &RasterImage,
    params: &ReflectionParameters,
) -> PlinthResult<RasterImage> {
    let (w, h) = cutout.dimensions();
    let rows = ((f64::from(h) * f64::from(params.length_fraction)).round() as u32).clamp(1, h);

    let flipped = imageops::flip_vertical(cutout.as_rgba8());
    let mut slice = imageops::crop_imm(&flipped, 0, 0, w, rows).to_image();
    let levels = reflection_gradient(rows, params.opacity, params.falloff);
    for (y, row) in slice.rows_mut().enumerate() {
        let level = u16::from(levels[y]);
        for px in row {
            px.0[3] = mul_div255_u8(u16::from(px.0[3]), level);
        }
    }
    RasterImage::new(slice)
}

fn shadow_size(visible: PixelRect, spread: f32, squash: f32) -> (f32, f32) {
    (
        visible.width as f32 * spread,
        visible.height as f32 * squash,
    )
}

fn ground_layer(
    role: LayerRole,
    mask: &AlphaMask,
    sigma: f32,
    visible: PixelRect,
    params: &ShadowParameters,
    x_bias: i64,
) -> PlinthResult<PlacedLayer> {
    let blurred = blur_mask(mask, sigma)?;
    let layer = Layer::from_mask(&blurred, params.color);
    let center_x = visible.x as f64 + f64::from(visible.width) / 2.0;
    let contact_y = (visible.bottom() + i64::from(params.vertical_offset)) as f64;
    Ok(PlacedLayer {
        role,
        x: (center_x - f64::from(layer.width) / 2.0).round() as i64 + x_bias,
        y: (contact_y - f64::from(layer.height) * CONTACT_ANCHOR).round() as i64,
        layer,
    })
}

fn silhouette_shadow(
    cutout: &RasterImage,
    visible: PixelRect,
    params: &ShadowParameters,
) -> PlinthResult<PlacedLayer> {
    let squash = params.squash.unwrap_or(SILHOUETTE_SQUASH);
    let (w, h) = shadow_size(visible, params.spread, squash);
    let mask = squash_mask(
        &silhouette_mask(cutout, params.intensity)?,
        w.round() as u32,
        h.round() as u32,
    )?;
    ground_layer(
        LayerRole::Shadow,
        &mask,
        params.blur_radius,
        visible,
        params,
        0,
    )
}

fn dual_layer_shadow(
    cutout: &RasterImage,
    visible: PixelRect,
    params: &ShadowParameters,
) -> PlinthResult<Vec<PlacedLayer>> {
    let squash = params.squash.unwrap_or(SILHOUETTE_SQUASH);
    let (w, h) = shadow_size(visible, params.spread, squash);

    let ambient_mask = squash_mask(
        &silhouette_mask(cutout, params.intensity * AMBIENT_STRENGTH)?,
        (w * AMBIENT_WIDTH).round() as u32,
        h.round() as u32,
    )?;
    let bias = -((visible.width as f32 * AMBIENT_BIAS).round() as i64);
    let ambient = ground_layer(
        LayerRole::Ambient,
        &ambient_mask,
        params.blur_radius,
        visible,
        params,
        bias,
    )?;

    let occlusion_mask = squash_mask(
        &silhouette_mask(cutout, params.intensity)?,
        (w * OCCLUSION_WIDTH).round() as u32,
        (h * OCCLUSION_HEIGHT).round() as u32,
    )?;
    let occlusion = ground_layer(
        LayerRole::Occlusion,
        &occlusion_mask,
        params.blur_radius * OCCLUSION_BLUR,
        visible,
        params,
        0,
    )?;

    Ok(vec![ambient, occlusion])
}

fn gradient_shadow(visible: PixelRect, params: &ShadowParameters) -> PlinthResult<PlacedLayer> {
    let squash = params.squash.unwrap_or(GRADIENT_SQUASH);
    let (w, h) = shadow_size(visible, params.spread, squash);
    let mask = ellipse_falloff_mask(w.round() as u32, h.round() as u32, params.intensity)?;
    ground_layer(
        LayerRole::Shadow,
        &mask,
        params.blur_radius / 2.0,
        visible,
        params,
        0,
    )
}

fn reflection(
    cutout: &RasterImage,
    visible: PixelRect,
    params: &ReflectionParameters,
) -> PlinthResult<PlacedLayer> {
    let slice = reflection_slice(cutout, params)?;
    let layer = blur_layer(&Layer::from_raster(&slice), params.blur_radius)?;
    let pad = i64::from(kernel_radius(params.blur_radius));
    Ok(PlacedLayer {
        role: LayerRole::Reflection,
        x: visible.x - pad,
        y: visible.bottom() + i64::from(params.gap) - pad,
        layer,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/studio/mask.rs"]
mod tests;
