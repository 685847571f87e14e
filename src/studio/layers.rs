//! Layer Compositor: lays synthesized layers and the subject onto one oversized canvas.

use crate::effects::composite::paste_over;
use crate::foundation::core::PixelRect;
use crate::foundation::error::{PlinthError, PlinthResult};
use crate::raster::image::RasterImage;
use crate::raster::layer::Layer;
use crate::studio::mask::PlacedLayer;

/// Slack added to each canvas dimension so rounding never clips a layer edge.
const CANVAS_SLACK: u32 = 2;

/// Result of painting every layer onto the canvas.
#[derive(Clone, Debug)]
pub struct CanvasComposition {
    /// Premultiplied canvas, transparent wherever nothing was painted.
    pub canvas: Layer,
    /// Where the subject image landed on the canvas.
    pub subject_rect: PixelRect,
}

/// Paint `layers` back to front, then `subject` on top, onto a fresh transparent canvas.
///
/// The subject's visible bounds are centered horizontally. The canvas is at least
/// `canvas_scale` times the subject in each dimension and grows further when a layer would
/// otherwise be clipped.
pub fn composite_layers(
    subject: &RasterImage,
    layers: &[PlacedLayer],
    canvas_scale: f32,
) -> PlinthResult<CanvasComposition> {
    if !canvas_scale.is_finite() || canvas_scale < 1.0 {
        return Err(PlinthError::invalid_parameter(format!(
            "canvas_scale must be >= 1 (got {canvas_scale})"
        )));
    }

    let (sw, sh) = subject.dimensions();
    let subject_rect = PixelRect::new(0, 0, sw, sh);
    let visible = subject.alpha_bounds().unwrap_or(subject_rect);
    let extent = layers
        .iter()
        .fold(subject_rect, |acc, l| acc.union(l.rect()));

    let center_x = visible.x as f64 + f64::from(visible.width) / 2.0;
    let half_w = (center_x - extent.x as f64).max(extent.right() as f64 - center_x);
    let min_w = (f64::from(sw) * f64::from(canvas_scale)).ceil() as u32;
    let min_h = (f64::from(sh) * f64::from(canvas_scale)).ceil() as u32;
    let width = min_w.max((2.0 * half_w).ceil() as u32 + CANVAS_SLACK);
    let height = min_h.max(extent.height + CANVAS_SLACK);

    let dx = (f64::from(width) / 2.0 - center_x).round() as i64;
    let dy = i64::from((height - extent.height) / 2) - extent.y;

    let mut canvas = Layer::transparent(width, height)?;
    for l in layers {
        paste_over(&mut canvas, &l.layer, l.x + dx, l.y + dy);
    }
    paste_over(&mut canvas, &Layer::from_raster(subject), dx, dy);

    let subject_rect = subject_rect.translate(dx, dy);
    tracing::debug!(width, height, ?subject_rect, layers = layers.len(), "composited canvas");
    Ok(CanvasComposition {
        canvas,
        subject_rect,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/studio/layers.rs"]
mod tests;
