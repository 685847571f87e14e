use crate::foundation::core::PixelRect;
use crate::foundation::error::PlinthResult;
use crate::raster::image::RasterImage;
use crate::segment::Segmenter;
use crate::studio::finalize::finalize;
use crate::studio::layers::composite_layers;
use crate::studio::params::StudioRequest;

/// Result of one studio pipeline run.
#[derive(Clone, Debug)]
pub struct StudioOutput {
    /// Transparent composite of subject and floor effect.
    pub image: RasterImage,
    /// `image` flattened over the request's backdrop, when one was set.
    pub preview: Option<RasterImage>,
    /// Where the subject image sits inside `image`. May extend past its edges when the subject
    /// carried transparent margin that trimming removed.
    pub subject_rect: PixelRect,
}

/// Run the full pipeline on an already cut-out RGBA subject.
///
/// Builds the style's layers, paints them under the subject on an oversized canvas, then trims
/// and optionally flattens the result. A subject without visible pixels fails with
/// [`crate::PlinthError::EmptyComposition`].
#[tracing::instrument(skip(subject, request), fields(style = request.style.name()))]
pub fn compose(subject: &RasterImage, request: &StudioRequest) -> PlinthResult<StudioOutput> {
    request.validate()?;

    let layers = request.style.build_layers(subject)?;
    let composition = composite_layers(subject, &layers, request.canvas_scale)?;
    let done = finalize(&composition.canvas, request.trim, request.backdrop)?;

    let subject_rect = composition
        .subject_rect
        .translate(-done.crop.x, -done.crop.y);
    tracing::debug!(
        width = done.image.width(),
        height = done.image.height(),
        ?subject_rect,
        "studio composite ready"
    );
    Ok(StudioOutput {
        image: done.image,
        preview: done.preview,
        subject_rect,
    })
}

/// Cut the subject out of `photo` with `segmenter`, then [`compose`] it.
pub fn compose_photo(
    photo: &RasterImage,
    segmenter: &dyn Segmenter,
    request: &StudioRequest,
) -> PlinthResult<StudioOutput> {
    request.validate()?;
    let subject = segmenter.segment(photo)?;
    compose(&subject, request)
}

#[cfg(test)]
#[path = "../../tests/unit/studio/pipeline.rs"]
mod tests;
