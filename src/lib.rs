//! Plinth turns cut-out product photos into studio shots.
//!
//! A subject with a transparent background gets a synthesized floor effect painted underneath
//! it: a silhouette-shaped contact shadow, an analytic elliptical shadow, or a fading mirror
//! reflection. The result is trimmed to its visible pixels and returned as a transparent image,
//! with an optional preview flattened over a solid backdrop.
//!
//! - Describe the look with a [`StudioRequest`] (built in code or loaded from JSON)
//! - Run [`compose`] on an RGBA subject, or [`compose_photo`] with a [`Segmenter`]
//! - Use [`decode_image`] / [`save_png`] at the file boundary
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod effects;
pub(crate) mod raster;
/// Photo to cut-out collaborators.
pub mod segment;
pub(crate) mod studio;

pub use crate::foundation::core::{PixelRect, Rgba8};
pub use crate::foundation::error::{PlinthError, PlinthResult};

pub use crate::assets::decode::{decode_image, load_image};
pub use crate::assets::encode::{encode_png, save_png};
pub use crate::effects::blur::{MAX_BLUR_SIGMA, blur_layer, blur_mask, kernel_radius};
pub use crate::raster::image::{AlphaMask, RasterImage};
pub use crate::raster::layer::Layer;
pub use crate::segment::{BorderKeySegmenter, KeepAlpha, Segmenter};
pub use crate::studio::finalize::{Finalized, finalize, flatten, trim};
pub use crate::studio::layers::{CanvasComposition, composite_layers};
pub use crate::studio::mask::{
    LayerRole, PlacedLayer, ellipse_falloff_mask, reflection_gradient, reflection_slice,
    silhouette_mask, squash_mask,
};
pub use crate::studio::params::{
    Falloff, GRADIENT_SQUASH, MAX_REFLECTION_GAP, MAX_SPREAD, MAX_VERTICAL_OFFSET,
    ReflectionParameters, SILHOUETTE_SQUASH, ShadowParameters, StudioRequest, StudioStyle,
};
pub use crate::studio::pipeline::{StudioOutput, compose, compose_photo};
