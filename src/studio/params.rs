use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::effects::blur::MAX_BLUR_SIGMA;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{PlinthError, PlinthResult};

/// Default vertical foreshortening for silhouette-derived shadows.
pub const SILHOUETTE_SQUASH: f32 = 0.1;
/// Default vertical foreshortening for gradient-falloff shadows.
pub const GRADIENT_SQUASH: f32 = 0.22;
/// Largest accepted horizontal spread factor.
pub const MAX_SPREAD: f32 = 10.0;
/// Largest accepted contact-line shift, in pixels either way.
pub const MAX_VERTICAL_OFFSET: i32 = 512;
/// Largest accepted gap between subject and reflection, in pixels.
pub const MAX_REFLECTION_GAP: u32 = 512;

/// Ground-shadow options shared by the silhouette and gradient styles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowParameters {
    /// Shadow opacity in `[0, 1]`.
    pub intensity: f32,
    /// Shadow width relative to the subject's visible width.
    pub spread: f32,
    /// Gaussian sigma in pixels; `0` disables blur.
    pub blur_radius: f32,
    /// Signed pixel shift of the contact line (positive moves the shadow down), at most
    /// [`MAX_VERTICAL_OFFSET`] either way.
    pub vertical_offset: i32,
    /// Shadow height relative to the subject's visible height. `None` uses the style default.
    pub squash: Option<f32>,
    /// Shadow tint.
    pub color: Rgba8,
    /// Silhouette style only: paint a sharp occlusion layer over a soft ambient one.
    pub dual_layer: bool,
}

impl Default for ShadowParameters {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            spread: 1.0,
            blur_radius: 12.0,
            vertical_offset: 0,
            squash: None,
            color: Rgba8::BLACK,
            dual_layer: true,
        }
    }
}

impl ShadowParameters {
    /// Set `intensity` from a `0..=255` level.
    pub fn with_intensity_u8(mut self, level: u8) -> Self {
        self.intensity = f32::from(level) / 255.0;
        self
    }

    fn validate(&self, style: &str) -> PlinthResult<()> {
        check_unit(style, "intensity", self.intensity)?;
        check_range(style, "spread", self.spread, f32::MIN_POSITIVE, MAX_SPREAD)?;
        check_range(style, "blur_radius", self.blur_radius, 0.0, MAX_BLUR_SIGMA)?;
        if let Some(squash) = self.squash {
            check_range(style, "squash", squash, f32::MIN_POSITIVE, 1.0)?;
        }
        check_pixels(
            style,
            "vertical_offset",
            i64::from(self.vertical_offset),
            -i64::from(MAX_VERTICAL_OFFSET),
            i64::from(MAX_VERTICAL_OFFSET),
        )
    }
}

/// Reflection gradient shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    /// `alpha = opacity * (1 - t)`.
    #[default]
    Linear,
    /// `alpha = opacity * (1 - t)^2`, fading faster away from the contact line.
    Quadratic,
}

impl Falloff {
    /// Exponent applied to `(1 - t)`.
    pub fn exponent(self) -> i32 {
        match self {
            Self::Linear => 1,
            Self::Quadratic => 2,
        }
    }
}

/// Mirror reflection options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionParameters {
    /// Opacity at the contact line, in `[0, 1]`.
    pub opacity: f32,
    /// Fraction of the subject's visible height that is mirrored, in `(0, 1]`.
    pub length_fraction: f32,
    /// Gaussian sigma in pixels for a frosted floor; `0` keeps a polished mirror.
    pub blur_radius: f32,
    /// Gradient shape along the reflection.
    pub falloff: Falloff,
    /// Pixels between the subject's base and the reflection, at most [`MAX_REFLECTION_GAP`].
    pub gap: u32,
}

impl Default for ReflectionParameters {
    fn default() -> Self {
        Self {
            opacity: 0.35,
            length_fraction: 0.4,
            blur_radius: 0.0,
            falloff: Falloff::Linear,
            gap: 0,
        }
    }
}

impl ReflectionParameters {
    /// Set `opacity` from a `0..=255` level.
    pub fn with_opacity_u8(mut self, level: u8) -> Self {
        self.opacity = f32::from(level) / 255.0;
        self
    }

    fn validate(&self) -> PlinthResult<()> {
        check_unit("reflection", "opacity", self.opacity)?;
        check_range(
            "reflection",
            "length_fraction",
            self.length_fraction,
            f32::MIN_POSITIVE,
            1.0,
        )?;
        check_range(
            "reflection",
            "blur_radius",
            self.blur_radius,
            0.0,
            MAX_BLUR_SIGMA,
        )?;
        check_pixels(
            "reflection",
            "gap",
            i64::from(self.gap),
            0,
            i64::from(MAX_REFLECTION_GAP),
        )
    }
}

/// Which shape family synthesizes the floor effect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StudioStyle {
    /// Shadow shaped like the subject's own silhouette, flattened onto the floor.
    Silhouette(ShadowParameters),
    /// Analytic elliptical shadow with a radial falloff.
    Gradient(ShadowParameters),
    /// Mirrored, fading copy of the subject's base.
    Reflection(ReflectionParameters),
}

impl Default for StudioStyle {
    fn default() -> Self {
        Self::Silhouette(ShadowParameters::default())
    }
}

impl StudioStyle {
    /// Short lowercase name, matching the serialized `mode` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Silhouette(_) => "silhouette",
            Self::Gradient(_) => "gradient",
            Self::Reflection(_) => "reflection",
        }
    }
}

/// Everything one pipeline run needs, built once per request and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioRequest {
    /// Shadow or reflection style.
    pub style: StudioStyle,
    /// Minimum canvas size relative to the subject, in `[1, 4]`.
    pub canvas_scale: f32,
    /// Crop the result to its visible pixels.
    pub trim: bool,
    /// When set, also produce a preview flattened over this color.
    pub backdrop: Option<Rgba8>,
}

impl Default for StudioRequest {
    fn default() -> Self {
        Self {
            style: StudioStyle::default(),
            canvas_scale: 1.5,
            trim: true,
            backdrop: None,
        }
    }
}

impl StudioRequest {
    /// Request with `style` and default finishing options.
    pub fn new(style: StudioStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Parse a JSON request document.
    pub fn from_json_str(json: &str) -> PlinthResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PlinthError::invalid_parameter(format!("parse studio request: {e}")))
    }

    /// Read and parse a JSON request file.
    pub fn from_path(path: &Path) -> PlinthResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read studio request '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check every option against its declared domain.
    pub fn validate(&self) -> PlinthResult<()> {
        match &self.style {
            StudioStyle::Silhouette(p) => p.validate("silhouette")?,
            StudioStyle::Gradient(p) => p.validate("gradient")?,
            StudioStyle::Reflection(p) => p.validate()?,
        }
        check_range("canvas", "canvas_scale", self.canvas_scale, 1.0, 4.0)
    }
}

fn check_unit(scope: &str, name: &str, v: f32) -> PlinthResult<()> {
    check_range(scope, name, v, 0.0, 1.0)
}

fn check_range(scope: &str, name: &str, v: f32, min: f32, max: f32) -> PlinthResult<()> {
    if !v.is_finite() || v < min || v > max {
        return Err(PlinthError::invalid_parameter(format!(
            "{scope}.{name} must be within [{min}, {max}] (got {v})"
        )));
    }
    Ok(())
}

fn check_pixels(scope: &str, name: &str, v: i64, min: i64, max: i64) -> PlinthResult<()> {
    if !(min..=max).contains(&v) {
        return Err(PlinthError::invalid_parameter(format!(
            "{scope}.{name} must be within [{min}, {max}] px (got {v})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/studio/params.rs"]
mod tests;
