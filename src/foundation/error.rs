/// Convenience result type used across plinth.
pub type PlinthResult<T> = Result<T, PlinthError>;

/// Error taxonomy for the studio pipeline and its helpers.
#[derive(thiserror::Error, Debug)]
pub enum PlinthError {
    /// Input has no decodable pixel data or zero dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A configuration value lies outside its declared domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Finalization found no visible pixel to keep.
    #[error("empty composition: {0}")]
    EmptyComposition(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlinthError {
    /// Build a [`PlinthError::InvalidImage`] value.
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Build a [`PlinthError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`PlinthError::EmptyComposition`] value.
    pub fn empty_composition(msg: impl Into<String>) -> Self {
        Self::EmptyComposition(msg.into())
    }

    /// Return `true` for [`PlinthError::EmptyComposition`].
    pub fn is_empty_composition(&self) -> bool {
        matches!(self, Self::EmptyComposition(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
