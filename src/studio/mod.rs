//! Studio pipeline: mask building, layer compositing and canvas finalization.

pub(crate) mod finalize;
pub(crate) mod layers;
pub(crate) mod mask;
pub(crate) mod params;
pub(crate) mod pipeline;
