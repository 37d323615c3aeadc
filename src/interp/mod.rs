//! The interpolation engine: inverse-distance weights, per-region color resolution, per-year
//! frames and the year sequence.

pub(crate) mod frame;
pub(crate) mod resolve;
pub(crate) mod sequence;
pub(crate) mod weight;
