//! Color statistics of painting images, producing sample rows.

pub(crate) mod colors;
