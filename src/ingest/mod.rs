//! Sample ingestion: tabular decoding, sanitization, and the year-indexed [`crate::SampleStore`].

pub(crate) mod provider;
pub(crate) mod sample;
pub(crate) mod store;
pub(crate) mod table;
