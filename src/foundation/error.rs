/// Convenience result type used across chroma-atlas.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Top-level error taxonomy for structural failures.
///
/// Data-sparsity and numeric problems inside a frame never surface here; they degrade to the
/// sentinel color instead (see [`crate::ResolutionFailure`]).
#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Sample input could not be read or decoded.
    #[error("ingest error: {0}")]
    Ingest(String),

    /// Region boundary data could not be loaded.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Errors while building or rasterizing a map frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing frames or assembling an animation.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AtlasError {
    /// Build an [`AtlasError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AtlasError::Ingest`] value.
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }

    /// Build an [`AtlasError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build an [`AtlasError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`AtlasError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`AtlasError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
