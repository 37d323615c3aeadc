//! Frame consumers: PNG directory, JSON export, animation assembly.

use std::path::Path;

use crate::foundation::error::AtlasResult;

pub(crate) mod ffmpeg;
pub(crate) mod gif;
pub(crate) mod png;
pub(crate) mod sink;

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> AtlasResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
