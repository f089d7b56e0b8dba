//! On-disk layout of generated assets
//!
//! ```text
//! <root>/characters/<name>.png
//! <root>/characters/<name>_metadata.json
//! <root>/backgrounds/<name>.png
//! <root>/characters/sprites/<name>_walk.png
//! <root>/characters/sprites/<name>_walk.json
//! ```

use crate::catalog::{ArtEntry, AssetCategory};
use artgen_core::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir_for(&self, category: AssetCategory) -> PathBuf {
        self.root.join(category.to_string())
    }

    pub fn sprites_dir(&self) -> PathBuf {
        self.dir_for(AssetCategory::Characters).join("sprites")
    }

    /// Create the category directories
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(self.dir_for(AssetCategory::Characters))?;
        std::fs::create_dir_all(self.dir_for(AssetCategory::Backgrounds))?;
        Ok(())
    }

    pub fn image_path(&self, entry: &ArtEntry) -> PathBuf {
        self.dir_for(entry.category).join(format!("{}.png", entry.name))
    }

    pub fn metadata_path(&self, entry: &ArtEntry) -> PathBuf {
        self.dir_for(entry.category)
            .join(format!("{}_metadata.json", entry.name))
    }
}
