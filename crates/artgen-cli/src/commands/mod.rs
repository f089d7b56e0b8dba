//! CLI command implementations

pub mod art;
pub mod balance;
pub mod list;
pub mod sprites;

use anyhow::Result;
use artgen_asset_gen::{ArtgenConfig, AssetCatalog, OutputLayout};
use std::path::Path;

/// Everything a command needs, resolved from config and global flags
pub struct Context {
    pub config: ArtgenConfig,
    pub catalog: AssetCatalog,
    pub layout: OutputLayout,
}

impl Context {
    pub fn load(catalog_path: Option<&str>, output: Option<&str>) -> Result<Self> {
        let config = ArtgenConfig::load().unwrap_or_else(|e| {
            log::warn!("Could not load config, using defaults: {}", e);
            ArtgenConfig::from_env()
        });

        let catalog = match catalog_path {
            Some(path) => AssetCatalog::load(Path::new(path))?,
            None => AssetCatalog::builtin(),
        };

        let root = output.unwrap_or(config.output.root.as_str());
        let layout = OutputLayout::new(root);

        Ok(Self {
            config,
            catalog,
            layout,
        })
    }
}
