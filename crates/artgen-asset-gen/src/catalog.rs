//! Named prompts for the game's art
//!
//! The built-in catalog holds the character and background prompts
//! (hand-painted 1990s adventure-game style) and the pixel-art sprite
//! characters. A TOML file can add entries or replace built-ins by name:
//!
//! ```toml
//! [[art]]
//! name = "cave"
//! category = "backgrounds"
//! prompt = "..."
//!
//! [[sprite]]
//! name = "parrot"
//! description = "..."
//! ```

use artgen_core::{ArtgenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Where a piece of art is filed under the output root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Characters,
    Backgrounds,
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetCategory::Characters => write!(f, "characters"),
            AssetCategory::Backgrounds => write!(f, "backgrounds"),
        }
    }
}

/// A prompt rendered as a single illustration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtEntry {
    pub name: String,
    pub category: AssetCategory,
    pub prompt: String,
}

/// A character rendered as a pixel-art walk cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteEntry {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    art: Vec<ArtEntry>,
    #[serde(default)]
    sprite: Vec<SpriteEntry>,
}

/// Ordered collection of art and sprite entries
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    art: Vec<ArtEntry>,
    sprites: Vec<SpriteEntry>,
}

const TANK_PROMPT: &str = "Video game character art of Tank, a heroic female martial artist. Athletic muscular woman in her late 20s with confident determined expression. She wears a weathered red sleeveless martial arts gi top with black belt, dark cargo pants, wrapped forearms, practical combat boots. Dark hair pulled back in a ponytail. Strong arms showing defined muscles. Standing in a confident martial arts ready stance with fists raised. Full body view, dynamic pose showing she's ready for action. Style: Hand-painted 1990s adventure game art like King's Quest V, Monkey Island 2. Rich saturated colors, detailed painterly brushwork, warm dramatic lighting. Professional video game character illustration, high detail, expressive.";

const PIG_PROMPT: &str = "Video game character art of a cartoon pig sidekick wearing cowboy gear. Pink pig standing semi-upright on hind legs. Wearing a worn brown leather cowboy hat tilted rakishly, red bandana around neck, small leather vest. Front hooves on hips in confident pose. Friendly expressive face with a knowing smirk and warm eyes. He's a loyal companion with personality and Western charm. Full body character design. Style: Hand-painted 1990s adventure game art like King's Quest, Monkey Island. Warm colors, detailed but charming cartoon style, personality-filled character design.";

const DEER_PROMPT: &str = "Video game character art of Mr. Snuggles, a friendly deer companion. Young white-tailed deer with gentle kind eyes and sweet trusting expression. Small velvet antlers, soft brown fur with white spots on back. Standing in relaxed pose, head slightly tilted as if listening. Looks approachable and loyal, like a gentle forest friend. Cuddly and friendly appearance matching his name. Full body view in forest lighting. Style: Hand-painted 1990s Sierra adventure game art like King's Quest. Naturalistic but expressive, warm forest lighting, detailed fur texture.";

const FOREST_PROMPT: &str = "Video game background scene of a lush Brazilian rainforest. Dense jungle with towering trees, thick canopy filtering golden afternoon sunlight. Tropical flowers, giant ferns, and hanging vines. A small dirt clearing with a path leading deeper into the jungle. Colorful parrots in the trees, butterflies floating in sunbeams. Rich emerald greens, golden light rays, humid atmospheric depth. Style: 1990s Sierra adventure game background art like King's Quest V or VI. Hand-painted look, detailed foliage, atmospheric perspective. Widescreen game scene composition with clear walkable foreground area.";

const GROUP_PROMPT: &str = "Three adventure game characters standing together as a team: Tank (athletic muscular woman in red martial arts gi with black belt, confident heroic pose, dark ponytail), a pink pig wearing cowboy hat and red bandana standing on hind legs with charming smirk, and Mr. Snuggles the deer with small antlers and gentle kind eyes. They stand together in a forest clearing as companions ready for adventure. Warm golden sunlight filtering through trees behind them. Style: Hand-painted 1990s adventure game art like King's Quest or Monkey Island. Character group shot, rich colors, heroic and charming feeling.";

impl AssetCatalog {
    /// The catalog shipped with the tool
    pub fn builtin() -> Self {
        let art = [
            ("tank", AssetCategory::Characters, TANK_PROMPT),
            ("pig", AssetCategory::Characters, PIG_PROMPT),
            ("deer", AssetCategory::Characters, DEER_PROMPT),
            ("forest", AssetCategory::Backgrounds, FOREST_PROMPT),
            ("group", AssetCategory::Characters, GROUP_PROMPT),
        ]
        .into_iter()
        .map(|(name, category, prompt)| ArtEntry {
            name: name.to_string(),
            category,
            prompt: prompt.to_string(),
        })
        .collect();

        let sprites = [
            (
                "tarzan",
                "muscular young man with long brown hair, leopard print loincloth, barefoot jungle hero",
            ),
            (
                "pig",
                "cute small pink cartoon pig, round body, friendly farm animal",
            ),
            (
                "mr_snuggles",
                "friendly brown deer with small antlers, cute forest animal companion",
            ),
        ]
        .into_iter()
        .map(|(name, description)| SpriteEntry {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();

        Self { art, sprites }
    }

    /// Built-in catalog extended by a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::builtin().merged_with_toml(&content).map_err(|e| match e {
            ArtgenError::Catalog(msg) => {
                ArtgenError::Catalog(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Apply TOML entries on top of this catalog
    pub fn merged_with_toml(mut self, content: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| ArtgenError::Catalog(e.to_string()))?;

        for entry in file.art {
            validate_name(&entry.name)?;
            match self.art.iter_mut().find(|a| a.name == entry.name) {
                Some(existing) => *existing = entry,
                None => self.art.push(entry),
            }
        }
        for entry in file.sprite {
            validate_name(&entry.name)?;
            match self.sprites.iter_mut().find(|s| s.name == entry.name) {
                Some(existing) => *existing = entry,
                None => self.sprites.push(entry),
            }
        }

        Ok(self)
    }

    pub fn art(&self, name: &str) -> Result<&ArtEntry> {
        self.art.iter().find(|a| a.name == name).ok_or_else(|| {
            ArtgenError::Catalog(format!(
                "Unknown asset type: {}. Available types: {}",
                name,
                self.art_names().join(", ")
            ))
        })
    }

    pub fn art_names(&self) -> Vec<&str> {
        self.art.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn art_entries(&self) -> &[ArtEntry] {
        &self.art
    }

    pub fn sprite(&self, name: &str) -> Result<&SpriteEntry> {
        self.sprites.iter().find(|s| s.name == name).ok_or_else(|| {
            ArtgenError::Catalog(format!(
                "Unknown sprite character: {}. Available: {}",
                name,
                self.sprites
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    pub fn sprites(&self) -> &[SpriteEntry] {
        &self.sprites
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Names become file names, so keep them to a safe character set
fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ArtgenError::Catalog(format!(
            "Invalid entry name '{}': use letters, digits, '_' or '-'",
            name
        )))
    }
}
