//! JSON sidecar files written next to generated assets

use crate::job::Slot;
use artgen_core::{ContentDigest, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Provenance of one generated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Remote job identifier
    pub uuid: String,
    pub prompt: String,
    /// All slots of the finished job, including failed ones
    pub slots: Vec<Slot>,
    /// Local time the artifact was written
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl GenerationRecord {
    pub fn new(uuid: &str, prompt: &str, slots: Vec<Slot>, digest: Option<ContentDigest>) -> Self {
        Self {
            uuid: uuid.to_string(),
            prompt: prompt.to_string(),
            slots,
            generated_at: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            content_hash: digest.map(|d| d.to_prefixed_hex()),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// One named animation over a sheet's frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub frames: Vec<usize>,
    pub frame_rate: u32,
    /// -1 loops forever
    pub repeat: i32,
}

/// Sheet description in the shape the game's sprite loader expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadata {
    pub name: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: usize,
    pub animations: BTreeMap<String, Animation>,
}

impl SheetMetadata {
    /// `idle` holds the first frame; `walk` loops over every frame at 8 fps
    pub fn walk_cycle(name: &str, frame_size: u32, frame_count: usize) -> Self {
        let mut animations = BTreeMap::new();
        animations.insert(
            "idle".to_string(),
            Animation {
                frames: vec![0],
                frame_rate: 1,
                repeat: 0,
            },
        );
        animations.insert(
            "walk".to_string(),
            Animation {
                frames: (0..frame_count).collect(),
                frame_rate: 8,
                repeat: -1,
            },
        );

        Self {
            name: name.to_string(),
            frame_width: frame_size,
            frame_height: frame_size,
            frame_count,
            animations,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("artgen_sidecar_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_record_timestamp_format() {
        let record = GenerationRecord::new("abc", "a forest", vec![], None);
        let parsed =
            chrono::NaiveDateTime::parse_from_str(&record.generated_at, TIMESTAMP_FORMAT);
        assert!(parsed.is_ok(), "bad timestamp {}", record.generated_at);
        assert!(record.content_hash.is_none());
    }

    #[test]
    fn test_record_written_with_raw_slots() {
        let dir = temp_dir();
        let path = dir.join("tank_metadata.json");
        let slots: Vec<Slot> = serde_json::from_value(serde_json::json!([
            {"status": "error", "reason": "timeout"},
            {"status": "success", "url": "https://cdn.example.com/t.png"}
        ]))
        .unwrap();

        let record = GenerationRecord::new(
            "gen-1",
            "Tank in a red gi",
            slots,
            Some(ContentDigest::of_bytes(b"png")),
        );
        record.write(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["uuid"], "gen-1");
        assert_eq!(raw["slots"][0]["reason"], "timeout");
        assert!(raw["content_hash"].as_str().unwrap().starts_with("sha256:"));

        assert_eq!(GenerationRecord::read(&path).unwrap(), record);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_sheet_metadata_shape() {
        let meta = SheetMetadata::walk_cycle("tarzan", 64, 4);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["frameWidth"], 64);
        assert_eq!(json["frameHeight"], 64);
        assert_eq!(json["frameCount"], 4);
        assert_eq!(json["animations"]["idle"]["frames"], serde_json::json!([0]));
        assert_eq!(json["animations"]["idle"]["repeat"], 0);
        assert_eq!(json["animations"]["walk"]["frames"], serde_json::json!([0, 1, 2, 3]));
        assert_eq!(json["animations"]["walk"]["frameRate"], 8);
        assert_eq!(json["animations"]["walk"]["repeat"], -1);
    }

    #[test]
    fn test_short_cycle_walks_only_existing_frames() {
        let meta = SheetMetadata::walk_cycle("pig", 32, 3);
        assert_eq!(meta.animations["walk"].frames, vec![0, 1, 2]);
    }
}
