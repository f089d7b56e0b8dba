//! Walk-cycle sprite sheets
//!
//! A walk cycle is four separately generated poses (idle, left leg forward,
//! idle, right leg forward) sharing a seed base so the character stays
//! recognisable across frames. Frames are packed left to right into one
//! transparent RGBA strip.

use crate::sidecar::SheetMetadata;
use artgen_core::{ArtgenError, Result};
use image::imageops::FilterType;
use image::RgbaImage;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Poses of the walk cycle, in frame order
pub const WALK_POSES: [&str; 4] = [
    "standing idle pose",
    "walking left leg forward",
    "standing idle pose",
    "walking right leg forward",
];

/// Fewest frames worth saving as a sheet
pub const MIN_FRAMES: usize = 2;

const SEED_RANGE: u64 = 100_000;

/// One frame to generate
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRequest {
    pub description: String,
    pub size: u32,
    pub seed: Option<u64>,
}

/// Anything that can turn a description into encoded image bytes
pub trait FrameSource {
    fn generate_frame(&self, request: &FrameRequest) -> Result<Vec<u8>>;
}

/// Stable seed base derived from a character name
pub fn name_seed(name: &str) -> u64 {
    let hash = name
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    hash % SEED_RANGE
}

/// Frame requests for a character's walk cycle
pub fn walk_cycle_requests(name: &str, description: &str, size: u32) -> Vec<FrameRequest> {
    let base_seed = name_seed(name);
    WALK_POSES
        .iter()
        .enumerate()
        .map(|(i, pose)| FrameRequest {
            description: format!("{}, {}, side view, pixel art", description, pose),
            size,
            seed: Some(base_seed + i as u64),
        })
        .collect()
}

/// Generate every walk-cycle frame, skipping the ones that fail
pub fn generate_walk_cycle<S: FrameSource + ?Sized>(
    source: &S,
    name: &str,
    description: &str,
    size: u32,
) -> Vec<Vec<u8>> {
    let requests = walk_cycle_requests(name, description, size);
    let total = requests.len();
    let mut frames = Vec::with_capacity(total);

    for (i, request) in requests.iter().enumerate() {
        info!("{}: frame {}/{}", name, i + 1, total);
        match source.generate_frame(request) {
            Ok(bytes) => frames.push(bytes),
            Err(e) => warn!("{}: failed to generate frame {}: {}", name, i + 1, e),
        }
    }

    frames
}

/// A composed horizontal sprite strip
#[derive(Debug)]
pub struct SpriteSheet {
    pub image: RgbaImage,
    pub frame_size: u32,
    pub frame_count: usize,
}

/// Pack encoded frames into a sheet, resizing any frame that is not
/// `frame_size` square
pub fn compose_sheet(frames: &[Vec<u8>], frame_size: u32) -> Result<SpriteSheet> {
    if frames.is_empty() {
        return Err(ArtgenError::Image("no frames to compose".to_string()));
    }

    let sheet_width = u32::try_from(frames.len())
        .ok()
        .and_then(|n| frame_size.checked_mul(n))
        .filter(|w| {
            (*w as usize)
                .checked_mul(frame_size as usize)
                .and_then(|px| px.checked_mul(4))
                .is_some()
        })
        .ok_or_else(|| {
            ArtgenError::Image(format!(
                "{} frame(s) of {}px do not fit in one sheet",
                frames.len(),
                frame_size
            ))
        })?;

    let mut sheet = RgbaImage::new(sheet_width, frame_size);

    for (i, bytes) in frames.iter().enumerate() {
        let mut frame = image::load_from_memory(bytes)
            .map_err(|e| ArtgenError::Image(format!("frame {}: {}", i + 1, e)))?
            .to_rgba8();

        if frame.dimensions() != (frame_size, frame_size) {
            frame = image::imageops::resize(&frame, frame_size, frame_size, FilterType::Lanczos3);
        }

        image::imageops::replace(&mut sheet, &frame, (i as u32 * frame_size) as i64, 0);
    }

    Ok(SpriteSheet {
        image: sheet,
        frame_size,
        frame_count: frames.len(),
    })
}

impl SpriteSheet {
    pub fn metadata(&self, name: &str) -> SheetMetadata {
        SheetMetadata::walk_cycle(name, self.frame_size, self.frame_count)
    }

    /// Write `<name>_walk.png` and `<name>_walk.json` into `dir`
    pub fn save(&self, dir: &Path, name: &str) -> Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)?;

        let image_path = dir.join(format!("{}_walk.png", name));
        self.image
            .save_with_format(&image_path, image::ImageFormat::Png)
            .map_err(|e| ArtgenError::Image(format!("{}: {}", image_path.display(), e)))?;

        let meta_path = dir.join(format!("{}_walk.json", name));
        self.metadata(name).write(&meta_path)?;

        info!("Saved {} and {}", image_path.display(), meta_path.display());
        Ok((image_path, meta_path))
    }
}
