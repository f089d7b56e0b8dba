//! Asset pipeline
//!
//! Ties the poller, catalog, layout and sidecars together: one entry in,
//! one image plus its metadata out. Batches run strictly one entry after
//! another and a failed entry does not stop the rest.

use crate::catalog::{ArtEntry, SpriteEntry};
use crate::job::select_artifact;
use crate::layout::OutputLayout;
use crate::poller::{JobBackend, JobPoller};
use crate::sidecar::GenerationRecord;
use crate::sprite::{compose_sheet, generate_walk_cycle, FrameSource, MIN_FRAMES};
use artgen_core::{ArtgenError, ContentDigest, Result};
use log::{error, info};
use std::path::PathBuf;

/// What `generate_art` produced
#[derive(Debug, Clone)]
pub struct ArtOutcome {
    pub name: String,
    pub job_id: String,
    pub image_path: PathBuf,
    pub metadata_path: PathBuf,
    pub digest: ContentDigest,
    pub size_bytes: usize,
}

/// What `generate_sprite_sheet` produced
#[derive(Debug, Clone)]
pub struct SheetOutcome {
    pub name: String,
    pub image_path: PathBuf,
    pub metadata_path: PathBuf,
    pub frame_count: usize,
}

/// Generate one catalog entry: submit, poll, pick the artifact, download
/// it, and write the sidecar record
pub fn generate_art<B: JobBackend>(
    poller: &JobPoller<B>,
    entry: &ArtEntry,
    layout: &OutputLayout,
) -> Result<ArtOutcome> {
    let image_path = layout.image_path(entry);
    let metadata_path = layout.metadata_path(entry);
    info!("Generating {} -> {}", entry.name, image_path.display());

    let job = poller.run(&entry.prompt)?;
    let url = select_artifact(&job.result)?;
    let bytes = poller.fetch(url)?;

    if let Some(parent) = image_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&image_path, &bytes)?;
    let digest = ContentDigest::of_bytes(&bytes);

    GenerationRecord::new(&job.id, &job.prompt, job.result.slots.clone(), Some(digest))
        .write(&metadata_path)?;

    info!("Saved {} ({} bytes)", image_path.display(), bytes.len());
    Ok(ArtOutcome {
        name: entry.name.clone(),
        job_id: job.id,
        image_path,
        metadata_path,
        digest,
        size_bytes: bytes.len(),
    })
}

/// Generate entries one at a time, recording each entry's outcome
pub fn generate_batch<'a, B, I>(
    poller: &JobPoller<B>,
    entries: I,
    layout: &OutputLayout,
) -> Vec<(String, Result<ArtOutcome>)>
where
    B: JobBackend,
    I: IntoIterator<Item = &'a ArtEntry>,
{
    entries
        .into_iter()
        .map(|entry| {
            let outcome = generate_art(poller, entry, layout);
            if let Err(e) = &outcome {
                error!("{}: {}", entry.name, e);
            }
            (entry.name.clone(), outcome)
        })
        .collect()
}

/// Generate a walk cycle for a sprite character and save it as a sheet
pub fn generate_sprite_sheet<S: FrameSource + ?Sized>(
    source: &S,
    entry: &SpriteEntry,
    frame_size: u32,
    layout: &OutputLayout,
) -> Result<SheetOutcome> {
    let frames = generate_walk_cycle(source, &entry.name, &entry.description, frame_size);

    if frames.len() < MIN_FRAMES {
        return Err(ArtgenError::NoArtifact(format!(
            "{}: only got {} frame(s), need at least {}",
            entry.name,
            frames.len(),
            MIN_FRAMES
        )));
    }

    let sheet = compose_sheet(&frames, frame_size)?;
    let (image_path, metadata_path) = sheet.save(&layout.sprites_dir(), &entry.name)?;

    Ok(SheetOutcome {
        name: entry.name.clone(),
        image_path,
        metadata_path,
        frame_count: sheet.frame_count,
    })
}
