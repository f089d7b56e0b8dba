//! Artgen Asset Gen - AI art generation for game assets
//!
//! Drives remote image-generation jobs to completion (submit, poll until a
//! terminal state, fetch the artifact), composes pixel-art walk-cycle sprite
//! sheets, and writes sidecar metadata next to every generated file.

pub mod catalog;
pub mod config;
pub mod job;
pub mod layout;
pub mod pipeline;
pub mod poller;
pub mod providers;
pub mod sidecar;
pub mod sprite;

pub use catalog::{ArtEntry, AssetCatalog, AssetCategory, SpriteEntry};
pub use config::{ArtgenConfig, PollSettings};
pub use job::{select_artifact, JobResult, JobSnapshot, JobStatus, Slot};
pub use layout::OutputLayout;
pub use pipeline::{generate_art, generate_batch, generate_sprite_sheet, ArtOutcome, SheetOutcome};
pub use poller::{CompletedJob, JobBackend, JobPoller, PollState};
pub use sidecar::{GenerationRecord, SheetMetadata};
pub use sprite::{compose_sheet, FrameRequest, FrameSource, SpriteSheet};
