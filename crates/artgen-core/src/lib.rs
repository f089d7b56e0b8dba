//! Artgen Core - Foundational types shared by the artgen crates
//!
//! - `ArtgenError` / `Result` - the error taxonomy for job submission,
//!   polling, artifact download and local persistence
//! - `ContentDigest` - SHA-256 digest recorded next to downloaded artifacts

mod digest;
mod error;

pub use digest::ContentDigest;
pub use error::{ArtgenError, Result};
