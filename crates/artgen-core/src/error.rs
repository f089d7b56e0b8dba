//! Error types for artgen

use thiserror::Error;

/// The main error type for artgen operations
#[derive(Debug, Error)]
pub enum ArtgenError {
    /// Transport failure or non-success HTTP status
    #[error("Request error: {0}")]
    Request(String),

    /// The remote service reported the job as failed
    #[error("Generation failed: {0}")]
    JobFailed(String),

    /// No terminal status was observed within the attempt budget
    #[error("Generation did not complete after {attempts} attempts ({waited_secs}s)")]
    PollTimeout { attempts: u32, waited_secs: u64 },

    /// The job finished but produced no usable output
    #[error("No artifact: {0}")]
    NoArtifact(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API key not configured for '{provider}'. Set {env_var} or add it to .artgen/config.toml")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl ArtgenError {
    /// True for errors raised by the remote side of a generation (as opposed
    /// to local configuration or filesystem problems)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ArtgenError::Request(_)
                | ArtgenError::JobFailed(_)
                | ArtgenError::PollTimeout { .. }
                | ArtgenError::NoArtifact(_)
                | ArtgenError::InvalidResponse(_)
        )
    }
}

/// Result type alias for artgen operations
pub type Result<T> = std::result::Result<T, ArtgenError>;

impl From<toml::de::Error> for ArtgenError {
    fn from(err: toml::de::Error) -> Self {
        ArtgenError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ArtgenError {
    fn from(err: serde_json::Error) -> Self {
        ArtgenError::Json(err.to_string())
    }
}
