//! Remote image services
//!
//! `maginary` runs asynchronous jobs and is driven through the poller;
//! `pixellab` answers synchronously and feeds sprite frames.

pub mod maginary;
pub mod pixellab;

use artgen_core::ArtgenError;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 60;

fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .build();
    config.into()
}

/// Map a transport or HTTP status failure to `ArtgenError::Request`
fn request_error(context: &str, e: ureq::Error) -> ArtgenError {
    ArtgenError::Request(format!("{}: {}", context, e))
}

fn read_body_bytes(response: ureq::http::Response<ureq::Body>) -> std::io::Result<Vec<u8>> {
    let mut reader = response.into_body().into_reader();
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut reader, &mut bytes)?;
    Ok(bytes)
}
