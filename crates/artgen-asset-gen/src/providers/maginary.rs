//! Maginary image generation provider
//!
//! Jobs are created with `POST {base}` and observed with `GET {base}{uuid}/`
//! until `processing_state` reaches `done` or `failed`. Finished jobs list
//! their images as slots under `processing_result`.

use super::{build_agent, read_body_bytes, request_error};
use crate::config::ArtgenConfig;
use crate::job::{JobResult, JobSnapshot};
use crate::poller::JobBackend;
use artgen_core::{ArtgenError, Result};
use serde::Deserialize;

pub const PROVIDER_NAME: &str = "maginary";
const DEFAULT_MAGINARY_URL: &str = "https://app.maginary.ai/api/gens/";

/// Maginary client for text-to-image jobs
pub struct MaginaryClient {
    api_key: String,
    api_url: String,
    agent: ureq::Agent,
}

impl MaginaryClient {
    pub fn new(api_key: &str, api_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_url: api_url.to_string(),
            agent: build_agent(),
        }
    }

    /// Create a client from config. A missing API key is fatal.
    pub fn from_config(config: &ArtgenConfig) -> Result<Self> {
        let api_key = config.require_api_key(PROVIDER_NAME)?;
        let api_url = config.api_url(PROVIDER_NAME).unwrap_or(DEFAULT_MAGINARY_URL);
        Ok(Self::new(api_key, api_url))
    }

    fn status_url(&self, job_id: &str) -> String {
        format!("{}/{}/", self.api_url.trim_end_matches('/'), job_id)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl JobBackend for MaginaryClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn submit(&self, prompt: &str) -> Result<String> {
        let payload = serde_json::json!({ "prompt": prompt });

        let mut response = self
            .agent
            .post(&self.api_url)
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .send_json(&payload)
            .map_err(|e| request_error("Maginary submit failed", e))?;

        let body: serde_json::Value = response.body_mut().read_json().map_err(|e| {
            ArtgenError::InvalidResponse(format!("Failed to parse Maginary response: {}", e))
        })?;

        parse_submit_response(&body)
    }

    fn status(&self, job_id: &str) -> Result<JobSnapshot> {
        let mut response = self
            .agent
            .get(&self.status_url(job_id))
            .header("Authorization", &self.auth_header())
            .call()
            .map_err(|e| request_error("Maginary poll failed", e))?;

        let body: serde_json::Value = response.body_mut().read_json().map_err(|e| {
            ArtgenError::InvalidResponse(format!("Failed to parse poll response: {}", e))
        })?;

        parse_status_response(job_id, body)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| request_error("Failed to download image", e))?;

        Ok(read_body_bytes(response)?)
    }
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    processing_state: Option<String>,
    #[serde(default)]
    processing_result: Option<JobResult>,
}

/// Extract the job UUID from a creation response
pub fn parse_submit_response(body: &serde_json::Value) -> Result<String> {
    body.get("uuid")
        .and_then(|u| u.as_str())
        .filter(|u| !u.is_empty())
        .map(|u| u.to_string())
        .ok_or_else(|| {
            ArtgenError::InvalidResponse(format!(
                "No uuid in Maginary submit response: {}",
                body
            ))
        })
}

/// Turn a status response into a snapshot. A missing state counts as pending.
pub fn parse_status_response(job_id: &str, body: serde_json::Value) -> Result<JobSnapshot> {
    let status: StatusBody = serde_json::from_value(body)?;
    Ok(JobSnapshot::new(
        job_id,
        status.processing_state.as_deref().unwrap_or(""),
        status.processing_result.unwrap_or_default(),
    ))
}
