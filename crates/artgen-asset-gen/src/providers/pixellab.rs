//! Pixellab pixel-art provider
//!
//! Synchronous: one request returns one base64-encoded sprite frame.

use super::{build_agent, request_error};
use crate::config::ArtgenConfig;
use crate::sprite::{FrameRequest, FrameSource};
use artgen_core::{ArtgenError, Result};
use base64::Engine as _;
use log::debug;

pub const PROVIDER_NAME: &str = "pixellab";
const DEFAULT_PIXELLAB_URL: &str = "https://api.pixellab.ai/v1";

/// Account balance as reported by the service
#[derive(Debug, Clone)]
pub struct Balance {
    pub amount: Option<f64>,
    pub raw: serde_json::Value,
}

pub struct PixellabClient {
    api_key: String,
    api_url: String,
    agent: ureq::Agent,
}

impl PixellabClient {
    pub fn new(api_key: &str, api_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            agent: build_agent(),
        }
    }

    pub fn from_config(config: &ArtgenConfig) -> Result<Self> {
        let api_key = config.require_api_key(PROVIDER_NAME)?;
        let api_url = config.api_url(PROVIDER_NAME).unwrap_or(DEFAULT_PIXELLAB_URL);
        Ok(Self::new(api_key, api_url))
    }

    /// Query the remaining account balance
    pub fn balance(&self) -> Result<Balance> {
        let mut response = self
            .agent
            .get(&format!("{}/balance", self.api_url))
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .call()
            .map_err(|e| request_error("Failed to check balance", e))?;

        let raw: serde_json::Value = response.body_mut().read_json().map_err(|e| {
            ArtgenError::InvalidResponse(format!("Failed to parse balance response: {}", e))
        })?;

        Ok(parse_balance(raw))
    }
}

impl FrameSource for PixellabClient {
    fn generate_frame(&self, request: &FrameRequest) -> Result<Vec<u8>> {
        let mut payload = serde_json::json!({
            "description": request.description,
            "image_size": {
                "width": request.size,
                "height": request.size
            },
            "no_background": true
        });

        if let Some(seed) = request.seed {
            payload["seed"] = serde_json::json!(seed);
        }

        debug!("Pixellab frame request: {}", request.description);

        let mut response = self
            .agent
            .post(&format!("{}/generate-image-pixflux", self.api_url))
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send_json(&payload)
            .map_err(|e| request_error("Pixellab request failed", e))?;

        let body: serde_json::Value = response.body_mut().read_json().map_err(|e| {
            ArtgenError::InvalidResponse(format!("Failed to parse Pixellab response: {}", e))
        })?;

        decode_image_payload(&body)
    }
}

/// Decode the image from a generation response. The service sends either
/// `{"image": {"base64": "..."}}` or `{"image": "..."}`.
pub fn decode_image_payload(body: &serde_json::Value) -> Result<Vec<u8>> {
    let encoded = match body.get("image") {
        Some(serde_json::Value::String(s)) => s.as_str(),
        Some(obj) => obj
            .get("base64")
            .and_then(|b| b.as_str())
            .ok_or_else(|| ArtgenError::InvalidResponse("image has no base64 field".to_string()))?,
        None => {
            return Err(ArtgenError::InvalidResponse(
                "No image in Pixellab response".to_string(),
            ))
        }
    };

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ArtgenError::InvalidResponse(format!("Invalid base64 image: {}", e)))
}

pub fn parse_balance(raw: serde_json::Value) -> Balance {
    let amount = raw.get("balance").and_then(|b| b.as_f64());
    Balance { amount, raw }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nested_base64() {
        let body = serde_json::json!({"image": {"type": "base64", "base64": "iVBORw0K"}});
        let bytes = decode_image_payload(&body).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_decode_plain_string() {
        let body = serde_json::json!({"image": "aGVsbG8="});
        assert_eq!(decode_image_payload(&body).unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_decode_missing_image() {
        let body = serde_json::json!({"detail": "Not enough credits"});
        assert!(matches!(
            decode_image_payload(&body),
            Err(ArtgenError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_decode_bad_base64() {
        let body = serde_json::json!({"image": "***"});
        assert!(decode_image_payload(&body).is_err());
    }

    #[test]
    fn test_parse_balance() {
        let b = parse_balance(serde_json::json!({"balance": 12.5}));
        assert_eq!(b.amount, Some(12.5));

        let b = parse_balance(serde_json::json!({"credits": 3}));
        assert_eq!(b.amount, None);
        assert_eq!(b.raw["credits"], 3);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = PixellabClient::new("k", "https://api.pixellab.ai/v1/");
        assert_eq!(client.api_url, "https://api.pixellab.ai/v1");
    }
}
