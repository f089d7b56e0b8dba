//! SHA-256 digests of downloaded artifacts

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of an artifact's bytes.
///
/// Written into sidecar metadata so a regenerated image can be told apart
/// from the previous one without diffing pixels.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Hex string tagged with the algorithm, e.g. `sha256:ab12...`
    pub fn to_prefixed_hex(&self) -> String {
        format!("sha256:{}", self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_prefixed_hex())
    }
}
