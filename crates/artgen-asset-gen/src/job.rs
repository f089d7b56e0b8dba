//! Remote job model
//!
//! A job lives only as long as the poll loop that drives it; nothing here is
//! persisted except the raw slots copied into the sidecar record.

use artgen_core::{ArtgenError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Status of a remote generation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl JobStatus {
    /// Map a raw status string to a status. Matching is exact; anything the
    /// service reports that is not recognised counts as still pending.
    pub fn parse(raw: &str) -> Self {
        Self::recognise(raw).unwrap_or(JobStatus::Pending)
    }

    /// Exact match against the four known status strings
    pub fn recognise(raw: &str) -> Option<Self> {
        match raw {
            "done" => Some(JobStatus::Done),
            "failed" => Some(JobStatus::Failed),
            "processing" => Some(JobStatus::Processing),
            "pending" => Some(JobStatus::Pending),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Done => write!(f, "done"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One candidate output of a job.
///
/// Unknown fields are kept in `extra` so the sidecar record carries the slot
/// exactly as the service described it. A `status` or `url` that is null or
/// not a string reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Slot {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Result payload of a job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub slots: Vec<Slot>,
    /// Set by the service when the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A single observation of a job's state
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub id: String,
    pub status: JobStatus,
    /// Status string as reported, before mapping
    pub raw_status: String,
    pub result: JobResult,
}

impl JobSnapshot {
    pub fn new(id: &str, raw_status: &str, result: JobResult) -> Self {
        Self {
            id: id.to_string(),
            status: JobStatus::parse(raw_status),
            raw_status: raw_status.to_string(),
            result,
        }
    }
}

/// Pick the artifact URL out of a finished job: the first slot marked
/// successful wins. Finding none is a `NoArtifact` error rather than a
/// transport failure.
pub fn select_artifact(result: &JobResult) -> Result<&str> {
    if result.slots.is_empty() {
        return Err(ArtgenError::NoArtifact("no images returned".to_string()));
    }

    let slot = result
        .slots
        .iter()
        .find(|s| s.is_success())
        .ok_or_else(|| {
            ArtgenError::NoArtifact(format!(
                "none of {} slot(s) succeeded",
                result.slots.len()
            ))
        })?;

    slot.url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ArtgenError::NoArtifact("successful slot has no URL".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_from(json: &str) -> JobResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(JobStatus::parse("done"), JobStatus::Done);
        assert_eq!(JobStatus::parse("failed"), JobStatus::Failed);
        assert_eq!(JobStatus::parse("processing"), JobStatus::Processing);
        assert_eq!(JobStatus::parse("pending"), JobStatus::Pending);
        assert_eq!(JobStatus::parse(""), JobStatus::Pending);
        assert_eq!(JobStatus::parse("queued_somewhere"), JobStatus::Pending);
        assert_eq!(JobStatus::parse("DONE"), JobStatus::Pending);
        assert_eq!(JobStatus::parse(" failed"), JobStatus::Pending);
        assert_eq!(JobStatus::recognise("Pending"), None);
        assert_eq!(JobStatus::recognise("pending"), Some(JobStatus::Pending));
        assert!(JobStatus::Done.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_select_skips_failed_slots() {
        let result = result_from(
            r#"{"slots": [{"status": "error"}, {"status": "success", "url": "X"}]}"#,
        );
        assert_eq!(select_artifact(&result).unwrap(), "X");
    }

    #[test]
    fn test_non_string_slot_status_is_not_success() {
        let result = result_from(
            r#"{"slots": [
                {"status": null, "url": null},
                {"status": 3, "url": "https://cdn.example.com/odd.png"},
                {"status": "success", "url": "X"}
            ]}"#,
        );
        assert_eq!(result.slots[0].status, None);
        assert!(!result.slots[1].is_success());
        assert_eq!(select_artifact(&result).unwrap(), "X");
    }

    #[test]
    fn test_select_first_success_wins() {
        let result = result_from(
            r#"{"slots": [
                {"status": "success", "url": "https://cdn.example.com/a.png"},
                {"status": "success", "url": "https://cdn.example.com/b.png"}
            ]}"#,
        );
        assert_eq!(
            select_artifact(&result).unwrap(),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_select_no_success_is_no_artifact() {
        let result = result_from(r#"{"slots": [{"status": "error"}, {"status": "nsfw"}]}"#);
        let err = select_artifact(&result).unwrap_err();
        assert!(matches!(err, ArtgenError::NoArtifact(_)));
    }

    #[test]
    fn test_select_empty_slots_is_no_artifact() {
        let err = select_artifact(&JobResult::default()).unwrap_err();
        assert!(matches!(err, ArtgenError::NoArtifact(_)));
    }

    #[test]
    fn test_slot_keeps_unknown_fields() {
        let result = result_from(
            r#"{"slots": [{"status": "success", "url": "u", "width": 1024, "seed": 7}]}"#,
        );
        let slot = &result.slots[0];
        assert_eq!(slot.extra.get("width").and_then(|v| v.as_u64()), Some(1024));

        let back = serde_json::to_value(slot).unwrap();
        assert_eq!(back["seed"], 7);
        assert_eq!(back["url"], "u");
    }
}
