//! Response bodies and the artifacts built from them.
//!
//! The `*Response` structs mirror the backend's JSON exactly and stay
//! private to the crate. The public types ([`Podcast`], [`Artifact`]) are
//! what callers get back: base64 already decoded, optional fields resolved.

use crate::derived::{Flashcard, Mnemonic, Summary};
use crate::pipeline::media::MediaData;
use serde::{Deserialize, Serialize};

// ── Wire shapes ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PodcastResponse {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub audio_file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub pdf_path: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlashcardsResponse {
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MnemonicsResponse {
    #[serde(default)]
    pub mnemonics: Vec<Mnemonic>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BrainRotResponse {
    #[serde(default)]
    pub video_file: Option<String>,
}

/// Reply of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ── Artifacts ───────────────────────────────────────────────────────────

/// A generated podcast: spoken transcript plus its audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Podcast {
    pub transcript: String,
    pub audio: MediaData,
}

/// Result of the main query surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    Summary { summary: Summary },
    Podcast(Podcast),
}

impl Artifact {
    /// The summary, when this artifact is one.
    pub fn as_summary(&self) -> Option<&Summary> {
        match self {
            Artifact::Summary { summary } => Some(summary),
            _ => None,
        }
    }

    /// Any media this artifact carries.
    pub fn media(&self) -> Option<&MediaData> {
        match self {
            Artifact::Summary { .. } => None,
            Artifact::Podcast(p) => Some(&p.audio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::media::MediaKind;

    #[test]
    fn podcast_response_tolerates_missing_audio() {
        let r: PodcastResponse = serde_json::from_str(r#"{"transcript":"T"}"#).unwrap();
        assert_eq!(r.transcript, "T");
        assert!(r.audio_file.is_none());
    }

    #[test]
    fn artifact_serialises_with_kind_tag() {
        let a = Artifact::Summary {
            summary: Summary::new("short").unwrap(),
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["kind"], "summary");
        assert_eq!(v["summary"], "short");
    }

    #[test]
    fn podcast_json_carries_base64_audio() {
        let a = Artifact::Podcast(Podcast {
            transcript: "T".into(),
            audio: MediaData {
                kind: MediaKind::AudioMpeg,
                bytes: b"ABC".to_vec(),
            },
        });
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["kind"], "podcast");
        assert_eq!(v["audio"]["data"], "QUJD");
        assert_eq!(v["audio"]["kind"], "audio/mpeg");
        assert!(a.media().is_some());
        assert!(a.as_summary().is_none());
    }

    #[test]
    fn health_status() {
        let h: HealthStatus = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert!(h.is_healthy());
    }
}
