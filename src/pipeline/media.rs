//! Media decoding: base64 text from a JSON envelope → [`MediaData`].
//!
//! The backend ships audio and video as base64 strings inside JSON. They are
//! decoded once, here, into bytes plus a MIME tag; everything downstream
//! works with [`MediaData`] and never sees the encoded string again. A data
//! URL is rebuilt on demand for hosts that want a single playable reference.

use crate::error::RotError;
use crate::pipeline::transport::Action;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// The media types the backend produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaKind {
    /// Podcast audio.
    #[serde(rename = "audio/mpeg")]
    AudioMpeg,
    /// Brain-rot video.
    #[serde(rename = "video/mp4")]
    VideoMp4,
}

impl MediaKind {
    pub fn mime(self) -> &'static str {
        match self {
            MediaKind::AudioMpeg => "audio/mpeg",
            MediaKind::VideoMp4 => "video/mp4",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::AudioMpeg => "mp3",
            MediaKind::VideoMp4 => "mp4",
        }
    }
}

/// Decoded media: raw bytes tagged with their MIME type.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct MediaData {
    pub kind: MediaKind,
    #[serde(rename = "data", serialize_with = "serialize_b64")]
    pub bytes: Vec<u8>,
}

fn serialize_b64<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&STANDARD.encode(bytes))
}

impl fmt::Debug for MediaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaData")
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MediaData {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>`, playable by any browser media element.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.kind.mime(), STANDARD.encode(&self.bytes))
    }

    /// Write the bytes to `path`.
    ///
    /// Uses atomic write (temp file in the same directory + rename) so a
    /// failed write never leaves a truncated media file behind.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), RotError> {
        let path = path.as_ref();
        let write_err = |source: std::io::Error| RotError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent).await.map_err(write_err)?;

        let tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
        tokio::fs::write(tmp.path(), &self.bytes)
            .await
            .map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Wrote {} bytes of {} to {}", self.len(), self.kind.mime(), path.display());
        Ok(())
    }
}

/// Decode a base64 payload from a response envelope.
///
/// Whitespace is stripped first; some servers wrap long base64 lines.
pub fn decode_media(encoded: &str, kind: MediaKind, action: Action) -> Result<MediaData, RotError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| RotError::Decode {
        action,
        detail: format!("invalid base64 {} payload: {e}", kind.mime()),
    })?;
    debug!("Decoded {} base64 chars → {} bytes ({})", encoded.len(), bytes.len(), kind.mime());
    Ok(MediaData { kind, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_podcast_audio() {
        let media = decode_media("QUJD", MediaKind::AudioMpeg, Action::PodcastUrl).unwrap();
        assert_eq!(media.bytes, b"ABC");
        assert_eq!(media.to_data_url(), "data:audio/mpeg;base64,QUJD");
    }

    #[test]
    fn tolerates_wrapped_lines() {
        let media = decode_media("QU\nJD\r\n", MediaKind::VideoMp4, Action::BrainRot).unwrap();
        assert_eq!(media.bytes, b"ABC");
        assert!(media.to_data_url().starts_with("data:video/mp4;base64,"));
    }

    #[test]
    fn rejects_garbage() {
        let err = decode_media("not base64!!", MediaKind::VideoMp4, Action::BrainRot).unwrap_err();
        assert!(matches!(err, RotError::Decode { .. }));
        assert_eq!(err.user_message(), "Failed to process video");
    }

    #[test]
    fn debug_hides_bytes() {
        let media = MediaData {
            kind: MediaKind::AudioMpeg,
            bytes: vec![0; 4096],
        };
        let dbg = format!("{media:?}");
        assert!(dbg.contains("4096"));
        assert!(dbg.len() < 100);
    }

    #[tokio::test]
    async fn write_to_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/podcast.mp3");
        let media = MediaData {
            kind: MediaKind::AudioMpeg,
            bytes: b"ID3fake".to_vec(),
        };
        media.write_to(&out).await.unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"ID3fake");
    }
}
