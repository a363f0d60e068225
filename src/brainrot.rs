//! Brain-rot video requests: caption phrases over a background video.
//!
//! The builder side of the feature lives here: the editable [`PhraseList`],
//! the background-video slot with its MIME/size gate, the fixed caption
//! [`BrainRotStyle`], and [`BrainRotRequest`], which can only be built once
//! all of those check out.

use crate::config::MAX_VIDEO_BYTES;
use crate::error::{RotError, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

// ── Style ────────────────────────────────────────────────────────────────

/// Caption styling sent alongside the phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainRotStyle {
    pub text_color: String,
    pub font_size: u32,
    /// Seconds each phrase stays on screen.
    pub duration_per_phrase: f64,
    pub position: String,
}

impl Default for BrainRotStyle {
    fn default() -> Self {
        Self {
            text_color: "white".to_string(),
            font_size: 50,
            duration_per_phrase: 2.0,
            position: "center".to_string(),
        }
    }
}

impl BrainRotStyle {
    pub(crate) fn validate(&self) -> Result<(), RotError> {
        if self.font_size == 0 {
            return Err(RotError::InvalidConfig("font size must be > 0".into()));
        }
        if !(self.duration_per_phrase.is_finite() && self.duration_per_phrase > 0.0) {
            return Err(RotError::InvalidConfig(format!(
                "duration per phrase must be a positive number of seconds, got {}",
                self.duration_per_phrase
            )));
        }
        if self.text_color.trim().is_empty() || self.position.trim().is_empty() {
            return Err(RotError::InvalidConfig(
                "text color and position must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// ── Phrases ──────────────────────────────────────────────────────────────

/// Ordered, editable caption phrases.
///
/// Starts with a single empty entry, ready to be filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseList {
    phrases: Vec<String>,
}

impl Default for PhraseList {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseList {
    pub fn new() -> Self {
        Self {
            phrases: vec![String::new()],
        }
    }

    pub fn push(&mut self, phrase: impl Into<String>) {
        self.phrases.push(phrase.into());
    }

    /// Overwrite the phrase at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, phrase: impl Into<String>) {
        if let Some(slot) = self.phrases.get_mut(index) {
            *slot = phrase.into();
        }
    }

    /// Remove the phrase at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.phrases.len()).then(|| self.phrases.remove(index))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.phrases
    }

    /// Phrases that survive submission: blank entries dropped, order kept.
    pub fn filtered(&self) -> Vec<String> {
        self.phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PhraseList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            phrases: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Background video ─────────────────────────────────────────────────────

/// A local video accepted as brain-rot background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub size: u64,
}

/// Accept only `video/*` MIME types no larger than `limit` bytes.
pub fn validate_video(mime: &str, size: u64, limit: u64) -> Result<(), ValidationError> {
    if !mime.starts_with("video/") {
        return Err(ValidationError::NotAVideo {
            mime: mime.to_string(),
        });
    }
    if size > limit {
        return Err(ValidationError::VideoTooLarge { size, limit });
    }
    Ok(())
}

/// MIME type for a local video, from its extension.
pub fn video_mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}

impl VideoFile {
    /// Inspect a local file and build a candidate for [`VideoSlot::select`].
    ///
    /// Files with an unknown extension get `application/octet-stream` and are
    /// then rejected by the MIME check.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref().to_path_buf();
        let meta = std::fs::metadata(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ValidationError::PermissionDenied { path: path.clone() }
            } else {
                ValidationError::FileNotFound { path: path.clone() }
            }
        })?;
        let mime = video_mime_for(&path).unwrap_or("application/octet-stream");
        Ok(Self {
            file_name: crate::pipeline::input::upload_file_name(&path, "video.mp4"),
            mime: mime.to_string(),
            size: meta.len(),
            path,
        })
    }
}

/// Holds the currently selected background video.
#[derive(Debug, Clone, Default)]
pub struct VideoSlot {
    selected: Option<VideoFile>,
}

impl VideoSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `candidate` if it passes validation.
    ///
    /// On rejection the previously stored video (if any) stays in place.
    pub fn select(&mut self, candidate: VideoFile, limit: u64) -> Result<(), ValidationError> {
        validate_video(&candidate.mime, candidate.size, limit)?;
        debug!("Selected background video {} ({} bytes)", candidate.file_name, candidate.size);
        self.selected = Some(candidate);
        Ok(())
    }

    /// [`select`](Self::select) with the default 100 MiB limit.
    pub fn select_default(&mut self, candidate: VideoFile) -> Result<(), ValidationError> {
        self.select(candidate, MAX_VIDEO_BYTES)
    }

    pub fn get(&self) -> Option<&VideoFile> {
        self.selected.as_ref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

// ── Request ──────────────────────────────────────────────────────────────

/// What the captions are laid over.
#[derive(Debug, Clone, PartialEq)]
pub enum BrainRotSource {
    Video(VideoFile),
    PdfUrl(String),
}

/// A validated brain-rot request.
#[derive(Debug, Clone, PartialEq)]
pub struct BrainRotRequest {
    source: BrainRotSource,
    phrases: Vec<String>,
    style: BrainRotStyle,
}

impl BrainRotRequest {
    /// Video + phrases. Needs a selected video and at least one non-blank phrase.
    pub fn from_video(
        video: Option<&VideoFile>,
        phrases: &PhraseList,
        style: BrainRotStyle,
    ) -> Result<Self, ValidationError> {
        let video = video.ok_or(ValidationError::MissingVideoOrPhrases)?;
        let phrases = phrases.filtered();
        if phrases.is_empty() {
            return Err(ValidationError::MissingVideoOrPhrases);
        }
        Ok(Self {
            source: BrainRotSource::Video(video.clone()),
            phrases,
            style,
        })
    }

    /// PDF-derived variant: the backend picks the captions from the document.
    pub fn from_pdf_url(url: impl Into<String>, style: BrainRotStyle) -> Self {
        Self {
            source: BrainRotSource::PdfUrl(url.into()),
            phrases: Vec::new(),
            style,
        }
    }

    pub fn source(&self) -> &BrainRotSource {
        &self.source
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn style(&self) -> &BrainRotStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(mime: &str, size: u64) -> VideoFile {
        VideoFile {
            path: "/tmp/bg".into(),
            file_name: "bg".into(),
            mime: mime.into(),
            size,
        }
    }

    #[test]
    fn phrase_list_filters_blanks() {
        let list: PhraseList = ["", "hello", ""].into_iter().collect();
        assert_eq!(list.filtered(), vec!["hello".to_string()]);
        let list: PhraseList = ["  ", "a", "b"].into_iter().collect();
        assert_eq!(list.filtered(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn phrase_list_edit_ops() {
        let mut list = PhraseList::new();
        assert_eq!(list.len(), 1);
        list.set(0, "first");
        list.push("second");
        list.push("third");
        assert_eq!(list.remove(1), Some("second".to_string()));
        assert_eq!(list.remove(10), None);
        list.set(10, "ignored");
        assert_eq!(list.as_slice(), ["first", "third"]);
    }

    #[test]
    fn video_mime_and_size_gate() {
        let limit = MAX_VIDEO_BYTES;
        assert!(validate_video("video/mp4", limit, limit).is_ok());
        assert!(matches!(
            validate_video("video/mp4", limit + 1, limit),
            Err(ValidationError::VideoTooLarge { .. })
        ));
        assert!(matches!(
            validate_video("image/png", 10, limit),
            Err(ValidationError::NotAVideo { .. })
        ));
    }

    #[test]
    fn rejected_selection_keeps_previous() {
        let mut slot = VideoSlot::new();
        slot.select_default(video("video/mp4", 1024)).unwrap();

        let too_big = video("video/mp4", 150 * 1024 * 1024);
        let err = slot.select_default(too_big).unwrap_err();
        assert_eq!(err.to_string(), "Video file size should be less than 100MB");
        assert_eq!(slot.get().map(|v| v.size), Some(1024));

        let err = slot.select_default(video("audio/mpeg", 10)).unwrap_err();
        assert_eq!(err.to_string(), "Please upload a valid video file");
        assert_eq!(slot.get().map(|v| v.mime.as_str()), Some("video/mp4"));
    }

    #[test]
    fn request_needs_video_and_phrases() {
        let phrases: PhraseList = ["", "hello", ""].into_iter().collect();
        assert_eq!(
            BrainRotRequest::from_video(None, &phrases, BrainRotStyle::default()),
            Err(ValidationError::MissingVideoOrPhrases)
        );

        let v = video("video/mp4", 10);
        let blank: PhraseList = ["", " "].into_iter().collect();
        assert_eq!(
            BrainRotRequest::from_video(Some(&v), &blank, BrainRotStyle::default()),
            Err(ValidationError::MissingVideoOrPhrases)
        );

        let req = BrainRotRequest::from_video(Some(&v), &phrases, BrainRotStyle::default()).unwrap();
        assert_eq!(req.phrases(), ["hello"]);
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(video_mime_for(Path::new("a.MP4")), Some("video/mp4"));
        assert_eq!(video_mime_for(Path::new("a.mov")), Some("video/quicktime"));
        assert_eq!(video_mime_for(Path::new("a.mkv")), Some("video/x-matroska"));
        assert_eq!(video_mime_for(Path::new("a.txt")), None);
        assert_eq!(video_mime_for(Path::new("noext")), None);
    }

    #[test]
    fn default_style_matches_backend_contract() {
        let s = BrainRotStyle::default();
        assert_eq!(s.text_color, "white");
        assert_eq!(s.font_size, 50);
        assert_eq!(s.duration_per_phrase, 2.0);
        assert_eq!(s.position, "center");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn from_path_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("clip.mp4");
        std::fs::write(&p, vec![0u8; 2048]).unwrap();
        let v = VideoFile::from_path(&p).unwrap();
        assert_eq!(v.size, 2048);
        assert_eq!(v.mime, "video/mp4");
        assert_eq!(v.file_name, "clip.mp4");

        assert!(matches!(
            VideoFile::from_path(dir.path().join("missing.mp4")),
            Err(ValidationError::FileNotFound { .. })
        ));
    }
}
