//! Error types for the researchrot client.
//!
//! Two distinct error types reflect two distinct failure points:
//!
//! * [`ValidationError`]: **Local**: the user's input was rejected before
//!   any request was built (bad URL, missing file, wrong MIME type, video too
//!   large, no phrases). These never reach the network.
//!
//! * [`RotError`]: **Per request**: everything that can end a request
//!   cycle, including wrapped validation errors, non-2xx responses, transport
//!   failures and `status: "error"` envelopes inside a 2xx body.
//!
//! Every error is terminal for the current request only. The session turns
//! it into the surface's error state via [`RotError::user_message`] and the
//! user may retry immediately.

use crate::pipeline::transport::Action;
use std::path::PathBuf;
use thiserror::Error;

/// Input rejected on the client before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No URL or path was given.
    #[error("Please enter a URL or choose a PDF file")]
    EmptyInput,

    /// Local PDF path does not exist.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists but does not start with `%PDF`.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// Selected background file is not a `video/*` type.
    #[error("Please upload a valid video file")]
    NotAVideo { mime: String },

    /// Selected background video exceeds the upload limit.
    #[error("Video file size should be less than 100MB")]
    VideoTooLarge { size: u64, limit: u64 },

    /// Brain-rot request without a video, or with no non-empty phrase.
    #[error("Please upload a video and add at least one phrase")]
    MissingVideoOrPhrases,

    /// A summary must carry text before it can seed derived content.
    #[error("No summary available to generate {what} from")]
    EmptySummary { what: &'static str },
}

/// All errors that can end a request cycle.
#[derive(Debug, Error)]
pub enum RotError {
    // ── Client-side ───────────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Backend ───────────────────────────────────────────────────────────
    /// Non-2xx response. `message` is taken from the error payload when one
    /// is present, otherwise it is the action's fallback text.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A 2xx response that reported `status: "error"`.
    #[error("{message}")]
    Backend { message: String },

    /// The podcast response carried no audio.
    #[error("No audio data received")]
    MissingMedia,

    /// The query succeeded but the answer was blank.
    #[error("No summary was generated")]
    EmptyAnswer,

    /// The backend returned an empty list of generated items.
    #[error("No {what} were generated")]
    NoResults { what: &'static str },

    // ── Transport ─────────────────────────────────────────────────────────
    /// No response was received at all.
    #[error("{}", action.fallback_message())]
    Transport { action: Action, reason: String },

    /// A response arrived but its body could not be decoded.
    #[error("{}", action.fallback_message())]
    Decode { action: Action, detail: String },

    // ── Output ────────────────────────────────────────────────────────────
    /// Could not write decoded media to disk.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config ────────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RotError {
    /// The human-readable text stored as a surface's error state.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether the error was raised locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, RotError::Validation(_))
    }

    /// Extra detail for logs; user-facing text stays generic.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RotError::Transport { reason, .. } => Some(reason),
            RotError::Decode { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_shows_backend_message() {
        let e = RotError::Http {
            status: 500,
            message: "bad pdf".into(),
        };
        assert_eq!(e.user_message(), "bad pdf");
    }

    #[test]
    fn transport_error_hides_reason() {
        let e = RotError::Transport {
            action: Action::SummarizeUrl,
            reason: "connection refused".into(),
        };
        assert_eq!(e.user_message(), "Failed to process URL");
        assert_eq!(e.detail(), Some("connection refused"));
    }

    #[test]
    fn video_too_large_display() {
        let e = ValidationError::VideoTooLarge {
            size: 150 * 1024 * 1024,
            limit: 100 * 1024 * 1024,
        };
        assert!(e.to_string().contains("100MB"), "got: {e}");
    }

    #[test]
    fn validation_is_flagged() {
        let e: RotError = ValidationError::EmptyInput.into();
        assert!(e.is_validation());
        assert!(!RotError::MissingMedia.is_validation());
    }

    #[test]
    fn no_results_display() {
        let e = RotError::NoResults { what: "mnemonics" };
        assert_eq!(e.to_string(), "No mnemonics were generated");
    }
}
