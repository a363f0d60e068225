//! Pipeline stages for one backend request.
//!
//! Each submodule implements exactly one step between what the user typed
//! and the artifact handed back.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ payload ──▶ transport ──▶ media
//! (URL/path)  (JSON or    (HTTP, error   (base64 →
//!              multipart)  envelope)      bytes)
//! ```
//!
//! 1. [`input`]    : trim, classify and canonicalise the input; arXiv
//!    abstract links become direct PDF links, local files are checked for a
//!    PDF header
//! 2. [`payload`]  : build the request body for the chosen endpoint; local
//!    files and background videos go out as multipart
//! 3. [`transport`]: send exactly one request, map failures onto
//!    [`RotError`](crate::error::RotError) with per-action fallback text; the
//!    only stage with network I/O
//! 4. [`media`]    : decode base64 audio/video into [`MediaData`](media::MediaData)

pub mod input;
pub mod media;
pub mod payload;
pub mod transport;
