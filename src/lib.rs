//! # researchrot
//!
//! Client-side request orchestration for the ResearchRot backend: turn a
//! research paper (URL, arXiv link or local PDF) into a summary, a podcast,
//! flashcards, mnemonics or a captioned "brain-rot" video.
//!
//! ## Pipeline Overview
//!
//! ```text
//! user input
//!  │
//!  ├─ 1. Input      trim, classify, arXiv abs → pdf, PDF header check
//!  ├─ 2. Payload    JSON body or multipart upload
//!  ├─ 3. Transport  one HTTP request, error envelope → RotError
//!  ├─ 4. Media      base64 audio/video → bytes
//!  └─ 5. Session    pending flag, view state, summary → flashcards/mnemonics
//! ```
//!
//! [`ResearchClient`] is the stateless API: one method per backend
//! operation. [`Session`] wraps it with the state a UI needs: one
//! single-flight [`Surface`] per feature and the [`Summary`] that unlocks
//! derived content.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use researchrot::{ClientConfig, Dispatch, ResearchClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://localhost:8000")
//!         .build()?;
//!     let mut session = Session::new(ResearchClient::new(config)?);
//!
//!     session.summarize("https://arxiv.org/abs/1706.03762").await;
//!     println!("{}", session.query.view());
//!
//!     if session.generate_flashcards().await == Dispatch::Completed {
//!         println!("{}", session.flashcards.view());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `researchrot` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! researchrot = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod brainrot;
pub mod client;
pub mod config;
pub mod derived;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod present;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use brainrot::{BrainRotRequest, BrainRotSource, BrainRotStyle, PhraseList, VideoFile, VideoSlot};
pub use client::ResearchClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL, MAX_VIDEO_BYTES};
pub use derived::{Flashcard, FlashcardCount, FlashcardDeck, Mnemonic, MnemonicCount, Summary};
pub use error::{RotError, ValidationError};
pub use output::{Artifact, HealthStatus, Podcast};
pub use pipeline::input::{normalize_url, resolve_source, NormalizedUrl, Source};
pub use pipeline::media::{MediaData, MediaKind};
pub use pipeline::transport::{Action, Endpoint};
pub use present::{MnemonicList, ViewState};
pub use progress::{NoopObserver, RequestObserver, SharedObserver};
pub use session::{Dispatch, Session, Surface, Ticket};
