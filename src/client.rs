//! Typed operations against the backend.
//!
//! [`ResearchClient`] is the stateless half of the library: each method
//! normalises its input, sends exactly one logical request (two for local
//! PDFs, which are uploaded first) and returns decoded artifacts. Pending
//! flags and view state live in [`crate::session`].

use crate::brainrot::BrainRotRequest;
use crate::config::ClientConfig;
use crate::derived::{Flashcard, FlashcardCount, Mnemonic, MnemonicCount, Summary};
use crate::error::RotError;
use crate::output::{
    BrainRotResponse, FlashcardsResponse, HealthStatus, MnemonicsResponse, Podcast,
    PodcastResponse, QueryResponse, UploadResponse,
};
use crate::pipeline::input::{check_pdf, Source};
use crate::pipeline::media::{decode_media, MediaData, MediaKind};
use crate::pipeline::payload::{DerivedBody, RequestPayload, WireBody};
use crate::pipeline::transport::{Action, Transport};
use std::path::Path;
use tracing::{debug, info};

/// Client for the ResearchRot backend.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
/// ```rust,no_run
/// use researchrot::{resolve_source, ClientConfig, ResearchClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ResearchClient::new(ClientConfig::default())?;
/// let source = resolve_source("https://arxiv.org/abs/1706.03762")?;
/// let summary = client.summarize(&source).await?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ResearchClient {
    transport: Transport,
}

impl ResearchClient {
    pub fn new(config: ClientConfig) -> Result<Self, RotError> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Summarise a document.
    pub async fn summarize(&self, source: &Source) -> Result<Summary, RotError> {
        let (action, payload) = self.prepare(source, Action::SummarizeUrl, Action::SummarizeFile).await?;
        let resp: QueryResponse = self.send_payload(action, &payload).await?;
        Summary::from_answer(resp.answer).ok_or(RotError::EmptyAnswer)
    }

    /// Ask a free-text question, optionally grounded in document text.
    pub async fn query_text(
        &self,
        text: impl Into<String>,
        file_content: Option<String>,
    ) -> Result<String, RotError> {
        let payload = RequestPayload::Text {
            text: text.into(),
            file_content,
        };
        let resp: QueryResponse = self.send_payload(Action::Ask, &payload).await?;
        Ok(resp.answer)
    }

    /// Turn a document into a podcast transcript plus MP3 audio.
    pub async fn generate_podcast(&self, source: &Source) -> Result<Podcast, RotError> {
        let (action, payload) = self.prepare(source, Action::PodcastUrl, Action::PodcastFile).await?;
        let resp: PodcastResponse = self.send_payload(action, &payload).await?;
        let encoded = resp
            .audio_file
            .filter(|a| !a.trim().is_empty())
            .ok_or(RotError::MissingMedia)?;
        let audio = decode_media(&encoded, MediaKind::AudioMpeg, action)?;
        Ok(Podcast {
            transcript: resp.transcript,
            audio,
        })
    }

    /// Store a local PDF on the backend; returns the server-side path.
    pub async fn upload_pdf(&self, path: &Path) -> Result<String, RotError> {
        let path = check_pdf(path)?;
        let resp: UploadResponse = self
            .transport
            .send(Action::UploadPdf, WireBody::pdf_upload(&path))
            .await?;
        info!("Uploaded {} → {}", path.display(), resp.pdf_path);
        Ok(resp.pdf_path)
    }

    /// Fails with [`RotError::NoResults`] if the backend returns none.
    pub async fn generate_flashcards(
        &self,
        summary: &Summary,
        count: FlashcardCount,
    ) -> Result<Vec<Flashcard>, RotError> {
        let resp: FlashcardsResponse = self
            .send_derived(Action::Flashcards, summary, count.get())
            .await?;
        if resp.flashcards.is_empty() {
            return Err(RotError::NoResults { what: "flashcards" });
        }
        Ok(resp.flashcards)
    }

    /// Fails with [`RotError::NoResults`] if the backend returns none.
    pub async fn generate_mnemonics(
        &self,
        summary: &Summary,
        count: MnemonicCount,
    ) -> Result<Vec<Mnemonic>, RotError> {
        let resp: MnemonicsResponse = self
            .send_derived(Action::Mnemonics, summary, count.get())
            .await?;
        if resp.mnemonics.is_empty() {
            return Err(RotError::NoResults { what: "mnemonics" });
        }
        Ok(resp.mnemonics)
    }

    /// Render a captioned video; returns MP4 bytes.
    pub async fn generate_brainrot(&self, request: &BrainRotRequest) -> Result<MediaData, RotError> {
        let payload = RequestPayload::BrainRot(request.clone());
        let resp: BrainRotResponse = self.send_payload(Action::BrainRot, &payload).await?;
        let encoded = resp
            .video_file
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| RotError::Decode {
                action: Action::BrainRot,
                detail: "response has no video_file".into(),
            })?;
        decode_media(&encoded, MediaKind::VideoMp4, Action::BrainRot)
    }

    pub async fn health(&self) -> Result<HealthStatus, RotError> {
        self.transport.get(Action::Health).await
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    /// Build the payload for a URL or local-PDF source, uploading the file
    /// first when needed.
    async fn prepare(
        &self,
        source: &Source,
        url_action: Action,
        file_action: Action,
    ) -> Result<(Action, RequestPayload), RotError> {
        match source {
            Source::Url(n) => Ok((url_action, n.clone().into())),
            Source::PdfFile(path) => {
                let pdf_path = self.upload_pdf(path).await?;
                Ok((file_action, RequestPayload::Upload { pdf_path }))
            }
        }
    }

    async fn send_payload<T: serde::de::DeserializeOwned>(
        &self,
        action: Action,
        payload: &RequestPayload,
    ) -> Result<T, RotError> {
        let body = payload.to_wire().map_err(|e| RotError::Decode {
            action,
            detail: format!("could not encode request: {e}"),
        })?;
        debug!("{} payload: {:?}", action.label(), payload);
        self.transport.send(action, body).await
    }

    async fn send_derived<T: serde::de::DeserializeOwned>(
        &self,
        action: Action,
        summary: &Summary,
        count: u8,
    ) -> Result<T, RotError> {
        let body = serde_json::to_value(DerivedBody {
            summary: summary.as_str(),
            count,
        })
        .map_err(|e| RotError::Decode {
            action,
            detail: format!("could not encode request: {e}"),
        })?;
        self.transport.send(action, WireBody::Json(body)).await
    }
}
