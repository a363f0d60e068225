//! Request orchestration: pending flags, view state and the summary hand-off.
//!
//! Each UI surface (query, flashcards, mnemonics, brain-rot) is a
//! [`Surface`]: a single-flight slot that
//! 1. refuses a new request while one is pending,
//! 2. clears the previous result/error when a request starts,
//! 3. applies the outcome only if it belongs to the latest request
//!    (generation check), and
//! 4. always clears the pending flag, even if the awaiting future is
//!    dropped half-way.
//!
//! [`Session`] owns one surface per feature plus the [`Summary`] threaded
//! from the query surface into the derived-content generators. Without a
//! summary those generators are disabled: calling them is a no-op that
//! returns [`Dispatch::Skipped`] and sends nothing.

use crate::brainrot::{BrainRotRequest, PhraseList, VideoFile, VideoSlot};
use crate::client::ResearchClient;
use crate::derived::{FlashcardCount, FlashcardDeck, MnemonicCount, Summary};
use crate::error::{RotError, ValidationError};
use crate::output::Artifact;
use crate::pipeline::input::resolve_source;
use crate::pipeline::media::MediaData;
use crate::present::{MnemonicList, ViewState};
use std::future::Future;
use std::path::Path;
use tracing::{debug, warn};

/// What happened to a requested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The request ran; inspect the surface's view state for the outcome.
    Completed,
    /// A request on this surface is already pending; nothing was sent.
    Busy,
    /// The action is disabled (no summary yet); nothing was sent.
    Skipped,
    /// Local validation failed; the error is in the view state, nothing was sent.
    Rejected,
}

/// Proof that a request was started on a surface.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a ticket must be completed or abandoned"]
pub struct Ticket {
    generation: u64,
}

/// Single-flight request slot with its view state.
#[derive(Debug)]
pub struct Surface<T> {
    pending: bool,
    generation: u64,
    view: ViewState<T>,
}

impl<T> Default for Surface<T> {
    fn default() -> Self {
        Self {
            pending: false,
            generation: 0,
            view: ViewState::Idle,
        }
    }
}

impl<T> Surface<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn view(&self) -> &ViewState<T> {
        &self.view
    }

    /// Mutable access to a ready result, e.g. to browse a flashcard deck.
    pub fn result_mut(&mut self) -> Option<&mut T> {
        self.view.result_mut()
    }

    /// Start a request: clear the view and mark pending.
    ///
    /// Returns `None` while another request is pending.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.pending {
            return None;
        }
        self.generation += 1;
        self.pending = true;
        self.view = ViewState::Idle;
        Some(Ticket {
            generation: self.generation,
        })
    }

    /// Apply an outcome. Returns `false` (and changes nothing) if the ticket
    /// belongs to a superseded request.
    pub fn complete(&mut self, ticket: Ticket, result: Result<T, RotError>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                "Discarding stale response (generation {} < {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.pending = false;
        self.view = ViewState::from_result(result);
        true
    }

    /// Give up on a request without an outcome; the view stays cleared.
    pub fn abandon(&mut self, ticket: Ticket) {
        if ticket.generation == self.generation {
            debug!("Request generation {} abandoned", ticket.generation);
            self.pending = false;
        }
    }

    /// Show a local validation failure without sending anything.
    ///
    /// Ignored while a request is pending so an in-flight result is never
    /// overwritten.
    pub fn reject(&mut self, err: ValidationError) -> Dispatch {
        if self.pending {
            return Dispatch::Busy;
        }
        self.view = ViewState::Failed(err.to_string());
        Dispatch::Rejected
    }

    /// Drop the current view and orphan any pending request.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending = false;
        self.view = ViewState::Idle;
    }

    /// Run one request through the begin → await → complete cycle.
    pub async fn run<F>(&mut self, request: F) -> Dispatch
    where
        F: Future<Output = Result<T, RotError>>,
    {
        let Some(ticket) = self.begin() else {
            return Dispatch::Busy;
        };
        let guard = InFlight {
            surface: self,
            ticket: Some(ticket),
        };
        let result = request.await;
        guard.finish(result);
        Dispatch::Completed
    }
}

/// Clears the pending flag on drop unless the request finished normally.
struct InFlight<'a, T> {
    surface: &'a mut Surface<T>,
    ticket: Option<Ticket>,
}

impl<T> InFlight<'_, T> {
    fn finish(mut self, result: Result<T, RotError>) {
        if let Some(ticket) = self.ticket.take() {
            self.surface.complete(ticket, result);
        }
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.surface.abandon(ticket);
        }
    }
}

// ── Session ─────────────────────────────────────────────────────────────

/// All client-side state for one user session.
pub struct Session {
    client: ResearchClient,
    summary: Option<Summary>,
    flashcard_count: FlashcardCount,
    mnemonic_count: MnemonicCount,
    pub phrases: PhraseList,
    video: VideoSlot,
    pub query: Surface<Artifact>,
    pub flashcards: Surface<FlashcardDeck>,
    pub mnemonics: Surface<MnemonicList>,
    pub brainrot: Surface<MediaData>,
}

impl Session {
    pub fn new(client: ResearchClient) -> Self {
        Self {
            client,
            summary: None,
            flashcard_count: FlashcardCount::default(),
            mnemonic_count: MnemonicCount::default(),
            phrases: PhraseList::new(),
            video: VideoSlot::new(),
            query: Surface::new(),
            flashcards: Surface::new(),
            mnemonics: Surface::new(),
            brainrot: Surface::new(),
        }
    }

    pub fn client(&self) -> &ResearchClient {
        &self.client
    }

    // ── Query surface ────────────────────────────────────────────────────

    /// Summarise a URL or local PDF. A successful summary enables the
    /// derived-content generators.
    pub async fn summarize(&mut self, input: &str) -> Dispatch {
        let source = match resolve_source(input) {
            Ok(s) => s,
            Err(e) => return self.query.reject(e),
        };
        let client = &self.client;
        let dispatch = self
            .query
            .run(async {
                let summary = client.summarize(&source).await?;
                Ok(Artifact::Summary { summary })
            })
            .await;
        if let Some(summary) = self.query.view().result().and_then(Artifact::as_summary) {
            self.summary = Some(summary.clone());
        }
        dispatch
    }

    /// Generate a podcast for a URL or local PDF.
    pub async fn generate_podcast(&mut self, input: &str) -> Dispatch {
        let source = match resolve_source(input) {
            Ok(s) => s,
            Err(e) => return self.query.reject(e),
        };
        let client = &self.client;
        self.query
            .run(async { client.generate_podcast(&source).await.map(Artifact::Podcast) })
            .await
    }

    // ── Derived content ──────────────────────────────────────────────────

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Supply a summary obtained elsewhere, e.g. saved from an earlier run.
    pub fn set_summary(&mut self, summary: Summary) {
        self.summary = Some(summary);
    }

    /// Whether flashcard and mnemonic generation are enabled.
    pub fn can_generate_derived(&self) -> bool {
        self.summary.is_some()
    }

    pub fn set_flashcard_count(&mut self, n: u32) {
        self.flashcard_count = FlashcardCount::new(n);
    }

    pub fn flashcard_count(&self) -> FlashcardCount {
        self.flashcard_count
    }

    pub fn set_mnemonic_count(&mut self, n: u32) {
        self.mnemonic_count = MnemonicCount::new(n);
    }

    pub fn mnemonic_count(&self) -> MnemonicCount {
        self.mnemonic_count
    }

    /// Generate (or regenerate) the flashcard deck. Replacing the deck
    /// rewinds it to the first card, question side up.
    pub async fn generate_flashcards(&mut self) -> Dispatch {
        let Some(summary) = self.summary.as_ref() else {
            debug!("Flashcards requested without a summary; ignoring");
            return Dispatch::Skipped;
        };
        let client = &self.client;
        let count = self.flashcard_count;
        self.flashcards
            .run(async {
                let cards = client.generate_flashcards(summary, count).await?;
                Ok(FlashcardDeck::new(cards))
            })
            .await
    }

    pub async fn generate_mnemonics(&mut self) -> Dispatch {
        let Some(summary) = self.summary.as_ref() else {
            debug!("Mnemonics requested without a summary; ignoring");
            return Dispatch::Skipped;
        };
        let client = &self.client;
        let count = self.mnemonic_count;
        self.mnemonics
            .run(async {
                let items = client.generate_mnemonics(summary, count).await?;
                Ok(MnemonicList(items))
            })
            .await
    }

    /// The current deck, for navigation.
    pub fn deck_mut(&mut self) -> Option<&mut FlashcardDeck> {
        self.flashcards.result_mut()
    }

    // ── Brain-rot ────────────────────────────────────────────────────────

    /// Pick a background video. A rejected file leaves the previous choice
    /// in place and shows the reason on the brain-rot surface.
    pub fn select_video(&mut self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let limit = self.client.config().max_video_bytes;
        let outcome = VideoFile::from_path(path).and_then(|v| self.video.select(v, limit));
        match &outcome {
            Ok(()) => {
                if self.brainrot.view().error().is_some() {
                    self.brainrot.view = ViewState::Idle;
                }
            }
            Err(e) => {
                self.brainrot.reject(e.clone());
            }
        }
        outcome
    }

    pub fn selected_video(&self) -> Option<&VideoFile> {
        self.video.get()
    }

    /// Render captions over the selected video.
    pub async fn generate_brainrot(&mut self) -> Dispatch {
        let style = self.client.config().brainrot_style.clone();
        let request = match BrainRotRequest::from_video(self.video.get(), &self.phrases, style) {
            Ok(r) => r,
            Err(e) => return self.brainrot.reject(e),
        };
        self.run_brainrot(request).await
    }

    /// Render a brain-rot video from a PDF URL instead of a local video.
    pub async fn generate_brainrot_from_pdf(&mut self, url: &str) -> Dispatch {
        let url = url.trim();
        if url.is_empty() {
            return self.brainrot.reject(ValidationError::EmptyInput);
        }
        let style = self.client.config().brainrot_style.clone();
        let normalized = crate::pipeline::input::normalize_url(url);
        self.run_brainrot(BrainRotRequest::from_pdf_url(normalized.url, style))
            .await
    }

    async fn run_brainrot(&mut self, request: BrainRotRequest) -> Dispatch {
        let client = &self.client;
        self.brainrot
            .run(async { client.generate_brainrot(&request).await })
            .await
    }
}
