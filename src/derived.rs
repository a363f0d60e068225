//! Derived content: flashcards and mnemonics generated from a summary.
//!
//! Both generators depend on a summary the backend produced earlier. That
//! dependency is a type: [`Summary`] can only be obtained from a successful
//! summarize call (or from explicit non-empty text), so a generator that
//! holds one is known to be enabled.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Summary capability ──────────────────────────────────────────────────

/// Server-produced digest of a document; required input for derived content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Summary(String);

impl Summary {
    /// Wrap existing summary text, e.g. one saved from an earlier run.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptySummary { what: "content" });
        }
        Ok(Self(text))
    }

    /// `None` for a blank answer; a summary always carries text.
    pub(crate) fn from_answer(answer: String) -> Option<Self> {
        (!answer.trim().is_empty()).then_some(Self(answer))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Counts ──────────────────────────────────────────────────────────────

/// Number of flashcards to request. Always within 5..=20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlashcardCount(u8);

impl FlashcardCount {
    pub const MIN: u8 = 5;
    pub const MAX: u8 = 20;

    pub fn new(n: u32) -> Self {
        Self(n.clamp(Self::MIN as u32, Self::MAX as u32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for FlashcardCount {
    fn default() -> Self {
        Self(10)
    }
}

/// Number of mnemonics to request. Always within 3..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MnemonicCount(u8);

impl MnemonicCount {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 10;

    pub fn new(n: u32) -> Self {
        Self(n.clamp(Self::MIN as u32, Self::MAX as u32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for MnemonicCount {
    fn default() -> Self {
        Self(5)
    }
}

// ── Generated items ─────────────────────────────────────────────────────

/// A question/answer pair for recall practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// A memory aid for one concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mnemonic {
    pub concept: String,
    pub mnemonic: String,
}

// ── Flashcard deck ──────────────────────────────────────────────────────

/// Flashcards plus a browsing cursor and a revealed flag.
///
/// Invariant: when the deck is non-empty, `index < cards.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    revealed: bool,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            index: 0,
            revealed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    /// Zero-based cursor.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the answer side is showing.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.cards.len()
    }

    /// Advance one card. No-op on the last card.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        self.revealed = false;
        true
    }

    /// Go back one card. No-op on the first card.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        self.revealed = false;
        true
    }

    /// Toggle between question and answer.
    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Swap in a freshly generated deck and rewind.
    pub fn replace(&mut self, cards: Vec<Flashcard>) {
        *self = Self::new(cards);
    }
}
