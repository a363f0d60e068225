//! Result presentation.
//!
//! A surface shows exactly one of nothing, an error, or a result.
//! [`ViewState`] encodes that as a single enum so "result and error both
//! set" cannot be represented. The `Display` impls here are the plain-text
//! rendering the CLI prints; other hosts can match on the variants instead.

use crate::derived::{FlashcardDeck, Mnemonic};
use crate::error::RotError;
use crate::output::Artifact;
use crate::pipeline::media::MediaData;
use serde::Serialize;
use std::fmt;

/// What a surface currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ViewState<T> {
    /// Nothing yet, or cleared at the start of a request.
    Idle,
    /// The last request failed with this message.
    Failed(String),
    /// The last request succeeded.
    Ready(T),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, RotError>) -> Self {
        match result {
            Ok(v) => ViewState::Ready(v),
            Err(e) => ViewState::Failed(e.user_message()),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            ViewState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn result_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ViewState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Idle => Ok(()),
            ViewState::Failed(msg) => write!(f, "Error: {msg}"),
            ViewState::Ready(v) => v.fmt(f),
        }
    }
}

// ── Artifact rendering ──────────────────────────────────────────────────

fn human_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB * KIB {
        format!("{:.1} MiB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}

impl fmt::Display for MediaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} · {}]", self.kind.mime(), human_size(self.len()))
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Summary { summary } => write!(f, "Summary:\n{summary}"),
            Artifact::Podcast(p) => write!(
                f,
                "Podcast Transcript:\n{}\n\nGenerated Audio: {}",
                p.transcript, p.audio
            ),
        }
    }
}

impl fmt::Display for FlashcardDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(card) = self.current() else {
            return write!(f, "No flashcards");
        };
        writeln!(f, "Card {} of {}", self.index() + 1, self.len())?;
        write!(f, "Question: {}", card.question)?;
        if self.is_revealed() {
            write!(f, "\nAnswer:   {}", card.answer)?;
        }
        Ok(())
    }
}

/// Numbered `concept: mnemonic` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MnemonicList(pub Vec<Mnemonic>);

impl fmt::Display for MnemonicList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Mnemonics")?;
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>2}. {}: {}", i + 1, m.concept, m.mnemonic)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::{Flashcard, Summary};
    use crate::output::Podcast;
    use crate::pipeline::media::MediaKind;

    #[test]
    fn idle_renders_nothing() {
        let v: ViewState<Artifact> = ViewState::default();
        assert!(v.is_idle());
        assert_eq!(v.to_string(), "");
    }

    #[test]
    fn error_and_result_are_exclusive() {
        let v: ViewState<String> = ViewState::from_result(Err(RotError::Http {
            status: 500,
            message: "bad pdf".into(),
        }));
        assert_eq!(v.error(), Some("bad pdf"));
        assert!(v.result().is_none());
        assert_eq!(v.to_string(), "Error: bad pdf");

        let v: ViewState<String> = ViewState::from_result(Ok("x".into()));
        assert!(v.error().is_none());
        assert_eq!(v.result().map(String::as_str), Some("x"));
    }

    #[test]
    fn podcast_rendering() {
        let a = Artifact::Podcast(Podcast {
            transcript: "T".into(),
            audio: MediaData {
                kind: MediaKind::AudioMpeg,
                bytes: b"ABC".to_vec(),
            },
        });
        let s = a.to_string();
        assert!(s.starts_with("Podcast Transcript:\nT"));
        assert!(s.contains("audio/mpeg · 3 B"), "got: {s}");
    }

    #[test]
    fn summary_rendering() {
        let a = Artifact::Summary {
            summary: Summary::new("It is about attention.").unwrap(),
        };
        assert_eq!(a.to_string(), "Summary:\nIt is about attention.");
    }

    #[test]
    fn deck_rendering_hides_answer_until_flipped() {
        let mut deck = FlashcardDeck::new(vec![Flashcard {
            question: "Q?".into(),
            answer: "A!".into(),
        }]);
        assert_eq!(deck.to_string(), "Card 1 of 1\nQuestion: Q?");
        deck.flip();
        assert!(deck.to_string().ends_with("Answer:   A!"));
    }

    #[test]
    fn mnemonic_rendering() {
        let list = MnemonicList(vec![
            Mnemonic {
                concept: "Attention".into(),
                mnemonic: "All Tokens Talk".into(),
            },
            Mnemonic {
                concept: "Softmax".into(),
                mnemonic: "Squash Scores".into(),
            },
        ]);
        let s = list.to_string();
        assert!(s.contains(" 1. Attention: All Tokens Talk"));
        assert!(s.contains(" 2. Softmax: Squash Scores"));
    }

    #[test]
    fn sizes() {
        assert_eq!(human_size(10), "10 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
