pub mod builder;

pub use builder::DeckBuilder;

use serde::{Deserialize, Serialize};

/// One slide of a deck: a title, a body and optional speaker notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Point size the deck asks for its body text. Rasterization uses its own fixed size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_font_size: Option<u32>,
}

impl Slide {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            notes: None,
            body_font_size: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_body_font_size(mut self, size: u32) -> Self {
        self.body_font_size = Some(size);
        self
    }

    /// Notes that should be narrated: present and non-blank after trimming.
    pub fn narration(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}

/// Ordered, non-empty sequence of slides. Order is presentation and narration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeckFile", into = "DeckFile")]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    /// Returns `None` for an empty slide list.
    pub fn new(slides: Vec<Slide>) -> Option<Self> {
        if slides.is_empty() {
            None
        } else {
            Some(Self { slides })
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// On-disk shape of a deck.
#[derive(Debug, Serialize, Deserialize)]
struct DeckFile {
    slides: Vec<Slide>,
}

impl TryFrom<DeckFile> for Deck {
    type Error = String;

    fn try_from(file: DeckFile) -> Result<Self, Self::Error> {
        Deck::new(file.slides).ok_or_else(|| "deck must contain at least one slide".to_string())
    }
}

impl From<Deck> for DeckFile {
    fn from(deck: Deck) -> Self {
        Self { slides: deck.slides }
    }
}
