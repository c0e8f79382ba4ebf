use crate::domain::deck::Deck;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DeckStoreError {
    #[error("deck file I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("deck file '{path}' is not a valid deck: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Persists a deck to a slide-deck file and reads it back.
///
/// Round-trips title, body and notes of every slide losslessly.
pub trait DeckRenderer: Send + Sync {
    fn save(&self, deck: &Deck, path: &Path) -> Result<(), DeckStoreError>;

    fn load(&self, path: &Path) -> Result<Deck, DeckStoreError>;

    /// File extension of the deck format, without the dot.
    fn extension(&self) -> &'static str;
}

/// JSON slide-deck files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDeckRenderer;

impl DeckRenderer for JsonDeckRenderer {
    fn save(&self, deck: &Deck, path: &Path) -> Result<(), DeckStoreError> {
        let json = serde_json::to_vec_pretty(deck).map_err(|source| DeckStoreError::Format {
            path: path.display().to_string(),
            source,
        })?;

        std::fs::write(path, json).map_err(|source| DeckStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(path = %path.display(), slides = deck.len(), "Deck saved");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Deck, DeckStoreError> {
        let bytes = std::fs::read(path).map_err(|source| DeckStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| DeckStoreError::Format {
            path: path.display().to_string(),
            source,
        })
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
