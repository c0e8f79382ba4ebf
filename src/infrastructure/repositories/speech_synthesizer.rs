use crate::domain::narration::LanguageCode;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?]+\s+)").expect("sentence pattern is valid"));

/// Text-to-speech backend.
/// Abstracts the underlying provider (Google Translate TTS, AWS Polly, OpenAI, ...)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Provider-specific voice selection
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize text to speech for a given language
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String>;

    /// Short provider name used in logs.
    fn provider(&self) -> &'static str;
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_batch_size` bytes.
pub fn split_into_batches(text: &str, max_batch_size: usize) -> Vec<String> {
    if text.len() <= max_batch_size {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    for mat in SENTENCE_END.find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        // If adding this sentence would exceed the limit, save current batch
        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if sentence.len() > max_batch_size {
            push_word_chunks(&mut batches, sentence, max_batch_size);
        } else {
            current_batch.push_str(sentence);
        }
        last_end = mat.end();
    }

    // Handle remaining text after last sentence boundary
    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if remaining.len() > max_batch_size {
            push_word_chunks(&mut batches, remaining, max_batch_size);
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.trim().is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches
}

/// Splits an oversized run of text on whitespace, cutting single words by characters
/// only when they alone exceed the limit.
fn push_word_chunks(batches: &mut Vec<String>, text: &str, max_batch_size: usize) {
    let mut chunk = String::new();

    for word in text.split_whitespace() {
        if word.len() > max_batch_size {
            if !chunk.is_empty() {
                batches.push(std::mem::take(&mut chunk));
            }
            let mut piece = String::new();
            for ch in word.chars() {
                if piece.len() + ch.len_utf8() > max_batch_size {
                    batches.push(std::mem::take(&mut piece));
                }
                piece.push(ch);
            }
            if !piece.is_empty() {
                chunk = piece;
            }
            continue;
        }

        let needed = if chunk.is_empty() { word.len() } else { word.len() + 1 };
        if chunk.len() + needed > max_batch_size {
            batches.push(std::mem::take(&mut chunk));
        }
        if !chunk.is_empty() {
            chunk.push(' ');
        }
        chunk.push_str(word);
    }

    if !chunk.is_empty() {
        batches.push(chunk);
    }
}
