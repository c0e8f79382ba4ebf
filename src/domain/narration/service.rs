use super::error::NarrationError;
use super::language::{LanguageCode, LanguagePolicy};
use crate::domain::deck::Deck;
use crate::domain::media::{AudioClip, AudioTrack, ClipSource};
use crate::infrastructure::repositories::SpeechSynthesizer;
use moka::future::Cache;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Produces the audio track of a request: one clip for the summary, then one clip per
/// slide that carries notes.
pub struct NarrationService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    language: LanguagePolicy,
    cache: Option<Cache<(LanguageCode, String), Arc<Vec<u8>>>>,
}

impl NarrationService {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        language: LanguagePolicy,
        cache_enabled: bool,
    ) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self {
            synthesizer,
            language,
            cache,
        }
    }

    /// Synthesizes the summary clip and every slide-notes clip into `audio_dir`.
    ///
    /// Any clip failing aborts the whole track.
    pub async fn synthesize(
        &self,
        summary: &str,
        deck: &Deck,
        audio_dir: &Path,
    ) -> Result<AudioTrack, NarrationError> {
        let summary_clip = self
            .synthesize_clip(ClipSource::Summary, summary, audio_dir)
            .await?;
        let mut track = AudioTrack::new(summary_clip);

        for (index, slide) in deck.slides().iter().enumerate() {
            let Some(notes) = slide.narration() else {
                continue;
            };

            let clip = self
                .synthesize_clip(ClipSource::Slide(index), notes, audio_dir)
                .await?;
            track.push_slide(clip).map_err(NarrationError::Track)?;
        }

        tracing::info!(
            clips = track.len(),
            slides = deck.len(),
            "Narration track synthesized"
        );

        Ok(track)
    }

    async fn synthesize_clip(
        &self,
        source: ClipSource,
        text: &str,
        audio_dir: &Path,
    ) -> Result<AudioClip, NarrationError> {
        let clip_name = source.file_name();
        let cleaned_text = normalize_whitespace(text);
        if cleaned_text.is_empty() {
            return Err(NarrationError::EmptyText { clip: clip_name });
        }

        let language = self.language.language_for(&cleaned_text);
        let audio = self.audio_for(&cleaned_text, language, &clip_name).await?;

        let path = audio_dir.join(&clip_name);
        tokio::fs::write(&path, audio.as_slice())
            .await
            .map_err(|source| NarrationError::Io {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(
            clip = %clip_name,
            language = %language,
            text_length = cleaned_text.len(),
            audio_size = audio.len(),
            "Audio clip written"
        );

        Ok(AudioClip {
            source,
            source_text: text.to_string(),
            language,
            path,
        })
    }

    async fn audio_for(
        &self,
        text: &str,
        language: LanguageCode,
        clip_name: &str,
    ) -> Result<Arc<Vec<u8>>, NarrationError> {
        let key = (language, text.to_string());

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                tracing::info!(clip = clip_name, "TTS cache hit - reusing synthesized audio");
                return Ok(cached);
            }
        }

        let audio = self
            .synthesizer
            .synthesize(text, language)
            .await
            .map_err(|message| NarrationError::Synthesis {
                clip: clip_name.to_string(),
                message,
            })?;
        let audio = Arc::new(audio);

        if let Some(cache) = &self.cache {
            cache.insert(key, audio.clone()).await;
        }

        Ok(audio)
    }
}

/// Collapses whitespace runs into single spaces. Everything else is spoken as written,
/// markup-looking text and links included.
fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_PATTERN.replace_all(text.trim(), " ").into_owned()
}
