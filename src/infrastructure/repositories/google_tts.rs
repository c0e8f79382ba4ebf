use super::speech_synthesizer::{split_into_batches, SpeechSynthesizer};
use crate::domain::narration::LanguageCode;
use async_trait::async_trait;

/// The Translate TTS endpoint rejects requests longer than 100 characters
const MAX_BATCH_SIZE: usize = 100;

const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Google Translate TTS implementation of the speech synthesizer
pub struct GoogleTtsSynthesizer {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTtsSynthesizer {
    pub fn new() -> Result<Self, String> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64)")
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn request_url(&self, text: &str, language: LanguageCode, index: usize, total: usize) -> String {
        format!(
            "{}?ie=UTF-8&q={}&tl={}&total={}&idx={}&textlen={}&client=tw-ob",
            self.endpoint,
            urlencoding::encode(text),
            language.as_str(),
            total,
            index,
            text.chars().count()
        )
    }

    async fn call_google(
        &self,
        text: &str,
        language: LanguageCode,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, String> {
        let url = self.request_url(text, language, index, total);

        tracing::debug!(
            language = %language,
            batch_index = index,
            text_length = text.len(),
            "Calling Google Translate TTS"
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, batch_index = index, "Google TTS request failed");
            format!("Google TTS error: {}", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Google TTS returned status {}", status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read Google TTS audio: {}", e))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        let total = batches.len();

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_google(batch, language, index, total).await?;
            merged_audio.extend(audio);
        }

        tracing::info!(
            provider = self.provider(),
            language = %language,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            batch_count = total,
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }

    fn provider(&self) -> &'static str {
        "google"
    }
}
