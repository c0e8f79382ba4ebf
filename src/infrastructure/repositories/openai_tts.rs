use super::speech_synthesizer::{split_into_batches, SpeechSynthesizer};
use crate::domain::narration::LanguageCode;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// OpenAI TTS implementation of the speech synthesizer
pub struct OpenAiTtsSynthesizer {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    default_voice: String,
}

impl OpenAiTtsSynthesizer {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String, default_voice: String) -> Self {
        Self {
            client,
            model,
            default_voice,
        }
    }

    fn voice_for_language(language: LanguageCode) -> Voice {
        match language {
            LanguageCode::English => Voice::Alloy,
            LanguageCode::Spanish => Voice::Echo,
            LanguageCode::French => Voice::Nova,
            LanguageCode::German => Voice::Onyx,
            LanguageCode::Italian => Voice::Fable,
            LanguageCode::Portuguese => Voice::Shimmer,
        }
    }

    fn voice(&self, language: LanguageCode) -> Voice {
        match self.default_voice.to_lowercase().as_str() {
            "" => Self::voice_for_language(language),
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            other => {
                tracing::warn!(voice = other, "Unknown OpenAI voice, using language default");
                Self::voice_for_language(language)
            }
        }
    }

    fn model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str, voice: Voice) -> Result<Vec<u8>, String> {
        tracing::debug!(
            model = %self.model,
            voice = ?voice,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: self.model(),
            input: text.to_string(),
            voice,
            response_format: None, // Defaults to MP3
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            format!("OpenAI TTS error: {}", e)
        })?;

        Ok(response.bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiTtsSynthesizer {
    async fn synthesize(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice = self.voice(language);

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_openai(batch, voice.clone()).await?;
            merged_audio.extend(audio);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        tracing::info!(
            provider = self.provider(),
            model = %self.model,
            voice = ?voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
