use super::summarizer::Summarizer;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Rough upper bound of tokens per summary word, used to cap the completion length
const TOKENS_PER_WORD: usize = 2;

/// Summarizer backed by an OpenAI chat completion model
pub struct OpenAiSummarizer {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    min_words: usize,
    max_words: usize,
}

impl OpenAiSummarizer {
    pub fn new(
        client: Arc<Client<OpenAIConfig>>,
        model: String,
        min_words: usize,
        max_words: usize,
    ) -> Self {
        Self {
            client,
            model,
            min_words,
            max_words,
        }
    }

    fn instructions(&self) -> String {
        format!(
            "Summarize the user's text in plain prose between {} and {} words. \
             Do not use lists, headings or markdown.",
            self.min_words, self.max_words
        )
    }

    fn build_request(&self, text: &str) -> Result<CreateChatCompletionRequest, String> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(self.instructions())
            .build()
            .map_err(|e| format!("Invalid summary prompt: {}", e))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()
            .map_err(|e| format!("Invalid summary prompt: {}", e))?;

        CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages([system.into(), user.into()])
            .max_tokens((self.max_words * TOKENS_PER_WORD) as u32)
            .temperature(0.0)
            .build()
            .map_err(|e| format!("Invalid summary request: {}", e))
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, String> {
        let start_time = std::time::Instant::now();
        let request = self.build_request(text)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "OpenAI summary call failed");
            format!("OpenAI summary error: {}", e)
        })?;

        let summary = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| "OpenAI returned an empty summary".to_string())?;

        tracing::info!(
            provider = self.provider(),
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            original_length = text.len(),
            summary_length = summary.len(),
            "Content summarized"
        );

        Ok(summary)
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
