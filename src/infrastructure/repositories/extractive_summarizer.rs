use super::summarizer::Summarizer;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)").expect("sentence pattern is valid"));

/// Offline summarizer: keeps the leading sentences of the content until the summary
/// reaches `min_words`, never going past `max_words`.
pub struct ExtractiveSummarizer {
    min_words: usize,
    max_words: usize,
}

impl ExtractiveSummarizer {
    pub fn new(min_words: usize, max_words: usize) -> Self {
        Self {
            min_words,
            max_words: max_words.max(1),
        }
    }

    fn extract(&self, text: &str) -> String {
        let mut summary: Vec<String> = Vec::new();
        let mut word_count = 0;

        for sentence in SENTENCE.find_iter(text) {
            let words: Vec<&str> = sentence.as_str().split_whitespace().collect();
            if words.is_empty() {
                continue;
            }

            if word_count + words.len() > self.max_words {
                if summary.is_empty() {
                    // A single sentence longer than the budget is cut at the word limit.
                    summary.push(words[..self.max_words].join(" "));
                }
                break;
            }

            word_count += words.len();
            summary.push(words.join(" "));

            if word_count >= self.min_words {
                break;
            }
        }

        summary.join(" ")
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, String> {
        let summary = self.extract(text);
        if summary.is_empty() {
            return Err("Nothing to summarize".to_string());
        }

        tracing::info!(
            provider = self.provider(),
            original_length = text.len(),
            summary_length = summary.len(),
            "Content summarized"
        );

        Ok(summary)
    }

    fn provider(&self) -> &'static str {
        "extractive"
    }
}
