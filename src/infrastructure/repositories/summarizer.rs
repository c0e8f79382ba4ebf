use async_trait::async_trait;

/// Turns long content into the short text shown on the summary slide and narrated.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, String>;

    /// Short provider name used in logs.
    fn provider(&self) -> &'static str;
}
