#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("speech synthesis failed for {clip}: {message}")]
    Synthesis { clip: String, message: String },
    #[error("nothing to narrate for {clip}")]
    EmptyText { clip: String },
    #[error("failed to write audio clip '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid audio track: {0}")]
    Track(String),
}
