use crate::infrastructure::ffmpeg::EncoderError;

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("no frames to assemble")]
    NoFrames,
    #[error("audio track has no clips")]
    EmptyTrack,
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error("failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AssemblyError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        AssemblyError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
