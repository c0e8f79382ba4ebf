pub mod encoder;

pub use encoder::{concat_manifest_line, FfmpegEncoder};

use crate::domain::media::RasterFrame;
use crate::infrastructure::config::PipelineSettings;
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("failed to start the encoder for {step}: {source}")]
    Spawn {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("encoder {step} exited with status {status}: {stderr}")]
    Failed {
        step: &'static str,
        status: String,
        stderr: String,
    },
    #[error("invalid frame sequence: {0}")]
    InvalidFrames(String),
}

impl EncoderError {
    pub fn step(&self) -> Option<&'static str> {
        match self {
            EncoderError::Spawn { step, .. } | EncoderError::Failed { step, .. } => Some(step),
            EncoderError::InvalidFrames(_) => None,
        }
    }
}

/// Output geometry and pacing of the silent base video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEncoding {
    /// How long each slide stays on screen.
    pub frame_seconds: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&PipelineSettings> for FrameEncoding {
    fn from(settings: &PipelineSettings) -> Self {
        Self {
            frame_seconds: settings.frame_seconds,
            width: settings.video_width,
            height: settings.video_height,
        }
    }
}

/// External video encoder. Every operation names its inputs and output explicitly
/// and fails on the first non-successful run.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encodes the frames, in order, into a silent H.264/yuv420p video.
    async fn encode_frames(
        &self,
        frames: &[RasterFrame],
        encoding: &FrameEncoding,
        output: &Path,
    ) -> Result<(), EncoderError>;

    /// Combines a video with an audio clip, stopping at the shorter of the two.
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), EncoderError>;

    /// Concatenates the segments listed in `manifest` without re-encoding.
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), EncoderError>;

    async fn is_available(&self) -> bool;
}
