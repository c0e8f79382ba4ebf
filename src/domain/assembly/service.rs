use super::error::AssemblyError;
use crate::domain::media::{segment_file_name, AudioTrack, FinalVideo, RasterFrame, VideoSegment};
use crate::infrastructure::ffmpeg::{concat_manifest_line, Encoder, FrameEncoding};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

pub const BASE_VIDEO_NAME: &str = "temp_video.mp4";
pub const MANIFEST_NAME: &str = "concat_list.txt";

/// Turns frames and narration into one video: a silent base video built once, one
/// segment per clip muxed against it, then a stream-copy concatenation in track order.
pub struct Assembler {
    encoder: Arc<dyn Encoder>,
    encoding: FrameEncoding,
}

impl Assembler {
    pub fn new(encoder: Arc<dyn Encoder>, encoding: FrameEncoding) -> Self {
        Self { encoder, encoding }
    }

    pub async fn assemble(
        &self,
        frames: &[RasterFrame],
        track: &AudioTrack,
        work_dir: &Path,
        output: &Path,
    ) -> Result<FinalVideo, AssemblyError> {
        if frames.is_empty() {
            return Err(AssemblyError::NoFrames);
        }
        if track.is_empty() {
            return Err(AssemblyError::EmptyTrack);
        }

        // The concat demuxer resolves manifest entries relative to the manifest, so every
        // path written into it is absolute.
        let work_dir = std::path::absolute(work_dir).map_err(|e| AssemblyError::io(work_dir, e))?;

        let base_video = work_dir.join(BASE_VIDEO_NAME);
        self.encoder
            .encode_frames(frames, &self.encoding, &base_video)
            .await?;
        tracing::info!(
            frames = frames.len(),
            path = %base_video.display(),
            "Base video encoded"
        );

        let manifest_path = work_dir.join(MANIFEST_NAME);
        let mut manifest = tokio::fs::File::create(&manifest_path)
            .await
            .map_err(|e| AssemblyError::io(&manifest_path, e))?;

        let mut segments = Vec::with_capacity(track.len());
        for (clip_index, clip) in track.clips().iter().enumerate() {
            let segment_path = work_dir.join(segment_file_name(&clip.path));
            self.encoder
                .mux(&base_video, &clip.path, &segment_path)
                .await?;

            manifest
                .write_all(concat_manifest_line(&segment_path).as_bytes())
                .await
                .map_err(|e| AssemblyError::io(&manifest_path, e))?;
            manifest
                .flush()
                .await
                .map_err(|e| AssemblyError::io(&manifest_path, e))?;

            tracing::debug!(
                clip = %clip.file_name(),
                segment = %segment_path.display(),
                "Segment muxed"
            );
            segments.push(VideoSegment {
                clip_index,
                path: segment_path,
            });
        }

        drop(manifest);

        self.encoder.concat(&manifest_path, output).await?;
        tracing::info!(
            segments = segments.len(),
            path = %output.display(),
            "Final video assembled"
        );

        Ok(FinalVideo {
            path: output.to_path_buf(),
            segments,
        })
    }
}
