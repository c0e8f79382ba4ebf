use super::{Encoder, EncoderError, FrameEncoding};
use crate::domain::media::{frame_file_name, RasterFrame, FRAME_PATTERN};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs the system `ffmpeg` binary, one process per operation.
pub struct FfmpegEncoder {
    binary: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, step: &'static str, args: Vec<OsString>) -> Result<(), EncoderError> {
        tracing::debug!(
            step,
            binary = %self.binary.display(),
            args = ?args,
            "Running ffmpeg"
        );

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| EncoderError::Spawn { step, source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(step, status = %output.status, stderr = %stderr, "ffmpeg failed");
            return Err(EncoderError::Failed {
                step,
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode_frames(
        &self,
        frames: &[RasterFrame],
        encoding: &FrameEncoding,
        output: &Path,
    ) -> Result<(), EncoderError> {
        let frames_dir = frame_sequence_dir(frames)?;
        self.run(
            "encode_frames",
            encode_frames_args(frames_dir, encoding, output),
        )
        .await
    }

    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), EncoderError> {
        self.run("mux", mux_args(video, audio, output)).await
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), EncoderError> {
        self.run("concat", concat_args(manifest, output)).await
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Checks that the frames form a contiguous `slide_001.png, slide_002.png, ...` run in one
/// directory and returns that directory.
fn frame_sequence_dir(frames: &[RasterFrame]) -> Result<&Path, EncoderError> {
    let first = frames
        .first()
        .ok_or_else(|| EncoderError::InvalidFrames("no frames to encode".to_string()))?;
    let dir = first.path.parent().ok_or_else(|| {
        EncoderError::InvalidFrames(format!("frame '{}' has no directory", first.path.display()))
    })?;

    for (position, frame) in frames.iter().enumerate() {
        if frame.index != position {
            return Err(EncoderError::InvalidFrames(format!(
                "frame {} found at position {}",
                frame.index, position
            )));
        }
        if frame.path != dir.join(frame_file_name(position)) {
            return Err(EncoderError::InvalidFrames(format!(
                "frame '{}' does not match {} in '{}'",
                frame.path.display(),
                FRAME_PATTERN,
                dir.display()
            )));
        }
    }

    Ok(dir)
}

fn common_args() -> Vec<OsString> {
    ["-y", "-hide_banner", "-loglevel", "error"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

fn encode_frames_args(frames_dir: &Path, encoding: &FrameEncoding, output: &Path) -> Vec<OsString> {
    let mut args = common_args();
    args.extend(
        [
            "-framerate".to_string(),
            format!("1/{}", encoding.frame_seconds),
            "-start_number".to_string(),
            "1".to_string(),
            "-i".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(frames_dir.join(FRAME_PATTERN).into_os_string());
    args.extend(
        [
            "-s".to_string(),
            format!("{}x{}", encoding.width, encoding.height),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    let mut args = common_args();
    args.push("-i".into());
    args.push(video.as_os_str().to_owned());
    args.push("-i".into());
    args.push(audio.as_os_str().to_owned());
    args.extend(
        [
            "-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac", "-shortest",
        ]
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
    let mut args = common_args();
    args.extend(["-f", "concat", "-safe", "0", "-i"].map(OsString::from));
    args.push(manifest.as_os_str().to_owned());
    args.extend(["-c", "copy"].map(OsString::from));
    args.push(output.as_os_str().to_owned());
    args
}

/// One concat demuxer line for `segment`. Single quotes are closed, escaped and reopened.
pub fn concat_manifest_line(segment: &Path) -> String {
    let quoted = segment.display().to_string().replace('\'', r"'\''");
    format!("file '{}'\n", quoted)
}
