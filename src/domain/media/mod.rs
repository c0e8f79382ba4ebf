use crate::domain::narration::LanguageCode;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Rendered image of one slide. `index` is the zero-based slide position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RasterFrame {
    pub index: usize,
    pub path: PathBuf,
}

/// Printf-style pattern of frame file names, as understood by the encoder's image-sequence input.
pub const FRAME_PATTERN: &str = "slide_%03d.png";

/// File name of the frame for a zero-based slide index.
pub fn frame_file_name(index: usize) -> String {
    format!("slide_{:03}.png", index + 1)
}

/// What an audio clip narrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "slide")]
pub enum ClipSource {
    Summary,
    Slide(usize),
}

impl ClipSource {
    pub fn file_name(&self) -> String {
        match self {
            ClipSource::Summary => "summary.mp3".to_string(),
            ClipSource::Slide(index) => format!("slide_{}.mp3", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioClip {
    pub source: ClipSource,
    pub source_text: String,
    pub language: LanguageCode,
    pub path: PathBuf,
}

impl AudioClip {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.file_name())
    }
}

/// Ordered clips of one request: the summary first, then slide narration in slide order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrack {
    clips: Vec<AudioClip>,
}

impl AudioTrack {
    pub fn new(summary: AudioClip) -> Self {
        Self {
            clips: vec![summary],
        }
    }

    /// Appends a slide clip. Slide clips must arrive in ascending slide order.
    pub fn push_slide(&mut self, clip: AudioClip) -> Result<(), String> {
        let ClipSource::Slide(index) = clip.source else {
            return Err("the summary clip can only be the first clip".to_string());
        };
        if let Some(ClipSource::Slide(last)) = self.clips.last().map(|c| c.source) {
            if index <= last {
                return Err(format!(
                    "slide clip {} pushed after slide clip {}",
                    index, last
                ));
            }
        }
        self.clips.push(clip);
        Ok(())
    }

    pub fn clips(&self) -> &[AudioClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// One audio clip muxed against the full silent base video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoSegment {
    pub clip_index: usize,
    pub path: PathBuf,
}

/// Segment file name derived from the clip's audio file name, e.g. `video_summary.mp3.mp4`.
pub fn segment_file_name(audio_path: &Path) -> String {
    let audio_name = audio_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("video_{}.mp4", audio_name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalVideo {
    pub path: PathBuf,
    pub segments: Vec<VideoSegment>,
}
