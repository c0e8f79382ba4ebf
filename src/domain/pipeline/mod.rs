pub mod error;
pub mod service;
pub mod stage;

pub use error::PipelineError;
pub use service::{PipelineService, PipelineServiceApi, WorkLayout};
pub use stage::{PipelineState, Stage};

use serde::{Deserialize, Serialize};

/// The three inputs every video is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
    pub topic: String,
    pub content: String,
    pub code: String,
}

/// Request for POST /generate-video
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateVideoRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl GenerateVideoRequest {
    /// `None` when any field is missing or blank.
    pub fn into_input(self) -> Option<GenerationInput> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Some(GenerationInput {
            topic: present(self.topic)?,
            content: present(self.content)?,
            code: present(self.code)?,
        })
    }
}

/// Response for a generated video
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateVideoResponse {
    pub message: String,
    pub video_file: String,
}
