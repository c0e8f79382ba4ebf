use super::stage::Stage;
use crate::domain::assembly::AssemblyError;
use crate::domain::narration::NarrationError;
use crate::infrastructure::raster::RasterError;
use crate::infrastructure::repositories::DeckStoreError;

/// A failed run, attributed to the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("working directory '{path}' is not usable: {message}")]
    WorkDir { path: String, message: String },
    #[error("summarization failed: {0}")]
    Summarization(String),
    #[error("deck file failed: {0}")]
    Deck(#[from] DeckStoreError),
    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),
    #[error("narration failed: {0}")]
    Narration(#[from] NarrationError),
    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("{stage} worker stopped: {message}")]
    Interrupted { stage: Stage, message: String },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::WorkDir { .. } => Stage::Preparing,
            PipelineError::Summarization(_) => Stage::Summarizing,
            PipelineError::Deck(_) => Stage::BuildingDeck,
            PipelineError::Raster(_) => Stage::Rasterizing,
            PipelineError::Narration(_) => Stage::Synthesizing,
            PipelineError::Assembly(_) => Stage::Assembling,
            PipelineError::Interrupted { stage, .. } => *stage,
        }
    }
}
