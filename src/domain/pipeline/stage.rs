use super::error::PipelineError;
use crate::domain::deck::Deck;
use crate::domain::media::{AudioTrack, FinalVideo, RasterFrame};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preparing,
    Summarizing,
    BuildingDeck,
    Rasterizing,
    Synthesizing,
    Assembling,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Preparing => "preparing",
            Stage::Summarizing => "summarizing",
            Stage::BuildingDeck => "building_deck",
            Stage::Rasterizing => "rasterizing",
            Stage::Synthesizing => "synthesizing",
            Stage::Assembling => "assembling",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a run is, together with everything the earlier stages produced.
#[derive(Debug)]
pub enum PipelineState {
    Summarizing,
    BuildingDeck {
        summary: String,
    },
    Rasterizing {
        summary: String,
        deck: Deck,
    },
    Synthesizing {
        summary: String,
        deck: Deck,
        frames: Vec<RasterFrame>,
    },
    Assembling {
        frames: Vec<RasterFrame>,
        track: AudioTrack,
    },
    Done(FinalVideo),
    Failed(PipelineError),
}

impl PipelineState {
    /// Stage about to run, or `None` once the run is over.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Summarizing => Some(Stage::Summarizing),
            PipelineState::BuildingDeck { .. } => Some(Stage::BuildingDeck),
            PipelineState::Rasterizing { .. } => Some(Stage::Rasterizing),
            PipelineState::Synthesizing { .. } => Some(Stage::Synthesizing),
            PipelineState::Assembling { .. } => Some(Stage::Assembling),
            PipelineState::Done(_) | PipelineState::Failed(_) => None,
        }
    }
}
