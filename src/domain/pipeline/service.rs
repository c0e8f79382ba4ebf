use super::error::PipelineError;
use super::stage::{PipelineState, Stage};
use super::GenerationInput;
use crate::domain::assembly::Assembler;
use crate::domain::deck::DeckBuilder;
use crate::domain::media::FinalVideo;
use crate::domain::narration::NarrationService;
use crate::infrastructure::raster::SlideRasterizer;
use crate::infrastructure::repositories::{DeckRenderer, Summarizer};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub const FINAL_VIDEO_NAME: &str = "final_video.mp4";

/// File layout of one request's working directory.
#[derive(Debug, Clone)]
pub struct WorkLayout {
    root: PathBuf,
}

impl WorkLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    pub fn deck_file(&self, extension: &str) -> PathBuf {
        self.root.join(format!("deck.{}", extension))
    }

    pub fn final_video(&self) -> PathBuf {
        self.root.join(FINAL_VIDEO_NAME)
    }

    /// Creates the directory tree. A directory that already holds files belongs to
    /// another run and is refused.
    async fn prepare(&self) -> Result<(), PipelineError> {
        let work_dir_error = |message: String| PipelineError::WorkDir {
            path: self.root.display().to_string(),
            message,
        };

        if let Ok(mut entries) = tokio::fs::read_dir(&self.root).await {
            if let Ok(Some(_)) = entries.next_entry().await {
                return Err(work_dir_error("directory is not empty".to_string()));
            }
        }

        for dir in [self.frames_dir(), self.audio_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| work_dir_error(e.to_string()))?;
        }

        Ok(())
    }
}

#[async_trait]
pub trait PipelineServiceApi: Send + Sync {
    /// Generates one video from `input` inside `work_dir`, which must be new or empty.
    async fn run(
        &self,
        input: &GenerationInput,
        work_dir: &Path,
    ) -> Result<FinalVideo, PipelineError>;
}

/// Runs summarize, deck, rasterize, narrate and assemble in strict order. The first
/// failing stage ends the run; nothing is retried.
pub struct PipelineService {
    summarizer: Arc<dyn Summarizer>,
    deck_builder: DeckBuilder,
    deck_renderer: Arc<dyn DeckRenderer>,
    rasterizer: Arc<dyn SlideRasterizer>,
    narration: Arc<NarrationService>,
    assembler: Arc<Assembler>,
}

impl PipelineService {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        deck_builder: DeckBuilder,
        deck_renderer: Arc<dyn DeckRenderer>,
        rasterizer: Arc<dyn SlideRasterizer>,
        narration: Arc<NarrationService>,
        assembler: Arc<Assembler>,
    ) -> Self {
        Self {
            summarizer,
            deck_builder,
            deck_renderer,
            rasterizer,
            narration,
            assembler,
        }
    }

    async fn advance(
        &self,
        state: PipelineState,
        input: &GenerationInput,
        layout: &WorkLayout,
    ) -> Result<PipelineState, PipelineError> {
        match state {
            PipelineState::Summarizing => {
                let summary = self
                    .summarizer
                    .summarize(&input.content)
                    .await
                    .map_err(PipelineError::Summarization)?;
                let summary = summary.trim().to_string();
                if summary.is_empty() {
                    return Err(PipelineError::Summarization(format!(
                        "{} summarizer returned no text",
                        self.summarizer.provider()
                    )));
                }

                tracing::debug!(
                    provider = self.summarizer.provider(),
                    summary_words = summary.split_whitespace().count(),
                    "Content summarized"
                );
                Ok(PipelineState::BuildingDeck { summary })
            }
            PipelineState::BuildingDeck { summary } => {
                let built = self.deck_builder.build(&input.topic, &summary, &input.code);
                let renderer = self.deck_renderer.clone();
                let deck_file = layout.deck_file(renderer.extension());

                // Later stages work from the deck as stored, not the in-memory copy.
                let deck = tokio::task::spawn_blocking(move || {
                    renderer.save(&built, &deck_file)?;
                    renderer.load(&deck_file)
                })
                .await
                .map_err(|e| PipelineError::Interrupted {
                    stage: Stage::BuildingDeck,
                    message: e.to_string(),
                })??;
                Ok(PipelineState::Rasterizing { summary, deck })
            }
            PipelineState::Rasterizing { summary, deck } => {
                let rasterizer = self.rasterizer.clone();
                let frames_dir = layout.frames_dir();
                let worker_deck = deck.clone();

                let frames = tokio::task::spawn_blocking(move || {
                    rasterizer.rasterize(&worker_deck, &frames_dir)
                })
                .await
                .map_err(|e| PipelineError::Interrupted {
                    stage: Stage::Rasterizing,
                    message: e.to_string(),
                })??;

                Ok(PipelineState::Synthesizing {
                    summary,
                    deck,
                    frames,
                })
            }
            PipelineState::Synthesizing {
                summary,
                deck,
                frames,
            } => {
                let track = self
                    .narration
                    .synthesize(&summary, &deck, &layout.audio_dir())
                    .await?;
                Ok(PipelineState::Assembling { frames, track })
            }
            PipelineState::Assembling { frames, track } => {
                let video = self
                    .assembler
                    .assemble(&frames, &track, layout.root(), &layout.final_video())
                    .await?;
                Ok(PipelineState::Done(video))
            }
            terminal @ (PipelineState::Done(_) | PipelineState::Failed(_)) => Ok(terminal),
        }
    }
}

#[async_trait]
impl PipelineServiceApi for PipelineService {
    async fn run(
        &self,
        input: &GenerationInput,
        work_dir: &Path,
    ) -> Result<FinalVideo, PipelineError> {
        let layout = WorkLayout::new(work_dir);
        let started = Instant::now();

        let mut state = match layout.prepare().await {
            Ok(()) => PipelineState::Summarizing,
            Err(e) => PipelineState::Failed(e),
        };

        loop {
            state = match state {
                PipelineState::Done(video) => {
                    tracing::info!(
                        path = %video.path.display(),
                        segments = video.segments.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Pipeline finished"
                    );
                    return Ok(video);
                }
                PipelineState::Failed(error) => {
                    tracing::error!(
                        stage = %error.stage(),
                        error = %error,
                        work_dir = %work_dir.display(),
                        "Pipeline failed"
                    );
                    return Err(error);
                }
                current => {
                    if let Some(stage) = current.stage() {
                        tracing::info!(stage = %stage, work_dir = %work_dir.display(), "Pipeline stage started");
                    }
                    self.advance(current, input, &layout)
                        .await
                        .unwrap_or_else(PipelineState::Failed)
                }
            };
        }
    }
}
