use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use parking_lot::Mutex;
use slidecast_backend::domain::media::RasterFrame;
use slidecast_backend::domain::narration::LanguageCode;
use slidecast_backend::infrastructure::config::{
    Config, Environment, LogFormat, PipelineSettings, SummarizerProvider, TtsProvider,
};
use slidecast_backend::infrastructure::ffmpeg::{Encoder, EncoderError, FrameEncoding};
use slidecast_backend::infrastructure::repositories::SpeechSynthesizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod api_client;
pub mod assertions;

use api_client::TestClient;

pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    pub encoder: Arc<StubEncoder>,
    pub synthesizer: Arc<StubSynthesizer>,
    _output: TempDir,
}

impl TestContext {
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    pub fn work_root(&self) -> PathBuf {
        self.config.work_root()
    }

    /// Names of the entries currently under the work root.
    pub fn work_entries(&self) -> Vec<String> {
        std::fs::read_dir(self.work_root())
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let output = tempfile::tempdir().expect("Failed to create output directory");

            // Create test configuration
            let config = Config {
                host: "127.0.0.1".to_string(),
                port: 0, // Will be assigned by the OS
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                output_dir: output.path().to_path_buf(),
                retain_work_dirs: false,
                ffmpeg_path: "ffmpeg".to_string(),
                tts_provider: TtsProvider::Google,
                tts_cache_enabled: false, // Disable cache in tests to avoid test pollution
                narration_language: "en".to_string(),
                summarizer: SummarizerProvider::Extractive,
                openai_api_key: None,
                openai_summary_model: "gpt-4o-mini".to_string(),
                openai_tts_model: "tts-1".to_string(),
                openai_tts_voice: String::new(),
                aws_region: "us-east-1".to_string(),
                font_dir: None,
                pipeline: PipelineSettings::default(),
            };
            std::fs::create_dir_all(config.work_root()).expect("Failed to create work root");

            let encoder = Arc::new(StubEncoder::default());
            let synthesizer = Arc::new(StubSynthesizer::default());

            let app = create_app_with_stubs(&config, encoder.clone(), synthesizer.clone())
                .expect("Failed to create app");

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            Self {
                client: TestClient::new(&base_url),
                config,
                encoder,
                synthesizer,
                _output: output,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Output directory is removed via Drop on TempDir
        }
    }
}

fn create_app_with_stubs(
    config: &Config,
    encoder: Arc<StubEncoder>,
    synthesizer: Arc<StubSynthesizer>,
) -> Result<Router> {
    use slidecast_backend::{
        controllers::video::VideoController,
        domain::{
            assembly::Assembler,
            deck::DeckBuilder,
            narration::{LanguagePolicy, NarrationService},
            pipeline::PipelineService,
        },
        infrastructure::{
            http::build_router,
            raster::{RasterSettings, SvgSlideRasterizer},
            repositories::{ExtractiveSummarizer, JsonDeckRenderer},
        },
    };

    let settings = &config.pipeline;

    let narration = Arc::new(NarrationService::new(
        synthesizer,
        LanguagePolicy::from_setting(&config.narration_language),
        config.tts_cache_enabled,
    ));
    let assembler = Arc::new(Assembler::new(
        encoder.clone(),
        FrameEncoding::from(settings),
    ));
    let pipeline = Arc::new(PipelineService::new(
        Arc::new(ExtractiveSummarizer::new(
            settings.summary_min_words,
            settings.summary_max_words,
        )),
        DeckBuilder::new(settings),
        Arc::new(JsonDeckRenderer),
        Arc::new(SvgSlideRasterizer::new(RasterSettings::from(settings), None)),
        narration,
        assembler,
    ));

    let video_controller = Arc::new(VideoController::new(pipeline, config));

    Ok(build_router(video_controller, encoder))
}

/// Speech synthesizer that returns a fixed payload and records what it was asked to say.
#[derive(Default)]
pub struct StubSynthesizer {
    pub spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, text: &str, _language: LanguageCode) -> Result<Vec<u8>, String> {
        self.spoken.lock().push(text.to_string());
        Ok(b"ID3stub-audio".to_vec())
    }

    fn provider(&self) -> &'static str {
        "stub"
    }
}

/// Encoder that writes placeholder files instead of running ffmpeg. The concatenated
/// output holds the manifest it was given, so tests can check segment order in the
/// downloaded file.
#[derive(Default)]
pub struct StubEncoder {
    pub calls: Mutex<Vec<String>>,
    fail_step: Mutex<Option<&'static str>>,
}

impl StubEncoder {
    pub fn fail_on(&self, step: &'static str) {
        *self.fail_step.lock() = Some(step);
    }

    fn record(&self, step: &'static str) -> Result<(), EncoderError> {
        self.calls.lock().push(step.to_string());
        if *self.fail_step.lock() == Some(step) {
            return Err(EncoderError::Failed {
                step,
                status: "exit status: 1".to_string(),
                stderr: "stub failure".to_string(),
            });
        }
        Ok(())
    }
}

fn write(step: &'static str, path: &Path, contents: &[u8]) -> Result<(), EncoderError> {
    std::fs::write(path, contents).map_err(|source| EncoderError::Spawn { step, source })
}

#[async_trait]
impl Encoder for StubEncoder {
    async fn encode_frames(
        &self,
        frames: &[RasterFrame],
        _encoding: &FrameEncoding,
        output: &Path,
    ) -> Result<(), EncoderError> {
        self.record("encode_frames")?;
        for frame in frames {
            assert!(frame.path.exists(), "frame {} missing", frame.path.display());
        }
        write("encode_frames", output, b"base-video")
    }

    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), EncoderError> {
        self.record("mux")?;
        assert!(video.exists() && audio.exists());
        write("mux", output, b"segment")
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), EncoderError> {
        self.record("concat")?;
        let listing = std::fs::read(manifest)
            .map_err(|source| EncoderError::Spawn { step: "concat", source })?;
        write("concat", output, &listing)
    }

    async fn is_available(&self) -> bool {
        true
    }
}
