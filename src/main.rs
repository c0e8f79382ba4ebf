use async_openai::{config::OpenAIConfig, Client as OpenAiClient};
use slidecast_backend::controllers::video::VideoController;
use slidecast_backend::domain::assembly::Assembler;
use slidecast_backend::domain::deck::DeckBuilder;
use slidecast_backend::domain::narration::{LanguagePolicy, NarrationService};
use slidecast_backend::domain::pipeline::{PipelineService, PipelineServiceApi};
use slidecast_backend::infrastructure::config::{Config, LogFormat, SummarizerProvider, TtsProvider};
use slidecast_backend::infrastructure::ffmpeg::{Encoder, FfmpegEncoder, FrameEncoding};
use slidecast_backend::infrastructure::http::{build_router, start_http_server};
use slidecast_backend::infrastructure::raster::{RasterSettings, SvgSlideRasterizer};
use slidecast_backend::infrastructure::repositories::{
    ExtractiveSummarizer, GoogleTtsSynthesizer, JsonDeckRenderer, OpenAiSummarizer,
    OpenAiTtsSynthesizer, PollyTtsSynthesizer, SpeechSynthesizer, Summarizer,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Slidecast Backend on {}:{}",
        config.host,
        config.port
    );

    tokio::fs::create_dir_all(config.work_root()).await?;
    tracing::info!(output_dir = %config.output_dir.display(), "Output directory ready");

    let encoder: Arc<dyn Encoder> = Arc::new(FfmpegEncoder::new(&config.ffmpeg_path));
    if !encoder.is_available().await {
        tracing::warn!(
            ffmpeg_path = %config.ffmpeg_path,
            "ffmpeg could not be started; video generation will fail until it is installed"
        );
    }

    let openai_client = config.openai_api_key.as_ref().map(|key| {
        Arc::new(OpenAiClient::with_config(
            OpenAIConfig::new().with_api_key(key.clone()),
        ))
    });

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate providers
    tracing::info!("Instantiating providers...");
    let summarizer = build_summarizer(&config, openai_client.clone())?;
    let synthesizer = build_synthesizer(&config, openai_client).await?;
    let rasterizer = Arc::new(SvgSlideRasterizer::new(
        RasterSettings::from(&config.pipeline),
        config.font_dir.as_deref(),
    ));

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let narration = Arc::new(NarrationService::new(
        synthesizer,
        LanguagePolicy::from_setting(&config.narration_language),
        config.tts_cache_enabled,
    ));
    let assembler = Arc::new(Assembler::new(
        encoder.clone(),
        FrameEncoding::from(&config.pipeline),
    ));
    let pipeline: Arc<dyn PipelineServiceApi> = Arc::new(PipelineService::new(
        summarizer,
        DeckBuilder::new(&config.pipeline),
        Arc::new(JsonDeckRenderer),
        rasterizer,
        narration,
        assembler,
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let video_controller = Arc::new(VideoController::new(pipeline, &config));

    // Start HTTP server with all routes
    let router = build_router(video_controller, encoder);
    start_http_server(config, router).await?;

    Ok(())
}

fn build_summarizer(
    config: &Config,
    openai_client: Option<Arc<OpenAiClient<OpenAIConfig>>>,
) -> Result<Arc<dyn Summarizer>, Box<dyn std::error::Error>> {
    let settings = &config.pipeline;
    let summarizer: Arc<dyn Summarizer> = match config.summarizer {
        SummarizerProvider::Extractive => Arc::new(ExtractiveSummarizer::new(
            settings.summary_min_words,
            settings.summary_max_words,
        )),
        SummarizerProvider::OpenAi => {
            let client = openai_client.ok_or("OPENAI_API_KEY is required for the OpenAI summarizer")?;
            Arc::new(OpenAiSummarizer::new(
                client,
                config.openai_summary_model.clone(),
                settings.summary_min_words,
                settings.summary_max_words,
            ))
        }
    };

    tracing::info!(provider = summarizer.provider(), "Summarizer selected");
    Ok(summarizer)
}

async fn build_synthesizer(
    config: &Config,
    openai_client: Option<Arc<OpenAiClient<OpenAIConfig>>>,
) -> Result<Arc<dyn SpeechSynthesizer>, Box<dyn std::error::Error>> {
    let synthesizer: Arc<dyn SpeechSynthesizer> = match config.tts_provider {
        TtsProvider::Google => Arc::new(GoogleTtsSynthesizer::new()?),
        TtsProvider::OpenAi => {
            let client = openai_client.ok_or("OPENAI_API_KEY is required for OpenAI TTS")?;
            Arc::new(OpenAiTtsSynthesizer::new(
                client,
                config.openai_tts_model.clone(),
                config.openai_tts_voice.clone(),
            ))
        }
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

            Arc::new(PollyTtsSynthesizer::new(Arc::new(aws_sdk_polly::Client::new(
                &aws_config,
            ))))
        }
    };

    tracing::info!(provider = synthesizer.provider(), "Speech synthesizer selected");
    Ok(synthesizer)
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "slidecast_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
