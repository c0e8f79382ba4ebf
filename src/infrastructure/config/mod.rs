use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Storage
    pub output_dir: PathBuf,
    pub retain_work_dirs: bool,
    // External encoder
    pub ffmpeg_path: String,
    // Providers
    pub tts_provider: TtsProvider,
    pub tts_cache_enabled: bool,
    pub narration_language: String,
    pub summarizer: SummarizerProvider,
    pub openai_api_key: Option<String>,
    pub openai_summary_model: String,
    pub openai_tts_model: String,
    pub openai_tts_voice: String,
    pub aws_region: String,
    pub font_dir: Option<PathBuf>,
    // Policy values
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Google,
    OpenAi,
    Polly,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    Extractive,
    OpenAi,
}

/// Fixed policy values of the synthesis pipeline.
///
/// Defaults reproduce the behaviour of the first release: 1280x720 slides
/// wrapped at 40 characters, 5 seconds per slide, 1920x1080 output.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PipelineSettings {
    pub slide_width: u32,
    pub slide_height: u32,
    pub wrap_width: usize,
    pub font_family: String,
    pub font_size: f32,
    pub title_offset: (f32, f32),
    pub body_offset: (f32, f32),
    pub summary_font_size: u32,
    pub code_font_size: u32,
    pub attribution: String,
    pub frame_seconds: u32,
    pub video_width: u32,
    pub video_height: u32,
    pub summary_min_words: usize,
    pub summary_max_words: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            slide_width: 1280,
            slide_height: 720,
            wrap_width: 40,
            font_family: "Arial".to_string(),
            font_size: 24.0,
            title_offset: (10.0, 10.0),
            body_offset: (10.0, 50.0),
            summary_font_size: 18,
            code_font_size: 16,
            attribution: "Made By RIYA CHAND".to_string(),
            frame_seconds: 5,
            video_width: 1920,
            video_height: 1080,
            summary_min_words: 100,
            summary_max_words: 150,
        }
    }
}

impl PipelineSettings {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::default();

        let settings = PipelineSettings {
            slide_width: env_or("SLIDE_WIDTH", defaults.slide_width)?,
            slide_height: env_or("SLIDE_HEIGHT", defaults.slide_height)?,
            wrap_width: env_or("WRAP_WIDTH", defaults.wrap_width)?,
            font_family: env::var("SLIDE_FONT_FAMILY").unwrap_or(defaults.font_family),
            font_size: env_or("SLIDE_FONT_SIZE", defaults.font_size)?,
            title_offset: defaults.title_offset,
            body_offset: defaults.body_offset,
            summary_font_size: env_or("SUMMARY_FONT_SIZE", defaults.summary_font_size)?,
            code_font_size: env_or("CODE_FONT_SIZE", defaults.code_font_size)?,
            attribution: env::var("ATTRIBUTION").unwrap_or(defaults.attribution),
            frame_seconds: env_or("FRAME_SECONDS", defaults.frame_seconds)?,
            video_width: env_or("VIDEO_WIDTH", defaults.video_width)?,
            video_height: env_or("VIDEO_HEIGHT", defaults.video_height)?,
            summary_min_words: env_or("SUMMARY_MIN_WORDS", defaults.summary_min_words)?,
            summary_max_words: env_or("SUMMARY_MAX_WORDS", defaults.summary_max_words)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.slide_width == 0 || self.slide_height == 0 {
            return Err("slide width/height must be non-zero".to_string());
        }
        if self.video_width == 0
            || self.video_height == 0
            || self.video_width % 2 != 0
            || self.video_height % 2 != 0
        {
            return Err("video width/height must be even and non-zero (yuv420p output)".to_string());
        }
        if self.frame_seconds == 0 {
            return Err("frame duration must be at least one second".to_string());
        }
        if self.wrap_width == 0 {
            return Err("wrap width must be non-zero".to_string());
        }
        if self.summary_min_words > self.summary_max_words {
            return Err("summary min words cannot exceed max words".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            output_dir: PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "./temp".to_string())),
            retain_work_dirs: env_flag("RETAIN_WORK_DIRS"),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            tts_provider: match env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "google".to_string())
                .to_lowercase()
                .as_str()
            {
                "openai" => TtsProvider::OpenAi,
                "polly" => TtsProvider::Polly,
                _ => TtsProvider::Google,
            },
            tts_cache_enabled: env_flag("TTS_CACHE_ENABLED"),
            narration_language: env::var("NARRATION_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            summarizer: match env::var("SUMMARIZER")
                .unwrap_or_else(|_| "extractive".to_string())
                .to_lowercase()
                .as_str()
            {
                "openai" => SummarizerProvider::OpenAi,
                _ => SummarizerProvider::Extractive,
            },
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_summary_model: env::var("OPENAI_SUMMARY_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            openai_tts_voice: env::var("OPENAI_TTS_VOICE").unwrap_or_default(),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            font_dir: env::var("FONT_DIR").ok().map(PathBuf::from),
            pipeline: PipelineSettings::from_env()?,
        };

        if config.uses_openai() && config.openai_api_key.is_none() {
            return Err("OPENAI_API_KEY is required when an OpenAI provider is selected".into());
        }

        Ok(config)
    }

    pub fn uses_openai(&self) -> bool {
        self.tts_provider == TtsProvider::OpenAi || self.summarizer == SummarizerProvider::OpenAi
    }

    /// Directory holding the per-request working directories.
    pub fn work_root(&self) -> PathBuf {
        self.output_dir.join("work")
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::error::Error + 'static,
{
    match env::var(key) {
        Ok(value) => Ok(value.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|s| s.to_lowercase() == "true")
        .unwrap_or(false)
}
