pub mod deck_renderer;
pub mod extractive_summarizer;
pub mod google_tts;
pub mod openai_summarizer;
pub mod openai_tts;
pub mod polly_tts;
pub mod speech_synthesizer;
pub mod summarizer;

pub use deck_renderer::{DeckRenderer, DeckStoreError, JsonDeckRenderer};
pub use extractive_summarizer::ExtractiveSummarizer;
pub use google_tts::GoogleTtsSynthesizer;
pub use openai_summarizer::OpenAiSummarizer;
pub use openai_tts::OpenAiTtsSynthesizer;
pub use polly_tts::PollyTtsSynthesizer;
pub use speech_synthesizer::SpeechSynthesizer;
pub use summarizer::Summarizer;
