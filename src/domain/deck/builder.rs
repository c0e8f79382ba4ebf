use super::{Deck, Slide};
use crate::infrastructure::config::PipelineSettings;

pub const SUMMARY_TITLE: &str = "Summary";
pub const CODE_TITLE: &str = "Code";

/// Builds the fixed three-slide deck: title, summary, code.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    attribution: String,
    summary_font_size: u32,
    code_font_size: u32,
}

impl DeckBuilder {
    pub fn new(settings: &PipelineSettings) -> Self {
        Self {
            attribution: settings.attribution.clone(),
            summary_font_size: settings.summary_font_size,
            code_font_size: settings.code_font_size,
        }
    }

    pub fn build(&self, topic: &str, summary: &str, code: &str) -> Deck {
        let slides = vec![
            Slide::new(topic, self.attribution.as_str()),
            Slide::new(SUMMARY_TITLE, summary).with_body_font_size(self.summary_font_size),
            Slide::new(CODE_TITLE, code).with_body_font_size(self.code_font_size),
        ];

        // Three fixed slides, never empty.
        Deck { slides }
    }
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new(&PipelineSettings::default())
    }
}
