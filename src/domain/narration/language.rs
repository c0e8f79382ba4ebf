use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes supported for narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
}

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(LanguageCode::English),
            "es" => Some(LanguageCode::Spanish),
            "fr" => Some(LanguageCode::French),
            "de" => Some(LanguageCode::German),
            "it" => Some(LanguageCode::Italian),
            "pt" => Some(LanguageCode::Portuguese),
            _ => None,
        }
    }

    /// Convert lingua Language to LanguageCode
    pub fn from_lingua(language: Language) -> Self {
        match language {
            Language::English => LanguageCode::English,
            Language::Spanish => LanguageCode::Spanish,
            Language::French => LanguageCode::French,
            Language::German => LanguageCode::German,
            Language::Italian => LanguageCode::Italian,
            Language::Portuguese => LanguageCode::Portuguese,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the narration language is chosen for each clip.
pub enum LanguagePolicy {
    Fixed(LanguageCode),
    Detect(Box<LanguageDetector>),
}

impl LanguagePolicy {
    /// `auto` enables detection; any supported code fixes the language; anything else is English.
    pub fn from_setting(setting: &str) -> Self {
        if setting.trim().eq_ignore_ascii_case("auto") {
            let detector = LanguageDetectorBuilder::from_all_languages().build();
            return LanguagePolicy::Detect(Box::new(detector));
        }

        match LanguageCode::parse(setting) {
            Some(code) => LanguagePolicy::Fixed(code),
            None => {
                tracing::warn!(
                    setting = setting,
                    "Unsupported narration language, falling back to English"
                );
                LanguagePolicy::Fixed(LanguageCode::English)
            }
        }
    }

    pub fn language_for(&self, text: &str) -> LanguageCode {
        match self {
            LanguagePolicy::Fixed(code) => *code,
            LanguagePolicy::Detect(detector) => match detector.detect_language_of(text) {
                Some(language) => LanguageCode::from_lingua(language),
                None => {
                    tracing::warn!("Could not detect language, falling back to English");
                    LanguageCode::English
                }
            },
        }
    }
}
