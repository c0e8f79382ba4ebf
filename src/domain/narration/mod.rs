pub mod error;
pub mod language;
pub mod service;

pub use error::NarrationError;
pub use language::{LanguageCode, LanguagePolicy};
pub use service::NarrationService;
