pub mod assembly;
pub mod deck;
pub mod media;
pub mod narration;
pub mod pipeline;
