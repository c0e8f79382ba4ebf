pub mod error;
pub mod service;

pub use error::AssemblyError;
pub use service::{Assembler, BASE_VIDEO_NAME, MANIFEST_NAME};
