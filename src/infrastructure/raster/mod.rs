pub mod svg;

pub use svg::{RasterSettings, SvgSlideRasterizer};

use crate::domain::deck::Deck;
use crate::domain::media::RasterFrame;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to build slide {index} document: {message}")]
    Document { index: usize, message: String },
    #[error("failed to allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("failed to write frame '{path}': {message}")]
    Write { path: String, message: String },
    #[error("frame output directory '{path}' is not usable: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Converts deck slides into fixed-size raster images.
pub trait SlideRasterizer: Send + Sync {
    /// Writes one frame per slide into `out_dir`, in deck order.
    ///
    /// Fails as a whole on the first slide that cannot be written.
    fn rasterize(&self, deck: &Deck, out_dir: &Path) -> Result<Vec<RasterFrame>, RasterError>;
}
