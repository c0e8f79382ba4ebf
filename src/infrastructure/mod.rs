pub mod config;
pub mod ffmpeg;
pub mod http;
pub mod raster;
pub mod repositories;
