// End-to-end tests for the Slidecast Backend HTTP API
//
// Each test gets its own server on an ephemeral port and its own temporary
// output directory. Summarization and slide rasterization are real; speech
// synthesis and the ffmpeg encoder are replaced by deterministic stubs so the
// suite runs without network access or an ffmpeg install.

mod helpers;
mod test_generate_video;
mod test_health;
