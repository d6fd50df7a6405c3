pub mod ffmpeg;

pub use ffmpeg::FfmpegTranscoder;

use async_trait::async_trait;
use std::path::Path;

/// Output parameters handed to the transcoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// External audio transcoder.
///
/// Implementations read `input`, write a WAV file at `output` matching
/// `target`, and report failures with the encoder's error text.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn transcode(&self, input: &Path, output: &Path, target: TargetFormat) -> Result<(), String>;
}
