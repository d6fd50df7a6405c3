use super::error::AudioError;
use super::format::{
    classify_format, inspect_wav, is_canonical_wav, FormatTag, TARGET_BITS_PER_SAMPLE,
    TARGET_CHANNELS, TARGET_SAMPLE_RATE,
};
use crate::infrastructure::transcoder::{AudioTranscoder, TargetFormat};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

pub const CANONICAL_TARGET: TargetFormat = TargetFormat {
    channels: TARGET_CHANNELS,
    sample_rate: TARGET_SAMPLE_RATE,
    bits_per_sample: TARGET_BITS_PER_SAMPLE,
};

#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    pub wav: Vec<u8>,
    pub format_detected: FormatTag,
}

/// Turns arbitrary audio bytes into canonical WAV
pub struct AudioNormalizer {
    transcoder: Arc<dyn AudioTranscoder>,
    scratch_dir: PathBuf,
}

impl AudioNormalizer {
    pub fn new(transcoder: Arc<dyn AudioTranscoder>, scratch_dir: PathBuf) -> Self {
        Self {
            transcoder,
            scratch_dir,
        }
    }

    /// Return `buffer` unchanged when it is already RIFF/WAVE, otherwise
    /// transcode it to mono 16-bit PCM at 22050 Hz.
    pub async fn normalize(&self, buffer: Vec<u8>) -> Result<NormalizedAudio, AudioError> {
        let format = classify_format(&buffer);

        if is_canonical_wav(&buffer) {
            match inspect_wav(&buffer) {
                Some(layout) if !layout.is_target() => tracing::warn!(
                    channels = layout.channels,
                    sample_rate = layout.sample_rate,
                    bits_per_sample = layout.bits_per_sample,
                    "WAV input passed through without matching the target layout"
                ),
                None => tracing::warn!(
                    size = buffer.len(),
                    "WAV input passed through with an unreadable fmt chunk"
                ),
                _ => {}
            }
            return Ok(NormalizedAudio {
                wav: buffer,
                format_detected: FormatTag::Wav,
            });
        }

        tracing::info!(
            format = %format,
            size = buffer.len(),
            "Transcoding audio to canonical WAV"
        );

        let stem = scratch_stem();
        let input_path = self
            .scratch_dir
            .join(format!("{}_in.{}", stem, format.scratch_extension()));
        let output_path = self.scratch_dir.join(format!("{}_out.wav", stem));

        let result = self
            .transcode_via_scratch(&buffer, &input_path, &output_path, format)
            .await;

        release_scratch(&input_path).await;
        release_scratch(&output_path).await;

        let wav = result?;
        Ok(NormalizedAudio {
            wav,
            format_detected: format,
        })
    }

    async fn transcode_via_scratch(
        &self,
        buffer: &[u8],
        input_path: &Path,
        output_path: &Path,
        format: FormatTag,
    ) -> Result<Vec<u8>, AudioError> {
        let conversion_failed = |message: String| AudioError::ConversionFailed { format, message };

        tokio::fs::write(input_path, buffer)
            .await
            .map_err(|e| conversion_failed(format!("failed to write scratch input: {}", e)))?;

        self.transcoder
            .transcode(input_path, output_path, CANONICAL_TARGET)
            .await
            .map_err(conversion_failed)?;

        let wav = tokio::fs::read(output_path)
            .await
            .map_err(|e| conversion_failed(format!("failed to read transcoder output: {}", e)))?;

        if !is_canonical_wav(&wav) {
            return Err(conversion_failed(format!(
                "transcoder produced {} output instead of WAV",
                classify_format(&wav)
            )));
        }

        Ok(wav)
    }
}

/// Millisecond timestamp plus a random suffix, unique per invocation
fn scratch_stem() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}", Utc::now().timestamp_millis(), &random[..12])
}

/// Remove a scratch file, logging but never propagating failures
async fn release_scratch(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove scratch file"
        ),
    }
}
