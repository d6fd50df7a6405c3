use super::{AudioTranscoder, TargetFormat};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;

/// Transcoder backed by the ffmpeg binary
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: String) -> Self {
        Self { binary }
    }

    fn build_args(input: &Path, output: &Path, target: TargetFormat) -> Vec<OsString> {
        let codec = format!("pcm_s{}le", target.bits_per_sample);
        vec![
            "-y".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            input.as_os_str().to_os_string(),
            "-ac".into(),
            target.channels.to_string().into(),
            "-ar".into(),
            target.sample_rate.to_string().into(),
            "-acodec".into(),
            codec.into(),
            "-f".into(),
            "wav".into(),
            output.as_os_str().to_os_string(),
        ]
    }

    /// Check that the binary can be executed; logs a warning otherwise
    pub async fn check_availability(&self) -> bool {
        match Command::new(&self.binary).arg("-version").output().await {
            Ok(output) if output.status.success() => {
                tracing::info!(binary = %self.binary, "ffmpeg available");
                true
            }
            Ok(output) => {
                tracing::warn!(
                    binary = %self.binary,
                    status = ?output.status,
                    "ffmpeg probe exited with failure, non-WAV uploads will fail"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    binary = %self.binary,
                    error = %e,
                    "ffmpeg not found, non-WAV uploads will fail"
                );
                false
            }
        }
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path, target: TargetFormat) -> Result<(), String> {
        let start_time = std::time::Instant::now();
        let result = Command::new(&self.binary)
            .args(Self::build_args(input, output, target))
            .output()
            .await
            .map_err(|e| format!("failed to run ffmpeg: {}", e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(format!("ffmpeg exited with {}: {}", result.status, stderr.trim()));
        }

        tracing::debug!(
            input = %input.display(),
            latency_ms = start_time.elapsed().as_millis(),
            "ffmpeg transcode completed"
        );

        Ok(())
    }
}
