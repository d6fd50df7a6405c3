use async_trait::async_trait;

/// Input for one voice-cloned synthesis
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    /// Whitespace-normalized, already truncated text
    pub text: &'a str,
    /// Reference sample as canonical WAV
    pub speaker_wav: &'a [u8],
    pub arousal: f64,
    pub valence: f64,
}

#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub audio: Vec<u8>,
    pub duration_seconds: Option<f64>,
}

/// Repository for TTS synthesis operations.
/// Abstracts the engine hosting the emotion-conditioned voice cloning model.
///
/// Implementations return the engine's audio bytes untouched; callers run
/// them through the normalizer before storing.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    async fn synthesize(&self, request: SynthesisRequest<'_>) -> Result<SynthesizedSpeech, String>;
}
