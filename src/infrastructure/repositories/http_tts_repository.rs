use super::tts_repository::{SynthesisRequest, SynthesizedSpeech, TtsRepository};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EngineRequest<'a> {
    text: &'a str,
    speaker_wav_base64: String,
    arousal: f64,
    valence: f64,
}

#[derive(Debug, Deserialize)]
struct EngineResponse {
    audio_base64: String,
    #[serde(default)]
    duration_seconds: Option<f64>,
}

/// TTS engine reached over HTTP (`POST <base>/synthesize`)
pub struct HttpTtsRepository {
    client: Client,
    endpoint: String,
}

impl HttpTtsRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build TTS engine client: {}", e))?;

        Ok(Self {
            client,
            endpoint: format!("{}/synthesize", base_url.trim_end_matches('/')),
        })
    }
}

fn decode_response(response: EngineResponse) -> Result<SynthesizedSpeech, String> {
    let audio = STANDARD
        .decode(response.audio_base64.trim())
        .map_err(|e| format!("TTS engine returned invalid base64 audio: {}", e))?;

    if audio.is_empty() {
        return Err("TTS engine returned empty audio".to_string());
    }

    Ok(SynthesizedSpeech {
        audio,
        duration_seconds: response.duration_seconds,
    })
}

#[async_trait]
impl TtsRepository for HttpTtsRepository {
    async fn synthesize(&self, request: SynthesisRequest<'_>) -> Result<SynthesizedSpeech, String> {
        let start_time = std::time::Instant::now();
        let body = EngineRequest {
            text: request.text,
            speaker_wav_base64: STANDARD.encode(request.speaker_wav),
            arousal: request.arousal,
            valence: request.valence,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("TTS engine request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("TTS engine returned {}: {}", status, detail));
        }

        let payload: EngineResponse = response
            .json()
            .await
            .map_err(|e| format!("TTS engine returned malformed JSON: {}", e))?;

        let speech = decode_response(payload)?;

        tracing::info!(
            text_length = request.text.chars().count(),
            audio_size = speech.audio.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "TTS engine synthesis completed"
        );

        Ok(speech)
    }
}
