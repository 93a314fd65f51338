//! Text-to-speech adapter for scene narration.
//!
//! Synchronous from the pipeline's viewpoint: one request returns the
//! full audio stream, which is written to a local temp file whose path
//! becomes the narration artifact handle.

use std::path::PathBuf;

use async_trait::async_trait;
use reelgen_core::provider::{NarrationSynthesizer, ProviderError};

use crate::classify::{error_from_response, error_from_transport};

const PROVIDER: &str = "tts";

/// Default voice used for all campaigns.
const DEFAULT_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";

/// HTTP client for an ElevenLabs-compatible TTS service.
pub struct TtsClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    voice_id: String,
    output_dir: PathBuf,
}

impl TtsClient {
    /// Create a new client writing audio files under `output_dir`.
    pub fn new(api_url: String, api_key: String, output_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            voice_id: DEFAULT_VOICE_ID.to_string(),
            output_dir,
        }
    }

    /// Override the voice.
    pub fn with_voice(mut self, voice_id: String) -> Self {
        self.voice_id = voice_id;
        self
    }
}

#[async_trait]
impl NarrationSynthesizer for TtsClient {
    async fn synthesize(&self, text: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "text": text,
            "model_id": "eleven_multilingual_v2",
            "output_format": "mp3_44100_128",
        });

        let response = self
            .client
            .post(format!(
                "{}/v1/text-to-speech/{}",
                self.api_url, self.voice_id
            ))
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| error_from_transport(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(error_from_response(PROVIDER, status.as_u16(), &body));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| error_from_transport(PROVIDER, e))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ProviderError::fatal(format!("failed to create narration dir: {e}")))?;

        let filename = format!("voice_{}.mp3", uuid::Uuid::new_v4().simple());
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| ProviderError::fatal(format!("failed to write narration file: {e}")))?;

        Ok(path.to_string_lossy().into_owned())
    }
}
