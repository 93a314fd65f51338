//! REST client for the Veo long-running video-generation API.
//!
//! One submission starts a remote operation; the caller polls the
//! operation until it reports completion, then fetches the generated
//! video bytes. The adapter owns prompt assembly (directive + overlay
//! + watermark) and error classification; it never sleeps or retries
//! itself — that is the pipeline's job.

use async_trait::async_trait;
use reelgen_core::narration::{BusinessIdentity, TextOverlay};
use reelgen_core::provider::{
    JobPoll, JobResult, ProviderError, RemoteOperation, VideoRequest, VideoSynthesizer,
};
use serde::Deserialize;

use crate::classify::{error_from_response, error_from_transport};

const PROVIDER: &str = "veo";

/// HTTP client for the Veo video-synthesis service.
pub struct VeoClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

// ---- wire types ----

/// Response returned when an operation is accepted.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    /// Server-assigned operation name, e.g. `operations/abc123`.
    name: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    #[serde(default)]
    generated_videos: Vec<GeneratedVideo>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideo {
    uri: String,
}

impl VeoClient {
    /// Create a new client.
    ///
    /// * `api_url` - Base HTTP URL of the Veo endpoint.
    /// * `api_key` - Bearer token for authentication.
    /// * `model`   - Model name, e.g. `veo-3.1-generate-preview`.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Assemble the final generation prompt from the motion directive,
    /// the optional on-screen overlay, and the optional business
    /// watermark. The scene lock preamble keeps the subject consistent
    /// with the reference image.
    fn build_prompt(
        directive: &str,
        overlay: Option<&TextOverlay>,
        watermark: Option<&BusinessIdentity>,
    ) -> String {
        let mut parts = vec![
            "Animate this exact image.".to_string(),
            "Keep the same person, same outfit, same background.".to_string(),
            directive.to_string(),
        ];

        if let Some(overlay) = overlay {
            if let Some(headline) = &overlay.headline {
                parts.push(format!("Show text '{headline}' centered."));
            }
            if let Some(subtext) = &overlay.subtext {
                parts.push(format!("Show subtext '{subtext}'."));
            }
            if let Some(cta) = &overlay.cta {
                parts.push(format!("Show CTA '{cta}' bottom."));
            }
        }

        if let Some(name) = watermark.and_then(|w| w.name.as_deref()) {
            parts.push(format!("Add small watermark '{name}' bottom-left."));
        }

        parts.push("No camera shake. No blur. Subtle natural movement only.".to_string());
        parts.join(" ")
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(error_from_response(PROVIDER, status.as_u16(), &body));
        }
        Ok(response)
    }
}

#[async_trait]
impl VideoSynthesizer for VeoClient {
    async fn submit(&self, request: &VideoRequest) -> Result<RemoteOperation, ProviderError> {
        let prompt = Self::build_prompt(
            &request.directive,
            request.overlay.as_ref(),
            request.watermark.as_ref(),
        );

        let body = serde_json::json!({
            "instances": [{
                "prompt": prompt,
                "image": { "uri": request.image_handle },
            }],
            "parameters": {
                "aspectRatio": request.aspect_ratio,
            },
        });

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:predictLongRunning",
                self.api_url, self.model
            ))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| error_from_transport(PROVIDER, e))?;

        let response = Self::check_response(response).await?;
        let submit: SubmitResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::fatal(format!("veo submit response malformed: {e}")))?;

        tracing::debug!(operation = %submit.name, "Veo operation started");
        Ok(RemoteOperation { id: submit.name })
    }

    async fn poll(&self, operation: &RemoteOperation) -> Result<JobPoll, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1beta/{}", self.api_url, operation.id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| error_from_transport(PROVIDER, e))?;

        let response = Self::check_response(response).await?;
        let status: OperationStatus = response
            .json()
            .await
            .map_err(|e| ProviderError::fatal(format!("veo poll response malformed: {e}")))?;

        Ok(JobPoll {
            done: status.done,
            error: status.error.map(|e| e.message),
            result: status
                .response
                .and_then(|r| r.generated_videos.into_iter().next())
                .map(|v| JobResult { uri: v.uri }),
        })
    }

    async fn fetch(&self, result: &JobResult) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(&result.uri)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| error_from_transport(PROVIDER, e))?;

        let response = Self::check_response(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| error_from_transport(PROVIDER, e))?;
        Ok(bytes.to_vec())
    }
}
