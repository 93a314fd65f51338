//! Per-scene stage executor.
//!
//! Runs the full generation sequence for one scene: derive framing and
//! motion directive, submit the video job, poll it to completion,
//! download and store the clip, then synthesize the narration track.
//! Transient provider failures are retried under the backoff policy;
//! each retry starts a fresh remote job, never resuming a failed one.
//! All errors returned here are scene-scoped — the orchestrator
//! decides whether a failed scene sinks the campaign.

use std::sync::Arc;

use reelgen_core::framing::derive_framing;
use reelgen_core::motion::SceneRole;
use reelgen_core::narration::{build_scene_narration, BusinessIdentity};
use reelgen_core::provider::{
    ArtifactStore, NarrationSynthesizer, ProviderError, ProviderErrorKind, VideoRequest,
    VideoSynthesizer,
};
use reelgen_core::retry::{RetryDecision, RetryPolicy};
use reelgen_core::store::{CampaignRecord, SceneRecord};

use crate::error::PipelineError;
use crate::poller::{poll_until_done, PollerConfig};

/// Retry and polling parameters for the scene stages.
#[derive(Debug, Clone, Copy)]
pub struct StageConfig {
    pub video_retry: RetryPolicy,
    pub narration_retry: RetryPolicy,
    pub poller: PollerConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            video_retry: RetryPolicy::video_stage(),
            narration_retry: RetryPolicy::narration_stage(),
            poller: PollerConfig::video_stage(),
        }
    }
}

/// Artifact handles produced by a successful scene run.
#[derive(Debug, Clone)]
pub struct SceneArtifacts {
    pub video_url: String,
    /// Empty when the scene has no overlay text to narrate.
    pub narration_url: String,
}

/// Executes the generation stages for a single scene.
pub struct SceneStageExecutor {
    video: Arc<dyn VideoSynthesizer>,
    narration: Arc<dyn NarrationSynthesizer>,
    artifacts: Arc<dyn ArtifactStore>,
    config: StageConfig,
}

impl SceneStageExecutor {
    pub fn new(
        video: Arc<dyn VideoSynthesizer>,
        narration: Arc<dyn NarrationSynthesizer>,
        artifacts: Arc<dyn ArtifactStore>,
        config: StageConfig,
    ) -> Self {
        Self {
            video,
            narration,
            artifacts,
            config,
        }
    }

    /// Run the scene end to end, returning its stored artifact handles.
    pub async fn run(
        &self,
        campaign: &CampaignRecord,
        scene: &SceneRecord,
        business: Option<&BusinessIdentity>,
    ) -> Result<SceneArtifacts, PipelineError> {
        let image_handle = scene
            .selected_image_url
            .clone()
            .ok_or_else(|| ProviderError::fatal("scene has no selected image"))?;

        let visual = scene.visual_prompt.as_deref().unwrap_or("");
        let framing = derive_framing(visual).ok_or_else(|| {
            ProviderError::fatal("unsupported output framing for this scene")
        })?;

        let role = SceneRole::from_str(scene.role.as_deref().unwrap_or(""));
        let request = VideoRequest {
            image_handle,
            directive: role.motion_directive().to_string(),
            aspect_ratio: framing.as_str(),
            overlay: (!scene.overlay.is_empty()).then(|| scene.overlay.clone()),
            watermark: business.cloned(),
        };

        tracing::info!(
            campaign_id = %campaign.id,
            scene_number = scene.scene_number,
            role = role.as_str(),
            aspect_ratio = framing.as_str(),
            "Generating scene video"
        );

        let bytes = self.generate_video(&request, campaign, scene).await?;

        let video_url = self
            .artifacts
            .store_scene_video(
                &campaign.id,
                &campaign.product_type,
                scene.scene_number,
                bytes,
            )
            .await?;

        let narration_url = self.generate_narration(scene, business).await?;

        Ok(SceneArtifacts {
            video_url,
            narration_url,
        })
    }

    /// One full video attempt: fresh submit, poll to completion, fetch.
    async fn attempt_video(&self, request: &VideoRequest) -> Result<Vec<u8>, PipelineError> {
        let operation = self.video.submit(request).await?;
        let result = poll_until_done(self.config.poller, || self.video.poll(&operation)).await?;
        let bytes = self.video.fetch(&result).await?;
        Ok(bytes)
    }

    async fn generate_video(
        &self,
        request: &VideoRequest,
        campaign: &CampaignRecord,
        scene: &SceneRecord,
    ) -> Result<Vec<u8>, PipelineError> {
        let mut attempt = 1u32;
        loop {
            let err = match self.attempt_video(request).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) => err,
            };

            let Some(kind) = retry_kind(&err) else {
                return Err(err);
            };
            match self.config.video_retry.decide(kind, attempt) {
                RetryDecision::Retry { after } => {
                    tracing::warn!(
                        campaign_id = %campaign.id,
                        scene_number = scene.scene_number,
                        attempt,
                        delay_secs = after.as_secs(),
                        error = %err,
                        "Video attempt failed, retrying"
                    );
                    tokio::time::sleep(after).await;
                    attempt += 1;
                }
                RetryDecision::Fail => return Err(err),
            }
        }
    }

    /// Synthesize the scene's narration track. A scene with no overlay
    /// text produces no narration and no provider call.
    async fn generate_narration(
        &self,
        scene: &SceneRecord,
        business: Option<&BusinessIdentity>,
    ) -> Result<String, PipelineError> {
        let text = build_scene_narration(&scene.overlay, business);
        if text.is_empty() {
            return Ok(String::new());
        }

        let mut attempt = 1u32;
        loop {
            let err = match self.narration.synthesize(&text).await {
                Ok(path) => return Ok(path),
                Err(err) => err,
            };

            match self.config.narration_retry.decide(err.kind, attempt) {
                RetryDecision::Retry { after } => {
                    tracing::warn!(
                        scene_number = scene.scene_number,
                        attempt,
                        delay_secs = after.as_secs(),
                        error = %err,
                        "Narration attempt failed, retrying"
                    );
                    tokio::time::sleep(after).await;
                    attempt += 1;
                }
                RetryDecision::Fail => return Err(err.into()),
            }
        }
    }
}

/// Classification fed to the retry policy.
///
/// A poll timeout is retried as a [`ProviderErrorKind::Timeout`]: the
/// next attempt abandons the stuck remote job and submits a fresh one.
/// Non-provider errors (store failures) are never retried here.
fn retry_kind(err: &PipelineError) -> Option<ProviderErrorKind> {
    match err {
        PipelineError::Provider(e) => Some(e.kind),
        PipelineError::OperationTimeout { .. } => Some(ProviderErrorKind::Timeout),
        _ => None,
    }
}
