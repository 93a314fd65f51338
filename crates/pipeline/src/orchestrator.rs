//! Sequential campaign orchestrator.
//!
//! Owns one campaign run end to end: asserts the status transition,
//! walks the eligible scenes in ordinal order through the scene
//! executor, then merges the surviving clips and publishes the final
//! advertisement. Scene failures are contained — one bad scene drops
//! out of the final cut without sinking the campaign — while store
//! failures, an empty cut, and merge failures are campaign-fatal and
//! always write the error detail to the record before the terminal
//! status.

use std::sync::Arc;

use reelgen_core::narration::BusinessIdentity;
use reelgen_core::provider::{
    ArtifactStore, NarrationSynthesizer, VideoAssembler, VideoSynthesizer,
};
use reelgen_core::status::{CampaignStatus, SceneStatus};
use reelgen_core::store::RecordStore;

use crate::error::PipelineError;
use crate::scene::{SceneStageExecutor, StageConfig};

/// Drives one campaign through video generation, merge, and publish.
pub struct Orchestrator {
    store: Arc<dyn RecordStore>,
    executor: SceneStageExecutor,
    assembler: Arc<dyn VideoAssembler>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        video: Arc<dyn VideoSynthesizer>,
        narration: Arc<dyn NarrationSynthesizer>,
        assembler: Arc<dyn VideoAssembler>,
        artifacts: Arc<dyn ArtifactStore>,
        config: StageConfig,
    ) -> Self {
        Self {
            store,
            executor: SceneStageExecutor::new(video, narration, artifacts.clone(), config),
            assembler,
            artifacts,
        }
    }

    /// Run the campaign's video generation to a terminal status.
    ///
    /// Idempotent over re-delivery: scenes already `video_generated`
    /// are reused from their stored artifacts without any remote
    /// submission, and a campaign already completed returns its final
    /// URL immediately.
    pub async fn run(
        &self,
        campaign_id: &str,
        business: Option<&BusinessIdentity>,
    ) -> Result<String, PipelineError> {
        let campaign = self
            .store
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| PipelineError::CampaignNotFound(campaign_id.to_string()))?;

        if campaign.status == CampaignStatus::VideosGenerated {
            if let Some(url) = campaign.final_video_url {
                tracing::info!(campaign_id, "Campaign already completed");
                return Ok(url);
            }
        }

        campaign
            .status
            .validate_transition(CampaignStatus::VeoGenerating)
            .map_err(PipelineError::InvalidTransition)?;
        self.store
            .update_campaign_status(campaign_id, CampaignStatus::VeoGenerating)
            .await?;

        let scenes = self.store.list_scenes(campaign_id).await?;
        let eligible: Vec<_> = scenes
            .into_iter()
            .filter(|s| s.is_eligible(campaign.num_scenes))
            .collect();

        if eligible.is_empty() {
            return Err(self
                .fail(campaign_id, PipelineError::NoEligibleScenes)
                .await);
        }

        tracing::info!(
            campaign_id,
            scenes = eligible.len(),
            "Starting video generation"
        );

        // Ordinal order; list_scenes already sorts, kept stable here.
        let mut clips: Vec<String> = Vec::with_capacity(eligible.len());
        let mut narration: Vec<String> = Vec::with_capacity(eligible.len());

        for scene in &eligible {
            // Re-delivered runs skip finished scenes entirely.
            if scene.status == SceneStatus::VideoGenerated {
                if let Some(url) = &scene.video_url {
                    tracing::info!(
                        campaign_id,
                        scene_number = scene.scene_number,
                        "Scene already generated, reusing artifacts"
                    );
                    clips.push(url.clone());
                    narration.push(scene.narration_url.clone().unwrap_or_default());
                    continue;
                }
            }
            if scene.status == SceneStatus::Failed {
                continue;
            }

            match self.executor.run(&campaign, scene, business).await {
                Ok(artifacts) => {
                    self.store
                        .set_scene_video_generated(
                            &scene.id,
                            &artifacts.video_url,
                            &artifacts.narration_url,
                        )
                        .await?;
                    clips.push(artifacts.video_url);
                    narration.push(artifacts.narration_url);
                }
                // Store failures abort the run; everything else is a
                // scene-scoped failure and the campaign continues.
                Err(PipelineError::Store(e)) => return Err(e.into()),
                Err(err) => {
                    tracing::warn!(
                        campaign_id,
                        scene_number = scene.scene_number,
                        error = %err,
                        "Scene generation failed, continuing without it"
                    );
                    self.store.set_scene_failed(&scene.id).await?;
                }
            }
        }

        if clips.is_empty() {
            return Err(self.fail(campaign_id, PipelineError::NoScenesProduced).await);
        }

        self.store
            .update_campaign_status(campaign_id, CampaignStatus::MergingVideo)
            .await?;

        let merged = match self
            .assembler
            .assemble(&clips, &narration, campaign_id)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                return Err(self
                    .fail(campaign_id, PipelineError::MergeFailed(e.to_string()))
                    .await)
            }
        };

        let final_url = match self.artifacts.publish_final(&merged, campaign_id).await {
            Ok(url) => url,
            Err(e) => {
                return Err(self
                    .fail(campaign_id, PipelineError::MergeFailed(e.to_string()))
                    .await)
            }
        };

        self.store
            .complete_campaign(campaign_id, &final_url)
            .await?;
        tracing::info!(campaign_id, final_url = %final_url, "Campaign completed");
        Ok(final_url)
    }

    /// Record a campaign-fatal error: write the detail and the terminal
    /// status, then hand the original error back to the caller.
    async fn fail(&self, campaign_id: &str, err: PipelineError) -> PipelineError {
        tracing::error!(campaign_id, error = %err, "Campaign failed");
        if let Err(store_err) = self.store.fail_campaign(campaign_id, &err.to_string()).await {
            return store_err.into();
        }
        err
    }
}
