//! Whole-campaign orchestrator runs against an in-memory record store
//! and scripted providers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::Utc;
use reelgen_core::narration::TextOverlay;
use reelgen_core::provider::{
    ArtifactStore, JobPoll, JobResult, NarrationSynthesizer, ProviderError, RemoteOperation,
    VideoAssembler, VideoRequest, VideoSynthesizer,
};
use reelgen_core::retry::RetryPolicy;
use reelgen_core::status::{CampaignStatus, SceneStatus};
use reelgen_core::store::{CampaignRecord, RecordStore, SceneRecord, StoreError};
use reelgen_pipeline::poller::PollerConfig;
use reelgen_pipeline::scene::StageConfig;
use reelgen_pipeline::{Orchestrator, PipelineError};

// ---------------------------------------------------------------------------
// In-memory record store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryStore {
    campaigns: Mutex<HashMap<String, CampaignRecord>>,
    scenes: Mutex<Vec<SceneRecord>>,
}

impl MemoryStore {
    fn insert_campaign(&self, campaign: CampaignRecord) {
        self.campaigns
            .lock()
            .unwrap()
            .insert(campaign.id.clone(), campaign);
    }

    fn insert_scene(&self, scene: SceneRecord) {
        self.scenes.lock().unwrap().push(scene);
    }

    fn campaign(&self, id: &str) -> CampaignRecord {
        self.campaigns.lock().unwrap().get(id).unwrap().clone()
    }

    fn scene(&self, id: &str) -> SceneRecord {
        self.scenes
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .unwrap()
            .clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_campaign(&self, id: &str) -> Result<Option<CampaignRecord>, StoreError> {
        Ok(self.campaigns.lock().unwrap().get(id).cloned())
    }

    async fn list_scenes(&self, campaign_id: &str) -> Result<Vec<SceneRecord>, StoreError> {
        let mut scenes: Vec<_> = self
            .scenes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.campaign_id == campaign_id)
            .cloned()
            .collect();
        scenes.sort_by_key(|s| s.scene_number);
        Ok(scenes)
    }

    async fn update_campaign_status(
        &self,
        id: &str,
        status: CampaignStatus,
    ) -> Result<(), StoreError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .get_mut(id)
            .ok_or_else(|| StoreError::Backend("campaign missing".to_string()))?;
        campaign.status = status;
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn fail_campaign(&self, id: &str, error_detail: &str) -> Result<(), StoreError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .get_mut(id)
            .ok_or_else(|| StoreError::Backend("campaign missing".to_string()))?;
        campaign.status = CampaignStatus::VideoFailed;
        campaign.generation_error = Some(error_detail.to_string());
        Ok(())
    }

    async fn complete_campaign(&self, id: &str, final_video_url: &str) -> Result<(), StoreError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .get_mut(id)
            .ok_or_else(|| StoreError::Backend("campaign missing".to_string()))?;
        campaign.status = CampaignStatus::VideosGenerated;
        campaign.final_video_url = Some(final_video_url.to_string());
        Ok(())
    }

    async fn set_scene_video_generated(
        &self,
        scene_id: &str,
        video_url: &str,
        narration_url: &str,
    ) -> Result<(), StoreError> {
        let mut scenes = self.scenes.lock().unwrap();
        let scene = scenes
            .iter_mut()
            .find(|s| s.id == scene_id)
            .ok_or_else(|| StoreError::Backend("scene missing".to_string()))?;
        scene.status = SceneStatus::VideoGenerated;
        scene.video_url = Some(video_url.to_string());
        scene.narration_url = Some(narration_url.to_string());
        Ok(())
    }

    async fn set_scene_failed(&self, scene_id: &str) -> Result<(), StoreError> {
        let mut scenes = self.scenes.lock().unwrap();
        let scene = scenes
            .iter_mut()
            .find(|s| s.id == scene_id)
            .ok_or_else(|| StoreError::Backend("scene missing".to_string()))?;
        scene.status = SceneStatus::Failed;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scripted providers
// ---------------------------------------------------------------------------

enum SubmitStep {
    Accept,
    Reject(ProviderError),
    /// Accepted, but the remote job never finishes.
    Stall,
}

/// Video synthesizer driven by a script of submission outcomes,
/// consumed in order across all scenes.
struct ScriptedVideo {
    script: Mutex<Vec<SubmitStep>>,
    submissions: AtomicU32,
    stalled_ops: Mutex<Vec<String>>,
}

impl ScriptedVideo {
    fn new(script: Vec<SubmitStep>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            submissions: AtomicU32::new(0),
            stalled_ops: Mutex::new(Vec::new()),
        })
    }

    fn always_accepting() -> Arc<Self> {
        Self::new(Vec::new())
    }

    fn submission_count(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoSynthesizer for ScriptedVideo {
    async fn submit(&self, _request: &VideoRequest) -> Result<RemoteOperation, ProviderError> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let step = if script.is_empty() {
            SubmitStep::Accept
        } else {
            script.remove(0)
        };
        match step {
            SubmitStep::Accept => Ok(RemoteOperation {
                id: format!("op/{n}"),
            }),
            SubmitStep::Reject(e) => Err(e),
            SubmitStep::Stall => {
                let id = format!("op/{n}");
                self.stalled_ops.lock().unwrap().push(id.clone());
                Ok(RemoteOperation { id })
            }
        }
    }

    async fn poll(&self, operation: &RemoteOperation) -> Result<JobPoll, ProviderError> {
        if self.stalled_ops.lock().unwrap().contains(&operation.id) {
            return Ok(JobPoll::default());
        }
        Ok(JobPoll {
            done: true,
            result: Some(JobResult {
                uri: format!("provider://{}", operation.id),
            }),
            error: None,
        })
    }

    async fn fetch(&self, _result: &JobResult) -> Result<Vec<u8>, ProviderError> {
        Ok(b"clip".to_vec())
    }
}

struct FixedNarration;

#[async_trait]
impl NarrationSynthesizer for FixedNarration {
    async fn synthesize(&self, _text: &str) -> Result<String, ProviderError> {
        Ok("/tmp/voice.mp3".to_string())
    }
}

struct MemoryArtifacts;

#[async_trait]
impl ArtifactStore for MemoryArtifacts {
    async fn store_scene_video(
        &self,
        campaign_id: &str,
        product_type: &str,
        scene_number: i32,
        _bytes: Vec<u8>,
    ) -> Result<String, ProviderError> {
        Ok(format!(
            "https://cdn.example/campaigns/{product_type}/{campaign_id}/scene_{scene_number}_video.mp4"
        ))
    }

    async fn publish_final(
        &self,
        _local_path: &Path,
        campaign_id: &str,
    ) -> Result<String, ProviderError> {
        Ok(format!(
            "https://cdn.example/campaigns/videos/{campaign_id}.mp4"
        ))
    }
}

struct RecordingAssembler {
    calls: AtomicU32,
    clips_seen: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl RecordingAssembler {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            clips_seen: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            clips_seen: Mutex::new(Vec::new()),
            fail: true,
        })
    }
}

#[async_trait]
impl VideoAssembler for RecordingAssembler {
    async fn assemble(
        &self,
        clips: &[String],
        _narration: &[String],
        campaign_id: &str,
    ) -> Result<PathBuf, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.clips_seen.lock().unwrap().push(clips.to_vec());
        if self.fail {
            return Err(ProviderError::fatal("ffmpeg exited with code 1"));
        }
        Ok(PathBuf::from(format!("/tmp/{campaign_id}/final_ad.mp4")))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn campaign(num_scenes: i32, status: CampaignStatus) -> CampaignRecord {
    CampaignRecord {
        id: "camp_1".to_string(),
        num_scenes,
        product_type: "beauty".to_string(),
        character_image_url: Some("s3://character".to_string()),
        status,
        final_video_url: None,
        generation_error: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn scene(number: i32) -> SceneRecord {
    SceneRecord {
        id: format!("scene_{number}"),
        campaign_id: "camp_1".to_string(),
        scene_number: number,
        role: Some("brand".to_string()),
        visual_prompt: Some("Wide shot, 16:9".to_string()),
        selected_image_url: Some(format!("s3://img_{number}")),
        overlay: TextOverlay {
            headline: Some(format!("Scene {number}")),
            ..Default::default()
        },
        video_url: None,
        narration_url: None,
        status: SceneStatus::ImageSelected,
    }
}

fn fast_config() -> StageConfig {
    StageConfig {
        video_retry: RetryPolicy::new(3, Duration::from_secs(1)),
        narration_retry: RetryPolicy::new(2, Duration::from_secs(1)),
        poller: PollerConfig::new(Duration::from_secs(1), Duration::from_secs(5)),
    }
}

fn orchestrator(
    store: Arc<MemoryStore>,
    video: Arc<ScriptedVideo>,
    assembler: Arc<RecordingAssembler>,
) -> Orchestrator {
    Orchestrator::new(
        store,
        video,
        Arc::new(FixedNarration),
        assembler,
        Arc::new(MemoryArtifacts),
        fast_config(),
    )
}

fn seeded_store(num_scenes: i32) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    store.insert_campaign(campaign(num_scenes, CampaignStatus::VideoQueued));
    for n in 1..=num_scenes {
        store.insert_scene(scene(n));
    }
    store
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn three_scene_campaign_completes_end_to_end() {
    let store = seeded_store(3);
    let video = ScriptedVideo::always_accepting();
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler.clone());

    let url = orch.run("camp_1", None).await.unwrap();
    assert_eq!(url, "https://cdn.example/campaigns/videos/camp_1.mp4");

    let c = store.campaign("camp_1");
    assert_eq!(c.status, CampaignStatus::VideosGenerated);
    assert_eq!(c.final_video_url.as_deref(), Some(url.as_str()));
    assert_eq!(c.generation_error, None);

    for n in 1..=3 {
        let s = store.scene(&format!("scene_{n}"));
        assert_eq!(s.status, SceneStatus::VideoGenerated);
        assert!(s.video_url.is_some());
    }

    // One submission per scene, one merge.
    assert_eq!(video.submission_count(), 3);
    assert_eq!(assembler.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_scene_retries_to_success() {
    let store = seeded_store(3);
    // Scene 2's first two submissions hit the quota ceiling.
    let video = ScriptedVideo::new(vec![
        SubmitStep::Accept,
        SubmitStep::Reject(ProviderError::rate_limited("429 quota")),
        SubmitStep::Reject(ProviderError::rate_limited("429 quota")),
        SubmitStep::Accept,
        SubmitStep::Accept,
    ]);
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler);

    orch.run("camp_1", None).await.unwrap();

    // Scene 2 took exactly three submissions; five in total.
    assert_eq!(video.submission_count(), 5);
    assert_eq!(store.scene("scene_2").status, SceneStatus::VideoGenerated);
    assert_eq!(
        store.campaign("camp_1").status,
        CampaignStatus::VideosGenerated
    );
}

#[tokio::test(start_paused = true)]
async fn persistently_stuck_scene_fails_but_campaign_completes() {
    let store = seeded_store(3);
    // Scene 1 succeeds, scene 2's jobs never finish across its whole
    // retry budget, scene 3 succeeds.
    let video = ScriptedVideo::new(vec![
        SubmitStep::Accept,
        SubmitStep::Stall,
        SubmitStep::Stall,
        SubmitStep::Stall,
        SubmitStep::Accept,
    ]);
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler.clone());

    orch.run("camp_1", None).await.unwrap();

    assert_eq!(
        store.scene("scene_1").status,
        SceneStatus::VideoGenerated
    );
    assert_eq!(store.scene("scene_2").status, SceneStatus::Failed);
    assert_eq!(
        store.scene("scene_3").status,
        SceneStatus::VideoGenerated
    );

    // The final cut carries scenes 1 and 3 only, in order.
    let clips = assembler.clips_seen.lock().unwrap();
    assert_eq!(clips.len(), 1);
    assert_eq!(
        clips[0],
        vec![
            "https://cdn.example/campaigns/beauty/camp_1/scene_1_video.mp4".to_string(),
            "https://cdn.example/campaigns/beauty/camp_1/scene_3_video.mp4".to_string(),
        ]
    );
    assert_eq!(
        store.campaign("camp_1").status,
        CampaignStatus::VideosGenerated
    );
}

#[tokio::test(start_paused = true)]
async fn no_eligible_scenes_fails_with_detail() {
    let store = Arc::new(MemoryStore::default());
    store.insert_campaign(campaign(3, CampaignStatus::VideoQueued));
    // Scenes exist but none has a selected image.
    for n in 1..=3 {
        let mut s = scene(n);
        s.selected_image_url = None;
        s.status = SceneStatus::Pending;
        store.insert_scene(s);
    }
    let video = ScriptedVideo::always_accepting();
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler);

    let err = orch.run("camp_1", None).await.unwrap_err();
    assert_matches!(err, PipelineError::NoEligibleScenes);

    let c = store.campaign("camp_1");
    assert_eq!(c.status, CampaignStatus::VideoFailed);
    assert!(c.generation_error.unwrap().contains("no eligible scenes"));
    assert_eq!(video.submission_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn every_scene_failing_fails_the_campaign() {
    let store = seeded_store(1);
    let video = ScriptedVideo::new(vec![SubmitStep::Reject(ProviderError::fatal(
        "prompt rejected",
    ))]);
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video, assembler.clone());

    let err = orch.run("camp_1", None).await.unwrap_err();
    assert_matches!(err, PipelineError::NoScenesProduced);

    let c = store.campaign("camp_1");
    assert_eq!(c.status, CampaignStatus::VideoFailed);
    assert!(c.generation_error.is_some());
    assert_eq!(store.scene("scene_1").status, SceneStatus::Failed);
    assert_eq!(assembler.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn merge_failure_is_campaign_fatal_with_detail() {
    let store = seeded_store(2);
    let video = ScriptedVideo::always_accepting();
    let assembler = RecordingAssembler::failing();
    let orch = orchestrator(store.clone(), video, assembler);

    let err = orch.run("camp_1", None).await.unwrap_err();
    assert_matches!(err, PipelineError::MergeFailed(_));

    let c = store.campaign("camp_1");
    assert_eq!(c.status, CampaignStatus::VideoFailed);
    assert!(c.generation_error.unwrap().contains("ffmpeg"));
}

#[tokio::test(start_paused = true)]
async fn rerun_skips_generated_scenes_without_submissions() {
    let store = seeded_store(2);
    let video = ScriptedVideo::always_accepting();
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler);

    orch.run("camp_1", None).await.unwrap();
    assert_eq!(video.submission_count(), 2);

    // Simulate a queue re-delivery of the finished campaign.
    let url = orch.run("camp_1", None).await.unwrap();
    assert_eq!(url, "https://cdn.example/campaigns/videos/camp_1.mp4");
    assert_eq!(video.submission_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn crashed_run_resumes_reusing_finished_scenes() {
    let store = seeded_store(2);
    // A previous run generated scene 1, then crashed mid-campaign with
    // the status stuck at veo_generating.
    store
        .update_campaign_status("camp_1", CampaignStatus::VeoGenerating)
        .await
        .unwrap();
    store
        .set_scene_video_generated("scene_1", "https://cdn.example/scene_1.mp4", "/tmp/v1.mp3")
        .await
        .unwrap();

    let video = ScriptedVideo::always_accepting();
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler.clone());

    orch.run("camp_1", None).await.unwrap();

    // Only scene 2 hits the provider; scene 1's stored clip is reused.
    assert_eq!(video.submission_count(), 1);
    let clips = assembler.clips_seen.lock().unwrap();
    assert_eq!(clips[0][0], "https://cdn.example/scene_1.mp4");
}

#[tokio::test(start_paused = true)]
async fn run_crashed_during_merge_completes_on_redelivery() {
    let store = seeded_store(2);
    // A previous run generated every scene and wrote merging_video,
    // then crashed before the terminal write.
    store
        .set_scene_video_generated("scene_1", "https://cdn.example/scene_1.mp4", "/tmp/v1.mp3")
        .await
        .unwrap();
    store
        .set_scene_video_generated("scene_2", "https://cdn.example/scene_2.mp4", "/tmp/v2.mp3")
        .await
        .unwrap();
    store
        .update_campaign_status("camp_1", CampaignStatus::MergingVideo)
        .await
        .unwrap();

    let video = ScriptedVideo::always_accepting();
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler.clone());

    let url = orch.run("camp_1", None).await.unwrap();
    assert_eq!(url, "https://cdn.example/campaigns/videos/camp_1.mp4");

    // Every clip is reused; only the merge and publish re-run.
    assert_eq!(video.submission_count(), 0);
    assert_eq!(assembler.calls.load(Ordering::SeqCst), 1);

    let c = store.campaign("camp_1");
    assert_eq!(c.status, CampaignStatus::VideosGenerated);
    assert_eq!(c.generation_error, None);
}

#[tokio::test(start_paused = true)]
async fn scenes_beyond_declared_count_are_ignored() {
    let store = seeded_store(2);
    // Orphan scene left over from an earlier, larger plan.
    store.insert_scene(scene(3));

    let video = ScriptedVideo::always_accepting();
    let assembler = RecordingAssembler::succeeding();
    let orch = orchestrator(store.clone(), video.clone(), assembler);

    orch.run("camp_1", None).await.unwrap();
    assert_eq!(video.submission_count(), 2);
    // The orphan keeps its original status.
    assert_eq!(store.scene("scene_3").status, SceneStatus::ImageSelected);
}

#[tokio::test(start_paused = true)]
async fn unknown_campaign_is_an_error() {
    let store = Arc::new(MemoryStore::default());
    let orch = orchestrator(
        store,
        ScriptedVideo::always_accepting(),
        RecordingAssembler::succeeding(),
    );

    let err = orch.run("camp_missing", None).await.unwrap_err();
    assert_matches!(err, PipelineError::CampaignNotFound(id) => {
        assert_eq!(id, "camp_missing");
    });
}

#[tokio::test(start_paused = true)]
async fn campaign_not_yet_queued_rejects_the_run() {
    let store = Arc::new(MemoryStore::default());
    store.insert_campaign(campaign(2, CampaignStatus::ImagesGenerated));

    let orch = orchestrator(
        store.clone(),
        ScriptedVideo::always_accepting(),
        RecordingAssembler::succeeding(),
    );

    let err = orch.run("camp_1", None).await.unwrap_err();
    assert_matches!(err, PipelineError::InvalidTransition(_));
    // The record is untouched; no terminal status was written.
    assert_eq!(
        store.campaign("camp_1").status,
        CampaignStatus::ImagesGenerated
    );
}
