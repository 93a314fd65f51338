//! Record-store boundary contract.
//!
//! The pipeline reads and writes campaign/scene records through this
//! trait rather than a concrete database, so orchestrator runs are
//! testable with an in-memory store. Every write is a single-row,
//! last-write-wins update scoped to the owning campaign; no
//! multi-entity transactions are assumed.

use async_trait::async_trait;

use crate::narration::TextOverlay;
use crate::status::{CampaignStatus, SceneStatus};
use crate::types::{EntityId, Timestamp};

/// Error from a record-store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store backend error: {0}")]
    Backend(String),
}

/// A campaign record as the pipeline sees it.
#[derive(Debug, Clone)]
pub struct CampaignRecord {
    pub id: EntityId,
    /// Declared scene count; scenes with ordinals beyond this are
    /// ineligible.
    pub num_scenes: i32,
    pub product_type: String,
    /// Character reference handle, set once by the upstream image
    /// stage and immutable thereafter.
    pub character_image_url: Option<String>,
    pub status: CampaignStatus,
    /// Non-empty iff status is `videos_generated`.
    pub final_video_url: Option<String>,
    /// Non-empty iff status is `video_failed`.
    pub generation_error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A scene record as the pipeline sees it.
#[derive(Debug, Clone)]
pub struct SceneRecord {
    pub id: EntityId,
    pub campaign_id: EntityId,
    /// 1-based ordinal, unique and contiguous within the campaign.
    pub scene_number: i32,
    /// Declared role used for the motion-directive lookup.
    pub role: Option<String>,
    /// Stored visual description; framing is derived from it.
    pub visual_prompt: Option<String>,
    /// Chosen still image feeding the video stage. A scene without
    /// one is ineligible.
    pub selected_image_url: Option<String>,
    pub overlay: TextOverlay,
    pub video_url: Option<String>,
    pub narration_url: Option<String>,
    pub status: SceneStatus,
}

impl SceneRecord {
    /// An eligible scene has a selected image and an ordinal within
    /// the campaign's declared scene count.
    pub fn is_eligible(&self, num_scenes: i32) -> bool {
        self.selected_image_url.is_some() && self.scene_number <= num_scenes
    }
}

/// Keyed record store for campaigns and their scenes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a campaign by ID.
    async fn get_campaign(&self, id: &str) -> Result<Option<CampaignRecord>, StoreError>;

    /// List a campaign's scenes ordered by ascending ordinal.
    async fn list_scenes(&self, campaign_id: &str) -> Result<Vec<SceneRecord>, StoreError>;

    /// Write a campaign's status.
    async fn update_campaign_status(
        &self,
        id: &str,
        status: CampaignStatus,
    ) -> Result<(), StoreError>;

    /// Terminal failure write: status `video_failed` plus the causing
    /// error detail, in one update.
    async fn fail_campaign(&self, id: &str, error_detail: &str) -> Result<(), StoreError>;

    /// Terminal success write: status `videos_generated` plus the
    /// final artifact handle, in one update.
    async fn complete_campaign(&self, id: &str, final_video_url: &str) -> Result<(), StoreError>;

    /// Persist a scene's artifacts and mark it `video_generated`.
    async fn set_scene_video_generated(
        &self,
        scene_id: &str,
        video_url: &str,
        narration_url: &str,
    ) -> Result<(), StoreError>;

    /// Mark a scene `failed`. Artifact handles are left unset.
    async fn set_scene_failed(&self, scene_id: &str) -> Result<(), StoreError>;
}
