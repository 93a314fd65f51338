//! Row types for the `campaigns` table.

use reelgen_core::types::Timestamp;
use serde::Serialize;

/// One advertisement generation run.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Campaign {
    pub id: String,
    /// The user's original description of the campaign.
    pub user_prompt: String,
    /// Declared scene count; scenes beyond this ordinal are ignored.
    pub num_scenes: i32,
    /// Product category used for artifact key prefixes.
    pub product_type: String,
    pub campaign_theme: Option<String>,
    /// Character reference handle produced by the upstream image
    /// stage. Set once; never rewritten by the video pipeline.
    pub character_image_url: Option<String>,
    // Business-identity metadata, persisted when videos are enqueued.
    pub business_name: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    /// Set only when the campaign reaches `videos_generated`.
    pub final_video_url: Option<String>,
    /// Set only when the campaign reaches `video_failed`.
    pub generation_error: Option<String>,
    pub status: String,
    /// Outer task-queue delivery attempts for this campaign.
    pub attempts: i32,
    /// Earliest time the queue may redeliver this campaign.
    pub next_attempt_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting a new campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub id: String,
    pub user_prompt: String,
    pub num_scenes: i32,
    pub product_type: String,
    pub campaign_theme: Option<String>,
    pub character_image_url: Option<String>,
    pub status: String,
}
