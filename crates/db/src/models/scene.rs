//! Row types for the `campaign_scenes` table.

use reelgen_core::types::Timestamp;
use serde::Serialize;

/// One ordered unit of a campaign.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CampaignScene {
    pub id: String,
    pub campaign_id: String,
    /// 1-based ordinal, unique within the campaign.
    pub scene_number: i32,
    pub scene_title: Option<String>,
    /// Declared role for the motion-directive lookup
    /// (`brand`/`service`/`reaction`/`cta`).
    pub role: Option<String>,
    /// Visual description produced by the image stage; the output
    /// framing is derived from its composition keywords.
    pub visual_prompt: Option<String>,
    /// Chosen still image feeding the video stage.
    pub selected_image_url: Option<String>,
    // On-screen overlay text, also the source of the spoken narration.
    pub headline: Option<String>,
    pub subtext: Option<String>,
    pub cta: Option<String>,
    pub video_url: Option<String>,
    pub narration_url: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting a new scene.
#[derive(Debug, Clone)]
pub struct CreateScene {
    pub id: String,
    pub campaign_id: String,
    pub scene_number: i32,
    pub scene_title: Option<String>,
    pub role: Option<String>,
    pub visual_prompt: Option<String>,
    pub status: String,
}
