//! Repository for the `campaign_scenes` table.

use sqlx::PgPool;

use crate::models::scene::{CampaignScene, CreateScene};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, campaign_id, scene_number, scene_title, role, visual_prompt, \
    selected_image_url, headline, subtext, cta, video_url, narration_url, status, \
    created_at, updated_at";

/// Provides CRUD operations for campaign scenes.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a new scene, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateScene) -> Result<CampaignScene, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_scenes
                (id, campaign_id, scene_number, scene_title, role, visual_prompt, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignScene>(&query)
            .bind(&input.id)
            .bind(&input.campaign_id)
            .bind(input.scene_number)
            .bind(&input.scene_title)
            .bind(&input.role)
            .bind(&input.visual_prompt)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a scene by its ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<CampaignScene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaign_scenes WHERE id = $1");
        sqlx::query_as::<_, CampaignScene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all scenes for a campaign, ordered by ascending ordinal.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: &str,
    ) -> Result<Vec<CampaignScene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_scenes
             WHERE campaign_id = $1
             ORDER BY scene_number ASC"
        );
        sqlx::query_as::<_, CampaignScene>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Persist a scene's artifact handles and mark it `video_generated`.
    pub async fn set_video_generated(
        pool: &PgPool,
        id: &str,
        video_url: &str,
        narration_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaign_scenes SET
                video_url = $2,
                narration_url = $3,
                status = 'video_generated',
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(video_url)
        .bind(narration_url)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a scene `failed`. Artifact handles are left unset.
    pub async fn set_failed(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaign_scenes SET status = 'failed', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
