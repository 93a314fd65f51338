//! Repository for the `campaigns` table.

use chrono::{Duration, Utc};
use reelgen_core::narration::BusinessIdentity;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_prompt, num_scenes, product_type, campaign_theme, \
    character_image_url, business_name, phone_number, website, final_video_url, \
    generation_error, status, attempts, next_attempt_at, created_at, updated_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns
                (id, user_prompt, num_scenes, product_type, campaign_theme,
                 character_image_url, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.id)
            .bind(&input.user_prompt)
            .bind(input.num_scenes)
            .bind(&input.product_type)
            .bind(&input.campaign_theme)
            .bind(&input.character_image_url)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a campaign by its ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write a campaign's status. Returns `true` if a row was updated.
    pub async fn set_status(pool: &PgPool, id: &str, status: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE campaigns SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist business-identity metadata and mark the campaign
    /// `video_queued`, in one update.
    pub async fn enqueue_videos(
        pool: &PgPool,
        id: &str,
        business: &BusinessIdentity,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET
                business_name = $2,
                phone_number = $3,
                website = $4,
                status = 'video_queued',
                attempts = 0,
                next_attempt_at = NOW(),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&business.name)
        .bind(&business.phone)
        .bind(&business.website)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Terminal success write: final artifact handle + `videos_generated`.
    pub async fn complete(
        pool: &PgPool,
        id: &str,
        final_video_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET
                final_video_url = $2,
                status = 'videos_generated',
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(final_video_url)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Terminal failure write: error detail + `video_failed`.
    pub async fn fail(pool: &PgPool, id: &str, error_detail: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET
                generation_error = $2,
                status = 'video_failed',
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(error_detail)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Claim the next queued campaign for a worker slot.
    ///
    /// Selects the oldest claimable campaign whose redelivery time has
    /// passed, using `FOR UPDATE SKIP LOCKED` so concurrent workers
    /// never claim the same campaign. A campaign is claimable while
    /// `video_queued`, and again while `veo_generating` or
    /// `merging_video` once its redelivery time passes — that is how a
    /// run lost to a crash gets redelivered, whichever in-flight state
    /// it died in. The claim increments the attempt counter and
    /// pushes `next_attempt_at` forward by
    /// `redelivery_delay_secs * (attempts + 1)`.
    pub async fn claim_next_queued(
        pool: &PgPool,
        redelivery_delay_secs: i64,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed: Option<(String, i32)> = sqlx::query_as(
            "SELECT id, attempts FROM campaigns
             WHERE status IN ('video_queued', 'veo_generating', 'merging_video')
               AND next_attempt_at <= NOW()
             ORDER BY updated_at ASC
             LIMIT 1
             FOR UPDATE SKIP LOCKED",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id, attempts)) = claimed else {
            tx.commit().await?;
            return Ok(None);
        };

        let redeliver_at = Utc::now() + Duration::seconds(redelivery_delay_secs * (attempts as i64 + 1));
        let query = format!(
            "UPDATE campaigns SET attempts = attempts + 1, next_attempt_at = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, Campaign>(&query)
            .bind(&id)
            .bind(redeliver_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(campaign))
    }
}
