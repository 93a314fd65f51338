//! Postgres implementation of the [`RecordStore`] boundary contract.

use async_trait::async_trait;
use reelgen_core::narration::TextOverlay;
use reelgen_core::status::{CampaignStatus, SceneStatus};
use reelgen_core::store::{CampaignRecord, RecordStore, SceneRecord, StoreError};
use sqlx::PgPool;

use crate::models::campaign::Campaign;
use crate::models::scene::CampaignScene;
use crate::repositories::campaign_repo::CampaignRepo;
use crate::repositories::scene_repo::SceneRepo;

/// Record store backed by the `campaigns`/`campaign_scenes` tables.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Unknown persisted status strings map to the earliest state rather
/// than failing the read; the state machine will reject any invalid
/// transition attempted from them.
fn campaign_record(row: Campaign) -> CampaignRecord {
    CampaignRecord {
        status: CampaignStatus::parse(&row.status).unwrap_or(CampaignStatus::Pending),
        id: row.id,
        num_scenes: row.num_scenes,
        product_type: row.product_type,
        character_image_url: row.character_image_url,
        final_video_url: row.final_video_url,
        generation_error: row.generation_error,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn scene_record(row: CampaignScene) -> SceneRecord {
    SceneRecord {
        status: SceneStatus::parse(&row.status).unwrap_or(SceneStatus::Pending),
        id: row.id,
        campaign_id: row.campaign_id,
        scene_number: row.scene_number,
        role: row.role,
        visual_prompt: row.visual_prompt,
        selected_image_url: row.selected_image_url,
        overlay: TextOverlay {
            headline: row.headline,
            subtext: row.subtext,
            cta: row.cta,
        },
        video_url: row.video_url,
        narration_url: row.narration_url,
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get_campaign(&self, id: &str) -> Result<Option<CampaignRecord>, StoreError> {
        let row = CampaignRepo::find_by_id(&self.pool, id)
            .await
            .map_err(backend_err)?;
        Ok(row.map(campaign_record))
    }

    async fn list_scenes(&self, campaign_id: &str) -> Result<Vec<SceneRecord>, StoreError> {
        let rows = SceneRepo::list_by_campaign(&self.pool, campaign_id)
            .await
            .map_err(backend_err)?;
        Ok(rows.into_iter().map(scene_record).collect())
    }

    async fn update_campaign_status(
        &self,
        id: &str,
        status: CampaignStatus,
    ) -> Result<(), StoreError> {
        CampaignRepo::set_status(&self.pool, id, status.as_str())
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn fail_campaign(&self, id: &str, error_detail: &str) -> Result<(), StoreError> {
        CampaignRepo::fail(&self.pool, id, error_detail)
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn complete_campaign(&self, id: &str, final_video_url: &str) -> Result<(), StoreError> {
        CampaignRepo::complete(&self.pool, id, final_video_url)
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn set_scene_video_generated(
        &self,
        scene_id: &str,
        video_url: &str,
        narration_url: &str,
    ) -> Result<(), StoreError> {
        SceneRepo::set_video_generated(&self.pool, scene_id, video_url, narration_url)
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn set_scene_failed(&self, scene_id: &str) -> Result<(), StoreError> {
        SceneRepo::set_failed(&self.pool, scene_id)
            .await
            .map_err(backend_err)?;
        Ok(())
    }
}
