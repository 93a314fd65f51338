//! Routes for the `/campaign` resource.
//!
//! ```text
//! POST /                      create a campaign with its scene slots
//! GET  /{id}                  campaign + ordered scenes + progress
//! POST /{id}/generate-videos  queue the video generation run
//! ```
//!
//! Handlers here are thin: all heavy work happens in the worker. The
//! generate-videos endpoint only validates preconditions, persists the
//! business identity, and flips the campaign to `video_queued`; callers
//! poll the GET endpoint for progress afterwards.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use reelgen_core::error::CoreError;
use reelgen_core::narration::BusinessIdentity;
use reelgen_core::progress::campaign_progress;
use reelgen_core::status::{CampaignStatus, SceneStatus};
use reelgen_core::types::new_entity_id;
use reelgen_db::models::campaign::{Campaign, CreateCampaign};
use reelgen_db::models::scene::{CampaignScene, CreateScene};
use reelgen_db::repositories::campaign_repo::CampaignRepo;
use reelgen_db::repositories::scene_repo::SceneRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub scenes: Vec<CampaignScene>,
    /// Derived percentage; absent for a failed campaign.
    pub progress: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateVideosRequest {
    pub business_name: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub prompt: String,
    #[serde(default = "default_num_scenes")]
    pub num_scenes: i32,
    #[serde(default = "default_product_type")]
    pub product_type: String,
    pub campaign_theme: Option<String>,
    /// Optional per-scene plan, ordinal order. Missing slots are
    /// created empty for the upstream image stage to fill in.
    #[serde(default)]
    pub scenes: Vec<CreateSceneRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSceneRequest {
    pub title: Option<String>,
    pub role: Option<String>,
    pub visual_prompt: Option<String>,
}

fn default_num_scenes() -> i32 {
    4
}

fn default_product_type() -> String {
    "default".to_string()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A scene counts toward generation when it has a selected image and
/// its ordinal is within the campaign's declared scene count.
fn is_eligible(scene: &CampaignScene, num_scenes: i32) -> bool {
    scene.selected_image_url.is_some() && scene.scene_number <= num_scenes
}

/// Eligible and completed scene counts feeding the progress formula.
fn scene_counts(scenes: &[CampaignScene], num_scenes: i32) -> (usize, usize) {
    let eligible: Vec<_> = scenes.iter().filter(|s| is_eligible(s, num_scenes)).collect();
    let completed = eligible
        .iter()
        .filter(|s| SceneStatus::parse(&s.status) == Some(SceneStatus::VideoGenerated))
        .count();
    (eligible.len(), completed)
}

fn parse_status(campaign: &Campaign) -> CampaignStatus {
    CampaignStatus::parse(&campaign.status).unwrap_or(CampaignStatus::Pending)
}

/// Validate a creation request. The declared scene count bounds the
/// plan: extra planned scenes would be permanently ineligible.
fn validate_create(req: &CreateCampaignRequest) -> Result<(), String> {
    if req.prompt.trim().is_empty() {
        return Err("prompt must not be empty".into());
    }
    if req.num_scenes < 1 {
        return Err("num_scenes must be at least 1".into());
    }
    if req.scenes.len() > req.num_scenes as usize {
        return Err(format!(
            "scene plan has {} entries but num_scenes is {}",
            req.scenes.len(),
            req.num_scenes
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /campaign -- create a campaign and its scene slots.
async fn create_campaign(
    State(state): State<AppState>,
    Json(body): Json<CreateCampaignRequest>,
) -> AppResult<(StatusCode, Json<CampaignResponse>)> {
    validate_create(&body).map_err(AppError::BadRequest)?;

    let campaign = CampaignRepo::create(
        &state.pool,
        &CreateCampaign {
            id: new_entity_id("camp"),
            user_prompt: body.prompt,
            num_scenes: body.num_scenes,
            product_type: body.product_type,
            campaign_theme: body.campaign_theme,
            character_image_url: None,
            status: CampaignStatus::Pending.as_str().to_string(),
        },
    )
    .await?;

    // One row per declared ordinal; planned scenes fill the early
    // slots, the rest stay empty until the image stage runs.
    let mut scenes = Vec::with_capacity(body.num_scenes as usize);
    let mut plan = body.scenes.into_iter();
    for ordinal in 1..=body.num_scenes {
        let planned = plan.next();
        let scene = SceneRepo::create(
            &state.pool,
            &CreateScene {
                id: new_entity_id("scene"),
                campaign_id: campaign.id.clone(),
                scene_number: ordinal,
                scene_title: planned.as_ref().and_then(|p| p.title.clone()),
                role: planned.as_ref().and_then(|p| p.role.clone()),
                visual_prompt: planned.and_then(|p| p.visual_prompt),
                status: SceneStatus::Pending.as_str().to_string(),
            },
        )
        .await?;
        scenes.push(scene);
    }

    tracing::info!(campaign_id = %campaign.id, scenes = scenes.len(), "Campaign created");

    Ok((
        StatusCode::CREATED,
        Json(CampaignResponse {
            campaign,
            scenes,
            progress: Some(0),
        }),
    ))
}

/// GET /campaign/{id} -- campaign with its ordered scenes and derived
/// progress percentage.
async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CampaignResponse>> {
    let campaign = CampaignRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: id.clone(),
        }))?;

    let scenes = SceneRepo::list_by_campaign(&state.pool, &id).await?;
    let (total, completed) = scene_counts(&scenes, campaign.num_scenes);
    let progress = campaign_progress(parse_status(&campaign), total, completed);

    Ok(Json(CampaignResponse {
        campaign,
        scenes,
        progress,
    }))
}

/// POST /campaign/{id}/generate-videos -- validate preconditions and
/// queue the campaign for video generation.
async fn generate_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<GenerateVideosRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let campaign = CampaignRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: id.clone(),
        }))?;

    if campaign.character_image_url.is_none() {
        return Err(AppError::BadRequest(
            "Campaign has no character reference image".into(),
        ));
    }

    let status = parse_status(&campaign);
    if !status.can_transition(CampaignStatus::VideoQueued) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot queue video generation from status '{}'",
            campaign.status
        ))));
    }

    let scenes = SceneRepo::list_by_campaign(&state.pool, &id).await?;
    if !scenes.iter().any(|s| is_eligible(s, campaign.num_scenes)) {
        return Err(AppError::BadRequest(
            "No scenes with a selected image to generate".into(),
        ));
    }

    let business = BusinessIdentity {
        name: body.business_name,
        phone: body.phone_number,
        website: body.website,
    };
    CampaignRepo::enqueue_videos(&state.pool, &id, &business).await?;

    tracing::info!(campaign_id = %id, "Campaign queued for video generation");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "id": id, "status": "video_queued" })),
    ))
}

/// Routes mounted at `/campaign`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_campaign))
        .route("/{id}", get(get_campaign))
        .route("/{id}/generate-videos", post(generate_videos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn scene(number: i32, image: Option<&str>, status: &str) -> CampaignScene {
        CampaignScene {
            id: format!("scene_{number}"),
            campaign_id: "camp_1".to_string(),
            scene_number: number,
            scene_title: None,
            role: None,
            visual_prompt: None,
            selected_image_url: image.map(str::to_string),
            headline: None,
            subtext: None,
            cta: None,
            video_url: None,
            narration_url: None,
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn counts_only_eligible_scenes() {
        let scenes = vec![
            scene(1, Some("s3://a"), "video_generated"),
            scene(2, None, "pending"),
            scene(3, Some("s3://c"), "image_selected"),
            // Beyond the declared count.
            scene(4, Some("s3://d"), "video_generated"),
        ];
        assert_eq!(scene_counts(&scenes, 3), (2, 1));
    }

    #[test]
    fn no_scenes_counts_zero() {
        assert_eq!(scene_counts(&[], 3), (0, 0));
    }

    #[test]
    fn failed_scene_is_eligible_but_not_completed() {
        let scenes = vec![scene(1, Some("s3://a"), "failed")];
        assert_eq!(scene_counts(&scenes, 1), (1, 0));
    }

    fn create_request(num_scenes: i32, planned: usize) -> CreateCampaignRequest {
        CreateCampaignRequest {
            prompt: "a salon ad".to_string(),
            num_scenes,
            product_type: "beauty".to_string(),
            campaign_theme: None,
            scenes: (0..planned)
                .map(|_| CreateSceneRequest {
                    title: None,
                    role: None,
                    visual_prompt: None,
                })
                .collect(),
        }
    }

    #[test]
    fn create_accepts_plan_within_declared_count() {
        assert!(validate_create(&create_request(4, 0)).is_ok());
        assert!(validate_create(&create_request(4, 4)).is_ok());
    }

    #[test]
    fn create_rejects_oversized_plan_and_bad_counts() {
        assert!(validate_create(&create_request(2, 3)).is_err());
        assert!(validate_create(&create_request(0, 0)).is_err());
    }

    #[test]
    fn create_rejects_blank_prompt() {
        let mut req = create_request(4, 0);
        req.prompt = "   ".to_string();
        assert!(validate_create(&req).is_err());
    }
}
