pub mod campaign_repo;
pub mod scene_repo;
