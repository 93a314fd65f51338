//! Campaign claim loop.
//!
//! Claims one queued campaign at a time via the locked database claim
//! and runs it through the orchestrator. At-least-once delivery: a
//! claim pushes the campaign's redelivery time forward, so a run lost
//! to a crash is reclaimed after the delay. Delivery attempts beyond
//! the configured ceiling fail the campaign permanently.

use std::sync::Arc;
use std::time::Duration;

use reelgen_core::narration::BusinessIdentity;
use reelgen_db::models::campaign::Campaign;
use reelgen_db::repositories::campaign_repo::CampaignRepo;
use reelgen_db::DbPool;
use reelgen_pipeline::Orchestrator;
use tokio_util::sync::CancellationToken;

/// Queue loop tunables.
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    /// Idle delay between polls when nothing is claimable.
    pub poll_interval: Duration,
    /// Base redelivery delay handed to the claim.
    pub redelivery_delay_secs: i64,
    /// Delivery attempts before a campaign is permanently failed.
    pub max_attempts: i32,
}

/// Runs the claim loop for one worker process.
pub struct QueueRunner {
    pool: DbPool,
    orchestrator: Arc<Orchestrator>,
    config: QueueConfig,
}

impl QueueRunner {
    pub fn new(pool: DbPool, orchestrator: Arc<Orchestrator>, config: QueueConfig) -> Self {
        Self {
            pool,
            orchestrator,
            config,
        }
    }

    /// Run until `cancel` is triggered. An in-flight campaign run is
    /// finished before the loop exits; the locked claim makes an
    /// abandoned one safe to redeliver anyway.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            poll_secs = self.config.poll_interval.as_secs(),
            max_attempts = self.config.max_attempts,
            "Queue runner started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            match CampaignRepo::claim_next_queued(&self.pool, self.config.redelivery_delay_secs)
                .await
            {
                Ok(Some(campaign)) => self.process(campaign).await,
                Ok(None) => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Queue claim failed");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!("Queue runner stopping");
    }

    /// Run one claimed campaign to a terminal status.
    async fn process(&self, campaign: Campaign) {
        // The claim already incremented the counter, so `attempts` is
        // the 1-based number of this delivery.
        if campaign.attempts > self.config.max_attempts {
            tracing::error!(
                campaign_id = %campaign.id,
                attempts = campaign.attempts,
                "Campaign exhausted its delivery attempts, failing permanently"
            );
            if let Err(e) = CampaignRepo::fail(
                &self.pool,
                &campaign.id,
                "video generation attempts exhausted",
            )
            .await
            {
                tracing::error!(campaign_id = %campaign.id, error = %e, "Failed to record exhaustion");
            }
            return;
        }

        tracing::info!(
            campaign_id = %campaign.id,
            attempt = campaign.attempts,
            "Processing claimed campaign"
        );

        let business = business_identity(&campaign);
        match self
            .orchestrator
            .run(&campaign.id, business.as_ref())
            .await
        {
            Ok(final_url) => {
                tracing::info!(campaign_id = %campaign.id, final_url = %final_url, "Campaign run succeeded");
            }
            // The orchestrator has already written the terminal status
            // and error detail for every fatal path; nothing to do here
            // but log.
            Err(e) => {
                tracing::error!(campaign_id = %campaign.id, error = %e, "Campaign run failed");
            }
        }
    }
}

/// Business-identity metadata captured at enqueue time, if any field
/// was supplied.
fn business_identity(campaign: &Campaign) -> Option<BusinessIdentity> {
    if campaign.business_name.is_none()
        && campaign.phone_number.is_none()
        && campaign.website.is_none()
    {
        return None;
    }
    Some(BusinessIdentity {
        name: campaign.business_name.clone(),
        phone: campaign.phone_number.clone(),
        website: campaign.website.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn campaign() -> Campaign {
        Campaign {
            id: "camp_1".to_string(),
            user_prompt: "a salon ad".to_string(),
            num_scenes: 4,
            product_type: "beauty".to_string(),
            campaign_theme: None,
            character_image_url: Some("s3://character".to_string()),
            business_name: None,
            phone_number: None,
            website: None,
            final_video_url: None,
            generation_error: None,
            status: "video_queued".to_string(),
            attempts: 1,
            next_attempt_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn no_business_fields_means_no_identity() {
        assert!(business_identity(&campaign()).is_none());
    }

    #[test]
    fn any_business_field_builds_the_identity() {
        let mut c = campaign();
        c.phone_number = Some("555-0147".to_string());
        let identity = business_identity(&c).unwrap();
        assert_eq!(identity.phone.as_deref(), Some("555-0147"));
        assert!(identity.name.is_none());
    }
}
