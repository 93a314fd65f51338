//! S3-backed artifact store.
//!
//! Keys are deterministic per campaign and scene, so re-running a
//! stage overwrites the same object and returns the same public URL —
//! uploads are idempotent by key.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use reelgen_core::provider::{ArtifactStore, ProviderError};

/// Artifact store publishing to a single S3 bucket.
#[derive(Clone)]
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, region: String) -> Self {
        Self {
            client,
            bucket,
            region,
        }
    }

    /// Object key for one scene's generated video.
    fn scene_key(product_type: &str, campaign_id: &str, scene_number: i32) -> String {
        format!("campaigns/{product_type}/{campaign_id}/scene_{scene_number}_video.mp4")
    }

    /// Object key for a merged final video.
    fn final_key(filename: &str) -> String {
        format!("campaigns/videos/{filename}")
    }

    /// Public virtual-hosted URL for an object in this bucket.
    fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{key}",
            self.bucket, self.region
        )
    }

    async fn put(&self, key: &str, body: ByteStream) -> Result<String, ProviderError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("video/mp4")
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::temporary(format!("s3 put_object failed for {key}: {e}")))?;
        Ok(self.public_url(key))
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn store_scene_video(
        &self,
        campaign_id: &str,
        product_type: &str,
        scene_number: i32,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError> {
        let key = Self::scene_key(product_type, campaign_id, scene_number);
        let url = self.put(&key, ByteStream::from(bytes)).await?;
        tracing::debug!(campaign_id = %campaign_id, scene = scene_number, %url, "Scene video stored");
        Ok(url)
    }

    async fn publish_final(
        &self,
        local_path: &Path,
        campaign_id: &str,
    ) -> Result<String, ProviderError> {
        let filename = local_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{campaign_id}.mp4"));
        let key = Self::final_key(&filename);

        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            ProviderError::fatal(format!(
                "failed to read final video {}: {e}",
                local_path.display()
            ))
        })?;

        let url = self.put(&key, body).await?;
        tracing::info!(campaign_id = %campaign_id, %url, "Final video published");
        Ok(url)
    }
}
