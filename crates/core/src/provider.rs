//! Boundary contracts for the external generation providers.
//!
//! The pipeline never talks to a concrete service directly: it is
//! handed trait objects constructed by the binary (`reelgen-worker`),
//! so tests can substitute scripted providers. Error classification
//! happens at the adapter boundary — adapters map their transport
//! errors into [`ProviderErrorKind`], and the retry policy consumes
//! that closed enumeration instead of matching on message text.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::narration::{BusinessIdentity, TextOverlay};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Classified outcome signal of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Rate limit or quota exhaustion (HTTP 429, RESOURCE_EXHAUSTED).
    RateLimited,
    /// The provider or transport timed out.
    Timeout,
    /// A provider-reported temporary condition (5xx, "temporarily
    /// unavailable").
    Temporary,
    /// The job completed but produced no artifacts.
    EmptyResult,
    /// Anything else. Never retried.
    Fatal,
}

impl ProviderErrorKind {
    /// Whether the backoff policy may spend retry budget on this kind.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProviderErrorKind::Fatal)
    }
}

/// An error from a remote generation provider, classified at the
/// adapter boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn temporary(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Temporary, message)
    }

    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::EmptyResult, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Fatal, message)
    }
}

// ---------------------------------------------------------------------------
// Remote operation types (ephemeral, never persisted)
// ---------------------------------------------------------------------------

/// Opaque handle to a submitted long-running remote job.
#[derive(Debug, Clone)]
pub struct RemoteOperation {
    /// Provider-assigned operation name/ID.
    pub id: String,
}

/// Reference to a completed job result, passed back to the provider's
/// `fetch` to download the artifact bytes.
#[derive(Debug, Clone)]
pub struct JobResult {
    /// Provider-scoped URI or handle of the generated artifact.
    pub uri: String,
}

/// One poll observation of a remote operation.
#[derive(Debug, Clone, Default)]
pub struct JobPoll {
    /// Whether the provider reports the operation as finished.
    pub done: bool,
    /// Present when the job finished and produced an artifact.
    pub result: Option<JobResult>,
    /// Present when the job finished with a provider-side error.
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Video synthesis
// ---------------------------------------------------------------------------

/// Inputs for one video-synthesis submission.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    /// Selected still image feeding the video stage (S3 key or URL).
    pub image_handle: String,
    /// Motion/style directive resolved from the scene role.
    pub directive: String,
    /// Output framing string, e.g. `16:9`.
    pub aspect_ratio: &'static str,
    /// Optional on-screen text overlay.
    pub overlay: Option<TextOverlay>,
    /// Optional business-identity watermark.
    pub watermark: Option<BusinessIdentity>,
}

/// Long-running image-to-video synthesis service.
#[async_trait]
pub trait VideoSynthesizer: Send + Sync {
    /// Submit a new video generation job. Each call starts a fresh
    /// remote job; retries never resume a failed one.
    async fn submit(&self, request: &VideoRequest) -> Result<RemoteOperation, ProviderError>;

    /// Query the status of a previously submitted job.
    async fn poll(&self, operation: &RemoteOperation) -> Result<JobPoll, ProviderError>;

    /// Download the generated video bytes for a completed job.
    async fn fetch(&self, result: &JobResult) -> Result<Vec<u8>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Narration synthesis
// ---------------------------------------------------------------------------

/// Text-to-speech service. Synchronous from the pipeline's viewpoint:
/// one call yields a local audio file handle.
#[async_trait]
pub trait NarrationSynthesizer: Send + Sync {
    /// Synthesize spoken narration, returning a local audio file path.
    async fn synthesize(&self, text: &str) -> Result<String, ProviderError>;
}

// ---------------------------------------------------------------------------
// Merge tool
// ---------------------------------------------------------------------------

/// Combines ordered scene clips and narration tracks into one final
/// advertisement file. Opaque and atomic: partial merges are not
/// surfaced.
#[async_trait]
pub trait VideoAssembler: Send + Sync {
    /// Assemble the final video, returning its local path.
    ///
    /// `clips` and `narration` are ordered by scene ordinal and have
    /// equal length.
    async fn assemble(
        &self,
        clips: &[String],
        narration: &[String],
        campaign_id: &str,
    ) -> Result<PathBuf, ProviderError>;
}

// ---------------------------------------------------------------------------
// Durable storage
// ---------------------------------------------------------------------------

/// Durable artifact storage. Uploads are idempotent by key: re-running
/// a stage overwrites the same object and returns the same handle.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store one scene's generated video bytes, returning its public URL.
    async fn store_scene_video(
        &self,
        campaign_id: &str,
        product_type: &str,
        scene_number: i32,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError>;

    /// Publish the merged final video, returning its public URL.
    async fn publish_final(
        &self,
        local_path: &std::path::Path,
        campaign_id: &str,
    ) -> Result<String, ProviderError>;
}
