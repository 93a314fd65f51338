//! Pipeline error taxonomy.

use std::time::Duration;

use reelgen_core::provider::ProviderError;
use reelgen_core::store::StoreError;

/// Errors surfaced by the campaign pipeline.
///
/// Scene-level errors are caught at the scene-executor boundary and
/// downgrade that scene to `failed`; the variants here that reach the
/// orchestrator's caller are campaign-fatal and always have a matching
/// error detail written to the campaign record first.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A provider call failed (classification in [`ProviderError::kind`]).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The poller's wall-clock ceiling elapsed before the remote job
    /// reported completion. Distinct from provider errors: the remote
    /// job may still be running, but this attempt gives up on it.
    #[error("remote operation timed out after {elapsed:?}")]
    OperationTimeout { elapsed: Duration },

    /// No scene has a selected image within the declared scene count.
    #[error("no eligible scenes: no scene has a selected image")]
    NoEligibleScenes,

    /// Every eligible scene failed; there is nothing to merge.
    #[error("no scene videos produced")]
    NoScenesProduced,

    /// The merge tool failed to assemble or publish the final video.
    #[error("merge failed: {0}")]
    MergeFailed(String),

    /// The campaign does not exist in the record store.
    #[error("campaign not found: {0}")]
    CampaignNotFound(String),

    /// A status transition violated the campaign state machine.
    #[error("{0}")]
    InvalidTransition(String),

    /// The record store itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
