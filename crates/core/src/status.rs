//! Campaign and scene status state machines.
//!
//! Status strings are a stable wire contract consumed by the status
//! endpoint and persisted in the record store; do not rename them.
//! Transitions are monotonic: terminal states accept no further
//! writes, and no edge is reversible. The one exception is crash
//! recovery: a redelivered run re-asserts `veo_generating`, from
//! either `veo_generating` or `merging_video`.

// ---------------------------------------------------------------------------
// CampaignStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a campaign.
///
/// The happy path is linear:
/// `Pending -> CharacterGenerated -> ImagesGenerated -> VideoQueued ->
/// VeoGenerating -> MergingVideo -> VideosGenerated`.
/// `VideoFailed` is terminal and reachable from `VideoQueued`,
/// `VeoGenerating`, and `MergingVideo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStatus {
    Pending,
    CharacterGenerated,
    ImagesGenerated,
    VideoQueued,
    VeoGenerating,
    MergingVideo,
    VideosGenerated,
    VideoFailed,
}

impl CampaignStatus {
    /// String representation for database storage and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::CharacterGenerated => "character_generated",
            CampaignStatus::ImagesGenerated => "images_generated",
            CampaignStatus::VideoQueued => "video_queued",
            CampaignStatus::VeoGenerating => "veo_generating",
            CampaignStatus::MergingVideo => "merging_video",
            CampaignStatus::VideosGenerated => "videos_generated",
            CampaignStatus::VideoFailed => "video_failed",
        }
    }

    /// Parse a persisted status string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CampaignStatus::Pending),
            "character_generated" => Some(CampaignStatus::CharacterGenerated),
            "images_generated" => Some(CampaignStatus::ImagesGenerated),
            "video_queued" => Some(CampaignStatus::VideoQueued),
            "veo_generating" => Some(CampaignStatus::VeoGenerating),
            "merging_video" => Some(CampaignStatus::MergingVideo),
            "videos_generated" => Some(CampaignStatus::VideosGenerated),
            "video_failed" => Some(CampaignStatus::VideoFailed),
            _ => None,
        }
    }

    /// Returns the set of valid target statuses reachable from `self`.
    ///
    /// Terminal states (`VideosGenerated`, `VideoFailed`) return an
    /// empty slice because no further transitions are allowed.
    pub fn valid_transitions(&self) -> &'static [CampaignStatus] {
        use CampaignStatus::*;
        match self {
            Pending => &[CharacterGenerated],
            CharacterGenerated => &[ImagesGenerated],
            ImagesGenerated => &[VideoQueued],
            VideoQueued => &[VeoGenerating, VideoFailed],
            // VeoGenerating may be re-asserted: a crashed run is
            // re-delivered by the task queue and must be able to
            // resume without an invalid-transition error. The same
            // applies to a run lost between the merging_video write
            // and the terminal write.
            VeoGenerating => &[VeoGenerating, MergingVideo, VideoFailed],
            MergingVideo => &[VeoGenerating, VideosGenerated, VideoFailed],
            VideosGenerated | VideoFailed => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(&self, to: CampaignStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a state transition, returning a descriptive error
    /// message for invalid ones.
    pub fn validate_transition(&self, to: CampaignStatus) -> Result<(), String> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid campaign transition: {} -> {}",
                self.as_str(),
                to.as_str()
            ))
        }
    }

    /// Whether this status accepts no further writes.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CampaignStatus::VideosGenerated | CampaignStatus::VideoFailed
        )
    }
}

// ---------------------------------------------------------------------------
// SceneStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a single scene within a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStatus {
    Pending,
    ImageSelected,
    VideoGenerated,
    Failed,
}

impl SceneStatus {
    /// String representation for database storage and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneStatus::Pending => "pending",
            SceneStatus::ImageSelected => "image_selected",
            SceneStatus::VideoGenerated => "video_generated",
            SceneStatus::Failed => "failed",
        }
    }

    /// Parse a persisted status string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SceneStatus::Pending),
            "image_selected" => Some(SceneStatus::ImageSelected),
            "video_generated" => Some(SceneStatus::VideoGenerated),
            "failed" => Some(SceneStatus::Failed),
            _ => None,
        }
    }

    /// Whether this status accepts no further writes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SceneStatus::VideoGenerated | SceneStatus::Failed)
    }
}
