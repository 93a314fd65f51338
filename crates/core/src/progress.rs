//! Campaign progress reporting.
//!
//! Progress is a pure function of campaign status plus per-scene
//! completion counts, consumed by the status endpoint. The generation
//! band runs from 30% to 70%, split proportionally across completed
//! scenes; merging sits at 80%. A failed campaign reports no progress
//! percentage at all (the caller surfaces the recorded error instead).

use crate::status::CampaignStatus;

/// Derive the campaign progress percentage.
///
/// Returns `None` for a failed campaign. Statuses earlier than
/// `video_queued` report 0.
pub fn campaign_progress(
    status: CampaignStatus,
    total_scenes: usize,
    completed_scenes: usize,
) -> Option<u8> {
    match status {
        CampaignStatus::VideoFailed => None,
        CampaignStatus::VideoQueued => Some(5),
        CampaignStatus::VeoGenerating => {
            if total_scenes == 0 {
                return Some(30);
            }
            let share = (completed_scenes as f64 / total_scenes as f64) * 40.0;
            Some(30 + share as u8)
        }
        CampaignStatus::MergingVideo => Some(80),
        CampaignStatus::VideosGenerated => Some(100),
        _ => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::CampaignStatus::*;

    #[test]
    fn early_statuses_report_zero() {
        assert_eq!(campaign_progress(Pending, 0, 0), Some(0));
        assert_eq!(campaign_progress(CharacterGenerated, 3, 0), Some(0));
        assert_eq!(campaign_progress(ImagesGenerated, 3, 0), Some(0));
    }

    #[test]
    fn queued_is_five_percent() {
        assert_eq!(campaign_progress(VideoQueued, 3, 0), Some(5));
    }

    #[test]
    fn generating_scales_from_30_to_70() {
        assert_eq!(campaign_progress(VeoGenerating, 4, 0), Some(30));
        assert_eq!(campaign_progress(VeoGenerating, 4, 1), Some(40));
        assert_eq!(campaign_progress(VeoGenerating, 4, 2), Some(50));
        assert_eq!(campaign_progress(VeoGenerating, 4, 4), Some(70));
    }

    #[test]
    fn generating_with_no_scenes_loaded_is_30() {
        assert_eq!(campaign_progress(VeoGenerating, 0, 0), Some(30));
    }

    #[test]
    fn merging_is_eighty() {
        assert_eq!(campaign_progress(MergingVideo, 3, 3), Some(80));
    }

    #[test]
    fn completed_is_one_hundred() {
        assert_eq!(campaign_progress(VideosGenerated, 3, 3), Some(100));
    }

    #[test]
    fn failed_reports_none() {
        assert_eq!(campaign_progress(VideoFailed, 3, 1), None);
    }
}
