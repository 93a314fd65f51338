//! FFmpeg-based final-video assembler.
//!
//! Downloads the ordered scene clips, muxes each clip with its
//! narration track, then concatenates the results into one file via
//! the concat demuxer. The whole assembly is atomic from the caller's
//! viewpoint: any step failing fails the merge, and partial outputs
//! stay in the campaign's work directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reelgen_core::provider::{ProviderError, VideoAssembler};

/// Error type for FFmpeg operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to download clip {url}: {message}")]
    Download { url: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Assembler shelling out to `ffmpeg`, working under `work_dir`.
pub struct FfmpegAssembler {
    client: reqwest::Client,
    work_dir: PathBuf,
}

impl FfmpegAssembler {
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            work_dir,
        }
    }

    /// Build the concat-demuxer list file contents for the given clip
    /// paths. Single quotes in paths are escaped per ffmpeg's quoting
    /// rules.
    fn build_concat_list(paths: &[PathBuf]) -> String {
        paths
            .iter()
            .map(|p| {
                let escaped = p.to_string_lossy().replace('\'', "'\\''");
                format!("file '{escaped}'\n")
            })
            .collect()
    }

    /// Run `ffmpeg` with the given arguments, failing on a non-zero
    /// exit code.
    async fn run_ffmpeg(args: &[&str]) -> Result<(), FfmpegError> {
        let output = tokio::process::Command::new("ffmpeg")
            .arg("-y")
            .args(args)
            .output()
            .await
            .map_err(FfmpegError::NotFound)?;

        if !output.status.success() {
            return Err(FfmpegError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(())
    }

    /// Download one clip to `dest`.
    async fn download_clip(&self, url: &str, dest: &Path) -> Result<(), FfmpegError> {
        let err = |message: String| FfmpegError::Download {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(err(format!("HTTP {}", response.status())));
        }
        let bytes = response.bytes().await.map_err(|e| err(e.to_string()))?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }

    /// Mux a narration track onto a clip. Video is stream-copied; the
    /// output is trimmed to the shorter of the two inputs.
    async fn mux_narration(
        clip: &Path,
        narration: &Path,
        dest: &Path,
    ) -> Result<(), FfmpegError> {
        Self::run_ffmpeg(&[
            "-i",
            &clip.to_string_lossy(),
            "-i",
            &narration.to_string_lossy(),
            "-map",
            "0:v",
            "-map",
            "1:a",
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-shortest",
            &dest.to_string_lossy(),
        ])
        .await
    }

    async fn assemble_inner(
        &self,
        clips: &[String],
        narration: &[String],
        campaign_id: &str,
    ) -> Result<PathBuf, FfmpegError> {
        let dir = self.work_dir.join(campaign_id);
        tokio::fs::create_dir_all(&dir).await?;

        // Download each clip and attach its narration track. A scene
        // with no narration (empty path) is concatenated as-is.
        let mut voiced: Vec<PathBuf> = Vec::with_capacity(clips.len());
        for (i, (clip_url, narration_path)) in clips.iter().zip(narration).enumerate() {
            let raw = dir.join(format!("scene_{i}.mp4"));
            self.download_clip(clip_url, &raw).await?;

            if narration_path.is_empty() {
                voiced.push(raw);
                continue;
            }

            let out = dir.join(format!("scene_{i}_voiced.mp4"));
            Self::mux_narration(&raw, Path::new(narration_path), &out).await?;
            voiced.push(out);
        }

        // Concatenate in order.
        let list_path = dir.join("concat.txt");
        tokio::fs::write(&list_path, Self::build_concat_list(&voiced)).await?;

        let final_path = dir.join("final_ad.mp4");
        Self::run_ffmpeg(&[
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            &list_path.to_string_lossy(),
            "-c",
            "copy",
            &final_path.to_string_lossy(),
        ])
        .await?;

        Ok(final_path)
    }
}

#[async_trait]
impl VideoAssembler for FfmpegAssembler {
    async fn assemble(
        &self,
        clips: &[String],
        narration: &[String],
        campaign_id: &str,
    ) -> Result<PathBuf, ProviderError> {
        tracing::info!(
            campaign_id = %campaign_id,
            clips = clips.len(),
            "Assembling final video"
        );
        self.assemble_inner(clips, narration, campaign_id)
            .await
            .map_err(|e| ProviderError::fatal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_list_is_ordered() {
        let paths = vec![PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/b.mp4")];
        assert_eq!(
            FfmpegAssembler::build_concat_list(&paths),
            "file '/tmp/a.mp4'\nfile '/tmp/b.mp4'\n"
        );
    }

    #[test]
    fn concat_list_escapes_single_quotes() {
        let paths = vec![PathBuf::from("/tmp/it's.mp4")];
        assert_eq!(
            FfmpegAssembler::build_concat_list(&paths),
            "file '/tmp/it'\\''s.mp4'\n"
        );
    }

    #[test]
    fn concat_list_empty() {
        assert_eq!(FfmpegAssembler::build_concat_list(&[]), "");
    }
}
