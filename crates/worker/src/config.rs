use std::path::PathBuf;

/// Worker configuration loaded from environment variables.
///
/// Provider credentials are required; everything else has defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Idle delay between queue polls when no campaign is claimable
    /// (default: `5`).
    pub queue_poll_secs: u64,
    /// Base redelivery delay for a claimed campaign; scales with the
    /// attempt count (default: `600`).
    pub redelivery_delay_secs: i64,
    /// Queue delivery attempts before a campaign is permanently failed
    /// (default: `3`).
    pub max_attempts: i32,

    /// Base URL of the Veo video-synthesis API.
    pub veo_api_url: String,
    /// Veo API key.
    pub veo_api_key: String,
    /// Veo model name (default: `veo-3.1-generate-preview`).
    pub veo_model: String,

    /// Base URL of the TTS API.
    pub tts_api_url: String,
    /// TTS API key.
    pub tts_api_key: String,

    /// S3 bucket for published artifacts.
    pub s3_bucket: String,
    /// AWS region used in public artifact URLs (default: `us-east-1`).
    pub s3_region: String,

    /// Local scratch directory for downloads and merges
    /// (default: `/tmp/reelgen`).
    pub work_dir: PathBuf,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                 |
    /// |--------------------------|-----------------------------------------|
    /// | `QUEUE_POLL_SECS`        | `5`                                     |
    /// | `REDELIVERY_DELAY_SECS`  | `600`                                   |
    /// | `QUEUE_MAX_ATTEMPTS`     | `3`                                     |
    /// | `VEO_API_URL`            | `https://generativelanguage.googleapis.com` |
    /// | `VEO_API_KEY`            | (required)                              |
    /// | `VEO_MODEL`              | `veo-3.1-generate-preview`              |
    /// | `TTS_API_URL`            | `https://api.elevenlabs.io`             |
    /// | `TTS_API_KEY`            | (required)                              |
    /// | `S3_BUCKET`              | (required)                              |
    /// | `AWS_REGION`             | `us-east-1`                             |
    /// | `WORK_DIR`               | `/tmp/reelgen`                          |
    pub fn from_env() -> Self {
        let queue_poll_secs: u64 = std::env::var("QUEUE_POLL_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("QUEUE_POLL_SECS must be a valid u64");

        let redelivery_delay_secs: i64 = std::env::var("REDELIVERY_DELAY_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("REDELIVERY_DELAY_SECS must be a valid i64");

        let max_attempts: i32 = std::env::var("QUEUE_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("QUEUE_MAX_ATTEMPTS must be a valid i32");

        let veo_api_url = std::env::var("VEO_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into());
        let veo_api_key = std::env::var("VEO_API_KEY").expect("VEO_API_KEY must be set");
        let veo_model = std::env::var("VEO_MODEL")
            .unwrap_or_else(|_| "veo-3.1-generate-preview".into());

        let tts_api_url =
            std::env::var("TTS_API_URL").unwrap_or_else(|_| "https://api.elevenlabs.io".into());
        let tts_api_key = std::env::var("TTS_API_KEY").expect("TTS_API_KEY must be set");

        let s3_bucket = std::env::var("S3_BUCKET").expect("S3_BUCKET must be set");
        let s3_region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into());

        let work_dir =
            PathBuf::from(std::env::var("WORK_DIR").unwrap_or_else(|_| "/tmp/reelgen".into()));

        Self {
            queue_poll_secs,
            redelivery_delay_secs,
            max_attempts,
            veo_api_url,
            veo_api_key,
            veo_model,
            tts_api_url,
            tts_api_key,
            s3_bucket,
            s3_region,
            work_dir,
        }
    }
}
