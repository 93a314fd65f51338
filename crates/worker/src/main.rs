use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelgen_db::store::PgRecordStore;
use reelgen_pipeline::scene::StageConfig;
use reelgen_pipeline::Orchestrator;
use reelgen_providers::ffmpeg::FfmpegAssembler;
use reelgen_providers::s3::S3ArtifactStore;
use reelgen_providers::tts::TtsClient;
use reelgen_providers::veo::VeoClient;
use reelgen_worker::config::WorkerConfig;
use reelgen_worker::queue::{QueueConfig, QueueRunner};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelgen_worker=debug,reelgen_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env();
    tracing::info!(
        veo_model = %config.veo_model,
        s3_bucket = %config.s3_bucket,
        "Loaded worker configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = reelgen_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    reelgen_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Providers ---
    let video = Arc::new(VeoClient::new(
        config.veo_api_url.clone(),
        config.veo_api_key.clone(),
        config.veo_model.clone(),
    ));

    let narration = Arc::new(TtsClient::new(
        config.tts_api_url.clone(),
        config.tts_api_key.clone(),
        config.work_dir.join("narration"),
    ));

    let aws_config = aws_config::load_from_env().await;
    let artifacts = Arc::new(S3ArtifactStore::new(
        aws_sdk_s3::Client::new(&aws_config),
        config.s3_bucket.clone(),
        config.s3_region.clone(),
    ));

    let assembler = Arc::new(FfmpegAssembler::new(config.work_dir.join("merge")));

    // --- Orchestrator ---
    let store = Arc::new(PgRecordStore::new(pool.clone()));
    let orchestrator = Arc::new(Orchestrator::new(
        store,
        video,
        narration,
        assembler,
        artifacts,
        StageConfig::default(),
    ));

    // --- Claim loop ---
    let runner = QueueRunner::new(
        pool,
        orchestrator,
        QueueConfig {
            poll_interval: Duration::from_secs(config.queue_poll_secs),
            redelivery_delay_secs: config.redelivery_delay_secs,
            max_attempts: config.max_attempts,
        },
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    runner.run(cancel).await;
    tracing::info!("Worker shut down");
}

/// Wait for a termination signal to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
