use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voicecast_backend::app::{build_app, AppDependencies};
use voicecast_backend::infrastructure::config::{Config, LogFormat};
use voicecast_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use voicecast_backend::infrastructure::http::start_http_server;
use voicecast_backend::infrastructure::repositories::{
    HttpTtsRepository, PgGeneratedAudioRepository, PgGenreRepository, PgSavedVoiceRepository,
    PgSessionRepository, PgUserRepository, PgVoiceRepository,
};
use voicecast_backend::infrastructure::storage::S3BlobStore;
use voicecast_backend::infrastructure::transcoder::FfmpegTranscoder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Voicecast Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    tracing::info!("Initializing S3 client with region: {}", config.aws_region);

    let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
    let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    tracing::info!(
        has_access_key_id = has_access_key,
        has_secret_access_key = has_secret_key,
        "AWS credentials environment check"
    );

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    let blob_store = Arc::new(S3BlobStore::from_sdk_config(
        &aws_config,
        config.s3_endpoint_url.as_deref(),
    ));
    tracing::info!(
        reference_bucket = %config.reference_audio_bucket,
        generated_bucket = %config.generated_audio_bucket,
        "Blob storage initialized"
    );

    let transcoder = Arc::new(FfmpegTranscoder::new(config.ffmpeg_path.clone()));
    if !transcoder.check_availability().await {
        tracing::warn!("ffmpeg is not available; non-WAV uploads will fail to convert");
    }

    let tts_repo = Arc::new(HttpTtsRepository::new(
        &config.tts_engine_url,
        Duration::from_secs(config.tts_engine_timeout_secs),
    )?);

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    tracing::info!("Instantiating repositories...");
    let deps = AppDependencies {
        user_repo: Arc::new(PgUserRepository::new(pool.clone())),
        voice_repo: Arc::new(PgVoiceRepository::new(pool.clone())),
        saved_voice_repo: Arc::new(PgSavedVoiceRepository::new(pool.clone())),
        session_repo: Arc::new(PgSessionRepository::new(pool.clone())),
        generated_audio_repo: Arc::new(PgGeneratedAudioRepository::new(pool.clone())),
        genre_repo: Arc::new(PgGenreRepository::new(pool.clone())),
        tts_repo,
        blob_store,
        transcoder,
    };

    let app = build_app(pool, config.clone(), deps);

    // Start HTTP server with all routes
    start_http_server(app, config).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voicecast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voicecast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
