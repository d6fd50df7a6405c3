use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Blob storage
    pub aws_region: String,
    pub s3_endpoint_url: Option<String>,
    pub reference_audio_bucket: String,
    pub generated_audio_bucket: String,
    pub signed_url_ttl_secs: u64,
    // Audio pipeline
    pub ffmpeg_path: String,
    pub scratch_dir: PathBuf,
    pub max_upload_bytes: usize,
    // TTS engine
    pub tts_engine_url: String,
    pub tts_engine_timeout_secs: u64,
    pub reference_cache_enabled: bool,
    // Frontend bundle served behind the navigation gate
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|s| s.trim().to_lowercase() == "true")
        .unwrap_or(false)
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            s3_endpoint_url: env::var("S3_ENDPOINT_URL").ok().filter(|s| !s.is_empty()),
            reference_audio_bucket: env::var("REFERENCE_AUDIO_BUCKET")
                .unwrap_or_else(|_| "reference-audio".to_string()),
            generated_audio_bucket: env::var("GENERATED_AUDIO_BUCKET")
                .unwrap_or_else(|_| "generated-audio".to_string()),
            signed_url_ttl_secs: env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()?,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse()?,
            tts_engine_url: env::var("TTS_ENGINE_URL")?,
            tts_engine_timeout_secs: env::var("TTS_ENGINE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()?,
            reference_cache_enabled: flag("REFERENCE_CACHE_ENABLED"),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public")),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
