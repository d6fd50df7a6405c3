use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::{
    controllers::{
        generation::GenerationController, genre::GenreController, health,
        session::SessionController, voice::VoiceController,
    },
    infrastructure::auth::{
        auth_middleware, navigation_guard, optional_auth_middleware, request_id_middleware,
        NavigationGuardState,
    },
};

use crate::infrastructure::repositories::{UserRepository, VoiceRepository};

/// Multipart framing on top of the raw sample size
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the application router: JSON APIs plus the gated frontend bundle
#[allow(clippy::too_many_arguments)]
pub fn build_router(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    user_repo: Arc<dyn UserRepository>,
    voice_repo: Arc<dyn VoiceRepository>,
    voice_controller: Arc<VoiceController>,
    session_controller: Arc<SessionController>,
    generation_controller: Arc<GenerationController>,
    genre_controller: Arc<GenreController>,
) -> Router {
    let auth_state = (user_repo.clone(), config.clone());

    // Voice routes (require authentication)
    let voice_routes = Router::new()
        .route(
            "/api/voices",
            get(VoiceController::list_own_voices).post(VoiceController::create_voice),
        )
        .route("/api/voices/saved", get(VoiceController::list_saved_voices))
        .route(
            "/api/voices/:voice_id",
            axum::routing::patch(VoiceController::update_voice).delete(VoiceController::delete_voice),
        )
        .route(
            "/api/voices/:voice_id/save",
            post(VoiceController::save_voice).delete(VoiceController::unsave_voice),
        )
        .with_state(voice_controller.clone())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Voice routes readable anonymously
    let public_voice_routes = Router::new()
        .route("/api/voices/public", get(VoiceController::list_public_voices))
        .route("/api/voices/:voice_id", get(VoiceController::get_voice))
        .route("/api/voices/:voice_id/audio", get(VoiceController::get_voice_audio))
        .with_state(voice_controller)
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            optional_auth_middleware,
        ));

    // Genre routes (admin checks happen in the service)
    let genre_routes = Router::new()
        .route(
            "/api/genres",
            get(GenreController::list_genres).post(GenreController::create_genre),
        )
        .route(
            "/api/genres/:genre_id",
            axum::routing::delete(GenreController::delete_genre),
        )
        .with_state(genre_controller)
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Session routes (require authentication)
    let session_routes = Router::new()
        .route(
            "/api/sessions",
            get(SessionController::list_sessions).post(SessionController::create_session),
        )
        .route(
            "/api/sessions/:session_id",
            get(SessionController::get_session)
                .patch(SessionController::rename_session)
                .delete(SessionController::delete_session),
        )
        .route(
            "/api/sessions/:session_id/generations",
            get(SessionController::list_generations).post(SessionController::generate),
        )
        .with_state(session_controller)
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Generation routes (require authentication)
    let generation_routes = Router::new()
        .route(
            "/api/generations/:generation_id",
            axum::routing::patch(GenerationController::update_feedback)
                .delete(GenerationController::delete_generation),
        )
        .route(
            "/api/generations/:generation_id/audio",
            get(GenerationController::get_audio),
        )
        .route(
            "/api/generations/:generation_id/url",
            get(GenerationController::get_signed_url),
        )
        .with_state(generation_controller)
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    // Everything else is the frontend bundle behind the page gate
    let frontend = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(
            NavigationGuardState {
                user_repo,
                voice_repo,
                config: config.clone(),
            },
            navigation_guard,
        ))
        .service(
            ServeDir::new(&config.static_dir)
                .fallback(ServeFile::new(config.static_dir.join("index.html"))),
        );

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(voice_routes)
        .merge(public_voice_routes)
        .merge(genre_routes)
        .merge(session_routes)
        .merge(generation_routes)
        .fallback_service(frontend)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http());

    if config.is_development() {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the HTTP server
pub async fn start_http_server(
    app: Router,
    config: Arc<Config>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
