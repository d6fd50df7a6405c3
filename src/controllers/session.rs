use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::generation::{GenerateRequest, GenerationResponse};
use crate::domain::session::{CreateSessionRequest, RenameSessionRequest, SessionResponse};
use crate::{
    domain::generation::{GenerationService, GenerationServiceApi},
    domain::session::{SessionService, SessionServiceApi},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct SessionController {
    session_service: Arc<SessionService>,
    generation_service: Arc<GenerationService>,
}

impl SessionController {
    pub fn new(
        session_service: Arc<SessionService>,
        generation_service: Arc<GenerationService>,
    ) -> Self {
        Self {
            session_service,
            generation_service,
        }
    }

    /// GET /api/sessions - Most recently active first
    pub async fn list_sessions(
        State(controller): State<Arc<SessionController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<SessionResponse>>> {
        let sessions = controller
            .session_service
            .list_sessions(&auth_user.principal())
            .await?;
        Ok(Json(sessions))
    }

    /// POST /api/sessions - Body is optional
    pub async fn create_session(
        State(controller): State<Arc<SessionController>>,
        Extension(auth_user): Extension<AuthUser>,
        request: Option<Json<CreateSessionRequest>>,
    ) -> AppResult<(StatusCode, Json<SessionResponse>)> {
        let request = request.map(|Json(r)| r).unwrap_or_default();
        let session = controller
            .session_service
            .create_session(&auth_user.principal(), request)
            .await?;
        Ok((StatusCode::CREATED, Json(session)))
    }

    /// GET /api/sessions/{session_id}
    pub async fn get_session(
        State(controller): State<Arc<SessionController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        let session = controller
            .session_service
            .get_session(&auth_user.principal(), session_id)
            .await?;
        Ok(Json(session))
    }

    /// PATCH /api/sessions/{session_id}
    pub async fn rename_session(
        State(controller): State<Arc<SessionController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<RenameSessionRequest>,
    ) -> AppResult<Json<SessionResponse>> {
        let session = controller
            .session_service
            .rename_session(&auth_user.principal(), session_id, request)
            .await?;
        Ok(Json(session))
    }

    /// DELETE /api/sessions/{session_id}
    pub async fn delete_session(
        State(controller): State<Arc<SessionController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .session_service
            .delete_session(&auth_user.principal(), session_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /api/sessions/{session_id}/generations
    pub async fn list_generations(
        State(controller): State<Arc<SessionController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<Vec<GenerationResponse>>> {
        let generations = controller
            .session_service
            .list_generations(&auth_user.principal(), session_id)
            .await?;
        Ok(Json(generations))
    }

    /// POST /api/sessions/{session_id}/generations - Synthesize a clip
    pub async fn generate(
        State(controller): State<Arc<SessionController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<GenerateRequest>,
    ) -> AppResult<(StatusCode, Json<GenerationResponse>)> {
        let generation = controller
            .generation_service
            .generate(&auth_user.principal(), session_id, request)
            .await?;
        Ok((StatusCode::CREATED, Json(generation)))
    }
}
